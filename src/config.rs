//! Run configuration and the file names derived from it.

use crate::error::{Error, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub const DEFAULT_PATTERN: &str = ";Python";
pub const DEFAULT_EXTENSION: &str = ".gcode";
pub const DEFAULT_INTERPRETER: &str = "python3";

/// G-code comment character. Stripped from code lines inside a block.
pub const COMMENT_CHAR: char = ';';

const BACKUP_SUFFIX: &str = "_original.gcode";

static GCODE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.gcode$").expect("valid regex"));

/// Settings for one preprocessing run. Built once, then only borrowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Marker prefix identifying embedded code lines.
    pub pattern: String,
    /// Replaces the `.gcode` suffix of the input to form the output file name.
    pub extension: String,
    /// Write over the input without keeping a backup copy.
    pub override_original: bool,
    /// Executable that runs the assembled script.
    pub interpreter: String,
    /// Reject documents that end inside a code block.
    pub strict_blocks: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            override_original: false,
            interpreter: DEFAULT_INTERPRETER.to_string(),
            strict_blocks: false,
        }
    }
}

impl Config {
    pub fn markers(&self) -> Markers {
        Markers::new(&self.pattern)
    }

    /// Path the result is written to: the input with its suffix swapped for `extension`.
    pub fn output_path(&self, input: &Path) -> Result<PathBuf> {
        if self.extension == DEFAULT_EXTENSION {
            check_input(input)?;
            return Ok(input.to_path_buf());
        }
        replace_suffix(input, &self.extension)
    }

    /// Path of the untouched copy kept when not overriding.
    pub fn backup_path(&self, input: &Path) -> Result<PathBuf> {
        replace_suffix(input, BACKUP_SUFFIX)
    }
}

/// The three marker prefixes built from a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    pub statement: String,
    pub open: String,
    pub close: String,
}

impl Markers {
    pub fn new(pattern: &str) -> Self {
        Self {
            statement: format!("{pattern}:"),
            open: format!("{pattern}<"),
            close: format!("{pattern}>"),
        }
    }
}

/// Fails with [`Error::InvalidInputKind`] unless `input` ends in `.gcode` (any case).
pub fn check_input(input: &Path) -> Result<()> {
    match input.to_str() {
        Some(s) if GCODE_SUFFIX.is_match(s) => Ok(()),
        _ => Err(Error::InvalidInputKind {
            path: input.to_path_buf(),
        }),
    }
}

fn replace_suffix(input: &Path, suffix: &str) -> Result<PathBuf> {
    check_input(input)?;
    let s = input.to_string_lossy();
    Ok(PathBuf::from(GCODE_SUFFIX.replace(&s, regex::NoExpand(suffix)).into_owned()))
}
