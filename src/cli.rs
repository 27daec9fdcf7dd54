//! Command line front end: backup, output naming and the assemble/run pipeline.

use crate::assembler::assemble;
use crate::command::{PrintScript, ScriptRunner};
use crate::config::{self, Config, DEFAULT_EXTENSION, DEFAULT_INTERPRETER, DEFAULT_PATTERN};
use crate::external::ExternalInterpreter;
use anyhow::{Context, Result};
use argh::FromArgs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(FromArgs, Debug)]
/// Run the Python code embedded in a Slic3r/PrusaSlicer gcode file.
///
/// `;Python: <code>` runs one line of code. Lines between `;Python<` and `;Python>`
/// form a code block; one leading `;` is removed from each of them. Anything the code
/// prints ends up in the gcode in its place. Write `[..]` as `<(..)>` and `{..}` as
/// `<~(..)~>` so the slicer does not expand them as macros.
pub struct Args {
    #[argh(positional)]
    /// path to the gcode file to process
    pub input: PathBuf,

    #[argh(switch, short = 'o', long = "override")]
    /// overwrite the gcode file without keeping a copy of the original
    pub override_original: bool,

    #[argh(option, short = 'e', default = "DEFAULT_EXTENSION.to_string()")]
    /// replace the .gcode extension of the output with this one (e.g. _py.gcode)
    pub extension: String,

    #[argh(option, short = 'p', default = "DEFAULT_PATTERN.to_string()")]
    /// pattern that marks python lines. default: ';Python'
    pub pattern: String,

    #[argh(option, short = 'i', default = "DEFAULT_INTERPRETER.to_string()")]
    /// interpreter that runs the generated script. default: python3
    pub interpreter: String,

    #[argh(switch)]
    /// fail when a code block is never closed
    pub strict: bool,

    #[argh(switch)]
    /// print the generated script to stdout instead of running it
    pub print_script: bool,
}

impl Args {
    pub fn config(&self) -> Config {
        Config {
            pattern: self.pattern.clone(),
            extension: self.extension.clone(),
            override_original: self.override_original,
            interpreter: self.interpreter.clone(),
            strict_blocks: self.strict,
        }
    }
}

/// Entry point of the `pygcode` binary.
pub fn run(args: Args) -> Result<()> {
    let config = args.config();
    config::check_input(&args.input)?;
    if args.print_script {
        let script = assemble_file(&args.input, &config)?;
        PrintScript.run(&script, &args.input, Box::new(std::io::stdout()))?;
        return Ok(());
    }

    let interpreter = ExternalInterpreter::find(&config.interpreter)?;
    tracing::debug!(interpreter = %interpreter.program().display(), "resolved interpreter");
    let output = process_file(&args.input, &config, &interpreter)?;
    info!(output = %output.display(), "done");
    Ok(())
}

/// Processes `input` and returns the path the result was written to.
///
/// Unless `config.override_original` is set, the input is first copied to its backup
/// name. On failure the output file may be empty or partially written; the backup is
/// the way back.
pub fn process_file(input: &Path, config: &Config, runner: &dyn ScriptRunner) -> Result<PathBuf> {
    config::check_input(input)?;
    info!(input = %input.display(), "processing gcode file");

    if config.override_original {
        info!("override: no backup of the original is created");
    } else {
        let backup = config.backup_path(input)?;
        info!(backup = %backup.display(), "backing up original file");
        fs::copy(input, &backup).with_context(|| {
            format!("can't back up {} to {}", input.display(), backup.display())
        })?;
    }

    let output = config.output_path(input)?;
    if output != input {
        info!(output = %output.display(), "changing output file");
    }
    if config.pattern != DEFAULT_PATTERN {
        info!(pattern = %config.pattern, "using custom code pattern");
    }

    let script = assemble_file(input, config)?;

    info!("generating new gcode file");
    let dest = fs::File::create(&output)
        .with_context(|| format!("can't create {}", output.display()))?;
    runner
        .run(&script, input, Box::new(dest))
        .with_context(|| format!("failed to generate {}", output.display()))?;
    Ok(output)
}

fn assemble_file(input: &Path, config: &Config) -> Result<String> {
    let source = fs::read_to_string(input)
        .with_context(|| format!("can't read {}", input.display()))?;
    let assembly = assemble(&source, config)
        .with_context(|| format!("can't assemble {}", input.display()))?;
    Ok(assembly.to_script())
}
