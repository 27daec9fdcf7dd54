use crate::error::Result;
use std::io::Write;
use std::path::Path;
use std::process::Stdio;

/// Where a generated G-code file goes: written in-process, or handed to the
/// interpreter as its standard output.
///
/// Covers [`std::fs::File`] and [`std::io::Stdout`] through the impl below.
pub trait OutputSink: Write {
    fn into_stdio(self: Box<Self>) -> Stdio;
}

impl<T: Write + Into<Stdio>> OutputSink for T {
    fn into_stdio(self: Box<Self>) -> Stdio {
        (*self).into()
    }
}

/// Something that consumes an assembled script.
pub trait ScriptRunner {
    /// Runs `script` for the document at `input`, sending the result to `stdout`.
    fn run(&self, script: &str, input: &Path, stdout: Box<dyn OutputSink>) -> Result<()>;
}

/// Writes the script itself instead of running it.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrintScript;

impl ScriptRunner for PrintScript {
    fn run(&self, script: &str, _input: &Path, mut stdout: Box<dyn OutputSink>) -> Result<()> {
        stdout.write_all(script.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}
