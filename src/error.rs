use std::path::PathBuf;
use std::process::ExitStatus;

/// Errors raised while preprocessing a G-code file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input does not carry the `.gcode` suffix. Nothing was processed.
    #[error("please provide a gcode file as input, got {}", .path.display())]
    InvalidInputKind { path: PathBuf },

    /// The document ended inside a code block and strict block checking is enabled.
    #[error("code block opened on line {line} is never closed")]
    UnterminatedBlock { line: usize },

    #[error("interpreter not found: {name}")]
    InterpreterNotFound { name: String },

    /// The interpreter ran but reported failure. `code` follows shell conventions,
    /// 128 + N when the child was killed by signal N.
    #[error("{interpreter} exited with status {code}")]
    InterpreterFailed { interpreter: String, code: i32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// `Ok` for a successful run, [`Error::InterpreterFailed`] otherwise.
    pub(crate) fn check_exit(interpreter: &str, status: ExitStatus) -> Result<()> {
        if status.success() {
            return Ok(());
        }
        let code = status.code().or_else(|| signal_code(&status)).unwrap_or(-1);
        Err(Error::InterpreterFailed {
            interpreter: interpreter.to_string(),
            code,
        })
    }
}

#[cfg(unix)]
fn signal_code(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal().map(|signal| 128 + signal)
}

#[cfg(not(unix))]
fn signal_code(_status: &ExitStatus) -> Option<i32> {
    None
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;

    fn failure_code(raw: i32) -> Option<i32> {
        match Error::check_exit("python3", ExitStatus::from_raw(raw)) {
            Ok(()) => None,
            Err(Error::InterpreterFailed { code, .. }) => Some(code),
            Err(e) => panic!("unexpected error: {e:?}"),
        }
    }

    #[test]
    fn success_is_ok() {
        assert_eq!(failure_code(0), None);
    }

    #[test]
    fn exit_code_is_kept() {
        assert_eq!(failure_code(3 << 8), Some(3));
    }

    #[test]
    fn signal_maps_to_shell_convention() {
        // SIGKILL
        assert_eq!(failure_code(9), Some(137));
    }
}
