use crate::command::{OutputSink, ScriptRunner};
use crate::error::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Runs assembled scripts with an interpreter found on the file system.
///
/// The script is written to a temporary file which is removed once the interpreter
/// exits, whether it succeeded or not. The interpreter is called as
/// `<program> <script> <input>`, so embedded code can read the original file
/// through `sys.argv[2]`.
#[derive(Debug, Clone)]
pub struct ExternalInterpreter {
    name: String,
    program: PathBuf,
    envs: Vec<(OsString, OsString)>,
}

impl ExternalInterpreter {
    /// Resolves `name` like a shell would, searching `PATH` for bare names.
    pub fn find(name: &str) -> Result<Self> {
        let search_paths = std::env::var_os("PATH").unwrap_or_default();
        match find_command_path(&search_paths, Path::new(name)) {
            Some(program) => Ok(Self {
                name: name.to_string(),
                program,
                envs: Vec::new(),
            }),
            None => Err(Error::InterpreterNotFound {
                name: name.to_string(),
            }),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Adds a variable to the interpreter's environment on top of the inherited one.
    pub fn env(mut self, key: impl Into<OsString>, val: impl Into<OsString>) -> Self {
        self.envs.push((key.into(), val.into()));
        self
    }
}

impl ScriptRunner for ExternalInterpreter {
    fn run(&self, script: &str, input: &Path, stdout: Box<dyn OutputSink>) -> Result<()> {
        let mut tmp = tempfile::Builder::new().prefix("pygcode-").tempfile()?;
        tmp.write_all(script.as_bytes())?;
        tmp.flush()?;

        tracing::debug!(
            "> {} {} {}",
            self.program.display(),
            tmp.path().display(),
            input.display()
        );
        let exit_status = Command::new(&self.program)
            .arg(tmp.path())
            .arg(input)
            .envs(self.envs.iter().map(|(k, v)| (k, v)))
            .stdout(stdout.into_stdio())
            .spawn()?
            .wait()?;

        Error::check_exit(&self.name, exit_status)
    }
}

/// Resolve an interpreter path.
///
/// - Absolute path or a path with several components: used as-is if it exists.
/// - Single component: the first match in `search_paths`.
/// - Empty path: `None`.
pub fn find_command_path(search_paths: &OsStr, path: &Path) -> Option<PathBuf> {
    let mut components = path.components();
    match (components.next(), components.next()) {
        (None, _) => None,
        (Some(x), None) if !path.is_absolute() => find_in_path(search_paths, x.as_os_str()),
        _ => path.exists().then(|| path.to_path_buf()),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths).find_map(|dir| {
        let path = dir.join(cmd);
        if path.is_file() {
            return Some(path);
        }
        if cfg!(windows) {
            let mut exe = cmd.to_os_string();
            exe.push(".exe");
            let exe = dir.join(exe);
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[cfg(unix)]
    fn osstr(s: &str) -> &OsStr {
        OsStr::new(s)
    }

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("external_tests_{}_{}", std::process::id(), tag));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[cfg(unix)]
    fn sh() -> ExternalInterpreter {
        ExternalInterpreter::find("/bin/sh").expect("/bin/sh")
    }

    #[test]
    #[cfg(unix)]
    fn absolute_existing() {
        let found = find_command_path(osstr("/nowhere"), Path::new("/bin/sh"));
        assert_eq!(found, Some(PathBuf::from("/bin/sh")));
    }

    #[test]
    #[cfg(unix)]
    fn absolute_nonexisting() {
        assert!(find_command_path(osstr("/bin"), Path::new("/bin/nonexisting")).is_none());
    }

    #[test]
    #[cfg(unix)]
    fn single_component_found_in_path() {
        let found = find_command_path(osstr("/nowhere:/bin"), Path::new("sh"))
            .expect("Expected to find 'sh' in /bin via PATH search");
        assert_eq!(found, PathBuf::from("/bin/sh"));
    }

    #[test]
    #[cfg(unix)]
    fn single_component_not_found_in_path() {
        assert!(find_command_path(osstr("/bin"), Path::new("nonexisting")).is_none());
    }

    #[test]
    fn empty_path_is_none() {
        assert!(find_command_path(OsStr::new("/bin"), Path::new("")).is_none());
    }

    #[test]
    fn missing_interpreter_is_an_error() {
        let err = ExternalInterpreter::find("pygcode-no-such-interpreter").unwrap_err();
        assert!(matches!(err, Error::InterpreterNotFound { .. }));
    }

    #[test]
    #[cfg(unix)]
    fn stdout_goes_to_destination() -> anyhow::Result<()> {
        let dir = temp_dir("stdout");
        let input = dir.join("part.gcode");
        let output = dir.join("part_py.gcode");
        fs::write(&input, "G28\nG1 X10\n")?;

        let dest = fs::File::create(&output)?;
        sh().run("cat \"$1\"\necho M84\n", &input, Box::new(dest))?;

        assert_eq!(fs::read_to_string(&output)?, "G28\nG1 X10\nM84\n");
        fs::remove_dir_all(dir)?;
        Ok(())
    }

    #[test]
    #[cfg(unix)]
    fn script_file_is_removed_after_run() -> anyhow::Result<()> {
        let dir = temp_dir("cleanup");
        let input = dir.join("part.gcode");
        let output = dir.join("script_path.txt");
        fs::write(&input, "")?;

        let dest = fs::File::create(&output)?;
        sh().run("printf %s \"$0\"\n", &input, Box::new(dest))?;

        let script_path = PathBuf::from(fs::read_to_string(&output)?);
        assert!(script_path.file_name().is_some());
        assert!(!script_path.exists(), "{} was left behind", script_path.display());
        fs::remove_dir_all(dir)?;
        Ok(())
    }

    #[test]
    #[cfg(unix)]
    fn failing_script_reports_exit_code() -> anyhow::Result<()> {
        let dir = temp_dir("failure");
        let input = dir.join("part.gcode");
        let output = dir.join("out.gcode");
        fs::write(&input, "")?;

        let dest = fs::File::create(&output)?;
        let err = sh()
            .run("printf %s \"$0\"\nexit 3\n", &input, Box::new(dest))
            .unwrap_err();
        assert!(
            matches!(err, Error::InterpreterFailed { code: 3, .. }),
            "unexpected error: {err:?}"
        );
        let script_path = PathBuf::from(fs::read_to_string(&output)?);
        assert!(!script_path.exists());
        fs::remove_dir_all(dir)?;
        Ok(())
    }
}
