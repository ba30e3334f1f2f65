//! External command execution with captured output.
//!
//! Thin builder over `std::process::Command` that always captures stdout
//! and stderr, so a failing tool's diagnostics land in the error message
//! instead of vanishing. The program is an `OsStr` because the packaging
//! binary usually arrives as a configured `PathBuf`, not a literal.

use anyhow::{bail, Context, Result};
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, ExitStatus};

/// Result of a command execution.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit status of the command.
    pub status: ExitStatus,
    /// Captured stdout as a string.
    pub stdout: String,
    /// Captured stderr as a string.
    pub stderr: String,
}

impl CommandResult {
    /// Returns true if the command exited successfully.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Get the exit code, or -1 if terminated by signal.
    pub fn code(&self) -> i32 {
        self.status.code().unwrap_or(-1)
    }

    /// Get stdout, trimmed of whitespace.
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }

    /// Get stderr, trimmed of whitespace.
    pub fn stderr_trimmed(&self) -> &str {
        self.stderr.trim()
    }
}

/// Builder for configuring command execution.
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    allow_fail: bool,
    error_prefix: Option<String>,
}

impl Cmd {
    /// Create a new command builder. Accepts a bare name (resolved on PATH)
    /// or an explicit path.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            allow_fail: false,
            error_prefix: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add a path as an argument.
    pub fn arg_path(mut self, path: &Path) -> Self {
        self.args.push(path.as_os_str().to_os_string());
        self
    }

    /// Allow non-zero exit codes without failing.
    pub fn allow_fail(mut self) -> Self {
        self.allow_fail = true;
        self
    }

    /// Set a custom error message prefix.
    pub fn error_msg(mut self, msg: impl AsRef<str>) -> Self {
        self.error_prefix = Some(msg.as_ref().to_string());
        self
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Run the command and capture output.
    pub fn run(self) -> Result<CommandResult> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .with_context(|| {
                format!("Failed to execute '{}'. Is it installed?", self.program_name())
            })?;

        let result = CommandResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !self.allow_fail && !result.success() {
            let prefix = self
                .error_prefix
                .clone()
                .unwrap_or_else(|| format!("'{}' failed", self.program_name()));

            let stderr = result.stderr_trimmed();
            if stderr.is_empty() {
                bail!("{} (exit code {})", prefix, result.code());
            } else {
                bail!("{} (exit code {}):\n{}", prefix, result.code(), stderr);
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn run_captures_stdout() {
        let result = Cmd::new("echo").arg("hello").run().unwrap();
        assert!(result.success());
        assert_eq!(result.stdout_trimmed(), "hello");
    }

    #[test]
    fn accepts_a_path_as_program() {
        let result = Cmd::new(PathBuf::from("/bin/sh"))
            .arg("-c")
            .arg("echo from-path")
            .run()
            .unwrap();
        assert_eq!(result.stdout_trimmed(), "from-path");
    }

    #[test]
    fn failure_includes_stderr() {
        let err = Cmd::new("ls").arg("/nonexistent_path_12345").run().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("No such file") || msg.contains("cannot access"));
    }

    #[test]
    fn allow_fail_returns_result() {
        let result = Cmd::new("false").allow_fail().run().unwrap();
        assert!(!result.success());
        assert_eq!(result.code(), 1);
    }

    #[test]
    fn custom_error_prefix() {
        let err = Cmd::new("false")
            .error_msg("packaging step failed")
            .run()
            .unwrap_err();
        assert!(err.to_string().contains("packaging step failed"));
    }

    #[test]
    fn spawn_failure_names_the_program() {
        let err = Cmd::new("no_such_program_12345").run().unwrap_err();
        assert!(format!("{:#}", err).contains("no_such_program_12345"));
    }
}
