use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use super::ToolboxError;

/// A program invocation, kept as data so it can be logged and asserted on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Build from a configured `["npx", "react-native"]` style prefix.
    pub fn from_parts(parts: &[String]) -> Option<Self> {
        let (program, rest) = parts.split_first()?;
        Some(Self::new(program.clone()).args(rest.iter().cloned()))
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }
        command
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

pub trait ProcessRunner {
    /// Run to completion with captured output; returns trimmed stdout.
    fn run(&self, command: &CommandLine) -> Result<String, ToolboxError>;

    /// Run to completion attached to the user's terminal.
    fn spawn(&self, command: &CommandLine) -> Result<(), ToolboxError>;
}

#[derive(Debug, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, command: &CommandLine) -> Result<String, ToolboxError> {
        tracing::info!(cwd = ?command.cwd, "run: {command}");
        let output = command
            .to_command()
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ToolboxError::Spawn {
                command: command.to_string(),
                source,
            })?;
        check_output(command, &output)?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        tracing::debug!("{} bytes of output from {}", stdout.len(), command.program);
        Ok(stdout)
    }

    fn spawn(&self, command: &CommandLine) -> Result<(), ToolboxError> {
        tracing::info!(cwd = ?command.cwd, "spawn: {command}");
        let status = command
            .to_command()
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| ToolboxError::Spawn {
                command: command.to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ToolboxError::CommandFailed {
                command: command.to_string(),
                status,
                detail: "see output above".to_string(),
            })
        }
    }
}

fn check_output(command: &CommandLine, output: &Output) -> Result<(), ToolboxError> {
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    tracing::warn!("{command} failed: {stderr}");
    Err(ToolboxError::CommandFailed {
        command: command.to_string(),
        status: output.status,
        detail: if stderr.is_empty() {
            "no output".to_string()
        } else {
            stderr
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_quotes_arguments_with_spaces() {
        let command = CommandLine::new("code-push")
            .args(["app", "add"])
            .arg("My App");
        assert_eq!(command.to_string(), "code-push app add \"My App\"");
    }

    #[test]
    fn from_parts_splits_program_and_prefix_args() {
        let parts = vec!["npx".to_string(), "react-native".to_string()];
        let command = CommandLine::from_parts(&parts).unwrap().arg("link");
        assert_eq!(command.program, "npx");
        assert_eq!(command.args, vec!["react-native", "link"]);
        assert!(CommandLine::from_parts(&[]).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn run_captures_trimmed_stdout() {
        let out = SystemRunner
            .run(&CommandLine::new("sh").args(["-c", "echo '  hello  '"]))
            .unwrap();
        assert_eq!(out, "hello");
    }

    #[cfg(unix)]
    #[test]
    fn run_reports_stderr_on_failure() {
        let err = SystemRunner
            .run(&CommandLine::new("sh").args(["-c", "echo boom >&2; exit 3"]))
            .unwrap_err();
        match err {
            ToolboxError::CommandFailed { detail, status, .. } => {
                assert_eq!(detail, "boom");
                assert_eq!(status.code(), Some(3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let err = SystemRunner
            .run(&CommandLine::new("definitely-not-a-real-program-7f3a"))
            .unwrap_err();
        assert!(matches!(err, ToolboxError::Spawn { .. }));
    }
}
