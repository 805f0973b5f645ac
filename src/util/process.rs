//! External process execution
//!
//! Both tool wrappers go through [`CommandRunner`] so tests can swap in a
//! scripted fake instead of spawning real processes.

use super::cancel::CancelToken;
use crate::error::HarnessError;
use std::ffi::{OsStr, OsString};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A fully described process invocation
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    pub program: OsString,
    pub args: Vec<OsString>,
    pub stdin: Option<Vec<u8>>,
    pub working_dir: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            stdin: None,
            working_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn stdin(mut self, input: Vec<u8>) -> Self {
        self.stdin = Some(input);
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.working_dir = Some(dir.to_path_buf());
        self
    }

    /// Render as a shell-like line for messages
    pub fn display(&self) -> String {
        let args = format_args(&self.args);
        if args.is_empty() {
            self.program.to_string_lossy().to_string()
        } else {
            format!("{} {}", self.program.to_string_lossy(), args)
        }
    }
}

/// Captured result of a finished process
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Capability to run an external command to completion
pub trait CommandRunner {
    fn execute(&self, spec: &CommandSpec) -> Result<CommandOutput, HarnessError>;
}

/// Runs commands as real child processes, blocking until they exit.
/// The child is killed if the cancel token trips while it is running.
pub struct SystemRunner {
    cancel: CancelToken,
}

impl SystemRunner {
    pub fn new(cancel: CancelToken) -> Self {
        Self { cancel }
    }
}

impl CommandRunner for SystemRunner {
    fn execute(&self, spec: &CommandSpec) -> Result<CommandOutput, HarnessError> {
        if self.cancel.is_cancelled() {
            return Err(HarnessError::Cancelled);
        }

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if spec.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            });

        if let Some(dir) = &spec.working_dir {
            cmd.current_dir(dir);
        }

        tracing::debug!(command = %spec.display(), cwd = ?spec.working_dir, "spawning");

        let mut child = cmd
            .spawn()
            .map_err(|e| HarnessError::io(format!("Failed to execute: {}", spec.display()), e))?;

        // A child that exits without reading stdin gives EPIPE here; its exit
        // status is what gets reported.
        let stdin_writer = match (child.stdin.take(), spec.stdin.clone()) {
            (Some(mut pipe), Some(input)) => Some(thread::spawn(move || {
                pipe.write_all(&input).ok();
            })),
            _ => None,
        };
        let stdout_reader = child.stdout.take().map(spawn_reader);
        let stderr_reader = child.stderr.take().map(spawn_reader);

        let status = loop {
            let polled = child
                .try_wait()
                .map_err(|e| HarnessError::io(format!("Failed to wait for: {}", spec.display()), e))?;
            if let Some(status) = polled {
                break status;
            }
            if self.cancel.is_cancelled() {
                tracing::warn!(command = %spec.display(), "killing child after interrupt");
                child.kill().ok();
                child.wait().ok();
                return Err(HarnessError::Cancelled);
            }
            thread::sleep(POLL_INTERVAL);
        };

        if let Some(handle) = stdin_writer {
            handle.join().ok();
        }

        let output = CommandOutput {
            stdout: String::from_utf8_lossy(&join_reader(stdout_reader)).to_string(),
            stderr: String::from_utf8_lossy(&join_reader(stderr_reader)).to_string(),
            exit_code: status.code(),
        };

        tracing::debug!(command = %spec.display(), exit_code = ?output.exit_code, "finished");
        Ok(output)
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut source: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        source.read_to_end(&mut buf).ok();
        buf
    })
}

fn join_reader(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}

/// Format args for error messages
fn format_args<S: AsRef<OsStr>>(args: &[S]) -> String {
    args.iter()
        .map(|s| s.as_ref().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
