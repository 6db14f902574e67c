// src/exec/command.rs

//! Running the user's callback command.

use std::fmt;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::errors::{Result, WatchError};
use crate::types::ChangeRecord;

/// Environment variable carrying the JSON-encoded change list.
pub const CHANGES_ENV_VAR: &str = "SIMPLE_FILE_WATCH_CHANGES";

/// A program plus its arguments, split from a single command line.
///
/// Splitting is plain whitespace splitting: no quoting, no escaping, no
/// shell. `echo "a b"` runs `echo` with the two arguments `"a` and `b"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackCommand {
    program: String,
    args: Vec<String>,
}

impl CallbackCommand {
    /// Returns `None` for a blank command line.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CallbackCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// How a callback run ended. Launch failures are errors, not outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    Success {
        stdout: String,
        stderr: String,
    },
    /// Non-zero exit. `code` is `None` when the process died from a signal.
    Failed {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    /// Killed after exceeding the configured callback timeout.
    TimedOut,
}

/// Serialize the change list as a JSON array.
pub fn encode_changes(changes: &[ChangeRecord]) -> Result<String> {
    Ok(serde_json::to_string(changes)?)
}

/// Run `command` to completion with `payload` in [`CHANGES_ENV_VAR`],
/// capturing stdout and stderr.
///
/// The child inherits the watcher's environment. With `timeout` set, a child
/// that outlives it is killed and reported as [`CallbackOutcome::TimedOut`].
pub async fn run_callback(
    command: &CallbackCommand,
    payload: &str,
    timeout: Option<Duration>,
) -> Result<CallbackOutcome> {
    info!(cmd = %command, "running callback command");
    debug!(env = CHANGES_ENV_VAR, payload = %payload, "callback environment");

    let mut cmd = Command::new(command.program());
    cmd.args(command.args())
        .env(CHANGES_ENV_VAR, payload)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd.spawn().map_err(|source| WatchError::Spawn {
        program: command.program().to_string(),
        source,
    })?;

    let wait = child.wait_with_output();
    let output = match timeout {
        Some(limit) => match tokio::time::timeout(limit, wait).await {
            Ok(res) => res?,
            Err(_) => {
                // Dropping the future drops the child, and kill_on_drop ends it.
                warn!(
                    cmd = %command,
                    timeout_ms = limit.as_millis() as u64,
                    "callback timed out; killed"
                );
                return Ok(CallbackOutcome::TimedOut);
            }
        },
        None => wait.await?,
    };

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if output.status.success() {
        Ok(CallbackOutcome::Success { stdout, stderr })
    } else {
        Ok(CallbackOutcome::Failed {
            code: output.status.code(),
            stdout,
            stderr,
        })
    }
}
