// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::LogLevel;
use crate::exec::CallbackCommand;
use crate::watch::ExclusionRules;

/// Poll interval used when `--sleep` is not given.
pub const DEFAULT_SLEEP_MS: u64 = 1000;

/// Validated, immutable configuration for one watcher process.
///
/// Built once at startup (see `TryFrom<CliArgs>`) and handed explicitly to
/// the snapshot builder, the callback invoker and the poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    pub run_command: CallbackCommand,
    /// As typed by the user; resolved to an absolute path by the
    /// snapshot builder.
    pub watch_folder: PathBuf,
    pub exclusions: ExclusionRules,
    pub interval: Duration,
    pub callback_timeout: Option<Duration>,
    pub debug: bool,
    pub log_level: Option<LogLevel>,
}
