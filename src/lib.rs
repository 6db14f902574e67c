// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::WatchConfig;
use crate::engine::Poller;
use crate::errors::Result;
use crate::exec::RealCallbackInvoker;
use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::SnapshotBuilder;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - the snapshot builder over the real filesystem
/// - the process-spawning callback invoker
/// - the poll loop
/// - Ctrl-C handling
///
/// Returns only on a startup error or Ctrl-C.
pub async fn run(config: WatchConfig) -> Result<()> {
    log_config(&config);

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let builder = SnapshotBuilder::new(fs, &config.watch_folder, &config.exclusions)?;
    let invoker = RealCallbackInvoker::from_config(&config);
    let poller = Poller::new(builder, invoker, config.interval);

    // The poll loop has no exit of its own; Ctrl-C drops it mid-cycle, which
    // also kills a running callback.
    tokio::select! {
        res = poller.run() => res,
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => info!("Ctrl-C received; stopping"),
                Err(e) => warn!(error = %e, "failed to listen for Ctrl-C; stopping"),
            }
            Ok(())
        }
    }
}

fn log_config(config: &WatchConfig) {
    debug!(cmd = %config.run_command, "command to run on file change");
    debug!(folder = ?config.watch_folder, "folder to watch");
    debug!(
        ignore_folders = ?config.exclusions.folders().collect::<Vec<_>>(),
        ignore_files = ?config.exclusions.files().collect::<Vec<_>>(),
        "exclusions"
    );
    debug!(
        interval_ms = config.interval.as_millis() as u64,
        callback_timeout_ms = ?config.callback_timeout.map(|t| t.as_millis() as u64),
        "timing"
    );
}
