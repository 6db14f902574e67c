// src/engine/runtime.rs

use std::fmt;
use std::time::Duration;

use tracing::{debug, error, info, trace, warn};

use crate::errors::Result;
use crate::exec::{CallbackInvoker, CallbackOutcome};
use crate::types::ChangeSummary;
use crate::watch::SnapshotBuilder;

use super::core::PollCore;
use super::{CycleReport, PollState};

/// Drives the snapshot builder on a fixed cadence and hands change lists to
/// a `CallbackInvoker`.
///
/// Everything happens in sequence: the next scan starts only after the
/// previous callback has exited, so a slow callback slows polling down
/// instead of queueing work.
pub struct Poller<I: CallbackInvoker> {
    core: PollCore,
    builder: SnapshotBuilder,
    invoker: I,
    interval: Duration,
    state: PollState,
    cycles: u64,
}

impl<I: CallbackInvoker> fmt::Debug for Poller<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Poller")
            .field("core", &self.core)
            .field("builder", &self.builder)
            .field("interval", &self.interval)
            .field("state", &self.state)
            .field("cycles", &self.cycles)
            .finish_non_exhaustive()
    }
}

impl<I: CallbackInvoker> Poller<I> {
    pub fn new(builder: SnapshotBuilder, invoker: I, interval: Duration) -> Self {
        Self {
            core: PollCore::new(),
            builder,
            invoker,
            interval,
            state: PollState::Idle,
            cycles: 0,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    /// Number of completed poll cycles, not counting the seed.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Take the baseline snapshot. A root that cannot be read here is fatal.
    pub fn seed(&mut self) -> Result<()> {
        let baseline = self.builder.build()?;
        info!(
            root = ?self.builder.root(),
            files = baseline.len(),
            "baseline snapshot taken"
        );
        self.core.seed(baseline);
        Ok(())
    }

    /// Main loop: seed, then scan / diff / maybe-callback / sleep forever.
    pub async fn run(mut self) -> Result<()> {
        self.seed()?;
        info!(interval_ms = self.interval.as_millis() as u64, "polling started");

        loop {
            tokio::time::sleep(self.interval).await;
            self.run_cycle().await;
        }
    }

    /// One poll cycle. Never fails: every error is logged and the cycle
    /// ends early.
    pub async fn run_cycle(&mut self) -> CycleReport {
        self.state = PollState::Scanning;
        let report = self.scan_and_dispatch().await;
        self.state = PollState::Idle;
        self.cycles += 1;
        report
    }

    async fn scan_and_dispatch(&mut self) -> CycleReport {
        let current = match self.builder.build() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!(error = %err, "scan failed; keeping previous snapshot");
                return CycleReport::Skipped;
            }
        };

        debug!(files = current.len(), cycle = self.cycles + 1, "current snapshot taken");
        for (path, size) in current.iter() {
            trace!(path = ?path, size, "current file");
        }

        let step = self.core.step(current);
        if !step.should_invoke() {
            debug!("no change in file list, nothing to do");
            return CycleReport::NoChanges;
        }

        let summary = ChangeSummary::of(&step.changes);
        info!(
            added = summary.added,
            removed = summary.removed,
            changed = summary.changed,
            "changes detected"
        );

        let outcome = match self.invoker.invoke(&step.changes).await {
            Ok(outcome) => {
                report_outcome(&outcome);
                Some(outcome)
            }
            Err(err) => {
                error!(error = %err, "callback not run for this cycle");
                None
            }
        };

        CycleReport::Invoked {
            changes: step.changes,
            outcome,
        }
    }
}

/// Surface the callback's output to the operator.
fn report_outcome(outcome: &CallbackOutcome) {
    match outcome {
        CallbackOutcome::Success { stdout, stderr } => {
            info!(exit_code = 0, "callback finished");
            print_stdout(stdout);
            for line in stderr.lines() {
                debug!("callback stderr: {}", line);
            }
        }
        CallbackOutcome::Failed {
            code,
            stdout,
            stderr,
        } => {
            warn!(exit_code = ?code, "callback command failed");
            print_stdout(stdout);
            for line in stderr.lines() {
                warn!("callback stderr: {}", line);
            }
        }
        CallbackOutcome::TimedOut => {
            warn!("callback produced no result before its timeout");
        }
    }
}

fn print_stdout(stdout: &str) {
    if stdout.is_empty() {
        return;
    }
    if stdout.ends_with('\n') {
        print!("{stdout}");
    } else {
        println!("{stdout}");
    }
}
