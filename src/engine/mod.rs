// src/engine/mod.rs

//! Poll loop for simple-file-watch.
//!
//! The pure state (retained snapshot + diffing) lives in [`core`]; the async
//! shell that sleeps, scans and invokes the callback is [`runtime`].

use crate::exec::CallbackOutcome;
use crate::types::ChangeRecord;

/// Where the poll loop is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Between cycles (sleeping, or not started).
    Idle,
    /// Building a snapshot, diffing, or waiting on the callback.
    Scanning,
}

/// What a single poll cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleReport {
    /// The snapshot matched the previous one.
    NoChanges,
    /// Changes were found and handed to the callback invoker.
    ///
    /// `outcome` is `None` when the callback could not be run at all
    /// (encoding or launch failure); the error has already been logged.
    Invoked {
        changes: Vec<ChangeRecord>,
        outcome: Option<CallbackOutcome>,
    },
    /// The watch folder could not be read; the previous snapshot was kept.
    Skipped,
}

pub mod core;
pub mod runtime;

pub use self::core::{CoreStep, PollCore};
pub use runtime::Poller;
