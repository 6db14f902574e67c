// src/exec/backend.rs

//! Pluggable callback invoker abstraction.
//!
//! The poll loop talks to a `CallbackInvoker` instead of spawning processes
//! itself, so tests can swap in a fake that records each change list.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::config::WatchConfig;
use crate::errors::Result;
use crate::types::ChangeRecord;

use super::command::{encode_changes, run_callback, CallbackCommand, CallbackOutcome};

/// Trait abstracting what happens with a non-empty change list.
pub trait CallbackInvoker: Send {
    /// Deliver `changes` and wait for the callback to finish.
    ///
    /// Errors cover work that never produced an outcome (encoding, launch);
    /// a command that ran and failed is an `Ok(CallbackOutcome::Failed)`.
    fn invoke<'a>(
        &'a mut self,
        changes: &'a [ChangeRecord],
    ) -> Pin<Box<dyn Future<Output = Result<CallbackOutcome>> + Send + 'a>>;
}

/// Invoker used in production: runs the configured command as a child
/// process with the changes in its environment.
#[derive(Debug, Clone)]
pub struct RealCallbackInvoker {
    command: CallbackCommand,
    timeout: Option<Duration>,
}

impl RealCallbackInvoker {
    pub fn new(command: CallbackCommand, timeout: Option<Duration>) -> Self {
        Self { command, timeout }
    }

    pub fn from_config(config: &WatchConfig) -> Self {
        Self::new(config.run_command.clone(), config.callback_timeout)
    }
}

impl CallbackInvoker for RealCallbackInvoker {
    fn invoke<'a>(
        &'a mut self,
        changes: &'a [ChangeRecord],
    ) -> Pin<Box<dyn Future<Output = Result<CallbackOutcome>> + Send + 'a>> {
        Box::pin(async move {
            let payload = encode_changes(changes)?;
            run_callback(&self.command, &payload, self.timeout).await
        })
    }
}
