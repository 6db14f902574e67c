// src/exec/mod.rs

//! Callback execution layer.
//!
//! - [`command`] splits the command line, encodes the change list and runs
//!   the child process with `tokio::process::Command`.
//! - [`backend`] provides the `CallbackInvoker` trait and the
//!   `RealCallbackInvoker` used in production, which tests replace with a
//!   fake implementation.

pub mod backend;
pub mod command;

pub use backend::{CallbackInvoker, RealCallbackInvoker};
pub use command::{
    encode_changes, run_callback, CallbackCommand, CallbackOutcome, CHANGES_ENV_VAR,
};
