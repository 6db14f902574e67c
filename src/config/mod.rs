// src/config/mod.rs

//! Runtime configuration.
//!
//! There is no configuration file: everything comes from the command line.
//! [`validate`] turns parsed [`crate::cli::CliArgs`] into a [`WatchConfig`].

pub mod model;
pub mod validate;

pub use model::{WatchConfig, DEFAULT_SLEEP_MS};
