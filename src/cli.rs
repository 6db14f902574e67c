// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! The historical short flags `-ifo` and `-ifi` are longer than one
//! character, which clap cannot express as shorts; [`normalize_args`]
//! rewrites them to `--ignore-folder` / `--ignore-file` before parsing.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::DEFAULT_SLEEP_MS;

/// Command-line arguments for `simple-file-watch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "simple-file-watch",
    version,
    about = "Poll a folder for file changes and run a command when something changes.",
    long_about = None,
    after_help = "Short aliases: -ifo = --ignore-folder, -ifi = --ignore-file.\n\
                  The callback receives the changes as JSON in SIMPLE_FILE_WATCH_CHANGES."
)]
pub struct CliArgs {
    /// Command to run on file change (split on whitespace, no shell).
    #[arg(short = 'x', long = "run-command", value_name = "CMD", required = true)]
    pub run_command: String,

    /// Folder to watch.
    #[arg(short = 'w', long = "watch-folder", value_name = "DIR", required = true)]
    pub watch_folder: PathBuf,

    /// Comma separated list of folders to ignore (-ifo).
    #[arg(long = "ignore-folder", value_name = "DIRS", value_delimiter = ',')]
    pub ignore_folder: Vec<PathBuf>,

    /// Comma separated list of file names to ignore (-ifi).
    #[arg(long = "ignore-file", value_name = "FILES", value_delimiter = ',')]
    pub ignore_file: Vec<String>,

    /// Sleep duration between checks, in milliseconds.
    #[arg(
        short = 's',
        long = "sleep",
        value_name = "MS",
        default_value_t = DEFAULT_SLEEP_MS,
        value_parser = clap::value_parser!(u64)
    )]
    pub sleep: u64,

    /// Enable debug output.
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Kill the callback if it runs longer than this many milliseconds.
    ///
    /// By default the callback may run forever, and polling waits for it.
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub callback_timeout: Option<u64>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// Takes precedence over `--debug` and `SIMPLE_FILE_WATCH_LOG`.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Rewrite multi-letter short aliases into their long forms.
///
/// Arguments are kept as `OsString` so a watch folder whose name is not
/// valid UTF-8 reaches clap intact.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if arg == "-ifo" {
                OsString::from("--ignore-folder")
            } else if arg == "-ifi" {
                OsString::from("--ignore-file")
            } else {
                arg
            }
        })
        .collect()
}

/// Parse without exiting; used by tests and by [`parse`].
pub fn try_parse_from<I, T>(args: I) -> Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    CliArgs::try_parse_from(normalize_args(args))
}

/// Parse the process arguments.
///
/// `--help` / `--version` print and exit 0; any other parse error (missing
/// `-x` or `-w`, non-numeric `--sleep`) prints and exits 1.
pub fn parse() -> CliArgs {
    match try_parse_from(std::env::args_os()) {
        Ok(args) => args,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    }
}
