// src/config/validate.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::CliArgs;
use crate::config::model::WatchConfig;
use crate::errors::{Result, WatchError};
use crate::exec::CallbackCommand;
use crate::watch::ExclusionRules;

impl TryFrom<CliArgs> for WatchConfig {
    type Error = WatchError;

    fn try_from(args: CliArgs) -> std::result::Result<Self, Self::Error> {
        let run_command = validate_run_command(&args.run_command)?;
        let watch_folder = validate_watch_folder(&args.watch_folder)?;

        Ok(WatchConfig {
            run_command,
            watch_folder,
            exclusions: ExclusionRules::new(&args.ignore_folder, &args.ignore_file),
            interval: Duration::from_millis(args.sleep),
            callback_timeout: args.callback_timeout.map(Duration::from_millis),
            debug: args.debug,
            log_level: args.log_level,
        })
    }
}

fn validate_run_command(raw: &str) -> Result<CallbackCommand> {
    CallbackCommand::parse(raw).ok_or_else(|| {
        WatchError::Config("Callback command using -x/--run-command is required".to_string())
    })
}

fn validate_watch_folder(raw: &Path) -> Result<PathBuf> {
    let blank = raw.to_str().is_some_and(|s| s.trim().is_empty());
    if blank {
        return Err(WatchError::Config(
            "Folder to watch using -w/--watch-folder is required".to_string(),
        ));
    }
    Ok(raw.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::try_parse_from;

    fn config_from(args: &[&str]) -> Result<WatchConfig> {
        let mut argv = vec!["simple-file-watch"];
        argv.extend_from_slice(args);
        WatchConfig::try_from(try_parse_from(argv).unwrap())
    }

    #[test]
    fn builds_config_from_flags() {
        let cfg = config_from(&[
            "-x", "./notify.sh --fast", "-w", "/tmp/w", "-ifo", "ignored", "-ifi", "a.log",
            "-s", "50", "--callback-timeout", "2000",
        ])
        .unwrap();

        assert_eq!(cfg.run_command.program(), "./notify.sh");
        assert_eq!(cfg.run_command.args(), ["--fast"]);
        assert_eq!(cfg.watch_folder, PathBuf::from("/tmp/w"));
        assert!(cfg.exclusions.is_folder_excluded("ignored"));
        assert!(cfg.exclusions.is_file_excluded("a.log"));
        assert_eq!(cfg.interval, Duration::from_millis(50));
        assert_eq!(cfg.callback_timeout, Some(Duration::from_secs(2)));
    }

    #[test]
    fn blank_run_command_is_a_config_error() {
        let err = config_from(&["-x", "  ", "-w", "/tmp/w"]).unwrap_err();
        match err {
            WatchError::Config(msg) => assert!(msg.contains("-x")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn blank_watch_folder_is_a_config_error() {
        let err = config_from(&["-x", "true", "-w", ""]).unwrap_err();
        match err {
            WatchError::Config(msg) => assert!(msg.contains("--watch-folder")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn empty_list_items_are_ignored() {
        let cfg = config_from(&["-x", "true", "-w", ".", "-ifo", "a,,b", "-ifi", ","]).unwrap();
        assert_eq!(cfg.exclusions.folders().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(cfg.exclusions.files().count(), 0);
    }
}
