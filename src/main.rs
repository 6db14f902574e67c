// src/main.rs

use simple_file_watch::config::WatchConfig;
use simple_file_watch::{cli, logging, run};

// Scanning, diffing and the callback run strictly one after another; a
// single-threaded runtime is all that needs.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("simple-file-watch error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    let config = WatchConfig::try_from(args)?;
    logging::init_logging(config.log_level, config.debug)?;
    run(config).await?;
    Ok(())
}
