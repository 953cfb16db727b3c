use clap::Parser;
use titlecache_core::error::TitleError;
use titlecache_core::logging::{self, LogOptions};

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logging goes to the state dir; fall back to stderr if that is not writable.
    let log_opts = LogOptions { debug: cli.debug };
    if let Err(e) = logging::init_logging(&log_opts) {
        logging::init_logging_stderr(&log_opts);
        tracing::warn!("log file unavailable, logging to stderr: {:#}", e);
    }

    if let Err(err) = cli.run().await {
        eprintln!("titlecache error: {:#}", err);
        std::process::exit(exit_code(&err));
    }
}

/// Library errors carry their own status; everything else is 1.
fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<TitleError>()
        .map(TitleError::exit_code)
        .unwrap_or(1)
}
