//! Binary crate for the `avwx` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments into request options
//! - Interactive configuration
//! - Printing reports and mapping failures to exit codes

use std::process::ExitCode;

use clap::Parser;
use env_logger::{Builder, Target};
use log::LevelFilter;

mod cli;
mod output;

#[tokio::main]
async fn main() -> ExitCode {
    let cmd = cli::Cli::parse();
    init_logging(cmd.verbose);

    match cmd.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::report_error(&err);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let mut builder = Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        });
    }
    builder
        .target(Target::Stderr)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();
}
