//! swc - Swift storage CLI client
//!
//! A command-line interface for Swift-compatible object storage services.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use swc_cli::commands::{self, Cli};

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so `cat` output stays clean
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = commands::execute(cli);

    std::process::exit(exit_code.as_i32());
}
