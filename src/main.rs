//! Stackforge - GPU cluster recipes and deployment bundles
//!
//! Resolves a validated configuration recipe for a cluster description and
//! generates deployment bundles from it.

use clap::Parser;

use stackforge::cli::Cli;
use stackforge::{commands, logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = commands::dispatch(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
