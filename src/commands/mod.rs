//! Command implementations for the stackforge CLI

pub mod bundle;
pub mod completions;
pub mod list;
pub mod recipe;
pub mod version;

use crate::cli::{Cli, Commands};
use crate::error::Result;

/// Dispatch a parsed command line
pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Recipe(args) => recipe::run(args),
        Commands::Bundle(args) => bundle::run(args).await,
        Commands::List(args) => list::run(args),
        Commands::Version => version::run(),
        Commands::Completions(args) => completions::run(args),
    }
}
