//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - recipe: Recipe resolution arguments
//! - bundle: Bundle generation arguments
//! - list: List command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};

pub mod bundle;
pub mod completions;
pub mod list;
pub mod recipe;

pub use bundle::BundleArgs;
pub use completions::CompletionsArgs;
pub use list::ListArgs;
pub use recipe::{OutputFormat, RecipeArgs};

/// Stackforge - GPU cluster recipes and deployment bundles
#[derive(Parser, Debug)]
#[command(
    name = "stackforge",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Resolve cluster recipes and generate deployment bundles",
    long_about = "Stackforge resolves a validated configuration recipe (Kubernetes, GPU, OS, \
                  SystemD settings) for a cluster description, and turns that recipe into \
                  deployment bundles such as GPU Operator and Network Operator values.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  stackforge recipe --service eks --gpu h100 -o recipe.yaml  \x1b[90m# Resolve a recipe\x1b[0m\n   \
                  stackforge bundle --recipe recipe.yaml -o out              \x1b[90m# Generate all bundles\x1b[0m\n   \
                  stackforge bundle -r recipe.yaml -b gpu-operator           \x1b[90m# Generate one bundle\x1b[0m\n   \
                  stackforge list                                            \x1b[90m# List bundlers\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a recipe for a cluster description
    Recipe(RecipeArgs),

    /// Generate deployment bundles from a recipe
    Bundle(BundleArgs),

    /// List registered bundlers
    List(ListArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
