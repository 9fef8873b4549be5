use std::path::PathBuf;

use clap::Parser;

/// Arguments for the bundle command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate every bundle:\n    stackforge bundle --recipe recipe.yaml --output-dir out\n\n\
                  Generate selected bundles, stopping at the first failure:\n    stackforge bundle -r recipe.yaml -b gpu-operator --fail-fast\n\n\
                  Use a bundler configuration file:\n    STACKFORGE_CONFIG=bundlers.yaml stackforge bundle -r recipe.yaml")]
pub struct BundleArgs {
    /// Recipe file written by `stackforge recipe` (YAML or JSON)
    #[arg(long, short = 'r', value_name = "FILE")]
    pub recipe: PathBuf,

    /// Directory receiving one subdirectory per bundle
    #[arg(long, short = 'o', value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Bundlers to run (default: all registered)
    #[arg(long, short = 'b', value_name = "TYPE", num_args = 1.., value_delimiter = ',')]
    pub bundlers: Vec<String>,

    /// Stop at the first bundler failure
    #[arg(long)]
    pub fail_fast: bool,

    /// Run bundlers one at a time instead of concurrently
    #[arg(long)]
    pub sequential: bool,

    /// Overall deadline in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Bundler configuration file
    #[arg(long, short = 'c', value_name = "FILE", env = "STACKFORGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}
