use clap::Parser;

/// Arguments for the list command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List registered bundlers:\n    stackforge list\n\n\
                  Show bundler capabilities:\n    stackforge list --detailed")]
pub struct ListArgs {
    /// Show which optional capabilities each bundler has
    #[arg(long)]
    pub detailed: bool,
}
