use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Arguments for the recipe command
///
/// Omitted fields (or `any`) leave that dimension unconstrained.
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Resolve for EKS:\n    stackforge recipe --service eks\n\n\
                  Resolve for H100 training on EKS as JSON:\n    stackforge recipe --service eks --gpu h100 --intent training --format json\n\n\
                  Write to a file:\n    stackforge recipe --os ubuntu --os-version 24.04 -o recipe.yaml")]
pub struct RecipeArgs {
    /// Operating system family (e.g. ubuntu)
    #[arg(long)]
    pub os: Option<String>,

    /// Operating system version (e.g. 24.04)
    #[arg(long, value_name = "VERSION")]
    pub os_version: Option<String>,

    /// Kernel version (e.g. 6.8)
    #[arg(long, value_name = "VERSION")]
    pub kernel: Option<String>,

    /// Managed Kubernetes service (eks, gke, aks)
    #[arg(long)]
    pub service: Option<String>,

    /// Kubernetes version (e.g. 1.30)
    #[arg(long, value_name = "VERSION")]
    pub k8s: Option<String>,

    /// Accelerator model (e.g. h100, gb200)
    #[arg(long)]
    pub gpu: Option<String>,

    /// Workload intent (training, inference)
    #[arg(long)]
    pub intent: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,

    /// Write to FILE instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}
