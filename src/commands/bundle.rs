//! Bundle command implementation
//!
//! Loads a recipe and the optional bundler configuration, runs the built-in
//! bundlers and prints a summary. Any bundler failure makes the command fail,
//! and so does naming a bundler that is not registered.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use console::Style;

use crate::bundler::{
    BundleOptions, BundleOutput, BundleType, Bundler, BundlerConfig, Context, ExecutionMode,
    Registry,
};
use crate::cli::BundleArgs;
use crate::error::{
    Result,
    bundler::{failed, not_found},
};
use crate::recipe::Recipe;

/// Run bundle command
pub async fn run(args: BundleArgs) -> Result<()> {
    let recipe = Recipe::from_file(&args.recipe)?;
    let config = load_config(args.config.as_deref())?;
    let registry = Arc::new(Registry::with_builtins()?);

    let ctx = match args.timeout {
        Some(secs) => Context::with_timeout(Duration::from_secs(secs)),
        None => Context::new(),
    };
    let options = BundleOptions {
        types: args.bundlers.iter().map(|name| BundleType::new(name.as_str())).collect(),
        fail_fast: args.fail_fast,
        mode: if args.sequential {
            ExecutionMode::Sequential
        } else {
            ExecutionMode::Parallel
        },
    };
    if let Some(unknown) = options.types.iter().find(|t| !registry.contains(t)) {
        return Err(not_found(unknown));
    }

    let output = Bundler::new(registry)
        .with_config(config)
        .make(&ctx, Some(&recipe), &args.output_dir, &options)
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_summary(&output);
    }

    match output.errors.first() {
        Some(error) => Err(failed(error)),
        None => Ok(()),
    }
}

fn load_config(path: Option<&Path>) -> Result<BundlerConfig> {
    match path {
        Some(path) => BundlerConfig::from_file(path),
        None => Ok(BundlerConfig::default()),
    }
}

fn print_summary(output: &BundleOutput) {
    let ok = Style::new().green().bold();
    let err = Style::new().red().bold();
    let dim = Style::new().dim();

    println!(
        "Bundles written to {}",
        Style::new().bold().apply_to(output.output_dir.display())
    );
    println!();

    let mut results: Vec<_> = output.results.iter().collect();
    results.sort_by(|a, b| a.bundler_type.cmp(&b.bundler_type));
    for result in results {
        if result.success {
            println!(
                "  {} {} {}",
                ok.apply_to("✓"),
                result.bundler_type,
                dim.apply_to(format!(
                    "({} files, {} bytes, {} ms)",
                    result.files.len(),
                    result.size,
                    result.duration.as_millis()
                ))
            );
        } else {
            println!("  {} {}", err.apply_to("✗"), result.bundler_type);
        }
    }

    for error in &output.errors {
        println!(
            "    {} {} during {}: {}",
            err.apply_to("error:"),
            error.bundler_type,
            error.stage,
            error.message
        );
    }

    println!();
    println!(
        "{} files, {} bytes in {} ms",
        output.total_files,
        output.total_size,
        output.total_duration.as_millis()
    );
}
