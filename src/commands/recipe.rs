//! Recipe command implementation
//!
//! Turns the query flags into a [`Query`], resolves it against the packaged
//! data set and prints (or writes) the recipe.

use tracing::info;

use crate::cli::{OutputFormat, RecipeArgs};
use crate::error::{Result, fs::write_failed};
use crate::recipe::{Query, Recipe, RecipeBuilder};

/// Run recipe command
pub fn run(args: RecipeArgs) -> Result<()> {
    let query = query_from_args(&args)?;
    let recipe = RecipeBuilder::packaged()?.build(Some(&query))?;
    info!(
        query = %query,
        matched = recipe.matched_rules.len(),
        "Resolved recipe"
    );

    let rendered = render(&recipe, args.format)?;
    match &args.output {
        Some(path) => std::fs::write(path, rendered)
            .map_err(|e| write_failed(path.display().to_string(), e.to_string()))?,
        None => print!("{rendered}"),
    }
    Ok(())
}

fn query_from_args(args: &RecipeArgs) -> Result<Query> {
    let mut query = Query::new();
    if let Some(os) = &args.os {
        query = query.with_os(os);
    }
    if let Some(version) = &args.os_version {
        query = query.with_os_version(version)?;
    }
    if let Some(kernel) = &args.kernel {
        query = query.with_kernel(kernel)?;
    }
    if let Some(service) = &args.service {
        query = query.with_service(service);
    }
    if let Some(version) = &args.k8s {
        query = query.with_k8s_version(version)?;
    }
    if let Some(gpu) = &args.gpu {
        query = query.with_gpu(gpu);
    }
    if let Some(intent) = &args.intent {
        query = query.with_intent(intent);
    }
    Ok(query)
}

fn render(recipe: &Recipe, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Yaml => serde_yaml::to_string(recipe)?,
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(recipe)?;
            json.push('\n');
            json
        }
    })
}
