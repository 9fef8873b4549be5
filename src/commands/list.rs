//! List command implementation
//!
//! Lists the bundlers registered at startup, optionally with the optional
//! capabilities each one implements.

use console::Style;

use crate::bundler::Registry;
use crate::cli::ListArgs;
use crate::error::Result;

/// Run list command
pub fn run(args: ListArgs) -> Result<()> {
    let registry = Registry::with_builtins()?;
    for line in describe(&registry, args.detailed) {
        println!("{line}");
    }
    Ok(())
}

fn describe(registry: &Registry, detailed: bool) -> Vec<String> {
    if registry.is_empty() {
        return vec!["No bundlers registered.".to_string()];
    }

    let mut lines = vec![format!("Registered bundlers ({}):", registry.len())];
    for bundle_type in registry.registered_types() {
        let name = Style::new().bold().yellow().apply_to(bundle_type.as_str());
        if !detailed {
            lines.push(format!("  {name}"));
            continue;
        }
        let Some(mut plugin) = registry.get(&bundle_type) else {
            continue;
        };
        let mut capabilities = vec!["make"];
        if plugin.as_configurable().is_some() {
            capabilities.push("configure");
        }
        if plugin.as_validatable().is_some() {
            capabilities.push("validate");
        }
        lines.push(format!("  {name}  [{}]", capabilities.join(", ")));
    }
    lines
}
