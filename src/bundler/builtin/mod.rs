//! Bundlers shipped with stackforge
//!
//! Both built-ins render a Helm-style `values.yaml` from recipe readings,
//! then an optional README and checksum manifest. The shared pieces live
//! here; each bundler only decides which readings go where.

mod gpu_operator;
mod network_operator;

use std::collections::BTreeMap;
use std::path::Path;

use serde_yaml::{Mapping, Value};

pub use gpu_operator::GpuOperatorBundler;
pub use network_operator::NetworkOperatorBundler;

use super::writer::BundleWriter;
use super::{BundleResult, BundleType, BundlerConfig, Context};
use crate::error::Result;
use crate::measurement::MeasurementType;
use crate::recipe::Recipe;

/// Options a built-in takes from the shared configuration
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Settings {
    pub namespace: Option<String>,
    pub include_readme: bool,
    pub include_checksums: bool,
    pub overrides: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        let defaults = BundlerConfig::default();
        Self {
            namespace: defaults.namespace,
            include_readme: defaults.include_readme,
            include_checksums: defaults.include_checksums,
            overrides: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn from_config(config: &BundlerConfig, bundle_type: &BundleType) -> Self {
        Self {
            namespace: config.namespace.clone(),
            include_readme: config.include_readme,
            include_checksums: config.include_checksums,
            overrides: config.overrides_for(bundle_type).cloned().unwrap_or_default(),
        }
    }
}

/// Reading as a YAML value
pub(crate) fn reading(
    recipe: &Recipe,
    measurement_type: MeasurementType,
    subtype: &str,
    key: &str,
) -> Option<Value> {
    let reading = recipe.reading(measurement_type, subtype, key)?;
    serde_yaml::to_value(reading).ok()
}

/// Set `a.b.c` in `values`, creating intermediate mappings
pub(crate) fn set_path(values: &mut Mapping, dotted: &str, value: Value) {
    let mut parts = dotted.split('.').filter(|p| !p.is_empty()).peekable();
    let mut current = values;
    while let Some(part) = parts.next() {
        let key = Value::String(part.to_string());
        if parts.peek().is_none() {
            current.insert(key, value);
            return;
        }
        let entry = current
            .entry(key)
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        if !entry.is_mapping() {
            *entry = Value::Mapping(Mapping::new());
        }
        let Value::Mapping(next) = entry else {
            return;
        };
        current = next;
    }
}

/// Apply configured overrides; values are parsed as YAML scalars
pub(crate) fn apply_overrides(values: &mut Mapping, overrides: &BTreeMap<String, String>) {
    for (path, raw) in overrides {
        let value =
            serde_yaml::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.clone()));
        set_path(values, path, value);
    }
}

fn render_readme(bundle_type: &BundleType, namespace: &str, recipe: &Recipe) -> String {
    let mut readme = format!(
        "# {bundle_type}\n\n\
         Generated by stackforge {version} at {generated}.\n\n\
         Request: `{request}`\n\n\
         ## Install\n\n\
         ```sh\n\
         helm upgrade --install {bundle_type} <chart> \\\n  \
         --namespace {namespace} --create-namespace \\\n  \
         --values values.yaml\n\
         ```\n",
        version = recipe.payload_version,
        generated = recipe.generated_at.to_rfc3339(),
        request = recipe.request,
    );
    if !recipe.matched_rules.is_empty() {
        readme.push_str("\n## Matched rules\n\n");
        for rule in &recipe.matched_rules {
            readme.push_str(&format!("- `{rule}`\n"));
        }
    }
    readme
}

/// Shared write sequence: values, README, checksums
pub(crate) async fn write_bundle(
    ctx: &Context,
    bundle_type: &BundleType,
    settings: &Settings,
    namespace: &str,
    recipe: &Recipe,
    output_dir: &Path,
    mut values: Mapping,
) -> Result<BundleResult> {
    let operation = format!("{bundle_type} bundle");
    apply_overrides(&mut values, &settings.overrides);

    ctx.check(&operation)?;
    let mut writer = BundleWriter::create(output_dir, bundle_type).await?;
    writer.write_yaml("values.yaml", &values).await?;

    if settings.include_readme {
        ctx.check(&operation)?;
        let readme = render_readme(bundle_type, namespace, recipe);
        writer.write("README.md", readme).await?;
    }

    if settings.include_checksums {
        ctx.check(&operation)?;
        writer.write_checksums().await?;
    }

    Ok(writer.finish())
}
