//! Shared bundler configuration (`--config` / `STACKFORGE_CONFIG`)
//!
//! One immutable value is handed to every [`Configurable`](super::Configurable)
//! bundler in a run.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::BundleType;
use crate::error::{
    Result,
    config::{parse_failed, read_failed},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BundlerConfig {
    /// Namespace override applied to every bundle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Write a README.md into each bundle
    pub include_readme: bool,

    /// Write a checksums.txt manifest into each bundle
    pub include_checksums: bool,

    /// Per bundle type, dotted values.yaml paths forced to a value
    /// (e.g. `gpu-operator: { driver.enabled: "false" }`)
    pub value_overrides: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for BundlerConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            include_readme: true,
            include_checksums: true,
            value_overrides: BTreeMap::new(),
        }
    }
}

impl BundlerConfig {
    /// Load from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| read_failed(path.display().to_string(), e.to_string()))?;
        let config: BundlerConfig = serde_yaml::from_str(&content)
            .map_err(|e| parse_failed(path.display().to_string(), e.to_string()))?;
        config
            .validate()
            .map_err(|reason| parse_failed(path.display().to_string(), reason))?;
        Ok(config)
    }

    pub fn overrides_for(&self, bundle_type: &BundleType) -> Option<&BTreeMap<String, String>> {
        self.value_overrides.get(bundle_type.as_str())
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if let Some(namespace) = &self.namespace {
            if !is_dns_label(namespace) {
                return Err(format!("namespace '{namespace}' is not a valid DNS-1123 label"));
            }
        }
        Ok(())
    }
}

/// Kubernetes namespace rule: 1-63 chars of `[a-z0-9-]`, alphanumeric at both ends
pub fn is_dns_label(value: &str) -> bool {
    let bytes = value.as_bytes();
    !bytes.is_empty()
        && bytes.len() <= 63
        && bytes
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
        && bytes.first().is_some_and(u8::is_ascii_alphanumeric)
        && bytes.last().is_some_and(u8::is_ascii_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = BundlerConfig::default();
        assert!(config.include_readme);
        assert!(config.include_checksums);
        assert!(config.namespace.is_none());
    }

    #[test]
    fn test_from_file_partial_document_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(
            &path,
            "namespace: gpu-system\nvalueOverrides:\n  gpu-operator:\n    driver.enabled: \"false\"\n",
        )
        .unwrap();

        let config = BundlerConfig::from_file(&path).unwrap();
        assert_eq!(config.namespace.as_deref(), Some("gpu-system"));
        assert!(config.include_readme);
        let overrides = config
            .overrides_for(&BundleType::new("gpu-operator"))
            .unwrap();
        assert_eq!(overrides.get("driver.enabled").map(String::as_str), Some("false"));
    }

    #[test]
    fn test_from_file_rejects_bad_namespace() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "namespace: Bad_Namespace\n").unwrap();

        let err = BundlerConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse configuration file"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = BundlerConfig::from_file(Path::new("/nonexistent/config.yaml")).unwrap_err();
        assert!(matches!(
            err,
            crate::error::StackError::ConfigReadFailed { .. }
        ));
    }

    #[test]
    fn test_is_dns_label() {
        assert!(is_dns_label("gpu-operator"));
        assert!(is_dns_label("ns1"));
        assert!(!is_dns_label("-lead"));
        assert!(!is_dns_label("trail-"));
        assert!(!is_dns_label("Upper"));
        assert!(!is_dns_label(""));
    }
}
