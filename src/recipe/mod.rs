//! Recipe resolution
//!
//! This module handles:
//! - Queries and their rule-side matching (via [`query`] and [`matcher`])
//! - The packaged base configuration and overlays (via [`store`])
//! - Building a [`Recipe`] for a query (via [`builder`])

pub mod builder;
pub mod matcher;
pub mod query;
pub mod store;

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use builder::RecipeBuilder;
pub use query::Query;
pub use store::{Overlay, Store};

use crate::error::{
    Result,
    fs::read_failed,
    recipe::{invalid_request, missing_measurement},
};
use crate::measurement::{Measurement, MeasurementType, Reading};

/// Fully resolved configuration for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub request: Query,
    pub measurements: Vec<Measurement>,
    #[serde(default)]
    pub matched_rules: Vec<String>,
    pub generated_at: DateTime<Utc>,
    pub payload_version: String,
}

impl Recipe {
    pub fn measurement(&self, measurement_type: MeasurementType) -> Option<&Measurement> {
        self.measurements
            .iter()
            .find(|m| m.measurement_type == measurement_type)
    }

    /// Look up `type/subtype/key`
    pub fn reading(
        &self,
        measurement_type: MeasurementType,
        subtype: &str,
        key: &str,
    ) -> Option<&Reading> {
        self.measurement(measurement_type)?.subtype(subtype)?.get(key)
    }

    /// Fail with the first of `types` the recipe does not carry
    pub fn require(&self, types: &[MeasurementType]) -> Result<()> {
        match types.iter().find(|t| self.measurement(**t).is_none()) {
            Some(missing) => Err(missing_measurement(missing)),
            None => Ok(()),
        }
    }

    /// Read a recipe previously written as YAML or JSON
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| read_failed(path.display().to_string(), e.to_string()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(&content).map_err(|e| e.to_string())
        };
        parsed.map_err(|reason| {
            invalid_request(format!("malformed recipe {}: {reason}", path.display()))
        })
    }
}
