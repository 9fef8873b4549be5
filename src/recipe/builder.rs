//! Recipe resolution against the overlay store
//!
//! Every build starts from a fresh clone of the base measurements and walks
//! the overlays in document order, so the shared store is never written and
//! the result does not depend on any map iteration order.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use super::matcher::matches;
use super::query::Query;
use super::store::{self, Store};
use super::Recipe;
use crate::error::{Result, recipe::invalid_request};
use crate::measurement::{Measurement, MeasurementType};

/// Payload version stamped on recipes unless overridden
pub const DEFAULT_PAYLOAD_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone)]
pub struct RecipeBuilder {
    store: Arc<Store>,
    payload_version: String,
}

impl RecipeBuilder {
    /// Build against an explicitly supplied store
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            payload_version: DEFAULT_PAYLOAD_VERSION.to_string(),
        }
    }

    /// Build against the packaged data set (loaded once per process)
    pub fn packaged() -> Result<Self> {
        Ok(Self::new(store::load()?))
    }

    pub fn with_payload_version(mut self, version: impl Into<String>) -> Self {
        self.payload_version = version.into();
        self
    }

    /// Resolve `query` into a recipe.
    ///
    /// Fails only when no query is supplied.
    pub fn build(&self, query: Option<&Query>) -> Result<Recipe> {
        let query = query.ok_or_else(|| invalid_request("query is required"))?;

        let mut measurements: Vec<Measurement> = self.store.base.clone();
        let mut index: HashMap<MeasurementType, usize> = measurements
            .iter()
            .enumerate()
            .map(|(idx, m)| (m.measurement_type, idx))
            .collect();
        let mut matched_rules = Vec::new();

        for overlay in &self.store.overlays {
            if !matches(&overlay.key, Some(query)) {
                continue;
            }
            let rule = overlay.key.to_string();
            debug!(rule = %rule, "Overlay matched");
            matched_rules.push(rule);

            for incoming in &overlay.types {
                match index.get(&incoming.measurement_type) {
                    Some(&idx) => measurements[idx].merge(incoming),
                    None => {
                        index.insert(incoming.measurement_type, measurements.len());
                        measurements.push(incoming.clone());
                    }
                }
            }
        }

        debug!(
            query = %query,
            matched = matched_rules.len(),
            measurements = measurements.len(),
            "Resolved recipe"
        );

        Ok(Recipe {
            request: query.clone(),
            measurements,
            matched_rules,
            generated_at: Utc::now(),
            payload_version: self.payload_version.clone(),
        })
    }
}
