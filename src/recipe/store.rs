//! Overlay store: the packaged base configuration and its ordered overlays
//!
//! The packaged data set is embedded at compile time and parsed at most once
//! per process by [`load`]. A parse failure is cached alongside a success, so
//! every later caller sees the same error without a re-parse.

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::query::Query;
use crate::error::{Result, StackError, store::load_failed};
use crate::measurement::Measurement;

/// Packaged data set shipped with the crate
pub const PACKAGED_DATA: &str = include_str!("data/overlays.yaml");

static PACKAGED: OnceLock<std::result::Result<Arc<Store>, String>> = OnceLock::new();

/// A match key and the measurements folded in when it fires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub key: Query,

    #[serde(default)]
    pub types: Vec<Measurement>,
}

/// Immutable snapshot of base measurements plus overlays in document order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Store {
    #[serde(default)]
    pub base: Vec<Measurement>,

    #[serde(default)]
    pub overlays: Vec<Overlay>,
}

impl Store {
    /// Parse and validate a data set document
    pub fn from_yaml(document: &str) -> Result<Self> {
        let store: Store =
            serde_yaml::from_str(document).map_err(|e| load_failed(e.to_string()))?;
        store.validate()?;
        debug!(
            base = store.base.len(),
            overlays = store.overlays.len(),
            "Parsed overlay store"
        );
        Ok(store)
    }

    /// The base must hold at most one measurement per type
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for measurement in &self.base {
            if !seen.insert(measurement.measurement_type) {
                return Err(load_failed(format!(
                    "base repeats measurement type '{}'",
                    measurement.measurement_type
                )));
            }
        }
        Ok(())
    }
}

/// Process-wide packaged store, parsed on first use.
///
/// Concurrent first callers block until the single parse completes and then
/// share its outcome.
pub fn load() -> Result<Arc<Store>> {
    PACKAGED
        .get_or_init(|| {
            Store::from_yaml(PACKAGED_DATA)
                .map(Arc::new)
                .map_err(|e| match e {
                    StackError::StoreLoadFailed { reason } => reason,
                    other => other.to_string(),
                })
        })
        .clone()
        .map_err(load_failed)
}
