//! Bundle generation
//!
//! This module provides a plugin-based architecture for turning a resolved
//! [`Recipe`](crate::recipe::Recipe) into deployment bundles, one per
//! Kubernetes add-on.
//!
//! ## Architecture
//!
//! - [`plugin`]: the [`BundlePlugin`] contract plus the optional
//!   [`Configurable`] and [`Validatable`] capabilities
//! - [`registry`]: bundle type → plugin factory, populated by the host program
//! - [`orchestrator`]: runs the selected plugins through
//!   configure → validate → make, sequentially or in parallel
//! - [`writer`]: helper that plugins use to lay out files under
//!   `<output>/<bundle-type>/`
//! - [`builtin`]: the bundlers shipped with the crate
//!
//! ## Adding a New Bundler
//!
//! 1. Create a new file in `src/bundler/builtin/`
//! 2. Implement [`BundlePlugin`] (and optionally the capability traits)
//! 3. Register its factory in [`Registry::register_builtins`]

pub mod builtin;
pub mod config;
pub mod context;
pub mod orchestrator;
pub mod plugin;
pub mod registry;
pub mod result;
pub mod writer;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use config::BundlerConfig;
pub use context::Context;
pub use orchestrator::{BundleOptions, Bundler, ExecutionMode};
pub use plugin::{BundlePlugin, Configurable, Validatable};
pub use registry::Registry;
pub use result::{BundleError, BundleOutput, BundleResult};

/// Unique identifier of a bundler, e.g. `gpu-operator`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BundleType(String);

impl BundleType {
    pub const GPU_OPERATOR: &'static str = "gpu-operator";
    pub const NETWORK_OPERATOR: &'static str = "network-operator";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BundleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BundleType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for BundleType {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Lifecycle stage a bundler failure is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleStage {
    Configuration,
    Validation,
    Execution,
}

impl fmt::Display for BundleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BundleStage::Configuration => "configuration",
            BundleStage::Validation => "validation",
            BundleStage::Execution => "execution",
        })
    }
}
