//! Registry of bundler factories
//!
//! The registry maps a [`BundleType`] to a factory producing a fresh plugin
//! instance. Instances are never shared between runs, so per-run state set
//! through [`Configurable`](super::Configurable) cannot leak.
//!
//! Registration happens once at startup (see [`Registry::register_builtins`]);
//! afterwards the registry is only read, typically behind an `Arc`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{BundlePlugin, BundleType};
use crate::error::{Result, bundler::duplicate};

/// Produces a new plugin instance per call
pub type PluginFactory = Arc<dyn Fn() -> Box<dyn BundlePlugin> + Send + Sync>;

#[derive(Default, Clone)]
pub struct Registry {
    factories: HashMap<BundleType, PluginFactory>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("types", &self.registered_types())
            .finish()
    }
}

impl Registry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the shipped bundlers
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        registry.register_builtins()?;
        Ok(registry)
    }

    /// Register a factory for `bundle_type`
    ///
    /// # Errors
    ///
    /// Returns `StackError::DuplicateBundler` if the type is already
    /// registered; the existing factory is kept.
    pub fn register<F>(&mut self, bundle_type: impl Into<BundleType>, factory: F) -> Result<()>
    where
        F: Fn() -> Box<dyn BundlePlugin> + Send + Sync + 'static,
    {
        let bundle_type = bundle_type.into();
        if self.factories.contains_key(&bundle_type) {
            return Err(duplicate(bundle_type));
        }
        self.factories.insert(bundle_type, Arc::new(factory));
        Ok(())
    }

    /// Register all built-in bundlers:
    /// - gpu-operator
    /// - network-operator
    pub fn register_builtins(&mut self) -> Result<()> {
        use super::builtin::{GpuOperatorBundler, NetworkOperatorBundler};

        self.register(BundleType::GPU_OPERATOR, || {
            Box::new(GpuOperatorBundler::default())
        })?;
        self.register(BundleType::NETWORK_OPERATOR, || {
            Box::new(NetworkOperatorBundler::default())
        })?;
        Ok(())
    }

    /// Fresh instance for `bundle_type`, if registered
    pub fn get(&self, bundle_type: &BundleType) -> Option<Box<dyn BundlePlugin>> {
        self.factories.get(bundle_type).map(|factory| factory())
    }

    /// Factory for `bundle_type`, for callers that build the instance later
    pub fn factory(&self, bundle_type: &BundleType) -> Option<PluginFactory> {
        self.factories.get(bundle_type).map(Arc::clone)
    }

    /// Fresh instance of every registered bundler
    pub fn get_all(&self) -> HashMap<BundleType, Box<dyn BundlePlugin>> {
        self.factories
            .iter()
            .map(|(bundle_type, factory)| (bundle_type.clone(), factory()))
            .collect()
    }

    /// Registered types in ascending order
    pub fn registered_types(&self) -> Vec<BundleType> {
        let mut types: Vec<BundleType> = self.factories.keys().cloned().collect();
        types.sort();
        types
    }

    pub fn contains(&self, bundle_type: &BundleType) -> bool {
        self.factories.contains_key(bundle_type)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
