//! Bundler plugin contract
//!
//! Every bundler implements [`BundlePlugin`]. Two capabilities are optional
//! and discovered at run time through the `as_*` accessors:
//!
//! - [`Configurable`]: receives the shared [`BundlerConfig`] before anything else
//! - [`Validatable`]: checks the recipe before `make` is called
//!
//! ```rust,ignore
//! #[derive(Debug, Default)]
//! struct MyBundler;
//!
//! #[async_trait]
//! impl BundlePlugin for MyBundler {
//!     fn bundle_type(&self) -> BundleType {
//!         BundleType::new("my-addon")
//!     }
//!
//!     async fn make(
//!         &self,
//!         ctx: &Context,
//!         recipe: &Recipe,
//!         output_dir: &Path,
//!     ) -> Result<BundleResult> {
//!         ctx.check("my-addon")?;
//!         let mut writer = BundleWriter::create(output_dir, &self.bundle_type()).await?;
//!         writer.write("values.yaml", b"enabled: true\n").await?;
//!         Ok(writer.finish())
//!     }
//! }
//! ```

use std::path::Path;

use async_trait::async_trait;

use super::{BundleResult, BundleType, BundlerConfig, Context};
use crate::error::Result;
use crate::recipe::Recipe;

#[async_trait]
pub trait BundlePlugin: Send + Sync + std::fmt::Debug {
    /// Identifier this bundler reports in results
    fn bundle_type(&self) -> BundleType;

    /// Produce the bundle under `output_dir`.
    ///
    /// Implementations should call [`Context::check`] before each unit of
    /// work so that cancellation and deadlines take effect promptly.
    async fn make(&self, ctx: &Context, recipe: &Recipe, output_dir: &Path)
    -> Result<BundleResult>;

    fn as_configurable(&mut self) -> Option<&mut dyn Configurable> {
        None
    }

    fn as_validatable(&self) -> Option<&dyn Validatable> {
        None
    }
}

/// Capability: accept the shared configuration before validation
pub trait Configurable: Send {
    fn configure(&mut self, config: &BundlerConfig) -> Result<()>;
}

/// Capability: reject a recipe before any file is written
#[async_trait]
pub trait Validatable: Send + Sync {
    async fn validate(&self, ctx: &Context, recipe: &Recipe) -> Result<()>;
}
