//! Stackforge - GPU cluster recipes and deployment bundles
//!
//! Two subsystems:
//!
//! - [`recipe`]: resolve a [`recipe::Query`] against a packaged base
//!   configuration and ordered overlays into a [`recipe::Recipe`]
//! - [`bundler`]: run registered bundle plugins over a recipe, sequentially
//!   or concurrently, and aggregate their results
//!
//! ```rust,ignore
//! let query = Query::new().with_service("eks").with_gpu("h100");
//! let recipe = RecipeBuilder::packaged()?.build(Some(&query))?;
//!
//! let registry = Arc::new(Registry::with_builtins()?);
//! let output = Bundler::new(registry)
//!     .make(&Context::new(), Some(&recipe), Path::new("out"), &BundleOptions::default())
//!     .await?;
//! ```

pub mod bundler;
pub mod cli;
pub mod commands;
pub mod error;
pub mod hash;
pub mod logging;
pub mod measurement;
pub mod recipe;
pub mod version;

pub use error::{ErrorKind, Result, StackError};
