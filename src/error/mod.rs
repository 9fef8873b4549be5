//! Error types and handling for stackforge
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`recipe`]: Query and recipe resolution errors
//! - [`store`]: Overlay store errors
//! - [`bundler`]: Bundler registry and orchestration errors
//! - [`config`]: Configuration errors
//! - [`fs`]: File system errors
//!
//! Every variant maps onto one [`ErrorKind`] of the public taxonomy and can
//! report its structured fields through [`StackError::context`].

pub mod bundler;
pub mod config;
pub mod fs;
pub mod recipe;
pub mod store;

use std::collections::BTreeMap;
use std::fmt;

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

use crate::bundler::BundleStage;

/// Coarse classification shared by every error the crate returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// Malformed or missing query, recipe, or argument
    InvalidRequest,
    /// Unknown bundler type
    NotFound,
    /// Store parse failure, plugin panic, I/O failure
    Internal,
    /// Deadline exceeded or run cancelled
    Timeout,
}

impl ErrorKind {
    /// Stable lowercase name, e.g. `invalid-request`
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidRequest => "invalid-request",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Internal => "internal",
            ErrorKind::Timeout => "timeout",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for stackforge operations
#[derive(Error, Diagnostic, Debug)]
pub enum StackError {
    // Request errors
    #[error("Invalid request: {message}")]
    #[diagnostic(
        code(stackforge::request::invalid),
        help("Check the query fields and the recipe document")
    )]
    InvalidRequest { message: String },

    #[error("Recipe is missing required measurement '{measurement}'")]
    #[diagnostic(
        code(stackforge::recipe::missing_measurement),
        help("Resolve the recipe with a query that produces this measurement type")
    )]
    MissingMeasurement { measurement: String },

    // Store errors
    #[error("Failed to load overlay store: {reason}")]
    #[diagnostic(
        code(stackforge::store::load_failed),
        help("The packaged data set is invalid; this failure is permanent for the process")
    )]
    StoreLoadFailed { reason: String },

    // Bundler errors
    #[error("Bundler not found: {bundler_type}")]
    #[diagnostic(
        code(stackforge::bundler::not_found),
        help("Run 'stackforge list' to see the registered bundlers")
    )]
    BundlerNotFound { bundler_type: String },

    #[error("Bundler '{bundler_type}' is already registered")]
    #[diagnostic(code(stackforge::bundler::duplicate))]
    DuplicateBundler { bundler_type: String },

    /// `kind` and `cause` describe the plugin's own error
    #[error("Bundler '{bundler_type}' failed during {stage}: {message}")]
    #[diagnostic(code(stackforge::bundler::failed))]
    BundlerFailed {
        bundler_type: String,
        stage: BundleStage,
        kind: ErrorKind,
        cause: Option<String>,
        message: String,
    },

    // Execution errors
    #[error("Deadline exceeded: {operation}")]
    #[diagnostic(
        code(stackforge::timeout),
        help("Increase the timeout or reduce the number of bundlers")
    )]
    Timeout { operation: String },

    #[error("Operation cancelled: {operation}")]
    #[diagnostic(code(stackforge::cancelled))]
    Cancelled { operation: String },

    #[error("Internal error: {message}")]
    #[diagnostic(code(stackforge::internal))]
    Internal { message: String },

    // Configuration errors
    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(stackforge::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(stackforge::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(stackforge::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(stackforge::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(stackforge::fs::io_error))]
    IoError { message: String },
}

impl StackError {
    /// Taxonomy bucket for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            StackError::InvalidRequest { .. } | StackError::MissingMeasurement { .. } => {
                ErrorKind::InvalidRequest
            }
            StackError::BundlerNotFound { .. } => ErrorKind::NotFound,
            StackError::Timeout { .. } | StackError::Cancelled { .. } => ErrorKind::Timeout,
            StackError::BundlerFailed { kind, .. } => *kind,
            StackError::StoreLoadFailed { .. }
            | StackError::DuplicateBundler { .. }
            | StackError::Internal { .. }
            | StackError::ConfigReadFailed { .. }
            | StackError::ConfigParseFailed { .. }
            | StackError::FileReadFailed { .. }
            | StackError::FileWriteFailed { .. }
            | StackError::IoError { .. } => ErrorKind::Internal,
        }
    }

    /// Structured fields describing where the error happened
    pub fn context(&self) -> BTreeMap<String, String> {
        let mut ctx = BTreeMap::new();
        ctx.insert("kind".to_string(), self.kind().to_string());
        match self {
            StackError::BundlerNotFound { bundler_type }
            | StackError::DuplicateBundler { bundler_type } => {
                ctx.insert("bundler".to_string(), bundler_type.clone());
            }
            StackError::BundlerFailed {
                bundler_type,
                stage,
                cause,
                ..
            } => {
                ctx.insert("bundler".to_string(), bundler_type.clone());
                ctx.insert("stage".to_string(), stage.to_string());
                if let Some(cause) = cause {
                    ctx.insert("cause".to_string(), cause.clone());
                }
            }
            StackError::MissingMeasurement { measurement } => {
                ctx.insert("measurement".to_string(), measurement.clone());
            }
            StackError::Timeout { operation } | StackError::Cancelled { operation } => {
                ctx.insert("operation".to_string(), operation.clone());
            }
            StackError::ConfigReadFailed { path, reason }
            | StackError::ConfigParseFailed { path, reason }
            | StackError::FileReadFailed { path, reason }
            | StackError::FileWriteFailed { path, reason } => {
                ctx.insert("path".to_string(), path.clone());
                ctx.insert("reason".to_string(), reason.clone());
            }
            StackError::InvalidRequest { .. }
            | StackError::StoreLoadFailed { .. }
            | StackError::Internal { .. }
            | StackError::IoError { .. } => {}
        }
        ctx
    }
}

impl From<std::io::Error> for StackError {
    fn from(err: std::io::Error) -> Self {
        StackError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for StackError {
    fn from(err: serde_yaml::Error) -> Self {
        StackError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for StackError {
    fn from(err: serde_json::Error) -> Self {
        StackError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, StackError>;
