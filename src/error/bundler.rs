//! Bundler registry and orchestration errors

use super::StackError;
use crate::bundler::BundleError;

/// Creates a bundler not found error
pub fn not_found(bundler_type: impl ToString) -> StackError {
    StackError::BundlerNotFound {
        bundler_type: bundler_type.to_string(),
    }
}

/// Creates a duplicate registration error
pub fn duplicate(bundler_type: impl ToString) -> StackError {
    StackError::DuplicateBundler {
        bundler_type: bundler_type.to_string(),
    }
}

/// Lifts a recorded bundler failure into a top-level error
///
/// The result keeps the failure's own kind, so a plugin that hit its
/// deadline is still reported as a timeout.
pub fn failed(error: &BundleError) -> StackError {
    StackError::BundlerFailed {
        bundler_type: error.bundler_type.to_string(),
        stage: error.stage,
        kind: error.kind,
        cause: error.code.clone(),
        message: error.message.clone(),
    }
}

/// Creates a timeout error
pub fn timeout(operation: impl Into<String>) -> StackError {
    StackError::Timeout {
        operation: operation.into(),
    }
}

/// Creates a cancellation error
pub fn cancelled(operation: impl Into<String>) -> StackError {
    StackError::Cancelled {
        operation: operation.into(),
    }
}

/// Creates an internal error
pub fn internal(message: impl Into<String>) -> StackError {
    StackError::Internal {
        message: message.into(),
    }
}
