//! Configuration errors

use super::StackError;

/// Creates a config read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> StackError {
    StackError::ConfigReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a config parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> StackError {
    StackError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
