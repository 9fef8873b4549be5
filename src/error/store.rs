//! Overlay store errors

use super::StackError;

/// Creates a store load failed error
pub fn load_failed(reason: impl Into<String>) -> StackError {
    StackError::StoreLoadFailed {
        reason: reason.into(),
    }
}
