//! Query and recipe errors

use super::StackError;

/// Creates an invalid request error
pub fn invalid_request(message: impl Into<String>) -> StackError {
    StackError::InvalidRequest {
        message: message.into(),
    }
}

/// Creates a missing measurement error
pub fn missing_measurement(measurement: impl ToString) -> StackError {
    StackError::MissingMeasurement {
        measurement: measurement.to_string(),
    }
}
