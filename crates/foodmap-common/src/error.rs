//! Error types for foodmap services.

use thiserror::Error;

/// Primary error type shared by the foodmap crates.
#[derive(Debug, Error)]
pub enum FoodMapError {
    #[error("Invalid value for '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl FoodMapError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            FoodMapError::InvalidField { .. } => 400,
            FoodMapError::InternalError(_) => 500,
        }
    }
}
