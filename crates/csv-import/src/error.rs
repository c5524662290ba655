//! Error types for the import crate.

use serde::Serialize;
use thiserror::Error;

/// Errors that abort a whole parse before any row is processed.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to read CSV: {0}")]
    Csv(String),

    #[error("Upload is not valid UTF-8 at byte {0}")]
    Encoding(usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Utf8 { err: utf8, .. } => ImportError::Encoding(utf8.valid_up_to()),
            _ => ImportError::Csv(err.to_string()),
        }
    }
}

/// Result type for import operations.
pub type Result<T> = std::result::Result<T, ImportError>;

/// Failure reported by a geocoding provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeocodeError {
    #[error("Geocoder request failed: {0}")]
    Http(String),

    #[error("Geocoder returned HTTP {0}")]
    Status(u16),

    #[error("Geocoder response could not be decoded: {0}")]
    Decode(String),

    #[error("Geocoder error {code}: {message}")]
    Provider { code: i64, message: String },
}

/// Why a row could not be given coordinates.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeocodeFailure {
    #[error("no address fields to geocode")]
    EmptyAddress,

    #[error("no geocoding candidates for '{address}'")]
    NoCandidates { address: String },

    #[error("geocoder failed for '{address}': {message}")]
    Provider { address: String, message: String },
}

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RowFailureReason {
    #[error(transparent)]
    Geocode(GeocodeFailure),

    #[error("{field} value '{value}' is not a valid coordinate")]
    InvalidCoordinate { field: String, value: String },
}

/// A row that was left out of the batch.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("row {index} (line {line}): {reason}")]
pub struct RowFailure {
    /// Zero-based position among the data rows
    pub index: usize,
    /// Line in the upload where the row starts
    pub line: u64,
    pub reason: RowFailureReason,
}
