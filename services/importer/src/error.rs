//! HTTP error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;

use csv_import::ImportError;
use foodmap_common::FoodMapError;

/// Error returned by a handler, rendered as `{ "error": "..." }`.
#[derive(Debug)]
pub struct ApiError(pub FoodMapError);

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl From<FoodMapError> for ApiError {
    fn from(err: FoodMapError) -> Self {
        ApiError(err)
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        let inner = match err {
            ImportError::Csv(_) | ImportError::Encoding(_) => FoodMapError::InvalidField {
                field: "file".to_string(),
                message: err.to_string(),
            },
            ImportError::InvalidConfig(message) => FoodMapError::InternalError(message),
        };
        ApiError(inner)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        warn!(status = status.as_u16(), error = %self.0, "Request failed");

        (
            status,
            Json(ErrorBody {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
