use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("upstream error: {0}")]
    Upstream(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::Conflict(message) => (StatusCode::CONFLICT, message.clone()),
            AppError::Upstream(message) => (StatusCode::BAD_GATEWAY, message.clone()),
        };

        let body = Json(ErrorResponse { message });
        (status, body).into_response()
    }
}

impl From<ScanError> for AppError {
    fn from(error: ScanError) -> Self {
        AppError::Conflict(error.to_string())
    }
}

/// Failures at the market-data boundary
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("still rate limited after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
    #[error("circuit open after repeated failures")]
    CircuitOpen,
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
    #[error("cancelled")]
    Cancelled,
}

impl DataSourceError {
    /// Whether this failure says anything about the health of the upstream.
    /// Client errors and bad payloads belong to one symbol, not the exchange.
    pub fn counts_against_upstream(&self) -> bool {
        match self {
            DataSourceError::Status(code) => *code >= 500,
            DataSourceError::Transport(_) | DataSourceError::RetriesExhausted { .. } => true,
            DataSourceError::MalformedPayload(_)
            | DataSourceError::CircuitOpen
            | DataSourceError::Cancelled => false,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScanError {
    #[error("a scan is already in progress")]
    AlreadyScanning,
    #[error("no scan is in progress")]
    NotScanning,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_409() {
        let response = AppError::from(ScanError::AlreadyScanning).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn validation_maps_to_400() {
        let response = AppError::Validation("bad symbol".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn cancellation_is_not_an_upstream_failure() {
        assert!(!DataSourceError::Cancelled.counts_against_upstream());
        assert!(DataSourceError::Status(500).counts_against_upstream());
        assert!(DataSourceError::RetriesExhausted { attempts: 4 }.counts_against_upstream());
    }

    #[test]
    fn symbol_level_failures_spare_the_upstream() {
        assert!(!DataSourceError::Status(404).counts_against_upstream());
        assert!(!DataSourceError::Status(400).counts_against_upstream());
        assert!(!DataSourceError::MalformedPayload("bad".to_string()).counts_against_upstream());
        assert!(DataSourceError::Status(502).counts_against_upstream());
    }
}
