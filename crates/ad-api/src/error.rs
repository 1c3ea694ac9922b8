//! Error types for ad-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use crate::handlers::PostAdResponse;

/// ad-api error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Wizard(#[from] ad_wizard::WizardError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            // Wizard failures carry the discriminating step message and
            // are the caller's problem to interpret, as are malformed
            // requests.
            ApiError::InvalidRequest(_) | ApiError::Wizard(_) => StatusCode::BAD_REQUEST,
            ApiError::Http(_) | ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Ad submission failed: {}", self);
        let body = Json(PostAdResponse::failure(self.to_string()));
        (self.status(), body).into_response()
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use ad_wizard::WizardError;

    #[test]
    fn test_wizard_message_passes_through_verbatim() {
        let err = ApiError::from(WizardError::Selection(
            "Location not available. Please verify the postal code and city are valid for Seminuevos."
                .to_string(),
        ));
        assert!(err.to_string().starts_with("Location not available"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_errors_are_500() {
        let err = ApiError::Http("task join failure".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
