//! HTTP API handlers
//!
//! Request handlers for ad submission and the health probe.

use std::path::PathBuf;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use ad_core::AdRequest;

use crate::error::ApiError;
use crate::server::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

/// Ad submission payload
#[derive(Debug, Deserialize)]
pub struct PostAdRequest {
    /// Asking price as a numeric string
    pub price: Option<String>,
    /// Free-text ad description
    pub description: Option<String>,
    /// Optional image paths; the configured defaults are used when absent
    #[serde(default)]
    pub images: Option<Vec<String>>,
}

/// Ad submission result
#[derive(Debug, Serialize, Deserialize)]
pub struct PostAdResponse {
    pub success: bool,
    pub message: String,
    /// URL of the completion screenshot on success
    pub screenshot: Option<String>,
}

impl PostAdResponse {
    pub(crate) fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            screenshot: None,
        }
    }
}

// ============================================================================
// Handler functions
// ============================================================================

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Submit an ad: runs the full posting workflow and returns the
/// completion-screenshot URL.
pub async fn post_ad(
    State(state): State<AppState>,
    Json(req): Json<PostAdRequest>,
) -> Result<Json<PostAdResponse>, ApiError> {
    let (Some(price), Some(description)) = (req.price, req.description) else {
        return Err(ApiError::InvalidRequest(
            "Price and description are required".to_string(),
        ));
    };

    let mut ad = AdRequest::new(price, description);
    ad.images = req
        .images
        .map(|paths| paths.into_iter().map(PathBuf::from).collect());

    info!("Ad submission received");

    let config = state.config.clone();
    // The workflow drives a blocking browser client; keep it off the
    // async executor.
    let path = tokio::task::spawn_blocking(move || ad_wizard::publish_ad(&config, &ad))
        .await
        .map_err(|e| ApiError::Http(format!("Workflow task failed: {}", e)))??;

    let url = screenshot_url(state.config.api.port, &path);
    info!("Ad posted successfully: {}", url);
    Ok(Json(PostAdResponse {
        success: true,
        message: "Ad posted successfully".to_string(),
        screenshot: Some(url),
    }))
}

/// Translate an artifact path into the URL it is served under.
fn screenshot_url(port: u16, path: &std::path::Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("http://localhost:{}/screenshots/{}", port, file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserializes_without_images() {
        let req: PostAdRequest =
            serde_json::from_str(r#"{"price": "250000", "description": "nice car"}"#).unwrap();
        assert_eq!(req.price.as_deref(), Some("250000"));
        assert_eq!(req.description.as_deref(), Some("nice car"));
        assert!(req.images.is_none());
    }

    #[test]
    fn test_request_tolerates_missing_fields() {
        let req: PostAdRequest = serde_json::from_str(r#"{"price": "250000"}"#).unwrap();
        assert!(req.description.is_none());
    }

    #[test]
    fn test_response_wire_shape() {
        let ok = PostAdResponse {
            success: true,
            message: "Ad posted successfully".to_string(),
            screenshot: Some("http://localhost:3000/screenshots/final_step_payment_1.png".into()),
        };
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["success"], true);
        assert!(json["screenshot"].as_str().unwrap().contains("/screenshots/"));

        let failed = PostAdResponse::failure("Login failed: Still on login page");
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["screenshot"].is_null());
    }

    #[test]
    fn test_screenshot_url_composition() {
        let url = screenshot_url(
            3000,
            std::path::Path::new("/srv/shots/final_step_payment_1700000000123.png"),
        );
        assert_eq!(
            url,
            "http://localhost:3000/screenshots/final_step_payment_1700000000123.png"
        );
    }
}
