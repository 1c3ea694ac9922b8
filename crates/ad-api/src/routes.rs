//! Route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{health, post_ad};
use crate::server::AppState;

/// Create the API router
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Ad submission
        .route("/api/post-ad", post(post_ad))
}
