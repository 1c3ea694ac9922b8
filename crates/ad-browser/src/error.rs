//! Error types for ad-browser

use thiserror::Error;

/// ad-browser error type
#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Browser initialization failed: {0}")]
    Initialization(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Interaction failed: {0}")]
    Interaction(String),

    #[error("Evaluation failed: {0}")]
    Evaluation(String),

    #[error("Screenshot failed: {0}")]
    Screenshot(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, BrowserError>;
