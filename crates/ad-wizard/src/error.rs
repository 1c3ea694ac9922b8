//! Error types for ad-wizard
//!
//! One variant per failure kind the run can end with. All are terminal:
//! none is retried, each aborts the state machine at the current step, and
//! the message reaches the caller unchanged so "Location not available" is
//! distinguishable from "Login failed".

use thiserror::Error;

use ad_browser::BrowserError;

/// ad-wizard error type
#[derive(Error, Debug)]
pub enum WizardError {
    /// Malformed request, raised before any session exists.
    #[error("{0}")]
    Validation(String),

    /// Bad credentials or unexpected post-login state.
    #[error("Login failed: {0}")]
    Authentication(String),

    /// A required control never appeared.
    #[error("{0}")]
    ElementNotFound(String),

    /// A dropdown option never matched.
    #[error("{0}")]
    Selection(String),

    /// An expected page transition did not occur.
    #[error("{0}")]
    Navigation(String),

    /// Attaching images failed.
    #[error("{0}")]
    Upload(String),

    /// Failure inside the browser layer.
    #[error(transparent)]
    Browser(#[from] BrowserError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, WizardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_message_prefix() {
        let err = WizardError::Authentication("Still on login page".to_string());
        assert_eq!(err.to_string(), "Login failed: Still on login page");
    }

    #[test]
    fn test_browser_error_message_passes_through() {
        let err = WizardError::from(BrowserError::ElementNotFound(
            "Element #email not found after 10000ms".to_string(),
        ));
        assert_eq!(
            err.to_string(),
            "Element not found: Element #email not found after 10000ms"
        );
    }

    #[test]
    fn test_selection_message_verbatim() {
        let err = WizardError::Selection(
            "Location not available. Please verify the postal code and city are valid for Seminuevos."
                .to_string(),
        );
        assert!(err.to_string().starts_with("Location not available"));
    }
}
