//! Inbound ad request

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Caller-supplied ad data, immutable once accepted.
///
/// Validated before any browser session is created; a request that fails
/// validation never costs a browser launch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdRequest {
    /// Asking price as a numeric string, e.g. "250000".
    pub price: String,
    /// Free-text ad description.
    pub description: String,
    /// Images to attach. When absent, the configured default set is used.
    #[serde(default)]
    pub images: Option<Vec<PathBuf>>,
}

impl AdRequest {
    pub fn new(price: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            price: price.into(),
            description: description.into(),
            images: None,
        }
    }

    /// Validate the request before a session is created.
    pub fn validate(&self) -> Result<()> {
        if self.price.trim().is_empty() || self.description.trim().is_empty() {
            return Err(Error::Validation(
                "Price and description are required".to_string(),
            ));
        }

        if self.price.trim().parse::<f64>().is_err() {
            return Err(Error::Validation(format!(
                "Price must be numeric, got \"{}\"",
                self.price
            )));
        }

        if let Some(images) = &self.images {
            if images.is_empty() {
                return Err(Error::Validation(
                    "Image list must not be empty when provided".to_string(),
                ));
            }
            for path in images {
                if !path.is_file() {
                    return Err(Error::Validation(format!(
                        "Image not found: {}",
                        path.display()
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_price_rejected() {
        let req = AdRequest::new("", "x");
        let err = req.validate().unwrap_err();
        assert_eq!(err.to_string(), "Price and description are required");
    }

    #[test]
    fn test_empty_description_rejected() {
        let req = AdRequest::new("250000", "   ");
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_non_numeric_price_rejected() {
        let req = AdRequest::new("mucho dinero", "great car");
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("numeric"));
    }

    #[test]
    fn test_valid_request_accepted() {
        let req = AdRequest::new("250000", "2018 Acura ILX, one owner");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_missing_image_rejected() {
        let mut req = AdRequest::new("250000", "desc");
        req.images = Some(vec![PathBuf::from("/definitely/not/here.jpg")]);
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("Image not found"));
    }

    #[test]
    fn test_existing_images_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let img = dir.path().join("car1.jpg");
        let mut f = std::fs::File::create(&img).unwrap();
        f.write_all(b"jpg").unwrap();

        let mut req = AdRequest::new("250000", "desc");
        req.images = Some(vec![img]);
        assert!(req.validate().is_ok());
    }
}
