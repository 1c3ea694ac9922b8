//! Workflow orchestrator
//!
//! Runs the wizard steps in fixed order against one browser session.
//! Validation happens before the session exists, so a malformed request
//! never costs a browser launch; after launch, the session is closed on
//! every exit path because dropping it tears the browser down.

use std::path::PathBuf;

use tracing::error;

use ad_browser::{BrowserConfig, BrowserSession, RetryPolicy};
use ad_core::{AdRequest, Config};

use crate::error::{Result, WizardError};
use crate::steps;

/// Publish one ad: validate, run the wizard, return the artifact path.
pub fn publish_ad(config: &Config, request: &AdRequest) -> Result<PathBuf> {
    request
        .validate()
        .map_err(|e| WizardError::Validation(e.to_string()))?;
    let images = effective_images(config, request)?;

    let session = BrowserSession::launch(browser_config(config))?;
    let result = run(&session, config, request, &images);

    if let Err(e) = &result {
        error!("Ad publishing failed: {}", e);
    }

    // Session drops here, closing the browser regardless of outcome.
    result
}

fn run(
    session: &BrowserSession,
    config: &Config,
    request: &AdRequest,
    images: &[String],
) -> Result<PathBuf> {
    steps::login(session, config)?;
    steps::start_listing(session)?;
    steps::select_plan(session)?;
    steps::fill_vehicle_details(session, config, &request.price)?;
    steps::fill_description_and_images(session, &request.description, images)?;
    steps::fill_contact_info(session, config)?;
    steps::publish(session, config)
}

fn browser_config(config: &Config) -> BrowserConfig {
    BrowserConfig::builder()
        .headless(config.browser.headless)
        .viewport(config.browser.width, config.browser.height)
        .navigation_timeout(config.browser.navigation_timeout())
        .element_timeout(config.browser.element_timeout())
        .retry(RetryPolicy::new(
            config.retry.attempts,
            config.retry.base_delay(),
        ))
        .build()
}

/// The image set for this run: the request's own images when present,
/// otherwise the configured defaults. Either way every path must exist on
/// disk before a session is created, and the attach uses absolute paths.
fn effective_images(config: &Config, request: &AdRequest) -> Result<Vec<String>> {
    let paths: Vec<PathBuf> = match &request.images {
        Some(images) => images.clone(),
        None => config.images.paths.iter().map(PathBuf::from).collect(),
    };

    let cwd = std::env::current_dir().map_err(|e| WizardError::Validation(e.to_string()))?;

    let mut resolved = Vec::with_capacity(paths.len());
    for path in paths {
        let absolute = if path.is_absolute() { path } else { cwd.join(path) };
        if !absolute.is_file() {
            return Err(WizardError::Validation(format!(
                "Image not found: {}",
                absolute.display()
            )));
        }
        resolved.push(absolute.to_string_lossy().into_owned());
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_image(dir: &std::path::Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"png").unwrap();
        path
    }

    #[test]
    fn test_invalid_request_fails_before_any_session() {
        // An empty price must be rejected without launching a browser; a
        // launch attempt in this environment would surface as an
        // Initialization error, not Validation.
        let config = Config::default();
        let request = AdRequest::new("", "x");
        let err = publish_ad(&config, &request).unwrap_err();
        assert!(matches!(err, WizardError::Validation(_)));
        assert_eq!(err.to_string(), "Price and description are required");
    }

    #[test]
    fn test_missing_default_images_fail_validation() {
        let mut config = Config::default();
        config.images.paths = vec!["/nope/car1.jpg".to_string()];
        let request = AdRequest::new("250000", "desc");
        let err = publish_ad(&config, &request).unwrap_err();
        assert!(matches!(err, WizardError::Validation(_)));
        assert!(err.to_string().contains("Image not found"));
    }

    #[test]
    fn test_request_images_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let img = write_image(dir.path(), "mine.jpg");

        let mut config = Config::default();
        config.images.paths = vec!["/nope/car1.jpg".to_string()];

        let mut request = AdRequest::new("250000", "desc");
        request.images = Some(vec![img.clone()]);

        let resolved = effective_images(&config, &request).unwrap();
        assert_eq!(resolved, vec![img.to_string_lossy().into_owned()]);
    }

    #[test]
    fn test_effective_images_are_absolute() {
        let dir = tempfile::tempdir().unwrap();
        let img = write_image(dir.path(), "car1.jpg");

        let mut config = Config::default();
        config.images.paths = vec![img.to_string_lossy().into_owned()];

        let request = AdRequest::new("250000", "desc");
        let resolved = effective_images(&config, &request).unwrap();
        assert!(std::path::Path::new(&resolved[0]).is_absolute());
    }
}
