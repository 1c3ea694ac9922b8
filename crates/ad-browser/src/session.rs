//! Browser session management
//!
//! One live Chrome page bound to one workflow run. The session owns the
//! browser process; dropping it closes the browser, so resource release is
//! unconditional on every exit path.

use std::time::Duration;

use headless_chrome::{Browser, Element, LaunchOptionsBuilder, Tab};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{BrowserError, Result};
use crate::retry::RetryPolicy;

/// Browser session configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Whether to run in headless mode
    pub headless: bool,
    /// Viewport width in pixels
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
    /// Bound for full-page navigations
    pub navigation_timeout: Duration,
    /// Bound for individual element appearance
    pub element_timeout: Duration,
    /// Retry policy for resolution and navigation waits
    pub retry: RetryPolicy,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            width: 1366,
            height: 768,
            navigation_timeout: Duration::from_secs(60),
            element_timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }
}

impl BrowserConfig {
    /// Create a new configuration builder
    pub fn builder() -> BrowserConfigBuilder {
        BrowserConfigBuilder::default()
    }
}

/// Builder for BrowserConfig
#[derive(Default)]
pub struct BrowserConfigBuilder {
    config: BrowserConfig,
}

impl BrowserConfigBuilder {
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.config.navigation_timeout = timeout;
        self
    }

    pub fn element_timeout(mut self, timeout: Duration) -> Self {
        self.config.element_timeout = timeout;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    pub fn build(self) -> BrowserConfig {
        self.config
    }
}

/// Managed browser session: one browser, one page, one workflow run.
pub struct BrowserSession {
    browser: Browser,
    tab: Arc<Tab>,
    config: BrowserConfig,
}

impl BrowserSession {
    /// Launch a browser and open the page the run will drive.
    pub fn launch(config: BrowserConfig) -> Result<Self> {
        use std::ffi::OsStr;

        info!("Launching browser session (headless: {})", config.headless);

        let args: Vec<String> = vec![
            format!("--window-size={},{}", config.width, config.height),
            "--no-sandbox".to_string(),
            "--disable-setuid-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-gpu".to_string(),
        ];
        let os_args: Vec<&OsStr> = args.iter().map(OsStr::new).collect();

        let launch_options = LaunchOptionsBuilder::default()
            .headless(config.headless)
            .args(os_args)
            .build()
            .map_err(|e| {
                BrowserError::Initialization(format!("Failed to build launch options: {}", e))
            })?;

        let browser = Browser::new(launch_options)
            .map_err(|e| BrowserError::Initialization(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| BrowserError::Initialization(format!("Failed to open page: {}", e)))?;
        tab.set_default_timeout(config.navigation_timeout);

        info!("Browser session ready");

        Ok(Self {
            browser,
            tab,
            config,
        })
    }

    /// The page driven by this session.
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Navigate to a URL and wait for the load to settle.
    pub fn navigate(&self, url: &str) -> Result<()> {
        info!("Navigating to: {}", url);

        self.tab
            .navigate_to(url)
            .map_err(|e| BrowserError::Navigation(format!("Failed to navigate to {}: {}", url, e)))?;

        self.wait_until_navigated()
    }

    /// Wait for an in-flight navigation to settle, with bounded retry.
    pub fn wait_until_navigated(&self) -> Result<()> {
        self.config
            .retry
            .run(|| self.tab.wait_until_navigated().map(|_| ()))
            .map_err(|e| BrowserError::Navigation(format!("Navigation did not settle: {}", e)))
    }

    /// Current page address.
    pub fn current_url(&self) -> String {
        self.tab.get_url()
    }

    /// Wait for an element to appear, with bounded retry on top of the
    /// element timeout.
    pub fn wait_for_element(&self, selector: &str) -> Result<Element<'_>> {
        debug!("Waiting for element: {}", selector);

        self.config
            .retry
            .run(|| {
                self.tab
                    .wait_for_element_with_custom_timeout(selector, self.config.element_timeout)
            })
            .map_err(|e| {
                BrowserError::ElementNotFound(format!(
                    "Element {} not found after {}ms: {}",
                    selector,
                    self.config.element_timeout.as_millis(),
                    e
                ))
            })
    }

    /// Find an element without waiting. Absence is `None`, not an error.
    pub fn try_find(&self, selector: &str) -> Option<Element<'_>> {
        self.tab.find_element(selector).ok()
    }

    /// Find all elements currently matching a selector. Missing elements
    /// yield an empty list.
    pub fn find_all(&self, selector: &str) -> Vec<Element<'_>> {
        self.tab.find_elements(selector).unwrap_or_default()
    }

    /// Click an element to focus it, then type text with per-keystroke
    /// events. The target page's client-side framework only reacts to
    /// individual input events, not bulk value assignment.
    pub fn type_into(&self, selector: &str, text: &str) -> Result<()> {
        let element = self.wait_for_element(selector)?;
        element
            .click()
            .map_err(|e| BrowserError::Interaction(format!("Failed to focus {}: {}", selector, e)))?;
        self.type_text(text)
    }

    /// Type text into whatever currently has focus, one keystroke at a time.
    pub fn type_text(&self, text: &str) -> Result<()> {
        self.tab
            .type_str(text)
            .map_err(|e| BrowserError::Interaction(format!("Failed to type text: {}", e)))?;
        Ok(())
    }

    /// Evaluate a JS expression that returns a `JSON.stringify`d value and
    /// parse the result.
    pub fn eval_json(&self, expression: &str) -> Result<serde_json::Value> {
        let object = self
            .tab
            .evaluate(expression, false)
            .map_err(|e| BrowserError::Evaluation(format!("JavaScript evaluation failed: {}", e)))?;

        match object.value {
            Some(serde_json::Value::String(payload)) => serde_json::from_str(&payload)
                .map_err(|e| BrowserError::Evaluation(format!("Malformed JS result: {}", e))),
            other => Err(BrowserError::Evaluation(format!(
                "Expected stringified JSON, got {:?}",
                other
            ))),
        }
    }

    /// Attach local files to a file input element.
    pub fn set_file_input(&self, element: &Element<'_>, files: &[String]) -> Result<()> {
        use headless_chrome::protocol::cdp::DOM;

        self.tab
            .call_method(DOM::SetFileInputFiles {
                files: files.to_vec(),
                node_id: None,
                backend_node_id: Some(element.backend_node_id),
                object_id: None,
            })
            .map_err(|e| BrowserError::Upload(format!("{}", e)))?;

        info!("Attached {} file(s) to upload input", files.len());
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // The browser process is torn down when the handle drops.
        info!("Closing browser session");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert_eq!(config.width, 1366);
        assert_eq!(config.height, 768);
        assert_eq!(config.navigation_timeout, Duration::from_secs(60));
        assert_eq!(config.element_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_config_builder() {
        let config = BrowserConfig::builder()
            .headless(false)
            .viewport(1920, 1080)
            .navigation_timeout(Duration::from_secs(30))
            .element_timeout(Duration::from_secs(5))
            .retry(RetryPolicy::new(5, Duration::from_millis(100)))
            .build();

        assert!(!config.headless);
        assert_eq!(config.width, 1920);
        assert_eq!(config.height, 1080);
        assert_eq!(config.navigation_timeout, Duration::from_secs(30));
        assert_eq!(config.element_timeout, Duration::from_secs(5));
        assert_eq!(config.retry.attempts, 5);
    }
}
