//! Configuration management
//!
//! Settings are resolved in the following priority order:
//! 1. Environment variables
//! 2. `ad-gateway.toml` configuration file
//! 3. Default values
//!
//! Inside the configuration file, `${VAR_NAME}` expands to the value of the
//! corresponding environment variable, which keeps the site credentials out
//! of the file itself.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::Error;
use crate::fields::FieldTable;

/// Site credentials used on the login step.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Target-site addresses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Login page of the classifieds admin portal.
    #[serde(default = "default_login_url")]
    pub login_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            login_url: default_login_url(),
        }
    }
}

/// Browser launch and timing settings.
///
/// Two timeout classes govern the run: a long bound for full-page
/// navigations and a shorter bound for individual element appearance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserSettings {
    /// Whether to run Chrome headless.
    #[serde(default = "default_headless")]
    pub headless: bool,
    /// Viewport width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Viewport height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,
    /// Bound for full-page navigations, in milliseconds.
    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,
    /// Bound for individual element appearance, in milliseconds.
    #[serde(default = "default_element_timeout_ms")]
    pub element_timeout_ms: u64,
}

impl BrowserSettings {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn element_timeout(&self) -> Duration {
        Duration::from_millis(self.element_timeout_ms)
    }
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            width: default_width(),
            height: default_height(),
            navigation_timeout_ms: default_navigation_timeout_ms(),
            element_timeout_ms: default_element_timeout_ms(),
        }
    }
}

/// Bounded-retry policy applied to element-resolution and navigation waits.
/// Steps are never retried and never move backward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Total attempts per wait, including the first.
    #[serde(default = "default_retry_attempts")]
    pub attempts: u32,
    /// Delay before the second attempt; doubles per attempt after that.
    #[serde(default = "default_retry_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl RetrySettings {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            attempts: default_retry_attempts(),
            base_delay_ms: default_retry_base_delay_ms(),
        }
    }
}

/// HTTP API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Port for the HTTP API server.
    #[serde(default = "default_api_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: default_api_port(),
        }
    }
}

/// Completion-screenshot storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    /// Directory the screenshots are written to, created on first use.
    #[serde(default = "default_artifact_dir")]
    pub dir: String,
    /// Fixed filename prefix; a millisecond timestamp is appended.
    #[serde(default = "default_artifact_name")]
    pub name: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: default_artifact_dir(),
            name: default_artifact_name(),
        }
    }
}

/// Default images attached when the request carries none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default = "default_image_paths")]
    pub paths: Vec<String>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            paths: default_image_paths(),
        }
    }
}

/// Main configuration for ad-gateway.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub credentials: Credentials,
    pub site: SiteConfig,
    pub browser: BrowserSettings,
    pub retry: RetrySettings,
    pub api: ApiConfig,
    pub artifacts: ArtifactConfig,
    pub images: ImageConfig,
    pub fields: FieldTable,
}

fn default_login_url() -> String {
    "https://admin.seminuevos.com/login".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_width() -> u32 {
    1366
}

fn default_height() -> u32 {
    768
}

fn default_navigation_timeout_ms() -> u64 {
    60_000
}

fn default_element_timeout_ms() -> u64 {
    10_000
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    250
}

fn default_api_port() -> u16 {
    3000
}

fn default_artifact_dir() -> String {
    "screenshots".to_string()
}

fn default_artifact_name() -> String {
    "final_step_payment".to_string()
}

fn default_image_paths() -> Vec<String> {
    vec![
        "images/car1.jpg".to_string(),
        "images/car2.jpg".to_string(),
        "images/car3.jpg".to_string(),
    ]
}

impl Config {
    /// Expand `${VAR_NAME}` references to environment-variable values.
    ///
    /// Unset variables expand to the empty string.
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next(); // consume '{'

                let mut var_name = String::new();
                while let Some(&c) = chars.peek() {
                    if c == '}' {
                        chars.next(); // consume '}'
                        break;
                    }
                    var_name.push(chars.next().unwrap());
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// Load configuration from a TOML file.
    ///
    /// `${VAR_NAME}` references in the file are expanded first; existing
    /// environment variables then override the file's values.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();

        let toml_content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let expanded_content = Self::expand_env_vars(&toml_content);

        let mut config: Config = toml::from_str(&expanded_content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load configuration from the default locations.
    ///
    /// Tries `./ad-gateway.toml` first, then falls back to environment
    /// variables only.
    pub fn load() -> crate::Result<Self> {
        if Path::new("ad-gateway.toml").exists() {
            return Self::from_toml_file("ad-gateway.toml");
        }

        Self::from_env()
    }

    /// Load configuration from environment variables only.
    ///
    /// The site credentials are required; everything else falls back to
    /// defaults.
    pub fn from_env() -> crate::Result<Self> {
        let email = std::env::var("SEMINUEVOS_EMAIL")
            .map_err(|_| Error::Config("SEMINUEVOS_EMAIL not set".to_string()))?;
        let password = std::env::var("SEMINUEVOS_PASSWORD")
            .map_err(|_| Error::Config("SEMINUEVOS_PASSWORD not set".to_string()))?;

        let mut config = Config {
            credentials: Credentials { email, password },
            ..Default::default()
        };
        config.apply_env_overrides();

        Ok(config)
    }

    /// Override settings from environment variables.
    fn apply_env_overrides(&mut self) {
        if let Ok(email) = std::env::var("SEMINUEVOS_EMAIL") {
            if !email.is_empty() {
                self.credentials.email = email;
            }
        }
        if let Ok(password) = std::env::var("SEMINUEVOS_PASSWORD") {
            if !password.is_empty() {
                self.credentials.password = password;
            }
        }

        if let Ok(url) = std::env::var("SEMINUEVOS_LOGIN_URL") {
            if !url.is_empty() {
                self.site.login_url = url;
            }
        }

        if let Ok(headless) = std::env::var("BROWSER_HEADLESS") {
            self.browser.headless = headless.to_lowercase() != "false";
        }
        if let Ok(timeout) = std::env::var("NAVIGATION_TIMEOUT_MS") {
            if let Ok(ms) = timeout.parse() {
                self.browser.navigation_timeout_ms = ms;
            }
        }
        if let Ok(timeout) = std::env::var("ELEMENT_TIMEOUT_MS") {
            if let Ok(ms) = timeout.parse() {
                self.browser.element_timeout_ms = ms;
            }
        }

        if let Ok(port) = std::env::var("API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        if let Ok(dir) = std::env::var("SCREENSHOTS_DIR") {
            if !dir.is_empty() {
                self.artifacts.dir = dir;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.browser.headless);
        assert_eq!(config.browser.width, 1366);
        assert_eq!(config.browser.height, 768);
        assert_eq!(config.browser.navigation_timeout_ms, 60_000);
        assert_eq!(config.browser.element_timeout_ms, 10_000);
        assert_eq!(config.retry.attempts, 3);
        assert_eq!(config.api.port, 3000);
        assert_eq!(config.artifacts.dir, "screenshots");
        assert_eq!(config.fields.dropdowns.len(), 6);
    }

    #[test]
    fn test_timeout_durations() {
        let settings = BrowserSettings::default();
        assert_eq!(settings.navigation_timeout(), Duration::from_secs(60));
        assert_eq!(settings.element_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_expand_env_vars() {
        unsafe { std::env::set_var("AD_GATEWAY_TEST_VAR", "hunter2") };
        assert_eq!(
            Config::expand_env_vars("password = \"${AD_GATEWAY_TEST_VAR}\""),
            "password = \"hunter2\""
        );
        assert_eq!(
            Config::expand_env_vars("${AD_GATEWAY_TEST_VAR_UNSET_XYZ}"),
            ""
        );
        assert_eq!(Config::expand_env_vars("no vars here"), "no vars here");
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ad-gateway.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(
            br#"
            [credentials]
            email = "seller@example.com"
            password = "secret"

            [browser]
            headless = false
            navigation_timeout_ms = 30000

            [artifacts]
            dir = "out"

            [[fields.dropdowns]]
            label = "Marca"
            value = "Honda"
            "#,
        )
        .unwrap();

        let config = Config::from_toml_file(&path).unwrap();
        assert_eq!(config.credentials.email, "seller@example.com");
        assert!(!config.browser.headless);
        assert_eq!(config.browser.navigation_timeout_ms, 30_000);
        // untouched sections keep their defaults
        assert_eq!(config.browser.element_timeout_ms, 10_000);
        assert_eq!(config.artifacts.dir, "out");
        assert_eq!(config.fields.dropdowns.len(), 1);
        assert_eq!(config.fields.dropdowns[0].value, "Honda");
        // omitted field-table entries fall back to defaults
        assert_eq!(config.fields.city.label, "Ciudad del vehículo");
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = Config::from_toml_file("/no/such/ad-gateway.toml").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
