use crate::session::BrowserKind;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Harness configuration
///
/// Carries the per-browser WebDriver endpoints and runtime knobs. The page
/// inputs the scenarios exercise (start URL, locators, query) are fixed
/// constants, not configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// chromedriver endpoint
    pub chromedriver_url: String,
    /// geckodriver endpoint
    pub geckodriver_url: String,
    /// Run browsers without a visible window
    pub headless: bool,
    /// How long to wait for a driver to report ready, in milliseconds
    pub ready_timeout_ms: u64,
    /// Directory for failure screenshots (disabled when unset)
    pub artifact_dir: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            chromedriver_url: "http://localhost:9515".to_string(),
            geckodriver_url: "http://localhost:4444".to_string(),
            headless: false,
            ready_timeout_ms: 10_000,
            artifact_dir: None,
        }
    }
}

impl HarnessConfig {
    /// Build a configuration from defaults plus `DISPLAYEDNESS_*` environment
    /// overrides.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("DISPLAYEDNESS_CHROMEDRIVER_URL") {
            config.chromedriver_url = url;
        }
        if let Ok(url) = env::var("DISPLAYEDNESS_GECKODRIVER_URL") {
            config.geckodriver_url = url;
        }
        if let Ok(value) = env::var("DISPLAYEDNESS_HEADLESS") {
            config.headless = matches!(value.as_str(), "1" | "true" | "yes");
        }
        if let Ok(value) = env::var("DISPLAYEDNESS_READY_TIMEOUT_MS") {
            if let Ok(ms) = value.parse() {
                config.ready_timeout_ms = ms;
            }
        }
        if let Ok(dir) = env::var("DISPLAYEDNESS_ARTIFACT_DIR") {
            config.artifact_dir = Some(PathBuf::from(dir));
        }

        config
    }

    /// The WebDriver endpoint serving the given browser kind
    pub fn webdriver_url(&self, kind: BrowserKind) -> &str {
        match kind {
            BrowserKind::Chrome => &self.chromedriver_url,
            BrowserKind::Firefox => &self.geckodriver_url,
        }
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }
}
