use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thirtyfour::{ChromiumLikeCapabilities, DesiredCapabilities, WebDriver};
use tokio::time::{sleep, timeout};
use tracing::{debug, info};
use url::Url;

/// Fixed start page every session navigates to after launch
pub const START_URL: &str = "http://www.google.com";

/// How often the driver status endpoint is polled while waiting for readiness
const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Browser kinds the harness can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserKind {
    Chrome,
    Firefox,
}

impl FromStr for BrowserKind {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "chrome" => Ok(Self::Chrome),
            "firefox" => Ok(Self::Firefox),
            other => Err(HarnessError::unsupported_configuration(format!(
                "browser kind '{}' is not supported",
                other
            ))),
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chrome => write!(f, "chrome"),
            Self::Firefox => write!(f, "firefox"),
        }
    }
}

/// WebDriver `GET /status` response body
#[derive(Debug, Deserialize)]
struct DriverStatus {
    value: DriverStatusValue,
}

#[derive(Debug, Deserialize)]
struct DriverStatusValue {
    ready: bool,
    #[serde(default)]
    message: String,
}

/// One live browser automation session
///
/// Owns the underlying WebDriver connection for exactly one scenario run.
/// `stop` consumes the session, so a stopped session cannot be reused.
pub struct Session {
    driver: WebDriver,
    kind: BrowserKind,
}

impl Session {
    /// Start a browser session for the given kind
    ///
    /// Waits for the driver endpoint to report ready, opens the session,
    /// navigates to the fixed start page and maximizes the window.
    pub async fn start(kind: BrowserKind, config: &HarnessConfig) -> Result<Self> {
        let endpoint = config.webdriver_url(kind);
        Url::parse(endpoint)?;

        info!("Starting {} session via {}", kind, endpoint);
        wait_for_driver_ready(endpoint, config.ready_timeout()).await?;

        let driver = match kind {
            BrowserKind::Chrome => {
                let mut caps = DesiredCapabilities::chrome();
                if config.headless {
                    caps.set_headless()?;
                }
                WebDriver::new(endpoint, caps).await?
            }
            BrowserKind::Firefox => {
                let mut caps = DesiredCapabilities::firefox();
                if config.headless {
                    caps.set_headless()?;
                }
                WebDriver::new(endpoint, caps).await?
            }
        };

        driver.goto(START_URL).await?;
        driver.maximize_window().await?;
        debug!("Session ready on {}", START_URL);

        Ok(Self { driver, kind })
    }

    /// The underlying WebDriver connection
    pub fn driver(&self) -> &WebDriver {
        &self.driver
    }

    pub fn kind(&self) -> BrowserKind {
        self.kind
    }

    /// Scroll the page to its bottom
    ///
    /// The single page mutation the scenarios apply between visibility probes.
    pub async fn scroll_to_bottom(&self) -> Result<()> {
        debug!("Scrolling to page bottom");
        self.driver
            .execute("window.scrollTo(0, document.body.scrollHeight)", Vec::new())
            .await?;
        Ok(())
    }

    /// Capture a viewport screenshot to a PNG file
    pub async fn screenshot(&self, path: &Path) -> Result<()> {
        self.driver.screenshot(path).await?;
        Ok(())
    }

    /// Terminate the session, releasing the external browser process
    pub async fn stop(self) -> Result<()> {
        info!("Stopping {} session", self.kind);
        self.driver.quit().await?;
        Ok(())
    }
}

/// Poll the driver's `/status` endpoint until it reports ready
async fn wait_for_driver_ready(endpoint: &str, ready_timeout: Duration) -> Result<()> {
    let status_url = format!("{}/status", endpoint.trim_end_matches('/'));
    let client = reqwest::Client::new();

    debug!("Waiting for driver readiness at {}", status_url);
    let result = timeout(ready_timeout, async {
        loop {
            if let Ok(response) = client.get(&status_url).send().await {
                if let Ok(status) = response.json::<DriverStatus>().await {
                    if status.value.ready {
                        debug!("Driver ready: {}", status.value.message);
                        break;
                    }
                }
            }
            sleep(READY_POLL_INTERVAL).await;
        }
    })
    .await;

    result.map_err(|_| HarnessError::WaitTimeout {
        timeout_ms: ready_timeout.as_millis() as u64,
    })
}
