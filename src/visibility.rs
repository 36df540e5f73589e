//! Visibility probes
//!
//! Three non-equivalent answers to "is this element currently displayed":
//! an instantaneous read of a held handle, a bounded poll of a held handle,
//! and a locator-based conditional lookup. Displayedness here is the
//! WebDriver notion (<https://www.w3.org/TR/webdriver1/#element-displayedness>),
//! computed by the browser on every query.

use crate::error::{HarnessError, Result};
use crate::session::Session;
use std::time::Duration;
use thirtyfour::{By, WebElement};
use tokio::time::{sleep, timeout};
use tracing::debug;

/// How often a bounded wait re-reads the element's state
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Outcome of a bounded visibility wait
///
/// Timing out is an ordinary outcome of the bounded probe, so it is carried
/// as a value and asserted by comparison rather than caught as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    TimedOut,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }
}

/// Instantaneous visibility of a held element handle, no waiting
pub async fn is_displayed(element: &WebElement) -> Result<bool> {
    Ok(element.is_displayed().await?)
}

/// Poll a held element handle until it is displayed or the budget elapses
///
/// Never suspends past `wait`; expiry yields [`Visibility::TimedOut`].
pub async fn wait_displayed(element: &WebElement, wait: Duration) -> Result<Visibility> {
    debug!("Waiting up to {:?} for element to become visible", wait);

    let result = timeout(wait, async {
        loop {
            if element.is_displayed().await? {
                return Ok::<(), HarnessError>(());
            }
            sleep(POLL_INTERVAL).await;
        }
    })
    .await;

    match result {
        Ok(Ok(())) => Ok(Visibility::Visible),
        Ok(Err(e)) => Err(e),
        Err(_) => Ok(Visibility::TimedOut),
    }
}

/// Resolve a locator to a currently-displayed element, no waiting
///
/// Absence is a successful negative outcome: `None` means no element at the
/// locator is displayed right now, which is distinct from any error.
pub async fn visible_element(session: &Session, locator: By) -> Result<Option<WebElement>> {
    for element in session.driver().find_all(locator).await? {
        if element.is_displayed().await? {
            return Ok(Some(element));
        }
    }
    Ok(None)
}
