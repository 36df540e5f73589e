//! Displayedness scenarios
//!
//! Each scenario is one independent case: start a session, search, probe the
//! results-page navigation element's visibility around a scroll with one of
//! the probe strategies, and assert the documented relationship. The runner
//! guarantees session teardown on every exit path.

use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::search;
use crate::session::{BrowserKind, Session};
use crate::visibility::{self, Visibility};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thirtyfour::{By, WebElement};
use tokio::fs;
use tracing::{info, warn};
use uuid::Uuid;

/// Query submitted on the start page
pub const SEARCH_QUERY: &str = "Selenium displayed element property";

/// Results-page navigation element, below the fold until the page is scrolled
pub const RESULTS_NAV_SELECTOR: &str = "table#nav";

/// Budget for the bounded-wait scenario
pub const BOUNDED_WAIT: Duration = Duration::from_secs(3);

/// The displayedness cases the harness can run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// One handle, read before and after the scroll
    SingleHandle,
    /// Fresh handles fetched before and after the scroll
    RefetchedHandle,
    /// Bounded wait on an off-screen element must expire
    BoundedWait,
    /// Conditional lookup of an off-screen element must come back absent
    VisibleLookup,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::SingleHandle,
        Scenario::RefetchedHandle,
        Scenario::BoundedWait,
        Scenario::VisibleLookup,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::SingleHandle => "single-handle",
            Self::RefetchedHandle => "refetched-handle",
            Self::BoundedWait => "bounded-wait",
            Self::VisibleLookup => "visible-lookup",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "single-handle" => Ok(Self::SingleHandle),
            "refetched-handle" => Ok(Self::RefetchedHandle),
            "bounded-wait" => Ok(Self::BoundedWait),
            "visible-lookup" => Ok(Self::VisibleLookup),
            other => Err(HarnessError::unsupported_configuration(format!(
                "scenario '{}' is not recognized",
                other
            ))),
        }
    }
}

/// Run one scenario against one browser kind
///
/// Starts a fresh session, executes the scenario body and stops the session
/// on every exit path. A failed body's error wins over a failed teardown.
pub async fn run(kind: BrowserKind, config: &HarnessConfig, scenario: Scenario) -> Result<()> {
    let run_id = Uuid::new_v4();
    info!("Running scenario {} on {} (run {})", scenario, kind, run_id);

    let session = Session::start(kind, config).await?;
    let outcome = execute(&session, scenario).await;

    if outcome.is_err() {
        capture_failure_screenshot(&session, config, scenario, run_id).await;
    }

    match session.stop().await {
        Ok(()) => outcome,
        Err(stop_error) => match outcome {
            Err(original) => {
                // teardown trouble must not mask what actually failed
                warn!("Session teardown also failed: {}", stop_error);
                Err(original)
            }
            Ok(()) => Err(stop_error),
        },
    }
}

async fn execute(session: &Session, scenario: Scenario) -> Result<()> {
    search::search(session, SEARCH_QUERY).await?;

    match scenario {
        Scenario::SingleHandle => single_handle(session).await,
        Scenario::RefetchedHandle => refetched_handle(session).await,
        Scenario::BoundedWait => bounded_wait(session).await,
        Scenario::VisibleLookup => visible_lookup(session).await,
    }
}

/// Direct property probe on one handle reused across the scroll
///
/// The engine recomputes displayedness on every read, so the same handle
/// observes the change.
async fn single_handle(session: &Session) -> Result<()> {
    let nav = results_nav(session).await?;

    let before_scroll = visibility::is_displayed(&nav).await?;
    session.scroll_to_bottom().await?;
    let after_scroll = visibility::is_displayed(&nav).await?;

    assert_scroll_changed_visibility(before_scroll, after_scroll)
}

/// Direct property probe on handles fetched before and after the scroll
///
/// The post-scroll handle is a logically distinct lookup result even though
/// it denotes the same visual element.
async fn refetched_handle(session: &Session) -> Result<()> {
    let nav_before_scroll = results_nav(session).await?;
    let before_scroll = visibility::is_displayed(&nav_before_scroll).await?;

    session.scroll_to_bottom().await?;

    let nav_after_scroll = results_nav(session).await?;
    let after_scroll = visibility::is_displayed(&nav_after_scroll).await?;

    assert_scroll_changed_visibility(before_scroll, after_scroll)
}

/// Bounded poll with no scroll performed: the wait must expire
async fn bounded_wait(session: &Session) -> Result<()> {
    let nav = results_nav(session).await?;

    match visibility::wait_displayed(&nav, BOUNDED_WAIT).await? {
        Visibility::TimedOut => Ok(()),
        Visibility::Visible => Err(HarnessError::assertion(format!(
            "expected the bounded wait to expire, but '{}' became visible within {:?}",
            RESULTS_NAV_SELECTOR, BOUNDED_WAIT
        ))),
    }
}

/// Conditional lookup with no scroll performed: absence, not an error
async fn visible_lookup(session: &Session) -> Result<()> {
    match visibility::visible_element(session, By::Css(RESULTS_NAV_SELECTOR)).await? {
        None => Ok(()),
        Some(_) => Err(HarnessError::assertion(format!(
            "expected no visible element at '{}' before scrolling",
            RESULTS_NAV_SELECTOR
        ))),
    }
}

async fn results_nav(session: &Session) -> Result<WebElement> {
    session
        .driver()
        .find_all(By::Css(RESULTS_NAV_SELECTOR))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| {
            HarnessError::element_not_found(format!(
                "results page has no element matching '{}'",
                RESULTS_NAV_SELECTOR
            ))
        })
}

fn assert_scroll_changed_visibility(before_scroll: bool, after_scroll: bool) -> Result<()> {
    if before_scroll == after_scroll {
        return Err(HarnessError::assertion(format!(
            "visibility did not change across the scroll (before: {}, after: {})",
            before_scroll, after_scroll
        )));
    }
    Ok(())
}

async fn capture_failure_screenshot(
    session: &Session,
    config: &HarnessConfig,
    scenario: Scenario,
    run_id: Uuid,
) {
    let dir = match config.artifact_dir.as_deref() {
        Some(dir) => dir,
        None => return,
    };

    if let Err(e) = fs::create_dir_all(dir).await {
        warn!("Could not create artifact directory {}: {}", dir.display(), e);
        return;
    }

    let path = artifact_path(dir, scenario, session.kind(), run_id);
    match session.screenshot(&path).await {
        Ok(()) => info!("Failure screenshot saved to {}", path.display()),
        Err(e) => warn!("Could not capture failure screenshot: {}", e),
    }
}

fn artifact_path(dir: &Path, scenario: Scenario, kind: BrowserKind, run_id: Uuid) -> PathBuf {
    dir.join(format!("{}-{}-{}.png", scenario, kind, run_id))
}
