mod config;
mod error;
mod scenario;
mod search;
mod session;
mod visibility;

use clap::Parser;
use config::HarnessConfig;
use error::Result;
use scenario::Scenario;
use session::BrowserKind;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// WebDriver element displayedness scenarios – probe how browsers report visibility
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Browser to drive (chrome, firefox or all)
    #[arg(long, default_value = "all")]
    browser: String,

    /// Scenario to run (single-handle, refetched-handle, bounded-wait, visible-lookup or all)
    #[arg(long, default_value = "all")]
    scenario: String,

    /// chromedriver endpoint
    #[arg(long)]
    chromedriver_url: Option<String>,

    /// geckodriver endpoint
    #[arg(long)]
    geckodriver_url: Option<String>,

    /// Run browsers without a visible window
    #[arg(long, default_value_t = false)]
    headless: bool,

    /// Directory for failure screenshots
    #[arg(long)]
    artifact_dir: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn resolve_browsers(selector: &str) -> Result<Vec<BrowserKind>> {
    if selector.eq_ignore_ascii_case("all") {
        Ok(vec![BrowserKind::Chrome, BrowserKind::Firefox])
    } else {
        Ok(vec![selector.parse()?])
    }
}

fn resolve_scenarios(selector: &str) -> Result<Vec<Scenario>> {
    if selector.eq_ignore_ascii_case("all") {
        Ok(Scenario::ALL.to_vec())
    } else {
        Ok(vec![selector.parse()?])
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize tracing
    let log_level = match args.log_level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(log_level))
        .init();

    let browsers = resolve_browsers(&args.browser)?;
    let scenarios = resolve_scenarios(&args.scenario)?;

    let mut config = HarnessConfig::from_env();
    if let Some(url) = args.chromedriver_url {
        config.chromedriver_url = url;
    }
    if let Some(url) = args.geckodriver_url {
        config.geckodriver_url = url;
    }
    if args.headless {
        config.headless = true;
    }
    if args.artifact_dir.is_some() {
        config.artifact_dir = args.artifact_dir;
    }

    info!("Starting displayedness harness");
    info!("Chromedriver: {}", config.chromedriver_url);
    info!("Geckodriver: {}", config.geckodriver_url);
    info!("Log level: {}", args.log_level);

    let mut passed = 0usize;
    let mut failed = 0usize;

    for kind in &browsers {
        for case in &scenarios {
            match scenario::run(*kind, &config, *case).await {
                Ok(()) => {
                    info!("PASS {} on {}", case, kind);
                    passed += 1;
                }
                Err(e) => {
                    error!("FAIL {} on {}: {}", case, kind, e);
                    failed += 1;
                }
            }
        }
    }

    info!("{} passed, {} failed", passed, failed);
    if failed > 0 {
        return Err(format!("{} scenario run(s) failed", failed).into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        use clap::Parser;

        let args = Args::parse_from(&[
            "displayedness",
            "--browser",
            "firefox",
            "--scenario",
            "bounded-wait",
            "--chromedriver-url",
            "http://127.0.0.1:9515",
            "--headless",
            "--log-level",
            "debug",
        ]);

        assert_eq!(args.browser, "firefox");
        assert_eq!(args.scenario, "bounded-wait");
        assert_eq!(
            args.chromedriver_url.as_deref(),
            Some("http://127.0.0.1:9515")
        );
        assert!(args.geckodriver_url.is_none());
        assert!(args.headless);
        assert_eq!(args.log_level, "debug");
    }

    #[test]
    fn test_default_args() {
        use clap::Parser;

        let args = Args::parse_from(&["displayedness"]);

        assert_eq!(args.browser, "all");
        assert_eq!(args.scenario, "all");
        assert!(args.chromedriver_url.is_none());
        assert!(args.geckodriver_url.is_none());
        assert!(!args.headless);
        assert!(args.artifact_dir.is_none());
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_resolve_browsers() {
        assert_eq!(
            resolve_browsers("all").unwrap(),
            vec![BrowserKind::Chrome, BrowserKind::Firefox]
        );
        assert_eq!(
            resolve_browsers("chrome").unwrap(),
            vec![BrowserKind::Chrome]
        );
        assert!(resolve_browsers("opera").is_err());
    }

    #[test]
    fn test_resolve_scenarios() {
        assert_eq!(resolve_scenarios("all").unwrap(), Scenario::ALL.to_vec());
        assert_eq!(
            resolve_scenarios("visible-lookup").unwrap(),
            vec![Scenario::VisibleLookup]
        );
        assert!(resolve_scenarios("unknown").is_err());
    }
}
