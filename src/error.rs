use thiserror::Error;

/// Main error type for the displayedness harness
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("wait timed out after {timeout_ms}ms")]
    WaitTimeout { timeout_ms: u64 },

    #[error("assertion failed: {0}")]
    Assertion(String),

    #[error("WebDriver error: {0}")]
    Driver(#[from] thirtyfour::error::WebDriverError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, HarnessError>;

impl HarnessError {
    pub fn unsupported_configuration(msg: impl Into<String>) -> Self {
        Self::UnsupportedConfiguration(msg.into())
    }

    pub fn element_not_found(msg: impl Into<String>) -> Self {
        Self::ElementNotFound(msg.into())
    }

    pub fn assertion(msg: impl Into<String>) -> Self {
        Self::Assertion(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_creation_methods() {
        let error = HarnessError::unsupported_configuration("edge is not supported");
        assert!(matches!(error, HarnessError::UnsupportedConfiguration(_)));
        assert_eq!(
            format!("{}", error),
            "unsupported configuration: edge is not supported"
        );

        let error = HarnessError::element_not_found("input[name='q']");
        assert!(matches!(error, HarnessError::ElementNotFound(_)));
        assert_eq!(format!("{}", error), "element not found: input[name='q']");

        let error = HarnessError::assertion("visibility did not change");
        assert!(matches!(error, HarnessError::Assertion(_)));
        assert_eq!(
            format!("{}", error),
            "assertion failed: visibility did not change"
        );
    }

    #[test]
    fn test_wait_timeout_error() {
        let error = HarnessError::WaitTimeout { timeout_ms: 3000 };
        assert!(matches!(error, HarnessError::WaitTimeout { timeout_ms: 3000 }));
        assert_eq!(format!("{}", error), "wait timed out after 3000ms");
    }

    #[test]
    fn test_error_from_conversions() {
        // Test IO error conversion
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let harness_error: HarnessError = io_error.into();
        assert!(matches!(harness_error, HarnessError::Io(_)));

        // Test JSON error conversion
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let harness_error: HarnessError = json_error.into();
        assert!(matches!(harness_error, HarnessError::Json(_)));

        // Test URL error conversion
        let url_error = url::Url::parse("not_a_url").unwrap_err();
        let harness_error: HarnessError = url_error.into();
        assert!(matches!(harness_error, HarnessError::Url(_)));
    }

    #[test]
    fn test_result_type_usage() {
        fn success_function() -> Result<String> {
            Ok("success".to_string())
        }

        fn error_function() -> Result<String> {
            Err(HarnessError::element_not_found("table#nav"))
        }

        let result = success_function();
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "success");

        let result = error_function();
        assert!(result.is_err());
        match result {
            Err(HarnessError::ElementNotFound(msg)) => assert_eq!(msg, "table#nav"),
            _ => panic!("Unexpected error type"),
        }
    }

    #[test]
    fn test_error_debug_formatting() {
        let error = HarnessError::unsupported_configuration("test");
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("UnsupportedConfiguration"));
        assert!(debug_str.contains("test"));
    }

    #[test]
    fn test_error_chain_compatibility() {
        // Test that errors work with the ? operator
        fn nested_function() -> Result<()> {
            let _file = std::fs::File::open("nonexistent_file.txt")?;
            Ok(())
        }

        let result = nested_function();
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), HarnessError::Io(_)));
    }
}
