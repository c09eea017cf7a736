//! CLI error types.

use std::collections::BTreeSet;
use std::path::PathBuf;

use thiserror::Error;

/// CLI-specific errors.
///
/// Every variant is terminal for the current command: nothing is retried.
#[derive(Debug, Error)]
pub enum CliError {
    /// The configuration file does not exist.
    #[error("No config file found at '{}'.", path.display())]
    ConfigMissing {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The configuration file lacks required keys.
    #[error("Missing configuration parameters: {}.", join(missing))]
    ConfigIncomplete {
        /// Required keys absent from the file, sorted.
        missing: BTreeSet<String>,
    },

    /// The API answered with an unexpected HTTP status.
    #[error("{context}. API returned HTTP {status}: {body}")]
    Remote {
        /// What was being attempted.
        context: String,
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// No service on the page has the given name.
    #[error("Unknown service: '{name}'.")]
    ServiceNotFound {
        /// Requested service name.
        name: String,
    },

    /// More than one service on the page has the given name.
    #[error("Ambiguous service: '{name}' matches {count} services.")]
    AmbiguousService {
        /// Requested service name.
        name: String,
        /// Number of services sharing that name.
        count: usize,
    },

    /// A timestamp is in neither of the accepted layouts.
    #[error("unrecognized timestamp: '{timestamp}'")]
    Parse {
        /// The offending value.
        timestamp: String,
    },

    /// Network-level failure before an HTTP status was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// Response body did not have the expected shape.
    #[error("unexpected API response: {0}")]
    Decode(String),

    /// Request signing failed.
    #[error("signing error: {0}")]
    Signing(String),

    /// Interactive prompt could not be completed.
    #[error("prompt error: {0}")]
    Prompt(String),

    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Whether the operator should be shown the config file template.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigMissing { .. } | Self::ConfigIncomplete { .. })
    }
}

fn join(keys: &BTreeSet<String>) -> String {
    keys.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_error_display_remote() {
        let err = CliError::Remote {
            context: "Error updating incident #12".into(),
            status: 404,
            body: "{\"detail\":\"Not found.\"}".into(),
        };
        assert_eq!(
            err.to_string(),
            "Error updating incident #12. API returned HTTP 404: {\"detail\":\"Not found.\"}"
        );
    }

    #[test]
    fn cli_error_display_config_incomplete_sorted() {
        let missing: BTreeSet<String> = ["secret", "key"].into_iter().map(String::from).collect();
        let err = CliError::ConfigIncomplete { missing };
        assert_eq!(err.to_string(), "Missing configuration parameters: key, secret.");
        assert!(err.is_config_error());
    }

    #[test]
    fn cli_error_display_service_not_found() {
        let err = CliError::ServiceNotFound { name: "api".into() };
        assert_eq!(err.to_string(), "Unknown service: 'api'.");
        assert!(!err.is_config_error());
    }

    #[test]
    fn cli_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err = CliError::from(io_err);
        assert!(matches!(cli_err, CliError::Io(_)));
    }
}
