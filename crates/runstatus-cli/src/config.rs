//! Operator configuration file.
//!
//! The file is a list of `key = value` lines. Blank lines, `#` comments and
//! lines without `=` are ignored:
//!
//! ```text
//! # ~/.runstatus
//! page = my-page
//! key = EXO...
//! secret = ...
//! endpoint = https://api.runstatus.com
//! ```

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CliError;

/// Endpoint used when the file does not name one.
pub const DEFAULT_ENDPOINT: &str = "https://api.runstatus.com";

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "~/.runstatus";

/// Example shown to the operator when the file is missing or incomplete.
pub const CONFIG_TEMPLATE: &str = "
    page = your-status-page-name
    key = api-key
    secret = secret-key
";

const REQUIRED_KEYS: [&str; 3] = ["page", "key", "secret"];

/// Credentials and target of the status page API.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Status page name.
    pub page: String,
    /// API key.
    pub api_key: String,
    /// API secret.
    pub secret_key: String,
    /// API base URL.
    pub endpoint: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("page", &self.page)
            .field("api_key", &self.api_key)
            .field("secret_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl Config {
    /// Read and parse the configuration file at `path`.
    ///
    /// A leading `~` is expanded to the current user's home directory.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let path = expand_home(path);
        if !path.exists() {
            return Err(CliError::ConfigMissing { path });
        }
        debug!(path = %path.display(), "Loading configuration");
        let contents = fs::read_to_string(&path)?;
        Self::parse(&contents)
    }

    /// Parse configuration file contents.
    pub fn parse(contents: &str) -> Result<Self, CliError> {
        let mut values: HashMap<&str, &str> = HashMap::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                values.insert(key.trim(), value.trim());
            }
        }

        let missing: BTreeSet<String> = REQUIRED_KEYS
            .iter()
            .filter(|key| !values.contains_key(*key))
            .map(|key| (*key).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(CliError::ConfigIncomplete { missing });
        }

        let get = |key: &str| values.get(key).map(|v| (*v).to_string()).unwrap_or_default();
        Ok(Self {
            page: get("page"),
            api_key: get("key"),
            secret_key: get("secret"),
            endpoint: values
                .get("endpoint")
                .map_or_else(|| DEFAULT_ENDPOINT.to_string(), |v| (*v).to_string()),
        })
    }
}

/// Expand a leading `~` component to the home directory.
fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "page = x\nkey = y\nsecret = z\n";

    #[test]
    fn parse_well_formed() {
        let config = Config::parse(WELL_FORMED).expect("should parse");
        assert_eq!(config.page, "x");
        assert_eq!(config.api_key, "y");
        assert_eq!(config.secret_key, "z");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn parse_missing_secret() {
        let err = Config::parse("page = x\nkey = y\n").unwrap_err();
        match err {
            CliError::ConfigIncomplete { missing } => {
                assert_eq!(missing.into_iter().collect::<Vec<_>>(), vec!["secret".to_string()]);
            }
            other => panic!("expected ConfigIncomplete, got {other:?}"),
        }
    }

    #[test]
    fn parse_empty_reports_all_required_keys() {
        let err = Config::parse("").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing configuration parameters: key, page, secret."
        );
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let noisy = "# status page credentials\n\npage = x\n   \n  # key below\nkey = y\nsecret = z\n\n";
        assert_eq!(
            Config::parse(noisy).expect("noisy"),
            Config::parse(WELL_FORMED).expect("plain")
        );
    }

    #[test]
    fn value_may_contain_equals_sign() {
        let config = Config::parse("page=x\nkey=y\nsecret = abc==\n").expect("should parse");
        assert_eq!(config.secret_key, "abc==");
    }

    #[test]
    fn lines_without_separator_are_skipped() {
        let config = Config::parse("garbage\npage = x\nkey = y\nsecret = z\n").expect("should parse");
        assert_eq!(config.page, "x");
    }

    #[test]
    fn custom_endpoint() {
        let config = Config::parse("page = x\nkey = y\nsecret = z\nendpoint = http://localhost:8000\n")
            .expect("should parse");
        assert_eq!(config.endpoint, "http://localhost:8000");
    }

    #[test]
    fn debug_redacts_secret() {
        let config = Config::parse("page = x\nkey = y\nsecret = hunter2\n").expect("should parse");
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, CliError::ConfigMissing { path: p } if p == path));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("runstatus");
        fs::write(&path, WELL_FORMED).expect("write");
        let config = Config::load(&path).expect("should load");
        assert_eq!(config.page, "x");
    }

    #[test]
    fn expand_home_leaves_plain_paths() {
        assert_eq!(expand_home(Path::new("/etc/runstatus")), PathBuf::from("/etc/runstatus"));
    }

    #[test]
    fn expand_home_replaces_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/.runstatus")), home.join(".runstatus"));
        }
    }
}
