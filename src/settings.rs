//! # Settings
//!
//! Layered scanner settings.
//!
//! Sources, later ones winning:
//!
//! 1. built-in defaults
//! 2. an optional TOML file
//! 3. `LEDGER_SCAN__*` environment variables, `__` separating sections,
//!    e.g. `LEDGER_SCAN__LEDGER__BASE_URL` or `LEDGER_SCAN__SCAN__MAX_TRADES`
//!
//! ```toml
//! [ledger]
//! base_url = "https://api.ripple.com"
//! timeout_ms = 10000
//! account = "rfZz9cPdU4DSCQhW2hsmu4tbzfdEbY3VrH"
//!
//! [rate_limit]
//! calls = 10
//! time_span = 1
//! time_unit = "seconds"
//!
//! [scan]
//! max_trades = 10
//! max_api_calls = 100
//! page_length = 20
//! earliest_first = false
//! ```

use crate::application::params::ScanDefaults;
use crate::application::services::ScannerConfig;
use crate::domain::value_objects::{AccountId, RateLimitPolicy};
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "LEDGER_SCAN";

/// Default ledger server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5990";

/// Default per-request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Remote ledger connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSettings {
    /// Server base URL.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Own account, the default scan target.
    pub account: Option<AccountId>,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            account: None,
        }
    }
}

/// All scanner settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerSettings {
    /// Remote ledger connection.
    pub ledger: LedgerSettings,
    /// Pacing of resolution calls.
    pub rate_limit: RateLimitPolicy,
    /// Fallbacks for unset scan parameters.
    pub scan: ScanDefaults,
}

impl ScannerSettings {
    /// Loads settings from defaults, the optional file at `path` and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is unreadable or a value has the
    /// wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Parses settings from TOML text, without consulting the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` on malformed TOML or mistyped values.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Returns the scanner configuration.
    #[must_use]
    pub fn scanner_config(&self) -> ScannerConfig {
        ScannerConfig {
            defaults: self.scan,
            rate_limit: self.rate_limit,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::TimeUnit;

    #[test]
    fn defaults() {
        let settings = ScannerSettings::default();
        assert_eq!(settings.ledger.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.ledger.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(settings.rate_limit.delay_millis(), 1000);
        assert_eq!(settings.scan, ScanDefaults::default());
    }

    #[test]
    fn full_file() {
        let settings = ScannerSettings::from_toml(
            r#"
            [ledger]
            base_url = "https://api.ripple.com"
            timeout_ms = 2500
            account = "rOwner"

            [rate_limit]
            calls = 3
            time_span = 1
            time_unit = "MINUTES"

            [scan]
            max_trades = 5
            max_api_calls = 50
            page_length = 10
            earliest_first = true
            "#,
        )
        .unwrap();

        assert_eq!(settings.ledger.base_url, "https://api.ripple.com");
        assert_eq!(settings.ledger.timeout_ms, 2500);
        assert_eq!(settings.ledger.account, Some(AccountId::new("rOwner")));
        assert_eq!(settings.rate_limit.time_unit(), TimeUnit::Minutes);
        assert_eq!(settings.rate_limit.delay_millis(), 20_000);

        let config = settings.scanner_config();
        assert_eq!(config.defaults.max_trades, 5);
        assert_eq!(config.defaults.max_api_calls, 50);
        assert_eq!(config.defaults.page_length, 10);
        assert!(config.defaults.earliest_first);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let settings = ScannerSettings::from_toml(
            r#"
            [scan]
            max_trades = 2
            "#,
        )
        .unwrap();
        assert_eq!(settings.scan.max_trades, 2);
        assert_eq!(settings.scan.max_api_calls, 100);
        assert_eq!(settings.ledger, LedgerSettings::default());
    }

    #[test]
    fn zero_calls_rejected() {
        let result = ScannerSettings::from_toml(
            r#"
            [rate_limit]
            calls = 0
            time_span = 1
            time_unit = "seconds"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = ScannerSettings::load(Some(Path::new("/nonexistent/ledger-scan.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn load_from_file() {
        let path = std::env::temp_dir().join(format!("ledger-scan-{}.toml", std::process::id()));
        std::fs::write(&path, "[ledger]\nbase_url = \"http://ledger.test\"\n").unwrap();
        let settings = ScannerSettings::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(settings.ledger.base_url, "http://ledger.test");
    }
}
