//! Configuration infrastructure
//!
//! Contains configuration loading for the card collector.
//!
//! Settings are layered by the `config` crate:
//! 1. Built-in defaults (every section is `#[serde(default)]`)
//! 2. Optional `card_collector.{toml,json,yaml}` in the working directory
//! 3. `CARD_COLLECTOR__<SECTION>__<KEY>` environment variables

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use crate::infrastructure::error::{CollectorError, CollectorResult};

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Card list site settings
    pub site: SiteConfig,

    /// Sync loop and dataset settings
    pub collector: CollectorConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Card list site and HTTP settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Origin image paths are resolved against
    pub origin: String,

    /// Listing endpoint queried page by page
    pub card_search_url: String,

    /// Cookie selecting the text view sorted by newest
    pub cookie: String,

    pub user_agent: String,

    /// Request timeout in seconds
    pub request_timeout_seconds: u64,
}

/// Sync loop settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Dataset snapshot file
    pub data_file: PathBuf,

    /// Delay between listing pages in milliseconds
    pub request_delay_ms: u64,

    /// Stop after this many pages even if more exist
    pub max_pages: Option<u32>,
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted file logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Directory holding the log file
    pub log_dir: PathBuf,

    /// Flat log file name (never rotated)
    pub file_name: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: hololive::ORIGIN.to_string(),
            card_search_url: hololive::CARD_SEARCH_URL.to_string(),
            cookie: hololive::LISTING_COOKIE.to_string(),
            user_agent: defaults::USER_AGENT.to_string(),
            request_timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
        }
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(defaults::DATA_FILE),
            request_delay_ms: defaults::REQUEST_DELAY_MS,
            max_pages: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            console_output: true,
            file_output: true,
            log_dir: PathBuf::from(defaults::LOG_DIR),
            file_name: defaults::LOG_FILE.to_string(),
        }
    }
}

impl SiteConfig {
    pub fn origin_url(&self) -> CollectorResult<Url> {
        Url::parse(&self.origin)
            .map_err(|e| CollectorError::validation(format!("invalid origin '{}': {e}", self.origin)))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl CollectorConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

impl AppConfig {
    /// Load from `card_collector.*` in the working directory and the environment
    pub fn load() -> CollectorResult<Self> {
        Self::from_sources(config::File::with_name(defaults::CONFIG_FILE).required(false))
    }

    /// Load from an explicit file (plus environment overrides)
    pub fn load_from(path: &Path) -> CollectorResult<Self> {
        Self::from_sources(config::File::from(path).required(true))
    }

    fn from_sources<S>(file: S) -> CollectorResult<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(defaults::ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        info!("Configuration loaded (data file: {:?})", config.collector.data_file);
        Ok(config)
    }

    pub fn validate(&self) -> CollectorResult<()> {
        self.site.origin_url()?;

        Url::parse(&self.site.card_search_url).map_err(|e| {
            CollectorError::validation(format!(
                "invalid card_search_url '{}': {e}",
                self.site.card_search_url
            ))
        })?;

        if self.site.request_timeout_seconds == 0 {
            return Err(CollectorError::validation(
                "request_timeout_seconds must be greater than 0",
            ));
        }

        if self.collector.max_pages == Some(0) {
            return Err(CollectorError::validation("max_pages must be greater than 0 when set"));
        }

        if self.collector.data_file.as_os_str().is_empty() {
            return Err(CollectorError::validation("data_file must not be empty"));
        }

        Ok(())
    }
}

/// hololive OFFICIAL CARD GAME card list constants
pub mod hololive {
    /// Site origin
    pub const ORIGIN: &str = "https://hololive-official-cardgame.com";

    /// Card search listing endpoint
    pub const CARD_SEARCH_URL: &str = "https://hololive-official-cardgame.com/cardlist/cardsearch_ex";

    /// Text list view, newest first
    pub const LISTING_COOKIE: &str = "cardlist_view=text; cardlist_search_sort=new";

    /// Unfiltered search parameters sent with every page request
    pub const LISTING_FILTERS: &[(&str, &str)] = &[
        ("keyword", ""),
        ("attribute[0]", "all"),
        ("expansion_name", ""),
        ("card_kind[0]", "all"),
        ("rare[0]", "all"),
        ("bloom_level[0]", "all"),
        ("parallel[0]", "all"),
    ];

    /// Query parameter carrying the page number
    pub const PARAM_PAGE: &str = "page";
}

/// Default configuration values
pub mod defaults {
    pub const REQUEST_DELAY_MS: u64 = 1000;

    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    pub const USER_AGENT: &str = concat!("card-collector/", env!("CARGO_PKG_VERSION"));

    pub const DATA_FILE: &str = "data/card_data.json";

    pub const LOG_DIR: &str = "logs";

    pub const LOG_FILE: &str = "card_collector.log";

    /// Base name of the optional configuration file
    pub const CONFIG_FILE: &str = "card_collector";

    pub const ENV_PREFIX: &str = "CARD_COLLECTOR";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.collector.request_delay(), Duration::from_secs(1));
        assert_eq!(config.site.card_search_url, hololive::CARD_SEARCH_URL);
        assert!(config.logging.console_output);
        assert!(config.logging.file_output);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[collector]\ndata_file = \"out/cards.json\"\nrequest_delay_ms = 250\nmax_pages = 3\n\n[logging]\nlevel = \"debug\""
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.collector.data_file, PathBuf::from("out/cards.json"));
        assert_eq!(config.collector.request_delay_ms, 250);
        assert_eq!(config.collector.max_pages, Some(3));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.site, SiteConfig::default());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.site.request_timeout_seconds = 0;
        assert!(matches!(config.validate(), Err(CollectorError::Validation { .. })));

        let mut config = AppConfig::default();
        config.site.origin = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.collector.max_pages = Some(0);
        assert!(config.validate().is_err());
    }
}
