//! Infrastructure layer for HTTP access, HTML parsing, persistence and logging

pub mod config;
pub mod dataset_store;
pub mod error;
pub mod http_client;
pub mod logging;
pub mod parsing;
pub mod parsing_error;

// Re-export commonly used items
pub use config::{AppConfig, CollectorConfig, LoggingConfig, SiteConfig};
pub use dataset_store::{Dataset, JsonDatasetStore};
pub use error::{CollectorError, CollectorResult};
pub use http_client::{CardListSource, HttpClient};
pub use logging::{init_logging_with_config, log_system_info};
pub use parsing::{CardListParser, ParsingError, ParsingResult};
