//! Card Collector - incremental harvester for the hololive OFFICIAL CARD GAME card list
//!
//! Walks the paginated card search listing, turns every card fragment into a
//! normalized record and merges new cards into a local JSON dataset.

pub mod application;
pub mod domain;
pub mod infrastructure;

use anyhow::{Context, Result};

use application::{CatalogSync, SyncOptions, SyncSummary};
use infrastructure::{AppConfig, CardListParser, HttpClient, JsonDatasetStore};

/// Build the live collaborators from `config` and run one sync pass
pub async fn run(config: &AppConfig) -> Result<SyncSummary> {
    let origin = config.site.origin_url()?;
    let parser = CardListParser::new(origin).context("Failed to compile card list selectors")?;
    let client = HttpClient::new(&config.site).context("Failed to create HTTP client")?;
    let store = JsonDatasetStore::new(&config.collector.data_file);

    let sync = CatalogSync::new(client, parser, store, SyncOptions::from(&config.collector));
    Ok(sync.run().await)
}
