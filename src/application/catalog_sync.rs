//! Incremental catalog sync
//!
//! Walks the listing page by page, merges every parsed card into the dataset
//! with insert-if-absent semantics, and saves a snapshot after each page.
//! The run ends at the first page without cards, at the configured page cap,
//! or at the first transport failure.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::domain::card::CardRecord;
use crate::infrastructure::config::CollectorConfig;
use crate::infrastructure::dataset_store::{Dataset, JsonDatasetStore};
use crate::infrastructure::error::CollectorResult;
use crate::infrastructure::http_client::CardListSource;
use crate::infrastructure::parsing::CardListParser;

/// Sync loop settings
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Wait between two listing requests
    pub request_delay: Duration,
    /// Last page to request; `None` walks until an empty page
    pub max_pages: Option<u32>,
}

impl From<&CollectorConfig> for SyncOptions {
    fn from(config: &CollectorConfig) -> Self {
        Self {
            request_delay: config.request_delay(),
            max_pages: config.max_pages,
        }
    }
}

/// How a sync run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// `page` had no cards, or was the last page allowed by the cap
    Exhausted { page: u32 },
    /// Processing `page` failed; earlier pages are already saved
    Aborted { page: u32, reason: String },
}

/// Totals reported at the end of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub pages_visited: u32,
    pub cards_processed: usize,
    pub new_cards: usize,
    /// Cards in the dataset before the run started
    pub existing_cards: usize,
    pub total_cards: usize,
    pub outcome: SyncOutcome,
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Final Summary:")?;
        writeln!(f, "Total pages processed: {}", self.pages_visited)?;
        writeln!(f, "Total cards processed: {}", self.cards_processed)?;
        writeln!(f, "New cards added: {}", self.new_cards)?;
        writeln!(f, "Existing cards: {}", self.existing_cards)?;
        writeln!(f, "Total cards in database: {}", self.total_cards)?;
        match &self.outcome {
            SyncOutcome::Exhausted { page } => write!(f, "Finished at page {page}"),
            SyncOutcome::Aborted { page, reason } => {
                write!(f, "Stopped at page {page}: {reason}")
            }
        }
    }
}

/// Per-page merge counts
#[derive(Debug, Default, Clone, Copy)]
struct PageStats {
    processed: usize,
    new: usize,
}

/// Sequential page-walking sync controller
pub struct CatalogSync<S> {
    source: S,
    parser: CardListParser,
    store: JsonDatasetStore,
    options: SyncOptions,
}

impl<S: CardListSource> CatalogSync<S> {
    pub fn new(
        source: S,
        parser: CardListParser,
        store: JsonDatasetStore,
        options: SyncOptions,
    ) -> Self {
        Self {
            source,
            parser,
            store,
            options,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run one full sync pass
    pub async fn run(&self) -> SyncSummary {
        let mut dataset = self.store.load_or_empty().await;
        let existing_cards = dataset.len();

        let mut pages_visited = 0;
        let mut cards_processed = 0;
        let mut new_cards = 0;
        let mut page = 1;

        let outcome = loop {
            info!("Processing page {}", page);

            let markup = match self.source.fetch_page(page).await {
                Ok(markup) => markup,
                Err(e) => {
                    error!("Error on page {}: {}", page, e);
                    break SyncOutcome::Aborted {
                        page,
                        reason: e.to_string(),
                    };
                }
            };
            pages_visited += 1;

            let records = self.parser.parse_page(&markup, page);
            if records.is_empty() {
                info!("No more cards found on page {}", page);
                break SyncOutcome::Exhausted { page };
            }

            let stats = match merge_page(&mut dataset, &records) {
                Ok(stats) => stats,
                Err(e) => {
                    error!("Error on page {}: {}", page, e);
                    break SyncOutcome::Aborted {
                        page,
                        reason: e.to_string(),
                    };
                }
            };
            cards_processed += stats.processed;
            new_cards += stats.new;

            if let Err(e) = self.store.save(&dataset).await {
                warn!("Failed to save dataset after page {}: {}", page, e);
            }

            info!(
                "Page {} completed. Cards processed: {}, New cards: {}",
                page, stats.processed, stats.new
            );

            if self.options.max_pages.is_some_and(|max| page >= max) {
                info!("Reached page limit {}", page);
                break SyncOutcome::Exhausted { page };
            }

            tokio::time::sleep(self.options.request_delay).await;
            page += 1;
        };

        let summary = SyncSummary {
            pages_visited,
            cards_processed,
            new_cards,
            existing_cards,
            total_cards: dataset.len(),
            outcome,
        };

        info!(
            "Collection completed. Pages: {}, cards processed: {}, new cards: {}, total: {}",
            summary.pages_visited, summary.cards_processed, summary.new_cards, summary.total_cards
        );
        summary
    }
}

fn merge_page(dataset: &mut Dataset, records: &[CardRecord]) -> CollectorResult<PageStats> {
    let mut stats = PageStats::default();
    for record in records {
        stats.processed += 1;
        if dataset.contains(&record.id) {
            debug!("Card {} already known", record.id);
            continue;
        }
        if dataset.insert_if_absent(&record.id, record)? {
            stats.new += 1;
        }
    }
    Ok(stats)
}
