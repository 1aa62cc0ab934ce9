//! Card list page parser
//!
//! Splits one listing page into `li.ex-item` fragments and turns each into a
//! [`CardRecord`] in document order.

use scraper::Html;
use tracing::debug;
use url::Url;

use super::ParsingResult;
use super::card_parser::CardRecordParser;
use super::config::{CardListSelectors, CompiledSelectors};
use crate::domain::card::CardRecord;

/// Parser for card list pages
pub struct CardListParser {
    selectors: CompiledSelectors,
    origin: Url,
}

impl CardListParser {
    /// Create a parser with the default selectors for the given site origin
    pub fn new(origin: Url) -> ParsingResult<Self> {
        Self::with_config(&CardListSelectors::default(), origin)
    }

    /// Create parser with custom selector configuration
    pub fn with_config(selectors: &CardListSelectors, origin: Url) -> ParsingResult<Self> {
        Ok(Self {
            selectors: CompiledSelectors::compile(selectors)?,
            origin,
        })
    }

    /// Parse raw markup of listing page `page` into records, in document order
    pub fn parse_page(&self, markup: &str, page: u32) -> Vec<CardRecord> {
        let html = Html::parse_document(markup);
        let records: Vec<CardRecord> = html
            .select(&self.selectors.card_item)
            .map(|element| CardRecordParser::new(element, &self.selectors, &self.origin).parse())
            .collect();

        debug!("Extracted {} card fragments from page {}", records.len(), page);
        records
    }
}
