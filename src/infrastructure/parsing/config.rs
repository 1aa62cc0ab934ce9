//! Parsing configuration for the card list markup
//!
//! Centralized CSS selectors for one card list layout, compiled once per
//! parser so the per-card passes never re-parse selector strings.

use scraper::Selector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ParsingError, ParsingResult};

/// CSS selectors for card list pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardListSelectors {
    /// One card fragment on a listing page
    pub card_item: String,

    /// Printed card number
    pub number: String,

    /// Card display name
    pub name: String,

    /// Container of the card image
    pub image_container: String,

    /// Block holding the primary info definition list
    pub info_block: String,

    /// Secondary definition list with icon based details
    pub detail_list: String,

    /// Skill blocks (oshi, SP oshi, arts, keyword)
    pub skill_block: String,

    /// Special-attack marker inside a skill block
    pub special_attack: String,
}

impl Default for CardListSelectors {
    fn default() -> Self {
        Self {
            card_item: "li.ex-item".to_string(),
            number: "p.number".to_string(),
            name: "p.name".to_string(),
            image_container: "div.img".to_string(),
            info_block: "div.info".to_string(),
            detail_list: "dl.info_Detail".to_string(),
            skill_block: "div.oshi, div.sp, div.arts, div.keyword".to_string(),
            special_attack: "span.tokkou".to_string(),
        }
    }
}

/// Selectors compiled from [`CardListSelectors`] plus the structural tags
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub card_item: Selector,
    pub number: Selector,
    pub name: Selector,
    pub image_container: Selector,
    pub info_block: Selector,
    pub detail_list: Selector,
    pub skill_block: Selector,
    pub special_attack: Selector,
    pub img: Selector,
    pub paragraph: Selector,
    pub definition_list: Selector,
    pub term: Selector,
    pub definition: Selector,
}

impl CompiledSelectors {
    /// Compile every selector, failing on the first invalid one
    pub fn compile(selectors: &CardListSelectors) -> ParsingResult<Self> {
        let compiled = Self {
            card_item: compile_selector(&selectors.card_item)?,
            number: compile_selector(&selectors.number)?,
            name: compile_selector(&selectors.name)?,
            image_container: compile_selector(&selectors.image_container)?,
            info_block: compile_selector(&selectors.info_block)?,
            detail_list: compile_selector(&selectors.detail_list)?,
            skill_block: compile_selector(&selectors.skill_block)?,
            special_attack: compile_selector(&selectors.special_attack)?,
            img: compile_selector("img")?,
            paragraph: compile_selector("p")?,
            definition_list: compile_selector("dl")?,
            term: compile_selector("dt")?,
            definition: compile_selector("dd")?,
        };

        debug!("Compiled card list selectors (card item: '{}')", selectors.card_item);
        Ok(compiled)
    }
}

fn compile_selector(selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| ParsingError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selectors_compile() {
        let compiled = CompiledSelectors::compile(&CardListSelectors::default());
        assert!(compiled.is_ok());
    }

    #[test]
    fn test_invalid_selector_is_reported() {
        let selectors = CardListSelectors {
            skill_block: "div..arts".to_string(),
            ..CardListSelectors::default()
        };

        match CompiledSelectors::compile(&selectors) {
            Err(ParsingError::InvalidSelector { selector, .. }) => {
                assert_eq!(selector, "div..arts");
            }
            other => panic!("expected selector error, got {other:?}"),
        }
    }
}
