//! HTML parsing infrastructure for the card list
//!
//! Parsing of listing pages into normalized card records, with the label
//! tables and selectors kept apart from the extraction logic.

pub mod card_list_parser;
pub mod card_mappings;
pub mod card_parser;
pub mod config;
pub mod skill_parser;

// Re-export public types
pub use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};
pub use card_list_parser::CardListParser;
pub use card_parser::{CardRecordParser, derive_card_id, parse_id};
pub use config::{CardListSelectors, CompiledSelectors};
pub use skill_parser::SkillParser;
