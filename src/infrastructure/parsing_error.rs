//! Parsing error types for card list markup
//!
//! Every card parsing pass reports its failures through [`ParsingError`];
//! the record parser logs them and keeps whatever the other passes produced.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Required element '{selector}' not found in {context}")]
    ElementMissing { selector: String, context: String },

    #[error("Attribute '{attribute}' missing on <{element}>")]
    AttributeMissing { attribute: String, element: String },

    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Field '{field}' could not be normalized from {value:?}: {reason}")]
    FieldTransformFailed {
        field: String,
        value: String,
        reason: String,
    },

    #[error("URL resolution failed: {url} - {reason}")]
    UrlResolutionFailed { url: String, reason: String },
}

impl ParsingError {
    /// Create an element missing error with the block it was searched in
    pub fn element_missing(selector: &str, context: &str) -> Self {
        Self::ElementMissing {
            selector: selector.to_string(),
            context: context.to_string(),
        }
    }

    pub fn attribute_missing(attribute: &str, element: &str) -> Self {
        Self::AttributeMissing {
            attribute: attribute.to_string(),
            element: element.to_string(),
        }
    }

    /// Create a field transform error for a value the mapping could not accept
    pub fn field_transform_failed(field: &str, value: &str, reason: impl ToString) -> Self {
        Self::FieldTransformFailed {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
