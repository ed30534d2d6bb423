//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Blueprint parse failures.
///
/// Parsing stops at the first violation; each variant names the offending node.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid TOML: {message}")]
    Syntax { message: String },

    #[error("blueprint root is not a table")]
    MalformedRoot,

    #[error("layer '{layer}' is not a table")]
    MalformedLayer { layer: String },

    #[error("section '{layer}.{section}' is not a table")]
    MalformedSection { layer: String, section: String },

    #[error("section '{layer}.{section}' has no 'components' array")]
    MissingComponentList { layer: String, section: String },

    #[error("section '{layer}.{section}': component #{index} is not a string")]
    InvalidComponentEntry {
        layer: String,
        section: String,
        index: usize,
    },
}

/// Result type for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;
