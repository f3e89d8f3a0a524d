//! Error types for hdevedit

use thiserror::Error;

/// Result type alias for hdevedit operations
pub type Result<T> = std::result::Result<T, EditorError>;

/// Editor error types
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("Could not write program: {0}")]
    Write(#[from] quick_xml::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("{0}")]
    Message(String),
}

/// Failure to turn a persisted program back into a document
///
/// The caller keeps whatever document it had before the failed load.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Malformed XML at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("Could not read program: {0}")]
    Read(#[source] std::io::Error),

    #[error("Invalid UTF-8 in character data at byte {position}: {source}")]
    Utf8 {
        position: u64,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("No root element found")]
    MissingRoot,

    #[error("Element <{tag}> is never closed")]
    Unclosed { tag: String },

    #[error("Unexpected end tag </{tag}> at byte {position}")]
    UnexpectedEnd { tag: String, position: u64 },

    #[error("Content outside the root element at byte {position}")]
    TrailingContent { position: u64 },
}
