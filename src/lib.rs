//! hdevedit - editing core for HALCON HDevelop programs
//!
//! Two independent pieces:
//!
//! - [`syntax`]: classifies one line at a time into highlight spans
//! - [`transcode`]: converts between a [`Document`] and `.hdev` XML
//!
//! The `hdevedit` binary is a terminal editor built on top of them.

pub mod config;
pub mod document;
pub mod error;
pub mod line;
pub mod syntax;
pub mod transcode;

pub use document::Document;
pub use error::{EditorError, ParseError, Result};
pub use syntax::{Highlighter, Span, TokenType};
