//! Syntax highlighting for HDevelop programs
//!
//! This module provides:
//! - line classification into comment, string and first-word spans
//! - the keyword set the first word is checked against
//! - a per-line span cache for incremental re-highlighting

mod style;
mod tokens;
mod rules;
mod keywords;
mod highlighter;
mod manager;

pub use style::{Color, Span, Style};
pub use tokens::TokenType;
pub use rules::{PatternRule, STRING_PATTERN};
pub use keywords::{KeywordSet, HALCON_OPERATORS};
pub use highlighter::{first_word, Highlighter};
pub use manager::{HighlightCache, SyntaxManager};
