//! Token categories for HDevelop highlighting
//!
//! Every span the highlighter emits carries one of these categories,
//! together with its default visual style.

use super::style::{Color, Style};

/// Semantic category of a highlighted region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// A whole `*` comment line
    Comment,
    /// A double-quoted string
    String,
    /// First word of a line that names a known operator or control statement
    Keyword,
    /// First word of a line that is not a known operator
    UnrecognizedFirstWord,
}

impl TokenType {
    /// Get the default style for this token type
    pub fn default_style(&self) -> Style {
        match self {
            TokenType::Comment => Style::fg(Color::Green).with_italic(),
            TokenType::String => Style::fg(Color::Red),
            TokenType::Keyword => Style::fg(Color::Blue).with_bold(),
            TokenType::UnrecognizedFirstWord => Style::fg(Color::BrightRed).with_bold(),
        }
    }

    /// Get a human-readable name for this token type
    pub fn name(&self) -> &'static str {
        match self {
            TokenType::Comment => "Comment",
            TokenType::String => "String",
            TokenType::Keyword => "Keyword",
            TokenType::UnrecognizedFirstWord => "UnrecognizedFirstWord",
        }
    }
}
