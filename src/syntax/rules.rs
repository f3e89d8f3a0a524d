//! Pattern rules for syntax highlighting

use regex::Regex;

use super::style::Span;
use super::tokens::TokenType;

/// Double-quoted string with no embedded quote
pub const STRING_PATTERN: &str = r#""[^"]*""#;

/// A single-line pattern rule
///
/// Every non-overlapping match of the pattern becomes one span.
#[derive(Debug, Clone)]
pub struct PatternRule {
    /// Name for debugging
    pub name: String,
    /// Compiled regex pattern
    pub pattern: Regex,
    /// Token type to assign to matches
    pub token_type: TokenType,
}

impl PatternRule {
    /// Create a new pattern rule
    pub fn new(name: &str, pattern: &str, token_type: TokenType) -> Option<Self> {
        Regex::new(pattern).ok().map(|regex| Self {
            name: name.to_string(),
            pattern: regex,
            token_type,
        })
    }

    /// Spans for all matches in `text`, left to right
    pub fn spans<'a>(&'a self, text: &'a str) -> impl Iterator<Item = Span> + 'a {
        self.pattern
            .find_iter(text)
            .map(move |m| Span::new(m.start(), m.len(), self.token_type))
    }
}
