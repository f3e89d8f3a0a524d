//! Line classifier for HDevelop programs
//!
//! HDevelop has no multi-line constructs, so every line is classified on
//! its own:
//!
//! - a line whose trimmed text starts with `*` is one comment span
//! - every `"..."` pair is a string span
//! - the first word is a keyword span when it names a known operator or
//!   control statement, and an unrecognized-first-word span otherwise

use crate::document::is_comment;

use super::keywords::KeywordSet;
use super::rules::{PatternRule, STRING_PATTERN};
use super::style::Span;
use super::tokens::TokenType;

/// Classifies lines into highlight spans
///
/// Holds no mutable state; one highlighter can serve any number of lines
/// and threads.
#[derive(Debug, Clone)]
pub struct Highlighter {
    keywords: KeywordSet,
    strings: Option<PatternRule>,
}

impl Highlighter {
    /// Create a highlighter over a fixed keyword set
    pub fn new(keywords: KeywordSet) -> Self {
        Self {
            keywords,
            strings: PatternRule::new("string", STRING_PATTERN, TokenType::String),
        }
    }

    /// The keyword set this highlighter checks first words against
    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    /// Classify one line
    ///
    /// Spans use byte offsets into `line`. String spans come first, in
    /// order; the first-word span comes last and wins where they overlap.
    pub fn classify(&self, line: &str) -> Vec<Span> {
        if is_comment(line) {
            return vec![Span::new(0, line.len(), TokenType::Comment)];
        }

        let mut spans: Vec<Span> = match &self.strings {
            Some(rule) => rule.spans(line).collect(),
            None => Vec::new(),
        };

        let body = line.trim_start();
        let indent = line.len() - body.len();

        if let Some(word) = first_word(body) {
            let token_type = if self.keywords.contains(word) {
                TokenType::Keyword
            } else {
                TokenType::UnrecognizedFirstWord
            };
            spans.push(Span::new(indent, word.len(), token_type));
        }

        spans
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(KeywordSet::halcon())
    }
}

/// The operator name that starts a line
///
/// Takes the first whitespace-delimited token and cuts it at its first
/// `(`, so `threshold(Image,` yields `threshold`. A token that starts with
/// `(` is returned whole.
pub fn first_word(text: &str) -> Option<&str> {
    let token = text.split_whitespace().next()?;
    match token.find('(') {
        Some(0) | None => Some(token),
        Some(paren) => Some(&token[..paren]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(line: &str) -> Vec<Span> {
        Highlighter::default().classify(line)
    }

    fn of_type(spans: &[Span], token_type: TokenType) -> Vec<Span> {
        spans
            .iter()
            .copied()
            .filter(|s| s.token_type == token_type)
            .collect()
    }

    #[test]
    fn test_comment_line_is_single_span() {
        for line in ["* this is a comment", "   * indented \"quoted\"", "*", "\t**read_image"] {
            let spans = classify(line);
            assert_eq!(spans, vec![Span::new(0, line.len(), TokenType::Comment)], "{line:?}");
        }
    }

    #[test]
    fn test_blank_lines_have_no_spans() {
        assert!(classify("").is_empty());
        assert!(classify("    ").is_empty());
        assert!(classify("\t \t").is_empty());
    }

    #[test]
    fn test_unrecognized_first_word_after_indent() {
        let line = "  foo_bar(X,Y)";
        let spans = classify(line);
        assert_eq!(spans, vec![Span::new(2, 7, TokenType::UnrecognizedFirstWord)]);
        assert_eq!(spans[0].slice(line), Some("foo_bar"));
    }

    #[test]
    fn test_keyword_with_strings() {
        let line = r#"write_image(Image, "png", 0, "result")"#;
        let spans = classify(line);

        let keywords = of_type(&spans, TokenType::Keyword);
        assert_eq!(keywords, vec![Span::new(0, 11, TokenType::Keyword)]);

        let strings = of_type(&spans, TokenType::String);
        assert_eq!(strings.len(), 2);
        assert_eq!(strings[0].slice(line), Some(r#""png""#));
        assert_eq!(strings[1].slice(line), Some(r#""result""#));
        assert!(of_type(&spans, TokenType::UnrecognizedFirstWord).is_empty());
    }

    #[test]
    fn test_exactly_one_first_word_span() {
        for line in ["threshold(Image, Region, 0, 128)", "if (Area > 10)", "endif", "  stop", "X := 5"] {
            let spans = classify(line);
            let first_words = spans
                .iter()
                .filter(|s| {
                    matches!(
                        s.token_type,
                        TokenType::Keyword | TokenType::UnrecognizedFirstWord
                    )
                })
                .count();
            assert_eq!(first_words, 1, "{line:?}");
        }
        assert_eq!(classify("endif")[0].token_type, TokenType::Keyword);
        assert_eq!(classify("X := 5")[0].token_type, TokenType::UnrecognizedFirstWord);
    }

    #[test]
    fn test_control_flow_with_space_before_paren() {
        let spans = classify("while (I < 10)");
        assert_eq!(spans, vec![Span::new(0, 5, TokenType::Keyword)]);
    }

    #[test]
    fn test_unterminated_quote_has_no_string_span() {
        let spans = classify(r#"read_image(Image, "board)"#);
        assert!(of_type(&spans, TokenType::String).is_empty());
        assert_eq!(of_type(&spans, TokenType::Keyword).len(), 1);
    }

    #[test]
    fn test_single_quotes_are_not_strings() {
        let spans = classify("read_image(Image, 'board')");
        assert_eq!(spans, vec![Span::new(0, 10, TokenType::Keyword)]);
    }

    #[test]
    fn test_first_word_span_comes_last() {
        let line = r#""label" stop"#;
        let spans = classify(line);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].token_type, TokenType::String);
        assert_eq!(spans[1], Span::new(0, 7, TokenType::UnrecognizedFirstWord));
    }

    #[test]
    fn test_custom_keyword_set() {
        let highlighter = Highlighter::new(KeywordSet::halcon().with_extra(["smooth_image"]));
        let spans = highlighter.classify("smooth_image(Image, Smooth, 'gauss', 2)");
        assert_eq!(spans, vec![Span::new(0, 12, TokenType::Keyword)]);
        assert!(highlighter.keywords().contains("smooth_image"));
    }

    #[test]
    fn test_first_word() {
        assert_eq!(first_word("threshold(Image,"), Some("threshold"));
        assert_eq!(first_word("endfor"), Some("endfor"));
        assert_eq!(first_word("(X)"), Some("(X)"));
        assert_eq!(first_word("   "), None);
        assert_eq!(first_word("a\tb"), Some("a"));
    }

    #[test]
    fn test_default_highlighter_has_string_rule() {
        let highlighter = Highlighter::default();
        assert!(highlighter.strings.is_some());
        assert!(!highlighter.keywords().is_empty());
    }
}
