//! Syntax highlighting manager
//!
//! Wraps a [`Highlighter`] with a per-line span cache so the host only
//! re-classifies the lines an edit touched.

use super::highlighter::Highlighter;
use super::style::Span;

/// Per-document highlighting cache
#[derive(Debug, Default)]
pub struct HighlightCache {
    /// Cached spans per line (None = not computed)
    pub line_spans: Vec<Option<Vec<Span>>>,
}

impl HighlightCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the cached spans of one line
    pub fn invalidate_line(&mut self, line: usize) {
        if let Some(slot) = self.line_spans.get_mut(line) {
            *slot = None;
        }
    }

    /// Drop cached spans from a specific line onwards
    pub fn invalidate_from(&mut self, line: usize) {
        self.line_spans.truncate(line);
    }

    /// Invalidate entire cache
    pub fn invalidate_all(&mut self) {
        self.line_spans.clear();
    }

    /// Number of lines that currently have spans cached
    pub fn cached_lines(&self) -> usize {
        self.line_spans.iter().filter(|s| s.is_some()).count()
    }

    fn ensure_size(&mut self, line_count: usize) {
        if self.line_spans.len() < line_count {
            self.line_spans.resize(line_count, None);
        }
    }
}

/// Main syntax highlighting manager
#[derive(Debug)]
pub struct SyntaxManager {
    highlighter: Highlighter,
    cache: HighlightCache,
    /// Whether syntax highlighting is enabled
    pub enabled: bool,
}

impl SyntaxManager {
    pub fn new(highlighter: Highlighter) -> Self {
        Self {
            highlighter,
            cache: HighlightCache::new(),
            enabled: true,
        }
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    pub fn cache(&self) -> &HighlightCache {
        &self.cache
    }

    /// Spans for one line, classifying it only if it is not cached
    ///
    /// Returns no spans while highlighting is disabled.
    pub fn highlight_line(&mut self, line_idx: usize, text: &str) -> Vec<Span> {
        if !self.enabled {
            return Vec::new();
        }

        self.cache.ensure_size(line_idx + 1);
        if let Some(spans) = &self.cache.line_spans[line_idx] {
            return spans.clone();
        }

        let spans = self.highlighter.classify(text);
        self.cache.line_spans[line_idx] = Some(spans.clone());
        spans
    }

    /// The content of one line changed
    pub fn invalidate_line(&mut self, line: usize) {
        self.cache.invalidate_line(line);
    }

    /// Lines were inserted or removed at `line`; everything after it moved
    pub fn invalidate_from(&mut self, line: usize) {
        self.cache.invalidate_from(line);
    }

    /// The whole document was replaced
    pub fn invalidate_all(&mut self) {
        self.cache.invalidate_all();
    }

    /// Toggle syntax highlighting on/off
    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }
}

impl Default for SyntaxManager {
    fn default() -> Self {
        Self::new(Highlighter::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::TokenType;

    #[test]
    fn test_highlight_line() {
        let mut manager = SyntaxManager::default();
        let spans = manager.highlight_line(0, "stop");
        assert_eq!(spans, vec![Span::new(0, 4, TokenType::Keyword)]);
        assert_eq!(manager.cache().cached_lines(), 1);
    }

    #[test]
    fn test_cached_spans_survive_until_invalidated() {
        let mut manager = SyntaxManager::default();
        manager.highlight_line(2, "stop");

        // Stale text is ignored while the line is cached
        let cached = manager.highlight_line(2, "* now a comment");
        assert_eq!(cached[0].token_type, TokenType::Keyword);

        manager.invalidate_line(2);
        let fresh = manager.highlight_line(2, "* now a comment");
        assert_eq!(fresh, vec![Span::new(0, 15, TokenType::Comment)]);
    }

    #[test]
    fn test_invalidate_from() {
        let mut manager = SyntaxManager::default();
        for (idx, text) in ["if (A)", "stop", "endif"].iter().enumerate() {
            manager.highlight_line(idx, text);
        }
        assert_eq!(manager.cache().cached_lines(), 3);

        manager.invalidate_from(1);
        assert_eq!(manager.cache().cached_lines(), 1);

        manager.invalidate_all();
        assert_eq!(manager.cache().cached_lines(), 0);
    }

    #[test]
    fn test_disabled() {
        let mut manager = SyntaxManager::default();
        manager.toggle();
        assert!(manager.highlight_line(0, "stop").is_empty());
        manager.toggle();
        assert!(!manager.highlight_line(0, "stop").is_empty());
    }
}
