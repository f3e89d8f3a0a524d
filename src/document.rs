//! Document representation - the ordered lines of one HDevelop program
//!
//! A document is what the highlighter reads line by line and what the
//! transcoder loads from and saves to `.hdev` files. Line order is program
//! order.

use crate::line::Line;

/// Marker that starts a comment line (after leading whitespace)
pub const COMMENT_MARKER: char = '*';

/// Check whether a line is a comment line
pub fn is_comment(text: &str) -> bool {
    text.trim().starts_with(COMMENT_MARKER)
}

/// Body of a comment line: leading markers and surrounding whitespace removed
///
/// Only markers at the very start of the line are dropped, so the indented
/// `"  ** note  "` becomes `"** note"` while `"** note"` becomes `"note"`.
pub fn comment_body(text: &str) -> &str {
    text.trim_start_matches(COMMENT_MARKER).trim()
}

fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split text at every line break
///
/// Besides `\n` and `\r\n` this breaks on a lone `\r`, vertical tab, form
/// feed, the file/group/record separators, NEL and the Unicode line and
/// paragraph separators. Empty text has no lines and a trailing break does
/// not start a new line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if !is_line_break(ch) {
            continue;
        }
        lines.push(&text[start..idx]);
        start = idx + ch.len_utf8();
        if ch == '\r' && matches!(chars.peek(), Some((_, '\n'))) {
            chars.next();
            start += 1;
        }
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// An ordered sequence of program lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    lines: Vec<Line>,
}

impl Document {
    /// Create an empty document (no lines)
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Create a document from line contents, in order
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(|s| Line::from_string(s.into())).collect(),
        }
    }

    /// Split plain text into a document, see [`split_lines`]
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(split_lines(text))
    }

    /// Join all lines with `\n`
    pub fn to_text(&self) -> String {
        self.lines
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Get number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get a line by index
    pub fn line(&self, idx: usize) -> Option<&Line> {
        self.lines.get(idx)
    }

    /// Get all lines
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Append a line at the end
    pub fn push(&mut self, text: impl Into<String>) {
        self.lines.push(Line::from_string(text.into()));
    }

    /// Insert a character at position
    pub fn insert_char(&mut self, line_idx: usize, byte_pos: usize, ch: char) -> bool {
        match self.lines.get_mut(line_idx) {
            Some(line) => {
                line.insert_char(byte_pos, ch);
                true
            }
            None => false,
        }
    }

    /// Insert a newline, splitting the current line
    pub fn insert_newline(&mut self, line_idx: usize, byte_pos: usize) -> bool {
        if let Some(line) = self.lines.get_mut(line_idx) {
            let new_line = line.split_off(byte_pos);
            self.lines.insert(line_idx + 1, new_line);
            return true;
        }
        false
    }

    /// Delete a character at position, returns the deleted char
    pub fn delete_char(&mut self, line_idx: usize, byte_pos: usize) -> Option<char> {
        let line = self.lines.get_mut(line_idx)?;
        let ch = line.text().get(byte_pos..)?.chars().next()?;
        line.delete_range(byte_pos, byte_pos + ch.len_utf8());
        Some(ch)
    }

    /// Delete backward (backspace), returns deleted char and new position
    pub fn delete_backward(&mut self, line_idx: usize, byte_pos: usize) -> Option<(char, usize)> {
        if byte_pos == 0 {
            return None;
        }
        let line = self.lines.get_mut(line_idx)?;
        let ch = line.text().get(..byte_pos)?.chars().last()?;
        let new_pos = byte_pos - ch.len_utf8();
        line.delete_range(new_pos, byte_pos);
        Some((ch, new_pos))
    }

    /// Join line with the next line, returns the byte position of the join
    pub fn join_line(&mut self, line_idx: usize) -> Option<usize> {
        if line_idx + 1 >= self.lines.len() {
            return None;
        }
        let next_line = self.lines.remove(line_idx + 1);
        let line = self.lines.get_mut(line_idx)?;
        let join_pos = line.len();
        line.append(next_line);
        Some(join_pos)
    }

    /// Delete a line by index
    pub fn delete_line(&mut self, line_idx: usize) -> Option<Line> {
        if line_idx < self.lines.len() {
            Some(self.lines.remove(line_idx))
        } else {
            None
        }
    }

    /// Kill from position to end of line, returns killed text
    ///
    /// At end of line the following line is joined instead.
    pub fn kill_to_eol(&mut self, line_idx: usize, byte_pos: usize) -> Option<String> {
        let line_len = self.lines.get(line_idx)?.len();
        if byte_pos < line_len {
            let line = self.lines.get_mut(line_idx)?;
            Some(line.delete_range(byte_pos, line_len))
        } else {
            self.join_line(line_idx).map(|_| "\n".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_detection() {
        assert!(is_comment("* comment"));
        assert!(is_comment("   *indented"));
        assert!(is_comment("*"));
        assert!(!is_comment("read_image(Image, 'a*b')"));
        assert!(!is_comment(""));
        assert!(!is_comment("   "));
    }

    #[test]
    fn test_comment_body() {
        assert_eq!(comment_body("* this is a comment"), "this is a comment");
        assert_eq!(comment_body("*** banner ***  "), "banner ***");
        assert_eq!(comment_body("*"), "");
        assert_eq!(comment_body("*\tx\t"), "x");
        assert_eq!(comment_body("*\t* x"), "* x");
    }

    #[test]
    fn test_indented_comment_keeps_its_marker() {
        assert_eq!(comment_body("  *** banner ***  "), "*** banner ***");
        assert_eq!(comment_body("  * note"), "* note");
        assert_eq!(comment_body("\t** banner **  "), "** banner **");
        assert_eq!(comment_body("   *"), "*");
    }

    #[test]
    fn test_split_lines_breaks_on_every_separator() {
        assert!(split_lines("").is_empty());
        assert_eq!(split_lines("\n"), vec![""]);
        assert_eq!(split_lines("a\rb"), vec!["a", "b"]);
        assert_eq!(split_lines("a\r\nb\r"), vec!["a", "b"]);
        assert_eq!(split_lines("a\r\rb"), vec!["a", "", "b"]);
        assert_eq!(
            split_lines("a\x0bb\x0cc\x1cd\x1de\x1ef\u{85}g\u{2028}h\u{2029}i"),
            vec!["a", "b", "c", "d", "e", "f", "g", "h", "i"]
        );
        assert_eq!(split_lines("tab\tstays"), vec!["tab\tstays"]);
    }

    #[test]
    fn test_from_text_uses_line_semantics() {
        assert!(Document::from_text("").is_empty());

        let doc = Document::from_text("a\nb\n");
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.to_text(), "a\nb");

        let doc = Document::from_text("a\r\n\nb");
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.line(0).map(Line::text), Some("a"));
        assert_eq!(doc.line(1).map(Line::text), Some(""));
    }

    #[test]
    fn test_insert_and_split() {
        let mut doc = Document::from_lines(["stopreturn"]);
        assert!(doc.insert_newline(0, 4));
        assert_eq!(doc.to_text(), "stop\nreturn");

        assert!(doc.insert_char(1, 0, ' '));
        assert_eq!(doc.line(1).map(Line::text), Some(" return"));
        assert!(!doc.insert_char(5, 0, 'x'));
    }

    #[test]
    fn test_delete_operations() {
        let mut doc = Document::from_lines(["ifx", "endif"]);
        assert_eq!(doc.delete_char(0, 2), Some('x'));
        assert_eq!(doc.delete_char(0, 2), None);
        assert_eq!(doc.delete_backward(1, 5), Some(('f', 4)));
        assert_eq!(doc.delete_backward(1, 0), None);
        assert_eq!(doc.to_text(), "if\nendi");
    }

    #[test]
    fn test_join_and_kill() {
        let mut doc = Document::from_lines(["for I := 1 to 3 by 1", "endfor", "stop"]);
        assert_eq!(doc.join_line(0), Some(20));
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.join_line(1), None);

        assert_eq!(doc.kill_to_eol(0, 3), Some(" I := 1 to 3 by 1endfor".to_string()));
        assert_eq!(doc.kill_to_eol(0, 3), Some("\n".to_string()));
        assert_eq!(doc.to_text(), "forstop");
        assert_eq!(doc.kill_to_eol(0, 8), None);

        assert_eq!(doc.delete_line(0).map(|l| l.text().to_string()), Some("forstop".to_string()));
        assert!(doc.is_empty());
    }
}
