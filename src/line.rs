//! Line representation and text operations

use unicode_width::UnicodeWidthStr;

/// A single line of program text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    /// The text content (without trailing newline)
    text: String,
}

impl Line {
    /// Create a new empty line
    pub fn new() -> Self {
        Self {
            text: String::new(),
        }
    }

    /// Create a line from a string
    pub fn from_string(s: String) -> Self {
        Self { text: s }
    }

    /// Get the text content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Get the display width of the line
    pub fn display_width(&self) -> usize {
        self.text.width()
    }

    /// Insert a character at byte position
    pub fn insert_char(&mut self, byte_pos: usize, ch: char) {
        self.text.insert(byte_pos, ch);
    }

    /// Delete a range of bytes and return the deleted text
    pub fn delete_range(&mut self, start: usize, end: usize) -> String {
        let deleted: String = self.text[start..end].to_string();
        self.text.replace_range(start..end, "");
        deleted
    }

    /// Split the line at byte position, returning the remainder
    pub fn split_off(&mut self, byte_pos: usize) -> Line {
        let remainder = self.text.split_off(byte_pos);
        Line::from_string(remainder)
    }

    /// Append another line's content to this line
    pub fn append(&mut self, other: Line) {
        self.text.push_str(other.text());
    }

    /// Get byte position for a given column (display position)
    /// Returns None if column is beyond line end
    pub fn col_to_byte(&self, col: usize) -> Option<usize> {
        let mut current_col = 0;
        for (byte_idx, ch) in self.text.char_indices() {
            if current_col >= col {
                return Some(byte_idx);
            }
            current_col += unicode_width::UnicodeWidthChar::width(ch).unwrap_or(1);
        }
        if current_col >= col {
            Some(self.text.len())
        } else {
            None
        }
    }

    /// Get column (display position) for a given byte position
    pub fn byte_to_col(&self, byte_pos: usize) -> usize {
        self.text[..byte_pos.min(self.text.len())].width()
    }
}

impl From<&str> for Line {
    fn from(s: &str) -> Self {
        Self::from_string(s.to_string())
    }
}

impl From<String> for Line {
    fn from(s: String) -> Self {
        Self::from_string(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_line_operations() {
        let mut line = Line::from("threshold");
        assert_eq!(line.text(), "threshold");
        assert_eq!(line.len(), 9);
        assert!(!line.is_empty());

        line.insert_char(9, '(');
        assert_eq!(line.text(), "threshold(");
    }

    #[test]
    fn test_delete_range() {
        let mut line = Line::from("dev_display(Image)");
        let deleted = line.delete_range(11, 18);
        assert_eq!(deleted, "(Image)");
        assert_eq!(line.text(), "dev_display");
    }

    #[test]
    fn test_split_off_and_append() {
        let mut line = Line::from("stop return");
        let remainder = line.split_off(5);
        assert_eq!(line.text(), "stop ");
        assert_eq!(remainder.text(), "return");

        line.append(remainder);
        assert_eq!(line.text(), "stop return");
    }

    #[test]
    fn test_column_conversion_with_wide_chars() {
        let line = Line::from("* 画像 read");
        // '画' and '像' are 3 bytes and 2 columns each
        assert_eq!(line.byte_to_col(2), 2);
        assert_eq!(line.byte_to_col(8), 6);
        assert_eq!(line.col_to_byte(6), Some(8));
        assert_eq!(line.col_to_byte(100), None);
        assert_eq!(line.display_width(), 11);
    }
}
