//! Buffer representation - the document being edited plus its metadata

use std::path::{Path, PathBuf};

use hdevedit::document::Document;
use hdevedit::error::{ParseError, Result};
use hdevedit::line::Line;
use hdevedit::transcode;

/// Name shown for a buffer that has no file yet
pub const UNTITLED: &str = "untitled";

/// The program being edited
#[derive(Debug)]
pub struct Buffer {
    /// Lines of text, never empty while editing
    document: Document,
    /// Buffer name (file name without directory)
    name: String,
    /// Associated file path (None for untitled buffers)
    filename: Option<PathBuf>,
    /// Whether buffer has unsaved changes
    modified: bool,
}

impl Buffer {
    /// Create a new empty buffer with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_document(name, Document::new())
    }

    /// Wrap a loaded document
    pub fn from_document(name: impl Into<String>, mut document: Document) -> Self {
        // The cursor always needs a line to sit on
        if document.is_empty() {
            document.push("");
        }
        Self {
            document,
            name: name.into(),
            filename: None,
            modified: false,
        }
    }

    /// Load a program file into a new buffer
    pub fn from_file(path: &Path) -> std::result::Result<Self, ParseError> {
        let document = transcode::load(path)?;
        let mut buffer = Self::from_document(buffer_name(path), document);
        buffer.filename = Some(path.to_path_buf());
        Ok(buffer)
    }

    /// Create an empty buffer that will be saved to `path`
    pub fn for_new_file(path: &Path) -> Self {
        let mut buffer = Self::new(buffer_name(path));
        buffer.filename = Some(path.to_path_buf());
        buffer
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get filename if set
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Set the filename, renaming the buffer after it
    pub fn set_filename(&mut self, path: PathBuf) {
        self.name = buffer_name(&path);
        self.filename = Some(path);
    }

    /// Check if buffer is modified
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    /// Get number of lines
    pub fn line_count(&self) -> usize {
        self.document.len()
    }

    /// Get a line by index
    pub fn line(&self, idx: usize) -> Option<&Line> {
        self.document.line(idx)
    }

    /// The document as it would be written to disk
    ///
    /// Lines are joined and split again, so a trailing empty line is
    /// dropped and an empty buffer has no lines at all.
    pub fn to_document(&self) -> Document {
        Document::from_text(&self.document.to_text())
    }

    /// Write the buffer to `path` and mark it clean
    pub fn save_to(&mut self, path: &Path) -> Result<usize> {
        let document = self.to_document();
        transcode::save(&document, path)?;
        self.modified = false;
        Ok(document.len())
    }

    /// Insert a character at position
    pub fn insert_char(&mut self, line_idx: usize, byte_pos: usize, ch: char) {
        if self.document.insert_char(line_idx, byte_pos, ch) {
            self.modified = true;
        }
    }

    /// Insert a newline, splitting the current line
    pub fn insert_newline(&mut self, line_idx: usize, byte_pos: usize) {
        if self.document.insert_newline(line_idx, byte_pos) {
            self.modified = true;
        }
    }

    /// Delete a character at position, returns the deleted char
    pub fn delete_char(&mut self, line_idx: usize, byte_pos: usize) -> Option<char> {
        let ch = self.document.delete_char(line_idx, byte_pos)?;
        self.modified = true;
        Some(ch)
    }

    /// Delete backward (backspace), returns deleted char and new position
    pub fn delete_backward(&mut self, line_idx: usize, byte_pos: usize) -> Option<(char, usize)> {
        let deleted = self.document.delete_backward(line_idx, byte_pos)?;
        self.modified = true;
        Some(deleted)
    }

    /// Join line with the next line (delete newline at end of line)
    pub fn join_line(&mut self, line_idx: usize) -> bool {
        if self.document.join_line(line_idx).is_some() {
            self.modified = true;
            return true;
        }
        false
    }

    /// Join with previous line (when backspacing at start of line)
    pub fn join_with_previous(&mut self, line_idx: usize) -> Option<usize> {
        if line_idx == 0 {
            return None;
        }
        let join_pos = self.document.join_line(line_idx - 1)?;
        self.modified = true;
        Some(join_pos)
    }

    /// Kill from position to end of line, returns killed text
    pub fn kill_to_eol(&mut self, line_idx: usize, byte_pos: usize) -> Option<String> {
        let killed = self.document.kill_to_eol(line_idx, byte_pos)?;
        self.modified = true;
        Some(killed)
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new(UNTITLED)
    }
}

fn buffer_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
