//! Command dispatch system
//!
//! This module provides the key binding table and command implementations.
//! Commands are organized into submodules by category.

mod editing;
mod files;
mod misc;
mod navigation;

use std::collections::HashMap;

use hdevedit::error::Result;

use crate::editor::EditorState;
use crate::input::{special, Key, BACKSPACE};

/// Command result status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failure,
    Abort,
}

/// Command function signature
pub type CommandFn = fn(&mut EditorState) -> Result<CommandStatus>;

/// Key binding entry with command function and name
struct BindingEntry {
    function: CommandFn,
    name: &'static str,
}

/// Key binding table
pub struct KeyTable {
    bindings: HashMap<u32, BindingEntry>,
}

impl KeyTable {
    /// Create an empty key table
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Create key table with default bindings
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table.setup_defaults();
        table
    }

    /// Add a key binding with command name
    pub fn bind_named(&mut self, key: Key, cmd: CommandFn, name: &'static str) {
        self.bindings.insert(key.code(), BindingEntry { function: cmd, name });
    }

    /// Look up a command and its name for a key
    pub fn lookup_named(&self, key: Key) -> Option<(CommandFn, &'static str)> {
        self.bindings.get(&key.code()).map(|e| (e.function, e.name))
    }

    /// Look up a command name for a key
    pub fn lookup_name(&self, key: Key) -> Option<&'static str> {
        self.bindings.get(&key.code()).map(|e| e.name)
    }

    /// Set up default key bindings
    fn setup_defaults(&mut self) {
        use editing::*;
        use files::*;
        use misc::*;
        use navigation::*;

        // Basic cursor movement
        self.bind_named(Key::ctrl('f'), forward_char, "forward-char");
        self.bind_named(Key::ctrl('b'), backward_char, "backward-char");
        self.bind_named(Key::ctrl('n'), next_line, "next-line");
        self.bind_named(Key::ctrl('p'), previous_line, "previous-line");
        self.bind_named(Key::ctrl('a'), beginning_of_line, "beginning-of-line");
        self.bind_named(Key::ctrl('e'), end_of_line, "end-of-line");

        // Page movement
        self.bind_named(Key::ctrl('v'), scroll_down, "scroll-down");
        self.bind_named(Key::meta('v'), scroll_up, "scroll-up");
        self.bind_named(Key::meta('<'), beginning_of_buffer, "beginning-of-buffer");
        self.bind_named(Key::meta('>'), end_of_buffer, "end-of-buffer");

        // Arrow keys (special keys)
        self.bind_named(Key::special(special::RIGHT), forward_char, "forward-char");
        self.bind_named(Key::special(special::LEFT), backward_char, "backward-char");
        self.bind_named(Key::special(special::DOWN), next_line, "next-line");
        self.bind_named(Key::special(special::UP), previous_line, "previous-line");
        self.bind_named(Key::special(special::PAGE_UP), scroll_up, "scroll-up");
        self.bind_named(Key::special(special::PAGE_DOWN), scroll_down, "scroll-down");
        self.bind_named(Key::special(special::HOME), beginning_of_line, "beginning-of-line");
        self.bind_named(Key::special(special::END), end_of_line, "end-of-line");

        // Editing
        self.bind_named(Key::ctrl('m'), newline, "newline");
        self.bind_named(Key::ctrl('i'), insert_tab, "tab-to-tab-stop");
        self.bind_named(BACKSPACE, delete_char_backward, "delete-backward-char");
        self.bind_named(Key::ctrl('h'), delete_char_backward, "delete-backward-char");
        self.bind_named(Key::ctrl('d'), delete_char_forward, "delete-char");
        self.bind_named(Key::special(special::DELETE), delete_char_forward, "delete-char");
        self.bind_named(Key::ctrl('k'), kill_line, "kill-line");

        // File operations
        self.bind_named(Key::ctrl('o'), open_file, "open-file");
        self.bind_named(Key::ctrl('s'), save_buffer, "save-buffer");
        self.bind_named(Key::ctlx_ctrl('s'), save_buffer, "save-buffer");
        self.bind_named(Key::ctlx_ctrl('w'), write_file, "write-file");
        self.bind_named(Key::ctlx_ctrl('n'), new_file, "new-file");

        // Quit
        self.bind_named(Key::ctlx_ctrl('c'), quit, "save-buffers-kill-emacs");
        self.bind_named(Key::ctrl('q'), quit, "save-buffers-kill-emacs");

        // Display
        self.bind_named(Key::ctrl('l'), redraw_display, "redraw-display");
        self.bind_named(Key::ctlx('n'), toggle_line_numbers, "toggle-line-numbers");
        self.bind_named(Key::ctlx('h'), toggle_syntax_highlighting, "toggle-syntax-highlighting");

        // Abort
        self.bind_named(Key::ctrl('g'), abort, "keyboard-quit");
    }
}

impl Default for KeyTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_bindings() {
        let table = KeyTable::with_defaults();
        assert_eq!(table.lookup_name(Key::ctrl('o')), Some("open-file"));
        assert_eq!(table.lookup_name(Key::ctrl('s')), Some("save-buffer"));
        assert_eq!(table.lookup_name(Key::ctlx_ctrl('s')), Some("save-buffer"));
        assert_eq!(table.lookup_name(Key::ctlx_ctrl('w')), Some("write-file"));
        assert_eq!(table.lookup_name(Key::ctlx_ctrl('n')), Some("new-file"));
        assert_eq!(table.lookup_name(Key::ctrl('q')), table.lookup_name(Key::ctlx_ctrl('c')));
    }

    #[test]
    fn test_movement_and_editing_bindings() {
        let table = KeyTable::with_defaults();
        assert_eq!(table.lookup_name(Key::special(special::LEFT)), Some("backward-char"));
        assert_eq!(table.lookup_name(Key::meta('>')), Some("end-of-buffer"));
        assert_eq!(table.lookup_name(Key::special(special::PAGE_DOWN)), Some("scroll-down"));
        assert_eq!(table.lookup_name(BACKSPACE), Some("delete-backward-char"));
        assert_eq!(table.lookup_name(Key::ctrl('m')), Some("newline"));
        assert_eq!(table.lookup_name(Key::ctlx('h')), Some("toggle-syntax-highlighting"));
    }

    #[test]
    fn test_unbound_keys() {
        let table = KeyTable::with_defaults();
        assert!(table.lookup_named(Key::char('a')).is_none());
        assert!(table.lookup_named(Key::ctrl('y')).is_none());

        let mut table = KeyTable::new();
        assert!(table.lookup_name(Key::ctrl('f')).is_none());
        table.bind_named(Key::ctrl('f'), navigation::forward_char, "forward-char");
        assert_eq!(table.lookup_name(Key::ctrl('f')), Some("forward-char"));
    }
}
