//! Editor state and main loop

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use hdevedit::config::Config;
use hdevedit::error::{ParseError, Result};
use hdevedit::syntax::{Highlighter, SyntaxManager};

use crate::buffer::{Buffer, UNTITLED};
use crate::command::{CommandStatus, KeyTable};
use crate::display::Display;
use crate::input::{InputState, Key, BACKSPACE};
use crate::terminal::Terminal;
use crate::window::Window;

/// Rows taken by the mode line and the minibuffer
const RESERVED_ROWS: u16 = 2;

/// Main editor state
pub struct EditorState {
    /// The program being edited
    pub buffer: Buffer,
    /// Viewport onto the buffer
    pub window: Window,
    /// Terminal interface
    pub terminal: Terminal,
    /// Display state
    pub display: Display,
    /// Input state
    pub input: InputState,
    /// Key bindings
    pub keytab: KeyTable,
    /// Highlighter and per-line span cache
    pub syntax: SyntaxManager,
    /// Minibuffer prompt state
    pub prompt: PromptState,
    /// Settings loaded at start-up
    pub config: Config,
    /// Whether editor is running
    pub running: bool,
}

/// What action to perform when prompt completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptAction {
    #[default]
    None,
    OpenFile,
    WriteFile,
    ConfirmQuit,
    ConfirmNew,
}

impl PromptAction {
    /// Whether the prompt is answered with a single y/n key
    fn is_confirmation(&self) -> bool {
        matches!(self, PromptAction::ConfirmQuit | PromptAction::ConfirmNew)
    }
}

/// Minibuffer prompt state
#[derive(Debug, Clone, Default)]
pub struct PromptState {
    /// Whether prompt is active
    pub active: bool,
    /// The prompt string (e.g., "Open file")
    pub prompt: String,
    /// Current input
    pub input: String,
    /// What to do when complete
    pub action: PromptAction,
    /// Default value (shown in prompt)
    pub default: Option<String>,
}

impl EditorState {
    /// Create a new editor state
    pub fn new(terminal: Terminal, config: Config) -> Self {
        let height = terminal.rows().saturating_sub(RESERVED_ROWS);

        let mut syntax = SyntaxManager::new(Highlighter::new(config.keyword_set()));
        syntax.enabled = config.highlighting;

        let mut display = Display::new();
        display.show_line_numbers = config.show_line_numbers;

        Self {
            buffer: Buffer::default(),
            window: Window::new(height),
            terminal,
            display,
            input: InputState::new(),
            keytab: KeyTable::with_defaults(),
            syntax,
            prompt: PromptState::default(),
            config,
            running: true,
        }
    }

    /// Replace the buffer with a program loaded from `path`
    ///
    /// On failure the current buffer is left untouched.
    pub fn open_file(&mut self, path: &Path) -> std::result::Result<(), ParseError> {
        let buffer = Buffer::from_file(path)?;
        info!("opened {} ({} lines)", path.display(), buffer.line_count());
        self.replace_buffer(buffer);
        Ok(())
    }

    /// Start an empty buffer for a file that doesn't exist yet
    pub fn open_new_file(&mut self, path: &Path) {
        let buffer = Buffer::for_new_file(path);
        let name = buffer.name().to_string();
        self.replace_buffer(buffer);
        self.display.set_message(format!("(New file) {}", name));
    }

    /// Discard the buffer and start an untitled one
    pub fn new_document(&mut self) {
        self.replace_buffer(Buffer::new(UNTITLED));
        self.display.set_message("New program");
    }

    fn replace_buffer(&mut self, buffer: Buffer) {
        self.buffer = buffer;
        self.window.reset();
        self.syntax.invalidate_all();
        self.display.force_redraw();
    }

    /// Write the buffer to `path`, adopting it as the buffer's file
    ///
    /// A failed write keeps the buffer and its modified flag as they were.
    pub fn write_buffer(&mut self, path: &Path) -> CommandStatus {
        match self.buffer.save_to(path) {
            Ok(count) => {
                info!("wrote {} lines to {}", count, path.display());
                if self.buffer.filename() != Some(path) {
                    self.buffer.set_filename(path.to_path_buf());
                }
                self.display.set_message(format!("Wrote {} lines to {}", count, path.display()));
                CommandStatus::Success
            }
            Err(e) => {
                warn!("saving {} failed: {}", path.display(), e);
                self.display.set_message(format!("Error writing {}: {}", path.display(), e));
                CommandStatus::Failure
            }
        }
    }

    /// Run the main editor loop
    pub fn run(&mut self) -> Result<()> {
        self.display.force_redraw();

        while self.running {
            self.window
                .set_height(self.terminal.rows().saturating_sub(RESERVED_ROWS));

            self.display
                .render(&mut self.terminal, &self.window, &self.buffer, &mut self.syntax)?;

            let key_event = self.terminal.read_key()?;

            if let Some(key) = self.input.translate_key(key_event) {
                self.handle_key(key)?;
            } else if self.input.is_ctlx_pending() {
                self.display.set_message("C-x -");
            } else if self.input.is_meta_pending() {
                self.display.set_message("ESC -");
            }
        }

        Ok(())
    }

    /// Handle a key press
    fn handle_key(&mut self, key: Key) -> Result<()> {
        if self.prompt.active {
            return self.handle_prompt_key(key);
        }

        self.display.clear_message();

        if let Some((cmd, name)) = self.keytab.lookup_named(key) {
            debug!("{} runs {}", key.display_name(), name);
            match cmd(self)? {
                CommandStatus::Success => {}
                CommandStatus::Failure => {
                    self.terminal.beep()?;
                }
                CommandStatus::Abort => {
                    self.display.set_message("Quit");
                    self.terminal.beep()?;
                }
            }
        } else if key.is_self_insert() {
            if let Some(ch) = key.base_char() {
                self.insert_char(ch);
            }
        } else {
            self.terminal.beep()?;
            self.display
                .set_message(format!("{} is not bound", key.display_name()));
        }

        Ok(())
    }

    fn cursor(&self) -> (usize, usize) {
        (self.window.cursor_line(), self.window.cursor_col())
    }

    /// Move the cursor and remember its display column for vertical motion
    fn set_cursor_and_goal(&mut self, line: usize, col: usize) {
        self.window.set_cursor(line, col);
        let goal = self.buffer.line(line).map(|l| l.byte_to_col(col)).unwrap_or(0);
        self.window.set_goal_col(goal);
        self.window.ensure_cursor_visible();
    }

    /// Insert a character at cursor
    pub fn insert_char(&mut self, ch: char) {
        let (line, col) = self.cursor();
        self.buffer.insert_char(line, col, ch);
        self.syntax.invalidate_line(line);
        self.set_cursor_and_goal(line, col + ch.len_utf8());
    }

    /// Insert spaces up to the next tab stop
    pub fn insert_tab(&mut self) {
        let (line, col) = self.cursor();
        let display_col = self.buffer.line(line).map(|l| l.byte_to_col(col)).unwrap_or(0);
        let tab_width = self.config.tab_width.max(1);
        let spaces = tab_width - display_col % tab_width;
        for _ in 0..spaces {
            self.insert_char(' ');
        }
    }

    /// Split the line at the cursor
    pub fn insert_newline(&mut self) {
        let (line, col) = self.cursor();
        self.buffer.insert_newline(line, col);
        self.syntax.invalidate_from(line);
        self.set_cursor_and_goal(line + 1, 0);
    }

    /// Delete the character under the cursor, joining lines at the end
    pub fn delete_forward(&mut self) -> bool {
        let (line, col) = self.cursor();
        if self.buffer.delete_char(line, col).is_some() {
            self.syntax.invalidate_line(line);
            return true;
        }
        if self.buffer.join_line(line) {
            self.syntax.invalidate_from(line);
            return true;
        }
        false
    }

    /// Delete the character before the cursor, joining lines at the start
    pub fn delete_backward(&mut self) -> bool {
        let (line, col) = self.cursor();
        if let Some((_, new_col)) = self.buffer.delete_backward(line, col) {
            self.syntax.invalidate_line(line);
            self.set_cursor_and_goal(line, new_col);
            return true;
        }
        if let Some(join_col) = self.buffer.join_with_previous(line) {
            self.syntax.invalidate_from(line - 1);
            self.set_cursor_and_goal(line - 1, join_col);
            return true;
        }
        false
    }

    /// Kill to end of line, or the line break when already there
    pub fn kill_line(&mut self) -> bool {
        let (line, col) = self.cursor();
        match self.buffer.kill_to_eol(line, col) {
            Some(killed) if killed == "\n" => {
                self.syntax.invalidate_from(line);
                true
            }
            Some(_) => {
                self.syntax.invalidate_line(line);
                true
            }
            None => false,
        }
    }

    /// Move cursor right
    pub fn move_cursor_right(&mut self) {
        let (line, col) = self.cursor();
        let next = self
            .buffer
            .line(line)
            .and_then(|l| l.text().get(col..))
            .and_then(|rest| rest.chars().next());

        if let Some(ch) = next {
            self.set_cursor_and_goal(line, col + ch.len_utf8());
        } else if line + 1 < self.buffer.line_count() {
            self.set_cursor_and_goal(line + 1, 0);
        }
    }

    /// Move cursor left
    pub fn move_cursor_left(&mut self) {
        let (line, col) = self.cursor();

        if col > 0 {
            let prev = self
                .buffer
                .line(line)
                .and_then(|l| l.text().get(..col))
                .and_then(|before| before.chars().last());
            if let Some(ch) = prev {
                self.set_cursor_and_goal(line, col - ch.len_utf8());
            }
        } else if line > 0 {
            let prev_len = self.buffer.line(line - 1).map(|l| l.len()).unwrap_or(0);
            self.set_cursor_and_goal(line - 1, prev_len);
        }
    }

    /// Move cursor down
    pub fn move_cursor_down(&mut self) {
        let line = self.window.cursor_line();
        if line + 1 < self.buffer.line_count() {
            self.move_to_line_keeping_goal(line + 1);
        }
    }

    /// Move cursor up
    pub fn move_cursor_up(&mut self) {
        let line = self.window.cursor_line();
        if line > 0 {
            self.move_to_line_keeping_goal(line - 1);
        }
    }

    fn move_to_line_keeping_goal(&mut self, line: usize) {
        let col = self.col_to_byte_in_line(line, self.window.goal_col());
        self.window.set_cursor(line, col);
        self.window.ensure_cursor_visible();
    }

    /// Move to beginning of line
    pub fn move_to_bol(&mut self) {
        let line = self.window.cursor_line();
        self.set_cursor_and_goal(line, 0);
    }

    /// Move to end of line
    pub fn move_to_eol(&mut self) {
        let line = self.window.cursor_line();
        let len = self.buffer.line(line).map(|l| l.len()).unwrap_or(0);
        self.set_cursor_and_goal(line, len);
    }

    /// Page down
    pub fn page_down(&mut self) {
        let height = self.window.height() as usize;
        self.window
            .scroll_down(height.saturating_sub(2).max(1), self.buffer.line_count());
        let top = self.window.top_line();
        self.move_to_line_keeping_goal(top);
    }

    /// Page up
    pub fn page_up(&mut self) {
        let height = self.window.height() as usize;
        self.window.scroll_up(height.saturating_sub(2).max(1));
        let top = self.window.top_line();
        self.move_to_line_keeping_goal(top);
    }

    /// Move to beginning of buffer
    pub fn move_to_buffer_start(&mut self) {
        self.set_cursor_and_goal(0, 0);
    }

    /// Move to end of buffer
    pub fn move_to_buffer_end(&mut self) {
        let last_line = self.buffer.line_count().saturating_sub(1);
        let last_col = self.buffer.line(last_line).map(|l| l.len()).unwrap_or(0);
        self.set_cursor_and_goal(last_line, last_col);
    }

    /// Convert display column to byte offset in a line
    fn col_to_byte_in_line(&self, line_idx: usize, display_col: usize) -> usize {
        match self.buffer.line(line_idx) {
            Some(line) => line.col_to_byte(display_col).unwrap_or(line.len()),
            None => 0,
        }
    }

    /// Force a full redraw
    pub fn force_redraw(&mut self) {
        self.display.force_redraw();
    }

    /// Quit the editor
    pub fn quit(&mut self) {
        info!("quitting");
        self.running = false;
    }

    /// Start a minibuffer prompt
    pub fn start_prompt(&mut self, prompt: &str, action: PromptAction, default: Option<String>) {
        self.prompt = PromptState {
            active: true,
            prompt: prompt.to_string(),
            input: String::new(),
            action,
            default,
        };
        self.update_prompt_display();
    }

    /// Update the prompt display
    fn update_prompt_display(&mut self) {
        let text = if self.prompt.action.is_confirmation() {
            format!("{} (y or n) ", self.prompt.prompt)
        } else {
            match (&self.prompt.default, self.prompt.input.is_empty()) {
                (Some(def), true) => format!("{} (default {}): ", self.prompt.prompt, def),
                _ => format!("{}: {}", self.prompt.prompt, self.prompt.input),
            }
        };
        self.display.set_prompt(text);
    }

    fn cancel_prompt(&mut self) {
        self.prompt = PromptState::default();
        self.display.set_message("Quit");
    }

    /// Handle key press during prompt mode
    fn handle_prompt_key(&mut self, key: Key) -> Result<()> {
        if key == Key::ctrl('g') {
            self.cancel_prompt();
            return Ok(());
        }

        if self.prompt.action.is_confirmation() {
            match key.base_char() {
                Some('y') | Some('Y') if !key.is_ctrl() => {
                    let action = self.prompt.action;
                    self.prompt = PromptState::default();
                    self.display.clear_message();
                    return self.complete_prompt(action, String::new());
                }
                Some('n') | Some('N') if !key.is_ctrl() => self.cancel_prompt(),
                _ => self.terminal.beep()?,
            }
            return Ok(());
        }

        if key == Key::ctrl('m') {
            let input = if self.prompt.input.is_empty() {
                self.prompt.default.clone().unwrap_or_default()
            } else {
                self.prompt.input.clone()
            };
            let action = self.prompt.action;
            self.prompt = PromptState::default();
            self.display.clear_message();
            return self.complete_prompt(action, input);
        }

        if key == BACKSPACE || key == Key::ctrl('h') {
            self.prompt.input.pop();
            self.update_prompt_display();
            return Ok(());
        }

        if key.is_self_insert() {
            if let Some(ch) = key.base_char() {
                self.prompt.input.push(ch);
                self.update_prompt_display();
            }
            return Ok(());
        }

        self.terminal.beep()?;
        Ok(())
    }

    /// Complete a prompt action
    fn complete_prompt(&mut self, action: PromptAction, input: String) -> Result<()> {
        match action {
            PromptAction::OpenFile => {
                if input.is_empty() {
                    self.display.set_message("No file name");
                    return Ok(());
                }
                let path = PathBuf::from(&input);
                match self.open_file(&path) {
                    Ok(()) => self.display.set_message(format!("Opened {}", input)),
                    Err(e) => {
                        warn!("opening {} failed: {}", input, e);
                        self.display.set_message(format!("Cannot open {}: {}", input, e));
                        self.terminal.beep()?;
                    }
                }
            }
            PromptAction::WriteFile => {
                if input.is_empty() {
                    self.display.set_message("No file name");
                    return Ok(());
                }
                if self.write_buffer(Path::new(&input)) == CommandStatus::Failure {
                    self.terminal.beep()?;
                }
                self.display.force_redraw();
            }
            PromptAction::ConfirmQuit => self.quit(),
            PromptAction::ConfirmNew => self.new_document(),
            PromptAction::None => {}
        }
        Ok(())
    }
}
