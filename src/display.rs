//! Display rendering

use unicode_width::UnicodeWidthChar;

use hdevedit::error::Result;
use hdevedit::syntax::{Span, Style, SyntaxManager};

use crate::buffer::Buffer;
use crate::terminal::Terminal;
use crate::window::Window;

/// Display state
pub struct Display {
    /// Whether a full redraw is needed
    needs_redraw: bool,
    /// Message to show in minibuffer (bottom line)
    message: Option<String>,
    /// Whether the message is a prompt waiting for input
    prompting: bool,
    /// Whether to show line numbers
    pub show_line_numbers: bool,
}

impl Display {
    pub fn new() -> Self {
        Self {
            needs_redraw: true,
            message: None,
            prompting: false,
            show_line_numbers: false,
        }
    }

    /// Toggle line numbers on/off
    pub fn toggle_line_numbers(&mut self) {
        self.show_line_numbers = !self.show_line_numbers;
        self.needs_redraw = true;
    }

    /// Calculate width needed for line numbers (including separator)
    fn line_number_width(&self, line_count: usize) -> usize {
        if !self.show_line_numbers {
            return 0;
        }
        let digits = line_count.max(1).to_string().len();
        digits.max(3) + 1 // minimum 3 digits + space
    }

    /// Mark that a full redraw is needed
    pub fn force_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Set a message to display
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.prompting = false;
    }

    /// Show a prompt; the cursor moves to the minibuffer
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.message = Some(prompt.into());
        self.prompting = true;
    }

    /// Clear the message
    pub fn clear_message(&mut self) {
        self.message = None;
        self.prompting = false;
    }

    /// Render the editor display
    pub fn render(
        &mut self,
        terminal: &mut Terminal,
        window: &Window,
        buffer: &Buffer,
        syntax: &mut SyntaxManager,
    ) -> Result<()> {
        let cols = terminal.cols() as usize;
        let rows = terminal.rows();

        terminal.set_cursor_visible(false)?;
        if self.needs_redraw {
            terminal.clear_screen()?;
        }

        self.render_text(terminal, window, buffer, syntax, cols)?;
        self.render_mode_line(terminal, buffer, window, syntax.enabled, window.height(), cols)?;
        self.render_minibuffer(terminal, rows.saturating_sub(1), cols)?;

        if self.prompting {
            let col = self.message.as_deref().map(display_width).unwrap_or(0);
            let col = col.min(cols.saturating_sub(1)) as u16;
            terminal.move_cursor(rows.saturating_sub(1), col)?;
        } else {
            self.position_cursor(terminal, window, buffer)?;
        }

        terminal.set_cursor_visible(true)?;
        terminal.flush()?;

        self.needs_redraw = false;
        Ok(())
    }

    /// Render the visible lines of the buffer
    fn render_text(
        &self,
        terminal: &mut Terminal,
        window: &Window,
        buffer: &Buffer,
        syntax: &mut SyntaxManager,
        cols: usize,
    ) -> Result<()> {
        let lnum_width = self.line_number_width(buffer.line_count());
        let text_cols = cols.saturating_sub(lnum_width);

        for row in 0..window.height() {
            let line_idx = window.top_line() + row as usize;
            terminal.move_cursor(row, 0)?;

            if let Some(line) = buffer.line(line_idx) {
                if self.show_line_numbers {
                    let lnum_str = format!("{:>width$} ", line_idx + 1, width = lnum_width - 1);
                    terminal.set_dim(true)?;
                    terminal.write_str(&lnum_str)?;
                    terminal.set_dim(false)?;
                }

                let text = line.text();
                let spans = syntax.highlight_line(line_idx, text);
                self.render_line(terminal, text, &spans, text_cols)?;
            } else {
                // Past the end of the buffer
                if self.show_line_numbers {
                    terminal.write_str(&" ".repeat(lnum_width))?;
                }
                terminal.set_dim(true)?;
                terminal.write_char('~')?;
                terminal.set_dim(false)?;
            }

            terminal.clear_to_eol()?;
        }
        Ok(())
    }

    /// Render one line, styling the highlighted ranges
    fn render_line(
        &self,
        terminal: &mut Terminal,
        text: &str,
        spans: &[Span],
        max_cols: usize,
    ) -> Result<()> {
        let mut remaining = max_cols;
        for (style, run) in styled_runs(text, spans) {
            if remaining == 0 {
                break;
            }
            let shown = truncate_to_width(run, remaining);
            remaining -= display_width(&shown);

            match style {
                Some(style) => {
                    terminal.apply_style(&style)?;
                    terminal.write_str(&shown)?;
                    terminal.reset_attributes()?;
                }
                None => terminal.write_str(&shown)?,
            }
        }
        Ok(())
    }

    /// Render the mode line below the text
    fn render_mode_line(
        &self,
        terminal: &mut Terminal,
        buffer: &Buffer,
        window: &Window,
        highlighting: bool,
        row: u16,
        cols: usize,
    ) -> Result<()> {
        terminal.move_cursor(row, 0)?;
        terminal.apply_style(&Style::reverse())?;

        let mode_line = mode_line_text(buffer, window.cursor_line(), highlighting);
        let padded = if display_width(&mode_line) < cols {
            let fill = cols - display_width(&mode_line);
            format!("{}{}", mode_line, "-".repeat(fill))
        } else {
            truncate_to_width(&mode_line, cols)
        };

        terminal.write_str(&padded)?;
        terminal.reset_attributes()?;
        Ok(())
    }

    /// Render the minibuffer (message area)
    fn render_minibuffer(&self, terminal: &mut Terminal, row: u16, cols: usize) -> Result<()> {
        terminal.move_cursor(row, 0)?;

        if let Some(ref msg) = self.message {
            let truncated = truncate_to_width(msg, cols);
            terminal.write_str(&truncated)?;
        }

        terminal.clear_to_eol()?;
        Ok(())
    }

    /// Position the hardware cursor at the correct location
    fn position_cursor(&self, terminal: &mut Terminal, window: &Window, buffer: &Buffer) -> Result<()> {
        let cursor_line = window.cursor_line();
        let display_col = buffer
            .line(cursor_line)
            .map(|line| line.byte_to_col(window.cursor_col()))
            .unwrap_or(0);

        let lnum_width = self.line_number_width(buffer.line_count());
        let screen_row = cursor_line.saturating_sub(window.top_line()) as u16;
        let max_col = (terminal.cols() as usize).saturating_sub(1);
        let screen_col = (lnum_width + display_col).min(max_col) as u16;

        terminal.move_cursor(screen_row, screen_col)?;
        Ok(())
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

/// Mode line: modified flag, buffer name, path, line and position
fn mode_line_text(buffer: &Buffer, cursor_line: usize, highlighting: bool) -> String {
    let modified = if buffer.is_modified() { "**" } else { "--" };
    let filename = buffer
        .filename()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "no file".to_string());

    let line_count = buffer.line_count();
    let line = cursor_line + 1;
    let percent = if line_count <= 1 {
        "All".to_string()
    } else if line == 1 {
        "Top".to_string()
    } else if line >= line_count {
        "Bot".to_string()
    } else {
        format!("{}%", line * 100 / line_count)
    };

    format!(
        "{}- hdevedit: {} ({}) L{} {} {} ",
        modified,
        buffer.name(),
        filename,
        line,
        percent,
        if highlighting { "[HDev]" } else { "[Text]" }
    )
}

/// Split a line into runs of equal style
///
/// Later spans override earlier ones where they overlap. Spans that do not
/// fall on character boundaries are ignored.
fn styled_runs<'a>(text: &'a str, spans: &[Span]) -> Vec<(Option<Style>, &'a str)> {
    let mut styles: Vec<Option<Style>> = vec![None; text.len()];
    for span in spans {
        if span.slice(text).is_none() {
            continue;
        }
        let style = span.style();
        for slot in &mut styles[span.start..span.end()] {
            *slot = Some(style);
        }
    }

    let mut runs = Vec::new();
    let mut run_start = 0;
    for (idx, _) in text.char_indices().skip(1) {
        if styles[idx] != styles[run_start] {
            runs.push((styles[run_start], &text[run_start..idx]));
            run_start = idx;
        }
    }
    if run_start < text.len() {
        runs.push((styles[run_start], &text[run_start..]));
    }
    runs
}

/// Display width of a string, control characters counting as one column
fn display_width(s: &str) -> usize {
    s.chars().map(|ch| ch.width().unwrap_or(1)).sum()
}

/// Truncate a string to fit within a display width
fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut width = 0;

    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(1);
        if width + ch_width > max_width {
            break;
        }
        // Control characters would move the terminal cursor
        result.push(if ch.is_control() { ' ' } else { ch });
        width += ch_width;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdevedit::document::Document;
    use hdevedit::syntax::{Highlighter, TokenType};

    #[test]
    fn test_styled_runs_follow_spans() {
        let text = r#"write_image(Image, "png")"#;
        let spans = Highlighter::default().classify(text);
        let runs = styled_runs(text, &spans);

        let keyword = TokenType::Keyword.default_style();
        let string = TokenType::String.default_style();
        assert_eq!(
            runs,
            vec![
                (Some(keyword), "write_image"),
                (None, "(Image, "),
                (Some(string), "\"png\""),
                (None, ")"),
            ]
        );
    }

    #[test]
    fn test_styled_runs_later_span_wins() {
        let text = "abcdef";
        let spans = [
            Span::new(0, 6, TokenType::String),
            Span::new(2, 2, TokenType::Keyword),
        ];
        let runs = styled_runs(text, &spans);
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[1], (Some(TokenType::Keyword.default_style()), "cd"));
        assert_eq!(runs[2].1, "ef");
    }

    #[test]
    fn test_styled_runs_without_spans() {
        assert!(styled_runs("", &[]).is_empty());
        assert_eq!(styled_runs("* 画像", &[]), vec![(None, "* 画像")]);
        // Out of range spans are skipped
        let spans = [Span::new(3, 10, TokenType::Comment)];
        assert_eq!(styled_runs("abc", &spans), vec![(None, "abc")]);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("hello", 3), "hel");
        assert_eq!(truncate_to_width("画像", 3), "画");
        assert_eq!(truncate_to_width("a\tb", 10), "a b");
    }

    #[test]
    fn test_mode_line_text() {
        let mut buffer = Buffer::from_document("a.hdev", Document::from_lines(["x", "y", "z"]));
        assert_eq!(
            mode_line_text(&buffer, 0, true),
            "--- hdevedit: a.hdev (no file) L1 Top [HDev] "
        );
        buffer.set_modified(true);
        assert!(mode_line_text(&buffer, 2, false).starts_with("**- hdevedit: a.hdev"));
        assert!(mode_line_text(&buffer, 2, false).contains("L3 Bot [Text]"));
    }
}
