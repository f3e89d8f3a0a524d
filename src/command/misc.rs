//! Display and control commands

use hdevedit::error::Result;

use super::CommandStatus;
use crate::editor::EditorState;

/// Redraw the screen (C-l)
pub fn redraw_display(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.window.ensure_cursor_visible();
    editor.force_redraw();
    Ok(CommandStatus::Success)
}

/// Toggle line numbers display (C-x n)
pub fn toggle_line_numbers(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.display.toggle_line_numbers();
    let status = if editor.display.show_line_numbers {
        "Line numbers enabled"
    } else {
        "Line numbers disabled"
    };
    editor.display.set_message(status);
    Ok(CommandStatus::Success)
}

/// Toggle syntax highlighting (C-x h)
pub fn toggle_syntax_highlighting(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.syntax.toggle();
    editor.force_redraw();
    let status = if editor.syntax.enabled {
        "Syntax highlighting enabled"
    } else {
        "Syntax highlighting disabled"
    };
    editor.display.set_message(status);
    Ok(CommandStatus::Success)
}

/// Abort current operation (C-g)
pub fn abort(_editor: &mut EditorState) -> Result<CommandStatus> {
    Ok(CommandStatus::Abort)
}
