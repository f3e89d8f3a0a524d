//! Editing commands - text modification operations

use hdevedit::error::Result;

use super::CommandStatus;
use crate::editor::EditorState;

/// Split the line at the cursor (Enter)
pub fn newline(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.insert_newline();
    Ok(CommandStatus::Success)
}

/// Indent to the next tab stop with spaces (Tab)
pub fn insert_tab(editor: &mut EditorState) -> Result<CommandStatus> {
    editor.insert_tab();
    Ok(CommandStatus::Success)
}

/// Delete character at cursor (forward)
pub fn delete_char_forward(editor: &mut EditorState) -> Result<CommandStatus> {
    if editor.delete_forward() {
        Ok(CommandStatus::Success)
    } else {
        // End of buffer
        Ok(CommandStatus::Failure)
    }
}

/// Delete character before cursor (backward)
pub fn delete_char_backward(editor: &mut EditorState) -> Result<CommandStatus> {
    if editor.delete_backward() {
        Ok(CommandStatus::Success)
    } else {
        Ok(CommandStatus::Failure)
    }
}

/// Kill to end of line (C-k)
pub fn kill_line(editor: &mut EditorState) -> Result<CommandStatus> {
    if editor.kill_line() {
        Ok(CommandStatus::Success)
    } else {
        Ok(CommandStatus::Failure)
    }
}
