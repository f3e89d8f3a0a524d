//! File commands

use hdevedit::error::Result;

use super::CommandStatus;
use crate::editor::{EditorState, PromptAction};

/// Open a program file (C-o)
pub fn open_file(editor: &mut EditorState) -> Result<CommandStatus> {
    let default = editor
        .buffer
        .filename()
        .and_then(|p| p.parent())
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.display().to_string());
    editor.start_prompt("Open file", PromptAction::OpenFile, default);
    Ok(CommandStatus::Success)
}

/// Write buffer to a new file (Save As) (C-x C-w)
pub fn write_file(editor: &mut EditorState) -> Result<CommandStatus> {
    let default = editor.buffer.filename().map(|p| p.display().to_string());
    editor.start_prompt("Write file", PromptAction::WriteFile, default);
    Ok(CommandStatus::Success)
}

/// Save current buffer to its file, asking for one when untitled
pub fn save_buffer(editor: &mut EditorState) -> Result<CommandStatus> {
    let Some(path) = editor.buffer.filename().map(|p| p.to_path_buf()) else {
        return write_file(editor);
    };

    if !editor.buffer.is_modified() {
        editor.display.set_message("(No changes need to be saved)");
        return Ok(CommandStatus::Success);
    }

    Ok(editor.write_buffer(&path))
}

/// Start a new untitled program (C-x C-n)
pub fn new_file(editor: &mut EditorState) -> Result<CommandStatus> {
    if editor.buffer.is_modified() {
        let msg = format!("Buffer {} modified; discard changes?", editor.buffer.name());
        editor.start_prompt(&msg, PromptAction::ConfirmNew, None);
    } else {
        editor.new_document();
    }
    Ok(CommandStatus::Success)
}

/// Quit the editor
pub fn quit(editor: &mut EditorState) -> Result<CommandStatus> {
    if editor.buffer.is_modified() {
        let msg = format!("Buffer {} modified; really quit?", editor.buffer.name());
        editor.start_prompt(&msg, PromptAction::ConfirmQuit, None);
        return Ok(CommandStatus::Success);
    }

    editor.quit();
    Ok(CommandStatus::Success)
}
