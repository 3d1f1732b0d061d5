//! Command line editing and execution (`:w`, `:q`, `:wq`, `:<line>`).
//!
//! The same line editor serves the `:` prompt and both search prompts; on
//! submit the prompt mode decides whether the text is parsed as a command or
//! used as a search pattern. Submitting or cancelling always returns to
//! `COMMAND`.

use std::path::PathBuf;

use super::DispatchResult;
use super::command_parser::{CommandParser, ParsedCommand};
use super::search;
use crate::Action;
use core_state::{EditorMode, EditorState};
use core_text::DocumentError;

pub(crate) fn handle_command_action(action: Action, state: &mut EditorState) -> DispatchResult {
    match action {
        Action::CommandStart(mode) => {
            state.command_line.clear();
            state.set_mode(mode);
            DispatchResult::dirty()
        }
        Action::CommandText(text) => {
            state.command_line.push_str(&text);
            DispatchResult::dirty()
        }
        Action::CommandBackspace => {
            if !state.command_line.backspace() {
                state.set_mode(EditorMode::Command);
            }
            DispatchResult::dirty()
        }
        Action::CommandCancel => {
            state.command_line.clear();
            state.set_mode(EditorMode::Command);
            DispatchResult::dirty()
        }
        Action::CommandSubmit => {
            let text = state.command_line.take();
            let mode = state.mode();
            state.set_mode(EditorMode::Command);
            match mode {
                EditorMode::SearchForward => search::submit(text, true, state),
                EditorMode::SearchBackward => search::submit(text, false, state),
                _ => execute_command(&text, state),
            }
        }
        other => {
            tracing::warn!(target: "actions.command", action = ?other, "not_a_command_line_action");
            DispatchResult::clean()
        }
    }
}

fn execute_command(raw: &str, state: &mut EditorState) -> DispatchResult {
    let parsed = CommandParser::parse(raw);
    tracing::debug!(target: "actions.command", ?parsed, "execute");
    match parsed {
        ParsedCommand::Quit => DispatchResult::quit(),
        ParsedCommand::Write(path) => {
            write(path, state);
            DispatchResult::dirty()
        }
        ParsedCommand::WriteQuit => {
            if write(None, state) {
                DispatchResult::quit()
            } else {
                DispatchResult::dirty()
            }
        }
        ParsedCommand::Goto(line) => {
            let cursor = state.buffer.cursor_mut();
            let last = cursor.with_document(|d| d.num_lines()).unwrap_or(1);
            cursor.to_line(line.clamp(1, last));
            DispatchResult::dirty()
        }
        ParsedCommand::Empty => DispatchResult::dirty(),
        ParsedCommand::Unknown(body) => {
            state.set_status(format!("not an editor command: {body}"));
            DispatchResult::dirty()
        }
    }
}

/// Save the document, to `path` when given. Reports the outcome in the
/// status line. Returns true on success.
fn write(path: Option<PathBuf>, state: &mut EditorState) -> bool {
    let saved = state.buffer.cursor().with_document_mut(|doc| {
        match path {
            Some(path) => doc.save_as(path)?,
            None => doc.save()?,
        }
        Ok((
            doc.filename().map(|p| p.display().to_string()),
            doc.num_lines(),
        ))
    });
    match saved {
        Ok((name, lines)) => {
            let name = name.unwrap_or_default();
            tracing::info!(target: "actions.command", file = %name, lines, "written");
            state.set_status(format!("\"{name}\" {lines}L written"));
            true
        }
        Err(DocumentError::MissingDestination) => {
            tracing::warn!(target: "actions.command", "write_without_filename");
            state.set_status("no file name");
            false
        }
        Err(err) => {
            tracing::warn!(target: "actions.command", error = %err, "write_failed");
            state.set_status(format!("write failed: {err}"));
            false
        }
    }
}
