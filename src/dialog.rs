//! Modal dialogs.
//!
//! Each dialog consumes inputs until it can produce its single result, then
//! the session pops it and posts the result to whoever opened it.

use crate::action::{Action, Command};
use crate::session::Input;

/// What the Edit Dialog hands back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditResult {
    Edited(Action),
    Unchanged,
}

/// Edits the command of one action.
///
/// The dialog owns its copy of the action, so dismissing it can never leak a
/// half-made edit into the screen. The hash and message are shown as context
/// and carried over unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDialog {
    action: Action,
}

impl EditDialog {
    pub fn new(action: Action) -> Self {
        EditDialog { action }
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    /// The text the command field starts with.
    pub fn initial_command(&self) -> &str {
        self.action.command().as_str()
    }

    /// Handles one input. Returns the result once the dialog is done.
    ///
    /// * `Submit(text)` with non-blank text yields [`EditResult::Edited`] with
    ///   the trimmed text as command. The text is not checked against Git's
    ///   vocabulary.
    /// * `Submit("")` and `Cancel` yield [`EditResult::Unchanged`].
    pub fn handle(&mut self, input: Input) -> Option<EditResult> {
        match input {
            Input::Submit(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Some(EditResult::Unchanged);
                }
                Some(EditResult::Edited(
                    self.action.with_command(Command::parse(text)),
                ))
            }
            Input::Cancel | Input::Quit => Some(EditResult::Unchanged),
            _ => None,
        }
    }
}

/// A yes/no question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog {
    prompt: String,
}

impl ConfirmDialog {
    pub fn new(prompt: impl Into<String>) -> Self {
        ConfirmDialog {
            prompt: prompt.into(),
        }
    }

    /// The quit confirmation shown by the Editing Screen.
    pub fn abort_rebase() -> Self {
        ConfirmDialog::new("Abort the rebase? (No changes will be saved)")
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn handle(&self, input: Input) -> Option<bool> {
        match input {
            Input::Answer(yes) => Some(yes),
            Input::Cancel => Some(false),
            _ => None,
        }
    }
}

/// Terminal notice shown when the license gate says no.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureDialog {
    title: String,
    reason: String,
}

impl FailureDialog {
    pub fn license(reason: impl Into<String>) -> Self {
        FailureDialog {
            title: "License Verification Failed".to_string(),
            reason: reason.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns `true` when the notice has been acknowledged.
    pub fn handle(&self, input: Input) -> bool {
        matches!(input, Input::Dismiss | Input::Quit | Input::Cancel)
    }
}
