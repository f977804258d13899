//! The Editing Screen: the table of todo rows the user works on.

use crate::action::Action;
use crate::dialog::EditResult;
use crate::license::{Features, PRO};
use crate::session::Input;
use crate::suggest::{Suggester, Suggestion};

/// What the screen asks the session to do after an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenRequest {
    Stay,
    /// Open the Edit Dialog on this copy of a row.
    OpenEdit(Action),
    /// Open the quit confirmation.
    ConfirmQuit,
    /// The session is over with this final list.
    Save(Vec<Action>),
    /// The user confirmed quitting.
    Abort,
}

/// A dialog result posted back to the screen that opened the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogResult {
    Edit(EditResult),
    Confirm(bool),
}

/// One visible table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row<'a> {
    /// Index into the working list. Stable across edits.
    pub index: usize,
    pub action: &'a Action,
}

pub struct EditingScreen {
    working: Vec<Action>,
    comments: Vec<Action>,
    features: Features,
    suggester: Box<dyn Suggester>,
    cursor: usize,
    /// Row whose Edit Dialog is open.
    pending_edit: Option<usize>,
    status: Option<String>,
    suggestions: Vec<Suggestion>,
}

impl EditingScreen {
    /// Opens the screen on a copy of `original`.
    ///
    /// Comment actions are kept aside and re-appended on save; every other
    /// action becomes an editable row.
    pub fn open(original: &[Action], features: Features, suggester: Box<dyn Suggester>) -> Self {
        let (comments, working): (Vec<Action>, Vec<Action>) =
            original.iter().cloned().partition(Action::is_comment);

        tracing::info!(
            rows = working.len(),
            comments = comments.len(),
            "editing screen opened"
        );

        EditingScreen {
            working,
            comments,
            features,
            suggester,
            cursor: 0,
            pending_edit: None,
            status: None,
            suggestions: Vec::new(),
        }
    }

    /// Header text, e.g. `git-pal Rebase Editor [PRO]`.
    pub fn title(&self) -> String {
        let tier = if self.features.contains(PRO) {
            "PRO"
        } else {
            "DEMO"
        };
        format!("git-pal Rebase Editor [{}]", tier)
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.working
            .iter()
            .enumerate()
            .map(|(index, action)| Row { index, action })
    }

    pub fn row_count(&self) -> usize {
        self.working.len()
    }

    pub fn working(&self) -> &[Action] {
        &self.working
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Suggestions computed by the last save, if any.
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn handle(&mut self, input: Input) -> ScreenRequest {
        match input {
            Input::Up => {
                self.move_cursor(-1);
                ScreenRequest::Stay
            }
            Input::Down => {
                self.move_cursor(1);
                ScreenRequest::Stay
            }
            Input::Select => self.open_edit(self.cursor),
            Input::SelectRow(index) => self.open_edit(index),
            Input::Save => ScreenRequest::Save(self.save()),
            Input::Quit => ScreenRequest::ConfirmQuit,
            _ => ScreenRequest::Stay,
        }
    }

    /// Consumes the result of a dialog this screen opened.
    pub fn on_result(&mut self, result: DialogResult) -> ScreenRequest {
        match result {
            DialogResult::Edit(edit) => {
                let index = self.pending_edit.take();
                if let (Some(index), EditResult::Edited(action)) = (index, edit) {
                    self.replace(index, action);
                }
                ScreenRequest::Stay
            }
            DialogResult::Confirm(true) => ScreenRequest::Abort,
            DialogResult::Confirm(false) => ScreenRequest::Stay,
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.working.len();
        if len == 0 {
            return;
        }
        self.cursor = (self.cursor as isize + delta).rem_euclid(len as isize) as usize;
    }

    fn open_edit(&mut self, index: usize) -> ScreenRequest {
        match self.working.get(index) {
            Some(action) => {
                self.cursor = index;
                self.pending_edit = Some(index);
                ScreenRequest::OpenEdit(action.clone())
            }
            None => ScreenRequest::Stay,
        }
    }

    fn replace(&mut self, index: usize, action: Action) {
        if action.command().is_known() {
            self.status = None;
        } else {
            tracing::warn!(
                index,
                command = %action.command(),
                "edited command is not a known rebase command"
            );
            self.status = Some(format!(
                "warning: `{}` is not a known rebase command; it will be written as typed",
                action.command()
            ));
        }
        self.working[index] = action;
    }

    /// Final list: working rows, then every original comment in order.
    ///
    /// With the `pro` feature the suggester runs first. Its failures are logged
    /// and dropped; they never stop the save.
    fn save(&mut self) -> Vec<Action> {
        if self.features.contains(PRO) {
            match self.suggester.suggest(&self.working) {
                Ok(found) => {
                    for s in &found {
                        tracing::info!(suggestion = %s, "autosquash suggestion");
                    }
                    self.suggestions = found;
                }
                Err(e) => {
                    tracing::debug!(error = %e, "suggestions skipped");
                    self.suggestions.clear();
                }
            }
        }

        self.working
            .iter()
            .chain(self.comments.iter())
            .cloned()
            .collect()
    }
}
