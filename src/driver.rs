//! Runs a [`Session`] against a terminal.
//!
//! Each turn renders the top layer through a [`Prompter`], turns the answer
//! into one [`Input`], and hands it to the session. The session never waits
//! on the terminal itself.

use crate::banner;
use crate::prompt::{self, Prompter};
use crate::screen::EditingScreen;
use crate::session::{Input, Layer, Session};

/// Label of the extra list entry that saves.
pub const SAVE_ITEM: &str = "» Save & exit";
/// Label of the extra list entry that quits.
pub const ABORT_ITEM: &str = "» Abort";

/// Drives `session` until it is finished.
///
/// # Errors
///
/// Returns the prompter's error message if reading input fails. The session is
/// left as it was; callers treat this as an abort.
pub fn drive<P: Prompter>(session: &mut Session, prompter: &mut P) -> Result<(), String> {
    while !session.is_finished() {
        let input = match session.top() {
            Some(layer) => next_input(layer, prompter)?,
            None => break,
        };
        session.handle(input);
    }
    Ok(())
}

fn next_input<P: Prompter>(layer: &Layer, prompter: &mut P) -> Result<Input, String> {
    match layer {
        Layer::Editor(screen) => {
            let items = editor_items(screen);
            let rows = screen.row_count();
            let choice = prompter.select(&editor_prompt(screen), &items, screen.cursor())?;
            Ok(match choice {
                Some(i) if i < rows => Input::SelectRow(i),
                Some(i) if i == rows => Input::Save,
                _ => Input::Quit,
            })
        }
        Layer::EditAction(dialog) => {
            let action = dialog.action();
            let context = [action.commit_hash(), action.message()]
                .iter()
                .filter(|s| !s.is_empty())
                .copied()
                .collect::<Vec<&str>>()
                .join(" ");
            match prompt::ask_command(prompter, &context, dialog.initial_command())? {
                Some(text) => Ok(Input::Submit(text)),
                None => Ok(Input::Cancel),
            }
        }
        Layer::ConfirmAbort(dialog) => {
            let yes = prompt::confirm_abort(prompter, dialog.prompt())?;
            Ok(Input::Answer(yes))
        }
        Layer::LicenseFailure(dialog) => {
            banner::print_failure(dialog.title(), dialog.reason());
            Ok(Input::Dismiss)
        }
    }
}

fn editor_prompt(screen: &EditingScreen) -> String {
    match screen.status() {
        Some(status) => format!("{}\n  {}", screen.title(), status),
        None => screen.title(),
    }
}

/// One line per row, then the save and abort entries.
pub fn editor_items(screen: &EditingScreen) -> Vec<String> {
    screen
        .rows()
        .map(|row| banner::row_line(row.action))
        .chain([SAVE_ITEM.to_string(), ABORT_ITEM.to_string()])
        .collect()
}
