//! Best-effort hints computed when a licensed user saves.
//!
//! Suggestions never change the todo list. They are reported next to the
//! written file so the user can act on them in the next rebase.

use crate::action::{Action, Command, CommandClass};

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("suggestion step failed: {0}")]
pub struct SuggestError(pub String);

/// A proposal to fold one commit into an earlier one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Index of the commit that should change command.
    pub index: usize,
    /// Index of the commit it belongs to.
    pub target: usize,
    pub command: Command,
    pub hash: String,
    pub target_hash: String,
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} looks like a {} of {}; move it after {} and mark it `{}`",
            self.hash, self.command, self.target_hash, self.target_hash, self.command
        )
    }
}

pub trait Suggester {
    fn suggest(&self, actions: &[Action]) -> Result<Vec<Suggestion>, SuggestError>;
}

/// Suggests `fixup`/`squash` for commits created with `git commit --fixup`,
/// `--squash` or `--fixup=amend:`, the way `rebase --autosquash` would.
#[derive(Debug, Clone, Copy, Default)]
pub struct Autosquash;

impl Suggester for Autosquash {
    fn suggest(&self, actions: &[Action]) -> Result<Vec<Suggestion>, SuggestError> {
        let mut found = Vec::new();

        for (index, action) in actions.iter().enumerate() {
            if action.command() != &Command::Pick {
                continue;
            }
            let Some((command, subject)) = strip_marker(action.message()) else {
                continue;
            };
            let Some(target) = find_target(&actions[..index], subject) else {
                continue;
            };

            found.push(Suggestion {
                index,
                target,
                command,
                hash: action.commit_hash().to_string(),
                target_hash: actions[target].commit_hash().to_string(),
            });
        }

        Ok(found)
    }
}

/// Splits `fixup! <subject>` style messages. Nested markers are peeled; the
/// outermost one decides the command.
fn strip_marker(message: &str) -> Option<(Command, &str)> {
    let (command, mut rest) = marker(message)?;
    while let Some((_, inner)) = marker(rest) {
        rest = inner;
    }
    Some((command, rest))
}

fn marker(message: &str) -> Option<(Command, &str)> {
    if let Some(rest) = message.strip_prefix("fixup! ") {
        return Some((Command::Fixup, rest));
    }
    if let Some(rest) = message.strip_prefix("amend! ") {
        return Some((Command::Fixup, rest));
    }
    if let Some(rest) = message.strip_prefix("squash! ") {
        return Some((Command::Squash, rest));
    }
    None
}

/// Exact subject match wins, then a subject prefix, then a hash prefix.
fn find_target(earlier: &[Action], subject: &str) -> Option<usize> {
    let subject = subject.trim();
    if subject.is_empty() {
        return None;
    }

    let commits = || {
        earlier
            .iter()
            .enumerate()
            .filter(|(_, a)| a.command().class() == CommandClass::CommitRef)
            .filter(|(_, a)| strip_marker(a.message()).is_none())
    };

    commits()
        .find(|(_, a)| a.message() == subject)
        .or_else(|| commits().find(|(_, a)| a.message().starts_with(subject)))
        .or_else(|| {
            commits().find(|(_, a)| !a.commit_hash().is_empty() && a.commit_hash().starts_with(subject))
        })
        .map(|(i, _)| i)
}
