use std::fmt;

/// A rebase todo command.
///
/// Known keywords are matched exactly and case-sensitively. Anything else is
/// kept as [`Command::Other`] so that commands introduced by newer versions of
/// Git survive an editing session untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Pick,
    Reword,
    Edit,
    Squash,
    Fixup,
    Drop,
    Merge,
    Exec,
    Label,
    Reset,
    UpdateRef,
    Break,
    Noop,
    /// A `#` line.
    Comment,
    /// An unrecognized command, or a whole unrecognized line when produced by the parser.
    Other(String),
}

/// Serialization class of a [`Command`].
///
/// Each class has a fixed line format:
///
/// | Class          | Line                          |
/// |----------------|-------------------------------|
/// | `CommitRef`    | `{command} {hash} {message}`  |
/// | `Argument`     | `{command} {message}`         |
/// | `Bare`         | `{command}`                   |
/// | `Comment`      | `#{message}`                  |
/// | `Unrecognized` | the raw line                  |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandClass {
    CommitRef,
    Argument,
    Bare,
    Comment,
    Unrecognized,
}

impl Command {
    /// Maps a keyword to its command. Unknown keywords become [`Command::Other`].
    ///
    /// # Examples
    ///
    /// ```
    /// use git_pal::action::Command;
    ///
    /// assert_eq!(Command::parse("fixup"), Command::Fixup);
    /// assert_eq!(Command::parse("Fixup"), Command::Other("Fixup".to_string()));
    /// ```
    pub fn parse(keyword: &str) -> Command {
        match keyword {
            "pick" => Command::Pick,
            "reword" => Command::Reword,
            "edit" => Command::Edit,
            "squash" => Command::Squash,
            "fixup" => Command::Fixup,
            "drop" => Command::Drop,
            "merge" => Command::Merge,
            "exec" => Command::Exec,
            "label" => Command::Label,
            "reset" => Command::Reset,
            "update-ref" => Command::UpdateRef,
            "break" => Command::Break,
            "noop" => Command::Noop,
            "#" => Command::Comment,
            other => Command::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Command::Pick => "pick",
            Command::Reword => "reword",
            Command::Edit => "edit",
            Command::Squash => "squash",
            Command::Fixup => "fixup",
            Command::Drop => "drop",
            Command::Merge => "merge",
            Command::Exec => "exec",
            Command::Label => "label",
            Command::Reset => "reset",
            Command::UpdateRef => "update-ref",
            Command::Break => "break",
            Command::Noop => "noop",
            Command::Comment => "#",
            Command::Other(raw) => raw,
        }
    }

    pub fn class(&self) -> CommandClass {
        match self {
            Command::Pick
            | Command::Reword
            | Command::Edit
            | Command::Squash
            | Command::Fixup
            | Command::Drop
            | Command::Merge => CommandClass::CommitRef,
            Command::Exec | Command::Label | Command::Reset | Command::UpdateRef => {
                CommandClass::Argument
            }
            Command::Break | Command::Noop => CommandClass::Bare,
            Command::Comment => CommandClass::Comment,
            Command::Other(_) => CommandClass::Unrecognized,
        }
    }

    /// Returns `true` for every command in Git's rebase vocabulary.
    pub fn is_known(&self) -> bool {
        !matches!(self, Command::Other(_))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a rebase todo list.
///
/// An action is immutable once built. The Edit Dialog replaces an action as a
/// whole through [`Action::with_command`]; nothing mutates it in place.
///
/// The canonical text line is derived on demand through [`fmt::Display`]:
///
/// ```
/// use git_pal::action::{Action, Command};
///
/// let action = Action::commit(Command::Pick, "a1b2c3d", "commit 1");
/// assert_eq!(action.to_string(), "pick a1b2c3d commit 1");
/// assert_eq!(Action::comment(" note").to_string(), "# note");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    command: Command,
    commit_hash: String,
    message: String,
}

impl Action {
    pub fn new(
        command: Command,
        commit_hash: impl Into<String>,
        message: impl Into<String>,
    ) -> Action {
        Action {
            command,
            commit_hash: commit_hash.into(),
            message: message.into(),
        }
    }

    /// A commit-referencing action (`pick`, `reword`, ..., `merge`).
    pub fn commit(command: Command, hash: impl Into<String>, message: impl Into<String>) -> Action {
        Action::new(command, hash, message)
    }

    /// An argument-only action (`exec`, `label`, `reset`, `update-ref`).
    pub fn argument(command: Command, message: impl Into<String>) -> Action {
        Action::new(command, "", message)
    }

    /// A bare action (`break`, `noop`).
    pub fn bare(command: Command) -> Action {
        Action::new(command, "", "")
    }

    /// A comment line. `body` is everything after the `#`, leading space included.
    pub fn comment(body: impl Into<String>) -> Action {
        Action::new(Command::Comment, "", body)
    }

    /// A line that matched no known grammar, kept verbatim.
    pub fn unrecognized(raw: impl Into<String>) -> Action {
        Action::new(Command::Other(raw.into()), "", "")
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn commit_hash(&self) -> &str {
        &self.commit_hash
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_comment(&self) -> bool {
        self.command == Command::Comment
    }

    /// Builds a new action with `command` and this action's hash and message.
    pub fn with_command(&self, command: Command) -> Action {
        Action::new(command, self.commit_hash.clone(), self.message.clone())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.command.class() {
            CommandClass::CommitRef => {
                let line = format!("{} {} {}", self.command, self.commit_hash, self.message);
                f.write_str(line.trim_end())
            }
            CommandClass::Argument => {
                let line = format!("{} {}", self.command, self.message);
                f.write_str(line.trim_end())
            }
            CommandClass::Bare => f.write_str(self.command.as_str()),
            CommandClass::Comment => write!(f, "#{}", self.message),
            CommandClass::Unrecognized => {
                if self.commit_hash.is_empty() && self.message.is_empty() {
                    return f.write_str(self.command.as_str());
                }
                // Only reachable after an edit gave a known row an unknown command.
                let parts = [
                    self.command.as_str(),
                    self.commit_hash.as_str(),
                    self.message.as_str(),
                ];
                let line = parts
                    .iter()
                    .filter(|p| !p.is_empty())
                    .copied()
                    .collect::<Vec<&str>>()
                    .join(" ");
                f.write_str(line.trim_end())
            }
        }
    }
}
