use crate::action::{Action, Command};

use regex::Regex;
use std::{
    fmt,
    fs::{self, read_to_string},
    io::Write,
    path::{Path, PathBuf},
    sync::LazyLock,
};
use thiserror::Error;

static COMMIT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<command>pick|reword|edit|squash|fixup|drop|merge)\s+(?P<hash>[0-9a-f]+)(?:\s+(?P<message>.*))?$",
    )
    .unwrap()
});

static ARGUMENT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<command>exec|label|reset|update-ref)\s+(?P<message>.*)$").unwrap()
});

static BARE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<command>break|noop)$").unwrap());

static COMMENT_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#(?P<message>.*)$").unwrap());

/// Failure reading or writing a todo file.
#[derive(Debug, Error)]
pub enum TodoError {
    #[error("read failed for {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("write failed for {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A line that matched none of the todo grammars.
///
/// It is still part of the parsed list (as [`Command::Other`]); the warning only
/// tells the caller where it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// 1-based line number in the input.
    pub line_number: usize,
    pub line: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized line {}: {}", self.line_number, self.line)
    }
}

/// Result of parsing a todo file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTodo {
    pub actions: Vec<Action>,
    pub warnings: Vec<ParseWarning>,
}

/// Parses the text of a rebase todo file.
///
/// Blank lines are skipped. Every other line yields exactly one [`Action`], in
/// input order. Unknown lines never fail the parse: they are kept verbatim and
/// reported in [`ParsedTodo::warnings`].
///
/// # Examples
///
/// ```
/// use git_pal::todo::parse;
///
/// let parsed = parse("pick a1b2c3d commit 1\n# note\n\nfrobnicate\n");
/// assert_eq!(parsed.actions.len(), 3);
/// assert_eq!(parsed.warnings.len(), 1);
/// assert_eq!(parsed.warnings[0].line_number, 4);
/// ```
pub fn parse(text: &str) -> ParsedTodo {
    let mut parsed = ParsedTodo::default();

    for (idx, raw) in text.lines().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }

        match parse_line(raw) {
            Some(action) => parsed.actions.push(action),
            None => {
                let warning = ParseWarning {
                    line_number: idx + 1,
                    line: raw.to_string(),
                };
                tracing::warn!(line_number = warning.line_number, line = %warning.line, "unrecognized todo line kept verbatim");
                parsed.warnings.push(warning);
                parsed.actions.push(Action::unrecognized(raw));
            }
        }
    }

    parsed
}

/// Classifies one non-blank line. Returns `None` when no grammar matches.
fn parse_line(raw: &str) -> Option<Action> {
    let line = raw.trim_end();

    if let Some(caps) = COMMIT_LINE.captures(line) {
        return Some(Action::commit(
            Command::parse(&caps["command"]),
            &caps["hash"],
            caps.name("message").map_or("", |m| m.as_str()),
        ));
    }

    if let Some(caps) = ARGUMENT_LINE.captures(line) {
        return Some(Action::argument(
            Command::parse(&caps["command"]),
            &caps["message"],
        ));
    }

    if let Some(caps) = BARE_LINE.captures(line) {
        return Some(Action::bare(Command::parse(&caps["command"])));
    }

    if let Some(caps) = COMMENT_LINE.captures(line) {
        return Some(Action::comment(&caps["message"]));
    }

    None
}

/// Renders actions in todo-file form: one line per action, each ending in `\n`.
///
/// An empty list renders as an empty string.
pub fn serialize(actions: &[Action]) -> String {
    actions
        .iter()
        .map(|action| format!("{}\n", action))
        .collect()
}

/// Reads and parses the todo file at `path`.
///
/// # Errors
///
/// Returns [`TodoError::Read`] if the file cannot be read as UTF-8 text.
pub fn read_todo(path: &Path) -> Result<ParsedTodo, TodoError> {
    let body = read_to_string(path).map_err(|source| TodoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse(&body))
}

/// Serializes `actions` and replaces the file at `path` with the result.
///
/// The content is written to a temporary file in the same directory and then
/// renamed over `path`, so a failed write leaves the original file untouched.
/// The file keeps its permissions, and a symlinked `path` keeps pointing at
/// the rewritten file.
///
/// # Errors
///
/// Returns [`TodoError::Write`] if the temporary file cannot be created,
/// written, or moved into place.
pub fn write_todo(path: &Path, actions: &[Action]) -> Result<(), TodoError> {
    let write_err = |source: std::io::Error| TodoError::Write {
        path: path.to_path_buf(),
        source,
    };

    // Symlinks are written through, not replaced.
    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(serialize(actions).as_bytes())
        .map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    if let Ok(meta) = fs::metadata(&target) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(write_err)?;
    }
    tmp.persist(&target).map_err(|e| write_err(e.error))?;

    tracing::info!(path = %path.display(), count = actions.len(), "todo file written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse, read_todo, serialize, write_todo};
    use crate::action::{Action, Command};
    use std::io::Write;

    const FULL_TODO: &str = "\
pick a1b2c3d commit 1
# a comment
reword e4f5a6b commit 2
edit 7c8d9e0 commit 3
squash f1a2b3c commit 4
fixup d4e5f6a commit 5
exec my-script.sh
break
drop b7c8d9e commit 6
label my-label
reset my-label
";

    #[test]
    fn parses_every_line_class() {
        let parsed = parse(FULL_TODO);
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.actions.len(), 11);
        assert_eq!(
            parsed.actions[0],
            Action::commit(Command::Pick, "a1b2c3d", "commit 1")
        );
        assert_eq!(parsed.actions[1], Action::comment(" a comment"));
        assert_eq!(
            parsed.actions[6],
            Action::argument(Command::Exec, "my-script.sh")
        );
        assert_eq!(parsed.actions[7], Action::bare(Command::Break));
        assert_eq!(
            parsed.actions[10],
            Action::argument(Command::Reset, "my-label")
        );
    }

    #[test]
    fn serialize_then_parse_is_stable() {
        let first = parse(FULL_TODO);
        let text = serialize(&first.actions);
        assert_eq!(text, FULL_TODO);
        assert_eq!(parse(&text), first);
    }

    #[test]
    fn merge_is_parsed_as_commit_line() {
        let parsed = parse("pick a1b2c3d commit 1\nmerge def4567 Merge feature branch\n");
        assert_eq!(
            parsed.actions[1],
            Action::commit(Command::Merge, "def4567", "Merge feature branch")
        );
    }

    #[test]
    fn commit_line_without_message() {
        let parsed = parse("pick abc123\n");
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.actions[0], Action::commit(Command::Pick, "abc123", ""));
        assert_eq!(serialize(&parsed.actions), "pick abc123\n");
    }

    #[test]
    fn uppercase_hash_is_not_a_commit_line() {
        let parsed = parse("pick ABC123 shouting\n");
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(
            parsed.actions[0].command(),
            &Command::Other("pick ABC123 shouting".to_string())
        );
    }

    #[test]
    fn unrecognized_lines_survive_byte_for_byte() {
        let input = "pick a1b2c3d one\nmerge -C 1234abc topic # Merge 'topic'  \n  indented pick\n";
        let parsed = parse(input);
        assert_eq!(parsed.warnings.len(), 2);
        assert_eq!(parsed.warnings[0].line_number, 2);
        assert_eq!(parsed.warnings[1].line_number, 3);
        assert_eq!(serialize(&parsed.actions), input);
    }

    #[test]
    fn blank_lines_are_dropped() {
        let parsed = parse("\npick a1b2c3d one\n   \n\nbreak\n\n");
        assert_eq!(parsed.actions.len(), 2);
        assert_eq!(serialize(&parsed.actions), "pick a1b2c3d one\nbreak\n");
    }

    #[test]
    fn crlf_input_is_normalized() {
        let parsed = parse("pick a1b2c3d one\r\n# note\r\n");
        assert_eq!(
            serialize(&parsed.actions),
            "pick a1b2c3d one\n# note\n"
        );
    }

    #[test]
    fn trailing_whitespace_is_incidental() {
        let parsed = parse("exec make   \n");
        assert_eq!(parsed.actions[0], Action::argument(Command::Exec, "make"));
    }

    #[test]
    fn comment_message_keeps_leading_space() {
        let parsed = parse("# note\n#tight\n");
        assert_eq!(parsed.actions[0].message(), " note");
        assert_eq!(parsed.actions[1].message(), "tight");
    }

    #[test]
    fn bare_command_with_argument_is_unrecognized() {
        let parsed = parse("break now\n");
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(serialize(&parsed.actions), "break now\n");
    }

    #[test]
    fn empty_input_serializes_to_nothing() {
        let parsed = parse("");
        assert!(parsed.actions.is_empty());
        assert_eq!(serialize(&parsed.actions), "");
    }

    #[test]
    fn read_and_write_round_trip_on_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("failed to create temp file");
        write!(file, "{}", FULL_TODO).expect("failed to write todo");
        let path = file.path().to_path_buf();

        let parsed = read_todo(&path).expect("read_todo failed");
        write_todo(&path, &parsed.actions).expect("write_todo failed");

        let s = std::fs::read_to_string(&path).expect("failed to read file");
        assert_eq!(s, FULL_TODO);
    }

    #[test]
    fn read_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let result = read_todo(&dir.path().join("missing"));
        assert!(result.is_err());
    }

    #[test]
    fn write_into_missing_directory_leaves_nothing_behind() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("nope").join("git-rebase-todo");
        let result = write_todo(&path, &[Action::bare(Command::Noop)]);
        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn write_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("git-rebase-todo");
        std::fs::write(&path, "pick a1b2c3d one\n").expect("failed to write todo");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644))
            .expect("failed to chmod");

        write_todo(&path, &[Action::bare(Command::Noop)]).expect("write_todo failed");

        let mode = std::fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
        assert_eq!(
            std::fs::read_to_string(&path).expect("failed to read file"),
            "noop\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn write_goes_through_symlink() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let real = dir.path().join("real-todo");
        let link = dir.path().join("git-rebase-todo");
        std::fs::write(&real, "pick a1b2c3d one\n").expect("failed to write todo");
        std::os::unix::fs::symlink(&real, &link).expect("failed to symlink");

        write_todo(&link, &[Action::bare(Command::Break)]).expect("write_todo failed");

        let meta = std::fs::symlink_metadata(&link).expect("metadata");
        assert!(meta.file_type().is_symlink());
        assert_eq!(
            std::fs::read_to_string(&real).expect("failed to read file"),
            "break\n"
        );
    }
}
