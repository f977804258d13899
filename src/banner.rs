use crate::action::{Action, CommandClass};

use console::{measure_text_width, style};

/// Prints a red, boxed notice to standard error.
///
/// The box is sized to the widest **visible** line of text, using
/// [`console::measure_text_width`] to ignore ANSI color codes when calculating
/// padding. Borders are styled independently from the inner text so embedded
/// color codes in the content do not bleed into the frame.
///
/// # Parameters
///
/// * `title` – Bold heading shown on the first line.
/// * `reason` – Body text; may span several lines.
///
/// # Examples
///
/// ```no_run
/// use git_pal::banner::print_failure;
///
/// print_failure("License Verification Failed", "License has expired.");
/// ```
pub fn print_failure(title: &str, reason: &str) {
    for line in boxed(&failure_lines(title, reason)) {
        eprintln!("{line}");
    }
}

/// Lines of the failure notice: title, blank line, reason, blank line, hint.
fn failure_lines(title: &str, reason: &str) -> Vec<String> {
    let mut lines = vec![style(title).red().bold().to_string(), String::new()];
    lines.extend(reason.lines().map(str::to_string));
    lines.push(String::new());
    lines.push(
        style("Fix your git-pal configuration and run the rebase again.")
            .yellow()
            .to_string(),
    );
    lines
}

/// Frames `lines` with box-drawing characters.
fn boxed(lines: &[String]) -> Vec<String> {
    let max_width = lines
        .iter()
        .map(|l| measure_text_width(l)) // ignore ANSI in content
        .max()
        .unwrap_or(0)
        + 2;

    let border = "═".repeat(max_width);
    let left = style("║ ").red().bold().to_string();
    let right = style("║").red().bold().to_string();

    let mut out = Vec::with_capacity(lines.len() + 2);
    out.push(style(format!("╔{}╗", border)).red().bold().to_string());
    for line in lines {
        let visible = measure_text_width(line);
        let pad = max_width - visible; // includes the one space after left border
        out.push(format!("{}{}{}{}", left, line, " ".repeat(pad - 1), right));
    }
    out.push(style(format!("╚{}╝", border)).red().bold().to_string());
    out
}

/// Formats one table row as `command  hash  message` in fixed columns.
///
/// Unrecognized lines are shown whole, dimmed, since they have no columns.
pub fn row_line(action: &Action) -> String {
    match action.command().class() {
        CommandClass::Unrecognized if action.commit_hash().is_empty() => {
            format!("{}", style(action.to_string()).dim())
        }
        _ => format!(
            "{:<10} {:<9} {}",
            action.command().as_str(),
            action.commit_hash(),
            action.message()
        )
        .trim_end()
        .to_string(),
    }
}
