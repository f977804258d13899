use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};

/// Abstraction over a string input prompt.
///
/// Implementors define how string input is collected from the user,
/// including any styling or interactivity. This trait enables testability
/// by decoupling user input from the logic that consumes it.
pub trait StringPrompter {
    /// Prompt the user for a string input.
    ///
    /// # Parameters
    /// - `prompt`: The message shown to the user.
    /// - `initial`: Text the input field starts with; the user edits it in place.
    ///
    /// # Returns
    /// `Ok(Some(String))` with the entered text, `Ok(None)` if the user left the
    /// field empty, or an `Err(String)` describing the failure.
    fn prompt(&mut self, prompt: &str, initial: &str) -> Result<Option<String>, String>;
}

/// Abstraction over a boolean (yes/no) confirmation prompt.
///
/// This trait allows interactive confirmation to be injected or mocked,
/// promoting testability in CLI workflows.
pub trait ConfirmPrompter {
    /// Prompt the user for a yes/no confirmation.
    ///
    /// # Parameters
    /// - `prompt`: The confirmation message.
    /// - `default`: The default answer if the user presses Enter.
    ///
    /// # Returns
    /// `Ok(true)` if confirmed, `Ok(false)` if declined or escaped, or `Err(String)` on input failure.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, String>;
}

/// Abstraction over a pick-one-item list.
pub trait SelectPrompter {
    /// Let the user pick one of `items`, starting on `default`.
    ///
    /// # Returns
    /// `Ok(Some(index))` for the chosen item, `Ok(None)` if the user escaped the
    /// list, or `Err(String)` on input failure.
    fn select(&mut self, prompt: &str, items: &[String], default: usize)
    -> Result<Option<usize>, String>;
}

/// Everything the session driver needs from a terminal.
pub trait Prompter: StringPrompter + ConfirmPrompter + SelectPrompter {}

impl<T: StringPrompter + ConfirmPrompter + SelectPrompter> Prompter for T {}

/// Default implementation of all prompt traits using `dialoguer`.
///
/// Uses the `ColorfulTheme` for user-friendly styling.
#[derive(Default)]
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl StringPrompter for DialoguerPrompter {
    fn prompt(&mut self, prompt: &str, initial: &str) -> Result<Option<String>, String> {
        let input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .with_initial_text(initial)
            .allow_empty(true);
        match input.interact_text() {
            Ok(v) if v.trim().is_empty() => Ok(None),
            Ok(v) => Ok(Some(v)),
            Err(e) => Err(e.to_string()),
        }
    }
}

impl ConfirmPrompter for DialoguerPrompter {
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, String> {
        let confirm = Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default);
        match confirm.interact_opt() {
            Ok(v) => Ok(v.unwrap_or(false)),
            Err(e) => Err(e.to_string()),
        }
    }
}

impl SelectPrompter for DialoguerPrompter {
    fn select(
        &mut self,
        prompt: &str,
        items: &[String],
        default: usize,
    ) -> Result<Option<usize>, String> {
        let select = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(default);
        match select.interact_opt() {
            Ok(v) => Ok(v),
            Err(e) => Err(e.to_string()),
        }
    }
}

/// Ask the user for a new rebase command, starting from the current one.
///
/// The prompt shows the commit the command applies to, e.g.
/// `"Command for a1b2c3d commit 1 (clear to cancel)"`.
///
/// # Returns
/// - `Ok(Some(String))` with the new command text.
/// - `Ok(None)` if the user cleared the field.
/// - `Err(String)` if input failed.
pub fn ask_command<P: StringPrompter>(
    prompter: &mut P,
    context: &str,
    current: &str,
) -> Result<Option<String>, String> {
    let prompt = if context.is_empty() {
        String::from("Command (clear to cancel)")
    } else {
        format!("Command for {} (clear to cancel)", context)
    };
    prompter.prompt(&prompt, current)
}

/// Ask the user to confirm a destructive choice. Defaults to "no".
pub fn confirm_abort<P: ConfirmPrompter>(prompter: &mut P, question: &str) -> Result<bool, String> {
    prompter.confirm(question, false)
}
