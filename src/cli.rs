use crate::{
    config::CONFIG_ENV,
    context::Context,
    driver,
    error::{Error, Result},
    license::LicenseGate,
    logging,
    prompt::{DialoguerPrompter, Prompter},
    session::{AbortReason, Session, SessionResult},
    suggest::Suggestion,
    todo,
};

use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use console::style;
use std::path::PathBuf;

/// Days before expiry from which a successful run reminds the user to renew.
const EXPIRY_NOTICE_DAYS: i64 = 14;

/// Interactive editor for git rebase todo lists.
///
/// Use it as git's sequence editor:
/// `git config sequence.editor git-pal`
#[derive(Debug, Parser)]
#[command(name = "git-pal", version)]
pub struct Cli {
    /// Path to the rebase todo file provided by git
    pub todo_file: PathBuf,

    /// Path to config.toml (overrides GIT_PAL_CONFIG and the default location)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// How a run ended, when it ended without an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The edited list was written back.
    Written {
        path: PathBuf,
        actions: usize,
        suggestions: Vec<Suggestion>,
        license_expires: Option<DateTime<Utc>>,
    },
    /// Nothing was written.
    Aborted(AbortReason),
}

impl Outcome {
    /// `0` only when the todo file was written.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Written { .. } => 0,
            Outcome::Aborted(_) => 1,
        }
    }
}

/// Reads the todo file, runs one editing session, and writes the result back.
///
/// The todo file is rewritten only when the session ends in `Saved`. On abort,
/// on license failure, and on any error it is left untouched.
///
/// # Errors
///
/// * [`Error::MissingTodo`] if the todo file does not exist.
/// * [`Error::Todo`] if reading or writing the todo file fails.
/// * [`Error::Prompt`] if the terminal cannot be read.
pub fn run<P: Prompter>(ctx: &Context, gate: &dyn LicenseGate, prompter: &mut P) -> Result<Outcome> {
    if !ctx.todo_path.is_file() {
        return Err(Error::MissingTodo(ctx.todo_path.clone()));
    }

    let parsed = todo::read_todo(&ctx.todo_path)?;
    for warning in &parsed.warnings {
        eprintln!(
            "{}",
            style(format!("[git-pal] warning: {} (kept as is)", warning)).yellow()
        );
    }

    let mut session = Session::start(parsed.actions, gate);
    driver::drive(&mut session, prompter).map_err(Error::Prompt)?;

    let suggestions = session.suggestions().to_vec();
    let license_expires = session.license().map(|license| license.expires_at);
    match session.into_result() {
        Some(SessionResult::Saved(actions)) => {
            todo::write_todo(&ctx.todo_path, &actions)?;
            Ok(Outcome::Written {
                path: ctx.todo_path.clone(),
                actions: actions.len(),
                suggestions,
                license_expires,
            })
        }
        Some(SessionResult::Aborted(reason)) => {
            tracing::info!(reason = ?reason, "todo file left untouched");
            Ok(Outcome::Aborted(reason))
        }
        None => Err(Error::Prompt(String::from(
            "session ended without a result",
        ))),
    }
}

/// Main CLI entry point for `git-pal`.
///
/// This function:
/// 1. Parses arguments.
/// 2. Sets up file logging.
/// 3. Resolves the context (todo path, config location).
/// 4. Runs the editing session against the terminal.
/// 5. Reports the outcome on stderr.
///
/// # Exit Codes
///
/// * `0` – The edited list was written.
/// * `1` – License failure, user abort, or any error; the todo file is untouched.
pub fn entry() -> std::result::Result<i32, ()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init_tracing(&logging::log_dir()) {
        eprintln!(
            "{}",
            style(format!("[git-pal] warning: logging disabled ({})", e)).yellow()
        );
    }

    let ctx = Context::new(cli.todo_file, cli.config, std::env::var_os(CONFIG_ENV));
    let gate = ctx.license_gate();
    let mut prompter = DialoguerPrompter::default();

    match run(&ctx, &gate, &mut prompter) {
        Ok(outcome) => {
            report(&outcome);
            Ok(outcome.exit_code())
        }
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            eprintln!("{}", style(format!("[git-pal] error: {}", e)).red().bold());
            Err(())
        }
    }
}

fn report(outcome: &Outcome) {
    match outcome {
        Outcome::Written {
            path,
            actions,
            suggestions,
            license_expires,
        } => {
            eprintln!(
                "{}",
                style(format!("[git-pal] wrote {} actions to {}", actions, path.display())).green()
            );
            for s in suggestions {
                eprintln!("{}", style(format!("[git-pal] hint: {}", s)).cyan());
            }
            if let Some(notice) = (*license_expires).and_then(|at| expiry_notice(at, Utc::now())) {
                eprintln!("{}", style(notice).yellow());
            }
        }
        Outcome::Aborted(AbortReason::UserQuit) => {
            eprintln!(
                "{}",
                style("[git-pal] rebase aborted by user.").yellow().bold()
            );
        }
        Outcome::Aborted(AbortReason::License(reason)) => {
            eprintln!(
                "{}",
                style(format!("[git-pal] license check failed: {}", reason))
                    .red()
                    .bold()
            );
        }
    }
}

/// Renewal reminder when `expires_at` is less than [`EXPIRY_NOTICE_DAYS`] away.
fn expiry_notice(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Option<String> {
    let left = expires_at - now;
    if left >= Duration::days(EXPIRY_NOTICE_DAYS) {
        return None;
    }
    Some(format!(
        "[git-pal] your license expires on {} ({} days left)",
        expires_at.format("%Y-%m-%d"),
        left.num_days().max(0)
    ))
}
