//! # git-pal
//!
//! An interactive editor for the todo list of `git rebase -i`.
//!
//! Git hands the todo file to its sequence editor; `git-pal` parses it, lets
//! the user change commands row by row, and writes the list back in the exact
//! format Git expects, or leaves the file untouched on abort.
//!
//! ## Usage
//!
//! ```bash
//! git config --global sequence.editor git-pal
//! git rebase -i main
//! ```
//!
//! ## Modules
//!
//! - [`action`] - One todo entry and its canonical text line
//! - [`todo`] - Todo file parsing and serialization
//! - [`session`] - Session state machine and screen stack
//! - [`screen`] - The Editing Screen
//! - [`dialog`] - Edit, confirm and failure dialogs
//! - [`driver`] - Renders a session through prompters
//! - [`prompt`] - User input abstractions
//! - [`license`] - License gate
//! - [`suggest`] - Autosquash suggestions for licensed users
//! - [`config`] - `config.toml` lookup and loading
//! - [`context`] - Per-process settings
//! - [`cli`] - Command-line interface and main entry point
//! - [`banner`] - Styled terminal output
//! - [`logging`] - File-backed tracing setup
//! - [`error`] - Crate error type

pub mod action;
pub mod banner;
pub mod cli;
pub mod config;
pub mod context;
pub mod dialog;
pub mod driver;
pub mod error;
pub mod license;
pub mod logging;
pub mod prompt;
pub mod screen;
pub mod session;
pub mod suggest;
pub mod todo;

pub use error::{Error, Result};
