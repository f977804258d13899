//! Crate-level error type.

use crate::todo::TodoError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that end a `git-pal` run.
///
/// License rejection and user abort are not errors: they are session results.
#[derive(Debug, Error)]
pub enum Error {
    #[error("todo file not found at {0}")]
    MissingTodo(PathBuf),

    #[error(transparent)]
    Todo(#[from] TodoError),

    #[error("prompt failed: {0}")]
    Prompt(String),
}

pub type Result<T> = std::result::Result<T, Error>;
