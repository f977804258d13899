use crate::config;
use crate::license::JwtLicenseGate;

use std::{ffi::OsString, path::PathBuf};

/// Per-process settings, resolved once at startup and passed down explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    /// The rebase todo file Git asked us to edit.
    pub todo_path: PathBuf,
    /// Where `config.toml` is expected. `None` when no location could be determined.
    pub config_path: Option<PathBuf>,
}

impl Context {
    /// Builds the context from the CLI flag and the `GIT_PAL_CONFIG` value.
    pub fn new(
        todo_path: PathBuf,
        config_flag: Option<PathBuf>,
        config_env: Option<OsString>,
    ) -> Self {
        Context {
            todo_path,
            config_path: config::resolve_config_path(config_flag, config_env),
        }
    }

    /// The license gate backed by this context's config file.
    pub fn license_gate(&self) -> JwtLicenseGate {
        JwtLicenseGate::new(self.config_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::Context;
    use std::path::PathBuf;

    #[test]
    fn explicit_config_is_kept() {
        let ctx = Context::new(
            PathBuf::from("git-rebase-todo"),
            Some(PathBuf::from("/tmp/config.toml")),
            None,
        );
        assert_eq!(ctx.config_path, Some(PathBuf::from("/tmp/config.toml")));
        assert_eq!(ctx.todo_path, PathBuf::from("git-rebase-todo"));
    }
}
