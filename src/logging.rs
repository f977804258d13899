use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter, e.g. `GIT_PAL_LOG=debug`.
pub const LOG_ENV: &str = "GIT_PAL_LOG";

const DEFAULT_FILTER: &str = "warn,git_pal=info";

/// Directory that holds `git-pal.log`.
pub fn log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".git-pal")
}

/// Installs a file-backed tracing subscriber.
///
/// Logs go to `<dir>/git-pal.log` (appended) instead of stderr, which belongs
/// to the interactive prompts. Returns the log file path.
pub fn init_tracing(dir: &Path) -> std::io::Result<PathBuf> {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    std::fs::create_dir_all(dir)?;
    let path = dir.join("git-pal.log");
    let log_file = OpenOptions::new().create(true).append(true).open(&path)?;

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .try_init();

    Ok(path)
}
