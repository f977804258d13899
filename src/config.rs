//! Configuration file lookup and loading.
//!
//! The config lives in `config.toml` and carries the license token together
//! with the public key used to verify it:
//!
//! ```toml
//! license_token = "eyJ..."
//!
//! [license]
//! public_key = """-----BEGIN PUBLIC KEY-----
//! ...
//! -----END PUBLIC KEY-----"""
//! ```
//!
//! Nothing here is cached. Callers load the file once and pass the result on.

use serde::Deserialize;
use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Environment variable that overrides the default config location.
pub const CONFIG_ENV: &str = "GIT_PAL_CONFIG";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LicenseConfig {
    /// PEM-encoded RSA public key for license verification.
    pub public_key: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub license: LicenseConfig,
    /// The user's signed license token.
    pub license_token: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine the config location; set GIT_PAL_CONFIG or pass --config")]
    NoLocation,

    #[error("Config file not found. Please create {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing TOML config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Platform default location of `config.toml`.
///
/// * Windows: `%APPDATA%\git-pal\config.toml`
/// * elsewhere: `~/.config/git-pal/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    let base = if cfg!(windows) {
        dirs::config_dir()
    } else {
        dirs::home_dir().map(|home| home.join(".config"))
    };
    base.map(|dir| dir.join("git-pal").join("config.toml"))
}

/// Picks the config path: explicit flag, then the [`CONFIG_ENV`] value, then the default.
pub fn resolve_config_path(flag: Option<PathBuf>, env_value: Option<OsString>) -> Option<PathBuf> {
    flag.or_else(|| {
        env_value
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    })
    .or_else(default_config_path)
}

/// Reads and parses the config file at `path`.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse(&text, path)
}

/// Parses config text. `path` is only used for error messages.
pub fn parse(text: &str, path: &Path) -> Result<Config, ConfigError> {
    toml::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, load, parse, resolve_config_path};
    use std::ffi::OsString;
    use std::path::{Path, PathBuf};

    const SAMPLE: &str = r#"
license_token = "ey.fake.token"

[license]
public_key = """-----BEGIN PUBLIC KEY-----
MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEA
fake
-----END PUBLIC KEY-----"""
"#;

    #[test]
    fn parses_sample_config() {
        let config = parse(SAMPLE, Path::new("config.toml")).expect("sample should parse");
        assert_eq!(config.license_token, "ey.fake.token");
        assert!(config.license.public_key.starts_with("-----BEGIN PUBLIC KEY-----"));
    }

    #[test]
    fn missing_table_is_a_parse_error() {
        let result = parse("license_token = \"x\"\n", Path::new("config.toml"));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).expect("failed to write config");

        let config = load(&path).expect("load failed");
        assert_eq!(config.license_token, "ey.fake.token");
    }

    #[test]
    fn load_missing_file_reports_path() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("config.toml");
        let err = load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn flag_wins_over_env() {
        let resolved = resolve_config_path(
            Some(PathBuf::from("/flag/config.toml")),
            Some(OsString::from("/env/config.toml")),
        );
        assert_eq!(resolved, Some(PathBuf::from("/flag/config.toml")));
    }

    #[test]
    fn env_wins_over_default() {
        let resolved = resolve_config_path(None, Some(OsString::from("/env/config.toml")));
        assert_eq!(resolved, Some(PathBuf::from("/env/config.toml")));
    }

    #[test]
    fn empty_env_falls_back_to_default() {
        let resolved = resolve_config_path(None, Some(OsString::new()));
        if let Some(path) = resolved {
            assert_eq!(path.file_name().and_then(|s| s.to_str()), Some("config.toml"));
            assert!(path.to_string_lossy().contains("git-pal"));
        }
    }
}
