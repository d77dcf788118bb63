//! Home-based paths used by aws-login.
//!
//! - `~/.aws/` - AWS CLI configuration directory
//! - `~/.aws/credentials` - credentials file written on every run
//! - `~/.aws-login/config.yaml` - optional aws-login configuration

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// The name of the aws-login configuration directory.
const AWS_LOGIN_DIR: &str = ".aws-login";

/// Environment variable that points at an alternate config file.
pub const CONFIG_ENV_VAR: &str = "AWS_LOGIN_CONFIG";

/// Returns the current user's home directory.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("Could not determine home directory")
}

/// Returns `<home>/.aws`
pub fn aws_dir(home: &Path) -> PathBuf {
    home.join(".aws")
}

/// Returns `<home>/.aws/credentials`
pub fn credentials_path(home: &Path) -> PathBuf {
    aws_dir(home).join("credentials")
}

/// Returns the default config file location.
///
/// `AWS_LOGIN_CONFIG` wins when set and non-empty, otherwise
/// `<home>/.aws-login/config.yaml`.
pub fn default_config_path(home: &Path) -> PathBuf {
    match std::env::var(CONFIG_ENV_VAR) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => home.join(AWS_LOGIN_DIR).join("config.yaml"),
    }
}
