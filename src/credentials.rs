//! AWS CLI credentials file writing.

use crate::error::LoginError;
use crate::login_paths;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// An AWS access key pair.
///
/// `Debug` never shows the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AwsCredentials {
    access_key_id: String,
    secret_access_key: String,
}

impl AwsCredentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }
}

impl std::fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Renders the credentials file: a single `[profile]` section.
pub fn render_credentials_file(profile: &str, creds: &AwsCredentials) -> String {
    format!(
        "[{}]\naws_access_key_id = {}\naws_secret_access_key = {}\n",
        profile,
        creds.access_key_id(),
        creds.secret_access_key()
    )
}

/// Writes `<home>/.aws/credentials`, replacing the whole file.
///
/// Other profiles already in the file are discarded. The `.aws` directory is
/// created with mode 0700 and the file is left with mode 0600.
pub fn write_credentials(
    home: &Path,
    profile: &str,
    creds: &AwsCredentials,
) -> Result<PathBuf, LoginError> {
    let aws_dir = login_paths::aws_dir(home);
    create_private_dir(&aws_dir).map_err(|e| {
        LoginError::io(format!(
            "Failed to create directory {}: {}",
            aws_dir.display(),
            e
        ))
    })?;

    let path = login_paths::credentials_path(home);
    let content = render_credentials_file(profile, creds);
    write_private_file(&path, content.as_bytes()).map_err(|e| {
        LoginError::io(format!("Failed to write {}: {}", path.display(), e))
    })?;

    info!(path = %path.display(), profile, "wrote credentials file");
    Ok(path)
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    if dir.is_dir() {
        return Ok(());
    }
    fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(unix)]
fn write_private_file(path: &Path, content: &[u8]) -> std::io::Result<()> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(content)?;
    file.flush()
}

#[cfg(not(unix))]
fn write_private_file(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(content)?;
    file.flush()
}

#[cfg(test)]
#[path = "tests/credentials_tests.rs"]
mod tests;
