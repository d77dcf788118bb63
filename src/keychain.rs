//! Access key lookup in the macOS keychain via the `security` CLI.
//!
//! The key pair is stored as an internet password: the access key ID is the
//! entry's account name and the secret access key is its password.

use crate::command_runner::{args, CommandOutput, CommandRunner};
use crate::credentials::AwsCredentials;
use crate::error::LoginError;
use tracing::{debug, info};

/// Marker of the account-name attribute in `security -g` output.
const ACCOUNT_MARKER: &str = "\"acct\"";

/// Reads the access key pair stored under `service`.
///
/// `security_command` is the program to invoke, normally `security`.
pub fn fetch_credentials(
    runner: &dyn CommandRunner,
    security_command: &str,
    service: &str,
) -> Result<AwsCredentials, LoginError> {
    let metadata = run_lookup(runner, security_command, service, "-g").map_err(|reason| {
        LoginError::lookup(format!(
            "failed to find {} keychain entry: {}",
            service, reason
        ))
    })?;

    let access_key_id = parse_account_name(&metadata.combined).ok_or_else(|| {
        LoginError::lookup("could not extract AWS Access Key ID from keychain")
    })?;
    debug!(service, "found keychain account name");

    let secret = run_lookup(runner, security_command, service, "-w").map_err(|reason| {
        LoginError::lookup(format!("failed to get secret access key: {}", reason))
    })?;

    let secret_access_key = secret.combined.trim().to_string();
    if secret_access_key.is_empty() {
        return Err(LoginError::lookup(
            "could not extract AWS Secret Access Key from keychain",
        ));
    }

    info!(service, "retrieved credentials from keychain");
    Ok(AwsCredentials::new(access_key_id, secret_access_key))
}

/// Runs `security find-internet-password -s <service> <mode>`.
///
/// Returns the failure reason when the process cannot start or exits non-zero.
fn run_lookup(
    runner: &dyn CommandRunner,
    security_command: &str,
    service: &str,
    mode: &str,
) -> Result<CommandOutput, String> {
    let output = runner
        .run(
            security_command,
            &args(["find-internet-password", "-s", service, mode]),
        )
        .map_err(|e| format!("{:#}", e))?;
    if !output.success {
        return Err(output.failure_reason());
    }
    Ok(output)
}

/// Extracts the account name from `security find-internet-password -g` output.
///
/// A matching line looks like `    "acct"<blob>="AKIA..."`; splitting on quotes
/// puts the value at index 3. When several lines match, the last one wins.
pub fn parse_account_name(output: &str) -> Option<String> {
    output
        .lines()
        .rev()
        .filter(|line| line.contains(ACCOUNT_MARKER))
        .find_map(|line| line.split('"').nth(3))
        .filter(|name| !name.is_empty())
        .map(String::from)
}

#[cfg(test)]
#[path = "tests/keychain_tests.rs"]
mod tests;
