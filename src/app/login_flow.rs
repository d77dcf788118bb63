//! The login sequence: keychain -> credentials file -> reports.

use crate::billing;
use crate::command_runner::CommandRunner;
use crate::config::LoginConfig;
use crate::credentials;
use crate::error::LoginError;
use crate::keychain;
use crate::storage_usage;
use chrono::NaiveDate;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Per-run switches that do not come from the config file.
#[derive(Debug, Clone, Copy)]
pub struct LoginOptions {
    /// Run the Cost Explorer report before the bucket report
    pub billing: bool,
    /// Date the billing period is computed from
    pub today: NaiveDate,
}

/// Runs the whole sequence, writing progress to `out`.
///
/// Returns an error only for the fatal steps (keychain lookup, credentials
/// file write). Report failures are printed inline.
pub fn run_login(
    runner: &dyn CommandRunner,
    config: &LoginConfig,
    home: Option<&Path>,
    options: LoginOptions,
    out: &mut dyn Write,
) -> Result<(), LoginError> {
    writeln!(out, "Retrieving AWS credentials from Keychain...")?;
    let creds = keychain::fetch_credentials(
        runner,
        &config.security_command,
        &config.keychain_service,
    )?;
    writeln!(out, "AWS Access Key ID: {}", creds.access_key_id())?;

    writeln!(out, "Setting AWS CLI credentials...")?;
    let home = home.ok_or_else(|| LoginError::io("Could not determine home directory"))?;
    credentials::write_credentials(home, &config.profile, &creds)?;
    writeln!(out, "AWS CLI credentials set from KeyChain.")?;

    if options.billing {
        info!("running billing report");
        writeln!(out, "\n==== AWS Billing for Current Month ====")?;
        billing::report_billing(
            runner,
            &config.aws_command,
            &config.billing_region,
            options.today,
            out,
        )?;
    }

    writeln!(out, "\n==== S3 Bucket Usage (bytes) ====")?;
    storage_usage::report_storage_usage(runner, &config.aws_command, out)?;

    Ok(())
}

#[cfg(test)]
#[path = "tests/login_flow_tests.rs"]
mod tests;
