use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Settings for one aws-login run.
///
/// Every field is optional in the YAML file; missing fields take the defaults
/// that match a stock macOS + AWS CLI setup.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoginConfig {
    /// Keychain internet-password entry (`security -s <service>`)
    #[serde(default = "default_keychain_service")]
    pub keychain_service: String,
    /// Section name written to the credentials file
    #[serde(default = "default_profile")]
    pub profile: String,
    /// Region passed to Cost Explorer
    #[serde(default = "default_billing_region")]
    pub billing_region: String,
    #[serde(default = "default_security_command")]
    pub security_command: String,
    #[serde(default = "default_aws_command")]
    pub aws_command: String,
}

fn default_keychain_service() -> String {
    "aws-cli".to_string()
}

fn default_profile() -> String {
    "default".to_string()
}

// Cost Explorer is only served from us-east-1
fn default_billing_region() -> String {
    "us-east-1".to_string()
}

fn default_security_command() -> String {
    "security".to_string()
}

fn default_aws_command() -> String {
    "aws".to_string()
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            keychain_service: default_keychain_service(),
            profile: default_profile(),
            billing_region: default_billing_region(),
            security_command: default_security_command(),
            aws_command: default_aws_command(),
        }
    }
}

impl LoginConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file as YAML: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when it exists, otherwise returns the defaults.
    ///
    /// A file that cannot be read or parsed is logged and replaced by the
    /// defaults; only an explicit `--config` path is fatal.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        debug!(path = %path.display(), "loading config");
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{:#}; using default settings", e);
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        let fields = [
            ("keychain_service", &self.keychain_service),
            ("profile", &self.profile),
            ("billing_region", &self.billing_region),
            ("security_command", &self.security_command),
            ("aws_command", &self.aws_command),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                anyhow::bail!("Config field '{}' must not be empty", name);
            }
        }

        if self
            .profile
            .chars()
            .any(|c| c == '[' || c == ']' || c == '\n' || c == '\r')
        {
            anyhow::bail!(
                "Profile name '{}' cannot be used as a credentials file section",
                self.profile
            );
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
