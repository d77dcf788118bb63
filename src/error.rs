//! Error types for the login flow.
//!
//! Two outcome kinds exist: [`LoginError`] halts the run with exit status 1,
//! [`ReportError`] is rendered as an inline message and the run continues.

use std::fmt::{Display, Formatter};

/// Failures that abort the login flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    /// Keychain entry missing, unreadable, or incomplete.
    Lookup { message: String },
    /// Home directory or credentials file could not be used.
    Io { message: String },
    /// Progress output could not be written.
    Output { message: String },
}

impl LoginError {
    pub fn lookup(message: impl Into<String>) -> Self {
        Self::Lookup {
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Line printed before exiting, e.g. `Error writing credentials: ...`.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io { .. } => format!("Error writing credentials: {}", self),
            Self::Lookup { .. } | Self::Output { .. } => format!("Error: {}", self),
        }
    }
}

impl From<std::io::Error> for LoginError {
    fn from(e: std::io::Error) -> Self {
        Self::Output {
            message: format!("Failed to write output: {}", e),
        }
    }
}

impl Display for LoginError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lookup { message } => write!(f, "{}", message),
            Self::Io { message } => write!(f, "{}", message),
            Self::Output { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for LoginError {}

/// Failures of the best-effort reporting steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// The CLI is missing, failed, or produced no output.
    Unavailable,
    /// The CLI answered but the response had no usable data.
    Unparseable,
    /// A listing command failed; `reason` is shown to the user.
    CommandFailed { reason: String },
}

impl Display for ReportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "unavailable"),
            Self::Unparseable => write!(f, "unparseable response"),
            Self::CommandFailed { reason } => write!(f, "{}", reason),
        }
    }
}

impl std::error::Error for ReportError {}
