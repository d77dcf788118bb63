use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Positional argument that enables the billing report.
pub const BILLING_FLAG: &str = "$";

#[derive(Parser, Debug, Default)]
#[command(name = "aws-login")]
#[command(about = "Load AWS CLI credentials from the macOS Keychain and report account usage")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("AWS_LOGIN_GIT_SHA"), ")"))]
pub struct Cli {
    /// Pass `$` to also show the current month's AWS cost
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    pub args: Vec<String>,

    /// Config file (defaults to ~/.aws-login/config.yaml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn wants_billing(&self) -> bool {
        self.args.first().map(String::as_str) == Some(BILLING_FLAG)
    }

    /// Parses `itr`, treating unparseable arguments as "no billing".
    ///
    /// `--help` and `--version` still print and exit.
    pub fn parse_lenient_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Self::try_parse_from(itr) {
            Ok(cli) => cli,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.exit()
            }
            Err(e) => {
                tracing::warn!(kind = ?e.kind(), "ignoring unrecognized arguments");
                Self::default()
            }
        }
    }

    pub fn parse_lenient() -> Self {
        Self::parse_lenient_from(std::env::args_os())
    }
}
