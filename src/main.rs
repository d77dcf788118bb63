mod app;
mod billing;
mod command_runner;
mod config;
mod credentials;
mod error;
mod keychain;
mod login_paths;
mod storage_usage;

use anyhow::Result;
use app::{run_login, Cli, LoginOptions};
use command_runner::SystemCommandRunner;
use config::LoginConfig;
use std::io::Write;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Log filter variable, e.g. `AWS_LOGIN_LOG=debug`.
const LOG_ENV_VAR: &str = "AWS_LOGIN_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli, home: Option<&std::path::Path>) -> Result<LoginConfig> {
    if let Some(path) = &cli.config {
        return LoginConfig::load(path);
    }
    match home {
        Some(home) => Ok(LoginConfig::load_or_default(
            &login_paths::default_config_path(home),
        )),
        None => Ok(LoginConfig::default()),
    }
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse_lenient();

    let home = match login_paths::home_dir() {
        Ok(home) => Some(home),
        Err(e) => {
            tracing::warn!("{:#}", e);
            None
        }
    };

    let config = match load_config(&cli, home.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            println!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let options = LoginOptions {
        billing: cli.wants_billing(),
        today: chrono::Local::now().date_naive(),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = run_login(
        &SystemCommandRunner,
        &config,
        home.as_deref(),
        options,
        &mut out,
    );

    let code = match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = writeln!(out, "{}", e.user_message());
            ExitCode::FAILURE
        }
    };
    let _ = out.flush();
    code
}
