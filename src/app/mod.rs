pub mod cli;
pub mod login_flow;

pub use cli::Cli;
pub use login_flow::{run_login, LoginOptions};
