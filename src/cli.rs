pub mod app;
pub mod commands;
mod exit;
pub mod guidance;

pub use app::{App, Completion};
pub use commands::{Cli, Command};
pub use exit::{exit_code, parse_exit_code};
