use anyhow::{Context, Result};
use clap::Parser;
use is_cli::cli::{App, Cli, exit_code, guidance, parse_exit_code};
use is_cli::infra::config::load_settings;
use is_cli::infra::signals::install_shutdown_channel;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            std::process::exit(parse_exit_code(&err));
        }
    };
    init_tracing(cli.verbose);

    let outcome = run(cli);
    if let Err(err) = &outcome {
        guidance::print_error(err);
    }

    std::process::exit(exit_code(&outcome));
}

fn run(cli: Cli) -> Result<i32> {
    let project_root = match cli.project_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("resolving the current directory")?,
    };

    let settings = load_settings(&cli.config_dir, &project_root)?;
    let shutdown = install_shutdown_channel()?;

    App::new(settings).run(cli.command, &shutdown)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
