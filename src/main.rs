#![deny(unsafe_code)]

mod banner;
mod cli;
mod common;
mod config;
mod daemon;
mod font;
mod geometry;
mod x11;

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::Cli;

fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

fn run(cli: Cli) -> Result<()> {
    let source = cli.config_source();
    let settings = config::load(&source).context("Failed to load configuration")?;

    if cli.dump_config {
        let json = serde_json::to_string_pretty(&settings)
            .context("Failed to serialize settings")?;
        println!("{}", json);
        return Ok(());
    }

    let display_set = std::env::var_os("DISPLAY").is_some_and(|display| !display.is_empty());
    if !display_set {
        bail!("DISPLAY environment variable not set.");
    }

    if !settings.shows_anything() {
        warn!("Both banners are disabled, nothing to display");
        return Ok(());
    }

    common::system::log_session_info();

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;

    rt.block_on(daemon::run_banner_daemon(source, settings))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Error: {:#}", e);
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
