//! stylesync CLI - compile SCSS, upload it over FTP, reload the browser
//!
//! Usage: stylesync [--sass] [--ftpall] [--livereload --url <HOST>] [OPTIONS]

use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod ui;

use cli::Cli;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // no mode flag given? show help
    if !cli.any_mode() {
        println!("No options given...");
        Cli::command().print_help()?;
        println!();
        return Ok(ExitCode::FAILURE);
    }

    // make sure reload-only runs know which site they serve
    if cli.missing_url() {
        println!("Please pass the --url www.yoursite.com option");
        return Ok(ExitCode::FAILURE);
    }

    commands::watch::cmd_watch(&cli)
}

/// Diagnostics go to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("stylesync={}", level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
