//! vconv command-line front-end.
//!
//! Picks a file and a target container, hands the conversion to
//! `vconv-core`, and prints the status updates as they arrive.

mod cli;
mod commands;
mod logging;
mod shell;

use std::process::ExitCode;

use clap::Parser;
use vconv_core::settings::SettingsManager;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let manager = match &cli.config_dir {
        Some(dir) => SettingsManager::new(dir.clone()),
        None => SettingsManager::with_default_dir(),
    };
    let settings = manager.load();

    logging::init_logging(&settings.log_dir(), &settings.logging.level, cli.verbose);
    tracing::debug!("Using settings from {}", manager.settings_path().display());

    let outcome = match cli.command {
        Command::Convert(args) => shell::run_convert(args, &settings).await,
        Command::Formats { json } => commands::run_formats(json),
        Command::Doctor { ffmpeg, json } => commands::run_doctor(ffmpeg, &settings, json),
        Command::Config(command) => commands::run_config(command, &manager),
    };

    match outcome {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
