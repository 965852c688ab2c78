//! TripleSec CLI - passphrase-based, triple-layer file encryption
//!
//! This is the command-line interface for TripleSec. It wires configuration,
//! logging, passphrase input and progress display around the core library.

mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod logging;
mod ui;

use clap::Parser;

use crate::cli::Cli;
use crate::config::load_config;
use crate::errors::CliError;

fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => CliError::from_anyhow(err).exit(),
    };

    let dispatch = logging::build_dispatch(cli.debug, &config.logging);
    let result = tracing::dispatcher::with_default(&dispatch, || {
        tracing::debug!(version = triplesec_core::VERSION, "starting");
        commands::run(&cli, &config)
    });

    if let Err(err) = result {
        CliError::from_anyhow(err).exit()
    }
}
