//! Schroeder CLI - Reverb Processor
//!
//! Command-line interface for the Schroeder reverberator.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use schroeder::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Schroeder Reverb v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Render {
            input,
            output,
            knobs,
        } => commands::run_render(&input, output.as_deref(), &knobs)
            .with_context(|| format!("render of {} failed", input.display())),
        Commands::ShowConfig { knobs } => {
            commands::run_show_config(&knobs).context("cannot resolve settings")
        }
    }
}
