//! clichess - play chess against a UCI engine from the terminal
//!
//! Run with: `cargo run -- --board --play 1`
//!
//! Exit status: 0 after a finished game, 1 when the engine cannot be
//! started or the console cannot be set up, 2 for bad arguments (clap),
//! 130 when the session was interrupted and autosaved.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uci_engine::UciEngine;

use clichess::core::{Autosave, Cli, Console, CoreError};
use clichess::game::Session;

const ENGINE_HINT: &str = "Make sure you have stockfish downloaded and added to the execution dir, or pass its path with --engine";

fn main() -> ExitCode {
    // stdout carries the game itself; diagnostics go to stderr.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = cli.session_config();

    let engine = match UciEngine::spawn(&cli.engine) {
        Ok(engine) => engine,
        Err(source) => {
            let err = CoreError::engine_launch(&cli.engine, source);
            tracing::error!("[ENGINE] {err}");
            eprintln!("{err}");
            if matches!(err, CoreError::EngineUnavailable { .. }) {
                eprintln!("{ENGINE_HINT}");
            }
            return Ok(ExitCode::FAILURE);
        }
    };
    tracing::info!(
        "[ENGINE] started {} ({})",
        cli.engine.display(),
        engine.name().unwrap_or("unnamed engine")
    );

    let console = Console::stdio().context("could not set up the console")?;
    let mut session = Session::new(config, engine, console, Autosave::default_location());

    Ok(ExitCode::from(session.run().exit_code()))
}
