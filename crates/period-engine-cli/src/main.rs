//! period: inspect duration strings, align timestamps, and list time buckets.
//!
//! Entry point for the application. Parses CLI arguments, sets up logging,
//! picks the clock, and delegates to the subcommand handlers.

#![forbid(unsafe_code)]

mod cli;
mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use period_engine::{Clock, FixedClock, SystemClock};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};
use commands::{Direction, Output};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.now {
        Some(now) => run(&cli, &FixedClock(now)),
        None => run(&cli, &SystemClock),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Dispatch to the subcommand handler, with "now" read from `clock`.
fn run(cli: &Cli, clock: &impl Clock) -> Result<()> {
    let out = Output { json: cli.json };

    match &cli.command {
        Commands::Inspect(args) => commands::inspect(args, &out),
        Commands::Seconds(args) => commands::seconds(args, &out),
        Commands::Ago(args) => commands::ago(args, clock, &out),
        Commands::Reset(args) => commands::align(args, Direction::Reset, clock, &out),
        Commands::Fill(args) => commands::align(args, Direction::Fill, clock, &out),
        Commands::Convert(args) => commands::convert(args, &out),
        Commands::Buckets(args) => commands::buckets(args, clock, &out),
        Commands::Format(args) => commands::format(args, &out),
    }
}

/// Log to stderr so stdout stays clean for results. `RUST_LOG` overrides
/// the level picked by `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
