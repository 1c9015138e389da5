#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Market Match in the terminal.

mod display;
mod save_file;
mod session;

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use market_match_core::CellCoord;
use market_match_world::query;

use crate::{display::Display, save_file::SaveFile, session::Session};

/// Play Market Match, a match-3 game over a shifting market.
#[derive(Debug, Parser)]
#[command(name = "market-match", version)]
struct CliArgs {
    /// Seed for the board and market event draws.
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,
    /// File holding the highest unlocked level.
    #[arg(long, default_value = "market-match.save")]
    save_file: PathBuf,
    /// Simulated frame length in milliseconds.
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Forget saved progress and start over from level one.
    ResetProgress,
}

/// Entry point for the Market Match command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    let save = SaveFile::new(args.save_file);

    if let Some(CliCommand::ResetProgress) = args.command {
        save.reset()
            .with_context(|| format!("failed to reset {}", save.path().display()))?;
        println!("Progress reset to level one.");
        return Ok(());
    }

    let level = save
        .load()
        .with_context(|| format!("failed to load progress from {}", save.path().display()))?;
    let session = Session::new(args.seed, Duration::from_millis(args.tick_ms));

    play(session, &save, level)
}

fn play(mut session: Session, save: &SaveFile, mut level: u32) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut display = Display::default();

    announce(&mut stdout, display.absorb(&session.start_level(level)))?;
    announce(&mut stdout, display.absorb(&session.settle()))?;

    let mut lines = stdin.lock().lines();
    loop {
        write!(
            stdout,
            "\n{}{}\npick \"row column\" or q> ",
            display.render(query::grid(session.world())),
            display.status()
        )?;
        stdout.flush()?;

        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line.context("failed to read from stdin")?;
        let input = line.trim();
        if input.eq_ignore_ascii_case("q") {
            return Ok(());
        }

        let Some(cell) = parse_cell(input) else {
            writeln!(stdout, "Expected two numbers, e.g. \"2 5\".")?;
            continue;
        };

        announce(&mut stdout, display.absorb(&session.pick(cell)))?;
        announce(&mut stdout, display.absorb(&session.settle()))?;

        let Some(outcome) = session.outcome() else {
            continue;
        };
        let (next, events) = session
            .navigate(level, outcome, save)
            .with_context(|| format!("failed to save progress to {}", save.path().display()))?;
        level = next;
        announce(&mut stdout, display.absorb(&events))?;
    }
}

fn announce(out: &mut impl Write, notes: Vec<String>) -> Result<()> {
    for note in notes {
        writeln!(out, "{note}")?;
    }
    Ok(())
}

fn parse_cell(input: &str) -> Option<CellCoord> {
    let mut parts = input.split_whitespace();
    let row = parts.next()?.parse().ok()?;
    let column = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(CellCoord::new(row, column))
}
