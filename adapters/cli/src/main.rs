#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays recorded snapshots through the engine.
//!
//! Input is JSON lines, one `WorldSnapshot` per line. Each answered tick is
//! written to stdout as one JSON action map; logs go to stderr.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use outpost_core::WorldSnapshot;
use outpost_system_decision::{Engine, StrategyConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Replays JSON-lines snapshots and prints the engine's action maps.
#[derive(Debug, Parser)]
#[command(name = "outpost", version, about)]
struct Args {
    /// TOML file overriding the default strategy tunables.
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON-lines snapshot file; stdin when absent.
    #[arg(long)]
    input: Option<PathBuf>,
}

/// Entry point for the replay harness.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("outpost=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => StrategyConfig::from_path(path)
            .with_context(|| format!("failed to load strategy config {}", path.display()))?,
        None => StrategyConfig::default(),
    };
    let mut engine = Engine::new(config);

    let input: Box<dyn BufRead> = match &args.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open snapshot file {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    let stdout = io::stdout();
    let mut output = BufWriter::new(stdout.lock());
    let ticks = replay(&mut engine, input, &mut output)?;
    output.flush().context("failed to flush action maps")?;

    info!(ticks, "replay finished");
    Ok(())
}

/// Answers every snapshot line of `input`, writing one action map per line.
///
/// Blank lines are skipped. Returns the number of answered snapshots.
fn replay(engine: &mut Engine, input: impl BufRead, output: &mut impl Write) -> Result<usize> {
    let mut answered = 0;

    for (index, line) in input.lines().enumerate() {
        let line_number = index + 1;
        let line = line.with_context(|| format!("failed to read line {line_number}"))?;
        if line.trim().is_empty() {
            continue;
        }

        let snapshot: WorldSnapshot = serde_json::from_str(&line)
            .with_context(|| format!("line {line_number} is not a valid snapshot"))?;
        let actions = engine
            .decide(&snapshot)
            .with_context(|| format!("tick {} was rejected", snapshot.current_tick))?;

        serde_json::to_writer(&mut *output, &actions)
            .with_context(|| format!("failed to encode actions for tick {}", snapshot.current_tick))?;
        writeln!(output).context("failed to write action map")?;
        answered += 1;
    }

    Ok(answered)
}
