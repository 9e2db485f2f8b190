//! Headless skirmish runner.
//!
//! Runs the simulation without graphics: a scripted command stream drives
//! the world for a fixed number of ticks, with snapshots written to
//! stdout and logs to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Run the built-in demo script for 3000 ticks
//! cargo run -p skirmish_headless
//!
//! # JSON snapshots every 100 ticks, custom config and script
//! cargo run -p skirmish_headless -- \
//!     --ticks 5000 --every 100 --json \
//!     --config world.ron --script opening.ron
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use skirmish_core::prelude::*;
use skirmish_headless::runner::{CommandScript, HeadlessRunner, OutputFormat, RunnerError};

#[derive(Parser)]
#[command(name = "skirmish_headless")]
#[command(about = "Headless skirmish simulation runner")]
#[command(version)]
struct Cli {
    /// Number of ticks to simulate
    #[arg(short, long, default_value = "3000")]
    ticks: u64,

    /// Report a snapshot every N ticks
    #[arg(short, long, default_value = "250")]
    every: u64,

    /// Emit snapshots as JSON lines instead of text summaries
    #[arg(long)]
    json: bool,

    /// RON file overriding the default SimConfig
    #[arg(long)]
    config: Option<PathBuf>,

    /// RON file with the command script (defaults to the built-in demo)
    #[arg(long)]
    script: Option<PathBuf>,

    /// Enable verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> std::result::Result<(), RunnerError> {
    let config = match &cli.config {
        Some(path) => load_ron(path)?,
        None => SimConfig::default(),
    };
    let script = match &cli.script {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            CommandScript::from_ron(&path.display().to_string(), &text)?
        }
        None => CommandScript::demo(),
    };

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Summary
    };

    let mut runner = HeadlessRunner::new(config, script, cli.every, format);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let report = runner.run(cli.ticks, &mut out)?;

    writeln!(
        out,
        "done: {} ticks, {} entities, {} rejected commands, state hash {:#018x}",
        report.ticks, report.entities, report.rejections, report.state_hash
    )?;
    Ok(())
}

fn load_ron(path: &PathBuf) -> std::result::Result<SimConfig, RunnerError> {
    let text = std::fs::read_to_string(path)?;
    ron::from_str(&text).map_err(|e| RunnerError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
