//! Backgammon CLI - Command-line interface
//!
//! Commands:
//! - new: Print the opening position
//! - play: Play one random self-play game
//! - simulate: Play many seeded games in parallel and tally the outcomes
//! - check: Validate a setup file

mod check;
mod new_cmd;
mod play_cmd;
mod selfplay;
mod simulate;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "backgammon")]
#[command(about = "Backgammon rules engine")]
struct Cli {
    /// Random seed for reproducible games
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the opening position
    New(new_cmd::NewArgs),
    /// Play one game with random legal moves
    Play(play_cmd::PlayArgs),
    /// Play many games in parallel and report win kinds
    Simulate(simulate::SimulateArgs),
    /// Load and validate a setup file
    Check(check::CheckArgs),
}

fn main() -> anyhow::Result<()> {
    // Logging goes to stderr so JSON output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::New(args) => new_cmd::run(args),
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Simulate(args) => simulate::run(args, cli.seed),
        Commands::Check(args) => check::run(args),
    }
}
