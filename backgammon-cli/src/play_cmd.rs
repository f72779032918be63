//! Play command - one random self-play game
//!
//! ## Architecture
//!
//! - Level 1: run() - orchestration
//! - Level 2: create_game(), report_game()
//! - Level 3: print_text_game(), print_json_game()

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use backgammon_core::{Game, GameConfig, SeededDice, Setup};

use crate::new_cmd::render;
use crate::selfplay::{self, GameRecord};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Start from a setup JSON file instead of the standard position
    #[arg(long, value_name = "FILE")]
    pub setup: Option<PathBuf>,

    /// Stake multiplier (power of two)
    #[arg(long, default_value = "1")]
    pub double_value: u32,

    /// Output history and outcome as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let seed = seed.unwrap_or_else(rand::random);
    tracing::info!("Playing self-play game with seed {}", seed);

    let mut game = create_game(&args, seed)?;
    let mut rng = selfplay::chooser_rng(seed);
    let record = selfplay::play_out(&mut game, seed, &mut rng)?;

    report_game(&game, &record, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn create_game(args: &PlayArgs, seed: u64) -> Result<Game> {
    let config = GameConfig::default()
        .with_seed(seed)
        .with_double_value(args.double_value);

    match &args.setup {
        Some(path) => {
            let setup = Setup::load(path)?;
            Game::from_setup(config, &setup, SeededDice::from_seed(seed))
                .with_context(|| format!("Failed to start from {}", path.display()))
        }
        None => Game::new(config).context("Failed to create game"),
    }
}

fn report_game(game: &Game, record: &GameRecord, args: &PlayArgs) -> Result<()> {
    if args.json {
        print_json_game(game, record)
    } else {
        print_text_game(game, record);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - OUTPUT
// ============================================================================

fn print_text_game(game: &Game, record: &GameRecord) {
    println!("=== Game (seed {}) ===", record.seed);
    for (i, entry) in game.history().iter().enumerate() {
        println!(
            "{:>4}. {:?} {}{}",
            i + 1,
            entry.player,
            entry.mv,
            if entry.capture { " *" } else { "" }
        );
    }

    println!("\n{}", render(&game.snapshot()));
    println!(
        "{:?} wins ({:?}) for {} point(s) after {} turns",
        record.outcome.winner, record.outcome.kind, record.outcome.points, record.turns
    );
}

fn print_json_game(game: &Game, record: &GameRecord) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        seed: u64,
        config: &'a GameConfig,
        turns: u32,
        history: &'a [backgammon_core::MoveHistoryEntry],
        outcome: backgammon_core::Outcome,
        final_position: backgammon_core::Snapshot,
    }

    let output = JsonOutput {
        seed: record.seed,
        config: game.config(),
        turns: record.turns,
        history: game.history(),
        outcome: record.outcome,
        final_position: game.snapshot(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
