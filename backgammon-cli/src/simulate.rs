//! Simulate command - many seeded self-play games in parallel
//!
//! ## Architecture
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_games(), report_results()
//! - Level 3: play_seeded_game(), compute_statistics()
//! - Level 4: formatting utilities

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use clap::Args;
use rayon::prelude::*;

use backgammon_core::{Color, Game, GameConfig, WinKind};

use crate::selfplay::{self, GameRecord};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct SimulateArgs {
    /// Number of games to play
    #[arg(long, default_value = "100")]
    pub games: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Aggregated results over all games
#[derive(Clone, Debug, Default, PartialEq)]
struct SimulationResults {
    games: usize,
    white_wins: usize,
    black_wins: usize,
    kinds: BTreeMap<String, usize>,
    avg_turns: f32,
    avg_moves: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: SimulateArgs, seed: Option<u64>) -> Result<()> {
    if args.games == 0 {
        bail!("--games must be at least 1");
    }

    let base_seed = seed.unwrap_or_else(rand::random);
    tracing::info!("Simulating {} games from seed {}", args.games, base_seed);

    let records = play_games(args.games, base_seed)?;
    let results = compute_statistics(&records);

    report_results(&results, base_seed, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Game `i` uses seed `base_seed + i`, so any single game can be replayed
/// with `play --seed`
fn play_games(games: usize, base_seed: u64) -> Result<Vec<GameRecord>> {
    (0..games as u64)
        .into_par_iter()
        .map(|i| play_seeded_game(base_seed.wrapping_add(i)))
        .collect()
}

fn report_results(results: &SimulationResults, base_seed: u64, args: &SimulateArgs) -> Result<()> {
    if args.json {
        print_json_results(results, base_seed)
    } else {
        print_text_results(results, base_seed);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn play_seeded_game(seed: u64) -> Result<GameRecord> {
    let mut game = Game::new(GameConfig::default().with_seed(seed))?;
    let mut rng = selfplay::chooser_rng(seed);
    let record = selfplay::play_out(&mut game, seed, &mut rng)?;

    tracing::debug!(
        "Seed {}: {:?} {:?} ({} turns)",
        seed,
        record.outcome.winner,
        record.outcome.kind,
        record.turns
    );

    Ok(record)
}

fn compute_statistics(records: &[GameRecord]) -> SimulationResults {
    let count_winner = |color: Color| records.iter().filter(|r| r.outcome.winner == color).count();

    let mut kinds = BTreeMap::new();
    for kind in [WinKind::Single, WinKind::Gammon, WinKind::Backgammon] {
        kinds.insert(format!("{:?}", kind), 0);
    }
    for record in records {
        *kinds.entry(format!("{:?}", record.outcome.kind)).or_insert(0) += 1;
    }

    let games = records.len();
    let (avg_turns, avg_moves) = if games == 0 {
        (0.0, 0.0)
    } else {
        let turns: u64 = records.iter().map(|r| r.turns as u64).sum();
        let moves: usize = records.iter().map(|r| r.moves).sum();
        (turns as f32 / games as f32, moves as f32 / games as f32)
    };

    SimulationResults {
        games,
        white_wins: count_winner(Color::White),
        black_wins: count_winner(Color::Black),
        kinds,
        avg_turns,
        avg_moves,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn percent(count: usize, total: usize) -> f32 {
    if total > 0 {
        count as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

fn print_json_results(results: &SimulationResults, base_seed: u64) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        base_seed: u64,
        total_games: usize,
        white_wins: usize,
        black_wins: usize,
        win_kinds: &'a BTreeMap<String, usize>,
        avg_turns: f32,
        avg_moves: f32,
    }

    let output = JsonOutput {
        base_seed,
        total_games: results.games,
        white_wins: results.white_wins,
        black_wins: results.black_wins,
        win_kinds: &results.kinds,
        avg_turns: results.avg_turns,
        avg_moves: results.avg_moves,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text_results(results: &SimulationResults, base_seed: u64) {
    let total = results.games;

    println!("\n=== Simulation Results (base seed {}) ===", base_seed);
    println!("Total games: {}", total);
    println!(
        "White wins:  {} ({:.1}%)",
        results.white_wins,
        percent(results.white_wins, total)
    );
    println!(
        "Black wins:  {} ({:.1}%)",
        results.black_wins,
        percent(results.black_wins, total)
    );
    for (kind, &count) in &results.kinds {
        println!("{:<11}  {} ({:.1}%)", format!("{}:", kind), count, percent(count, total));
    }
    println!("Avg turns:   {:.1}", results.avg_turns);
    println!("Avg moves:   {:.1}", results.avg_moves);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_games_match_sequential() {
        let parallel = play_games(8, 500).unwrap();
        for (i, record) in parallel.iter().enumerate() {
            let sequential = play_seeded_game(500 + i as u64).unwrap();
            assert_eq!(record.seed, sequential.seed);
            assert_eq!(record.outcome, sequential.outcome);
            assert_eq!(record.moves, sequential.moves);
        }
    }

    #[test]
    fn test_statistics_add_up() {
        let records = play_games(12, 42).unwrap();
        let stats = compute_statistics(&records);

        assert_eq!(stats.games, 12);
        assert_eq!(stats.white_wins + stats.black_wins, 12);
        assert_eq!(stats.kinds.values().sum::<usize>(), 12);
        assert!(!stats.kinds.contains_key("Forfeit"));
        assert!(stats.avg_turns > 0.0);
    }

    #[test]
    fn test_empty_statistics() {
        let stats = compute_statistics(&[]);
        assert_eq!(stats.games, 0);
        assert_eq!(stats.avg_turns, 0.0);
        assert_eq!(stats.kinds.len(), 3);
    }
}
