//! Random self-play driver shared by `play` and `simulate`
//!
//! Picks uniformly among the legal moves. This is not a strategy; it only
//! drives games to completion through the public session API.

use anyhow::{anyhow, bail, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use backgammon_core::{DiceSource, Game, Outcome, Phase};

/// Turns after which a self-play game is considered stuck
pub const MAX_TURNS: u32 = 10_000;

/// Summary of a finished self-play game
#[derive(Clone, Debug)]
pub struct GameRecord {
    pub seed: u64,
    pub outcome: Outcome,
    pub turns: u32,
    pub moves: usize,
}

/// Move-choice RNG derived from the game seed, independent of the dice stream
pub fn chooser_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed.rotate_left(32) ^ 0x9E37_79B9_7F4A_7C15)
}

/// Drive `game` to completion with random legal moves
pub fn play_out<D: DiceSource>(game: &mut Game<D>, seed: u64, rng: &mut ChaCha8Rng) -> Result<GameRecord> {
    let mut turns = 0u32;

    loop {
        match game.phase() {
            Phase::Rolling => {
                turns += 1;
                if turns > MAX_TURNS {
                    bail!("game with seed {} did not finish within {} turns", seed, MAX_TURNS);
                }
                game.roll_dice()?;
            }
            Phase::Moving => {
                let moves = game.available_moves()?;
                let &mv = moves
                    .choose(rng)
                    .ok_or_else(|| anyhow!("no legal move while {:?} is moving", game.current_player()))?;
                game.make_move(mv)?;
            }
            Phase::TurnOver => {
                game.end_turn()?;
            }
            Phase::GameOver => break,
        }
    }

    let Some(outcome) = game.outcome() else {
        bail!("game with seed {} ended without an outcome", seed);
    };

    Ok(GameRecord {
        seed,
        outcome,
        turns,
        moves: game.history().len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use backgammon_core::{GameConfig, PIECES_PER_SIDE};

    #[test]
    fn test_play_out_finishes_with_winner() {
        let mut game = Game::new(GameConfig::default().with_seed(7)).unwrap();
        let mut rng = chooser_rng(7);
        let record = play_out(&mut game, 7, &mut rng).unwrap();

        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.board().born_off(record.outcome.winner), PIECES_PER_SIDE);
        assert!(record.turns > 0);
        assert_eq!(record.moves, game.history().len());
    }

    #[test]
    fn test_play_out_is_reproducible() {
        let run = |seed: u64| {
            let mut game = Game::new(GameConfig::default().with_seed(seed)).unwrap();
            let mut rng = chooser_rng(seed);
            let record = play_out(&mut game, seed, &mut rng).unwrap();
            (record.outcome, record.turns, record.moves)
        };
        assert_eq!(run(99), run(99));
    }

    #[test]
    fn test_play_out_with_auto_end_turn() {
        let config = GameConfig::default().with_seed(3).with_auto_end_turn(true);
        let mut game = Game::new(config).unwrap();
        let mut rng = chooser_rng(3);
        let record = play_out(&mut game, 3, &mut rng).unwrap();
        assert_eq!(game.outcome(), Some(record.outcome));
    }
}
