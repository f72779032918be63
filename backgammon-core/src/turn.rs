//! Turn state: whose turn, which dice are left, which phase we are in

use crate::board::Color;
use crate::dice::{DicePool, Roll};
use serde::{Deserialize, Serialize};

/// Turn phase.
///
/// `Rolling -> Moving -> TurnOver -> Rolling` for the next player, or
/// `TurnOver -> GameOver` once someone has won.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Rolling,
    Moving,
    TurnOver,
    GameOver,
}

/// Per-turn state
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    dice: DicePool,
    current_player: Color,
    phase: Phase,
    double_value: u32,
}

impl TurnState {
    pub fn new(starting_player: Color, double_value: u32) -> Self {
        Self {
            dice: DicePool::default(),
            current_player: starting_player,
            phase: Phase::Rolling,
            double_value,
        }
    }

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Stake multiplier (the doubling cube's face)
    pub fn double_value(&self) -> u32 {
        self.double_value
    }

    pub fn dice(&self) -> &DicePool {
        &self.dice
    }

    pub fn remaining_dice(&self) -> Vec<u8> {
        self.dice.remaining()
    }

    pub(crate) fn dice_mut(&mut self) -> &mut DicePool {
        &mut self.dice
    }

    pub(crate) fn start_moving(&mut self, roll: Roll) {
        self.dice = DicePool::from_roll(roll);
        self.phase = Phase::Moving;
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Hand the turn to the opponent
    pub(crate) fn flip(&mut self) {
        self.current_player = self.current_player.opponent();
        self.dice = DicePool::default();
        self.phase = Phase::Rolling;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_turn_is_rolling() {
        let turn = TurnState::new(Color::White, 1);
        assert_eq!(turn.phase(), Phase::Rolling);
        assert_eq!(turn.current_player(), Color::White);
        assert!(turn.remaining_dice().is_empty());
    }

    #[test]
    fn test_flip_alternates_and_clears_dice() {
        let mut turn = TurnState::new(Color::White, 1);
        turn.start_moving(Roll::new(2, 2).unwrap());
        assert_eq!(turn.phase(), Phase::Moving);
        assert_eq!(turn.remaining_dice(), vec![2, 2, 2, 2]);

        turn.flip();
        assert_eq!(turn.current_player(), Color::Black);
        assert_eq!(turn.phase(), Phase::Rolling);
        assert!(turn.remaining_dice().is_empty());

        turn.flip();
        assert_eq!(turn.current_player(), Color::White);
    }
}
