//! Game configuration

use crate::board::Color;
use crate::error::GameError;
use serde::{Deserialize, Serialize};

/// Options fixed when a game is created
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Dice seed for reproducible games (None = from entropy)
    pub seed: Option<u64>,
    /// Who rolls first
    pub starting_player: Color,
    /// Stake multiplier, a power of two
    pub double_value: u32,
    /// Hand the turn over as soon as it ends, without waiting for `end_turn`
    pub auto_end_turn: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            starting_player: Color::White,
            double_value: 1,
            auto_end_turn: false,
        }
    }
}

impl GameConfig {
    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_starting_player(mut self, player: Color) -> Self {
        self.starting_player = player;
        self
    }

    pub fn with_double_value(mut self, double_value: u32) -> Self {
        self.double_value = double_value;
        self
    }

    pub fn with_auto_end_turn(mut self, auto_end_turn: bool) -> Self {
        self.auto_end_turn = auto_end_turn;
        self
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if !self.double_value.is_power_of_two() {
            return Err(GameError::InvalidConfig(format!(
                "double value {} is not a power of two",
                self.double_value
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_double_value_must_be_power_of_two() {
        assert!(GameConfig::default().with_double_value(8).validate().is_ok());
        assert!(GameConfig::default().with_double_value(0).validate().is_err());
        assert!(GameConfig::default().with_double_value(3).validate().is_err());
    }
}
