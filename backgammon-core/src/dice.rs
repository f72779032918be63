//! Dice rolling with an injected randomness source

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Faces on a die
pub const DIE_FACES: u8 = 6;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiceError {
    #[error("die value {0} is outside 1..=6")]
    OutOfRange(u8),

    #[error("scripted dice ran out of values")]
    Exhausted,

    #[error("no unplayed {0} left this turn")]
    NotInPool(u8),
}

/// Anything that can produce single die values.
///
/// Sources are owned by the game that uses them; there is no shared
/// global generator.
pub trait DiceSource {
    fn roll_die(&mut self) -> Result<u8, DiceError>;
}

impl<T: DiceSource + ?Sized> DiceSource for Box<T> {
    fn roll_die(&mut self) -> Result<u8, DiceError> {
        (**self).roll_die()
    }
}

impl<T: DiceSource + ?Sized> DiceSource for &mut T {
    fn roll_die(&mut self) -> Result<u8, DiceError> {
        (**self).roll_die()
    }
}

/// Uniform dice backed by a ChaCha8 generator
#[derive(Clone, Debug)]
pub struct SeededDice {
    rng: ChaCha8Rng,
}

impl SeededDice {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl DiceSource for SeededDice {
    fn roll_die(&mut self) -> Result<u8, DiceError> {
        Ok(self.rng.gen_range(1..=DIE_FACES))
    }
}

/// Scripted dice: yields the queued values in order
#[derive(Clone, Debug, Default)]
pub struct FixedDice {
    values: VecDeque<u8>,
}

impl FixedDice {
    pub fn new(values: impl IntoIterator<Item = u8>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Queue both dice of one roll
    pub fn push_roll(&mut self, first: u8, second: u8) {
        self.values.push_back(first);
        self.values.push_back(second);
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl DiceSource for FixedDice {
    fn roll_die(&mut self) -> Result<u8, DiceError> {
        self.values.pop_front().ok_or(DiceError::Exhausted)
    }
}

// ============================================================================
// ROLL
// ============================================================================

/// The two values shown after a roll
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RollParts")]
pub struct Roll {
    pub first: u8,
    pub second: u8,
}

/// Unchecked wire form of [`Roll`]
#[derive(Deserialize)]
struct RollParts {
    first: u8,
    second: u8,
}

impl TryFrom<RollParts> for Roll {
    type Error = DiceError;

    fn try_from(parts: RollParts) -> Result<Self, Self::Error> {
        Roll::new(parts.first, parts.second)
    }
}

impl Roll {
    pub fn new(first: u8, second: u8) -> Result<Self, DiceError> {
        for value in [first, second] {
            if !(1..=DIE_FACES).contains(&value) {
                return Err(DiceError::OutOfRange(value));
            }
        }
        Ok(Self { first, second })
    }

    pub fn is_double(&self) -> bool {
        self.first == self.second
    }

    /// Playable die values: four copies on a double, otherwise both dice
    pub fn pool(&self) -> Vec<u8> {
        if self.is_double() {
            vec![self.first; 4]
        } else {
            vec![self.first, self.second]
        }
    }
}

/// Roll two dice from `source`
pub fn roll<D: DiceSource + ?Sized>(source: &mut D) -> Result<Roll, DiceError> {
    let first = source.roll_die()?;
    let second = source.roll_die()?;
    Roll::new(first, second)
}

// ============================================================================
// DICE POOL
// ============================================================================

/// Die values of the current turn and which of them have been played
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DicePool {
    values: Vec<u8>,
    used: Vec<bool>,
}

impl DicePool {
    pub fn from_roll(roll: Roll) -> Self {
        let values = roll.pool();
        let used = vec![false; values.len()];
        Self { values, used }
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn used(&self) -> &[bool] {
        &self.used
    }

    /// Values not yet played this turn
    pub fn remaining(&self) -> Vec<u8> {
        self.values
            .iter()
            .zip(&self.used)
            .filter(|&(_, &used)| !used)
            .map(|(&value, _)| value)
            .collect()
    }

    pub fn contains(&self, die: u8) -> bool {
        self.values
            .iter()
            .zip(&self.used)
            .any(|(&value, &used)| value == die && !used)
    }

    /// Mark one unused copy of `die` as played
    pub fn consume(&mut self, die: u8) -> Result<(), DiceError> {
        let slot = self
            .values
            .iter()
            .zip(&self.used)
            .position(|(&value, &used)| value == die && !used)
            .ok_or(DiceError::NotInPool(die))?;
        self.used[slot] = true;
        Ok(())
    }

    pub fn is_exhausted(&self) -> bool {
        self.used.iter().all(|&used| used)
    }
}
