//! Errors returned by the public game API

use crate::board::BoardError;
use crate::dice::DiceError;
use crate::executor::InvalidMoveReason;
use crate::movegen::Move;
use crate::turn::Phase;

/// Everything [`crate::Game`] can refuse to do.
///
/// `InvalidMove` and `WrongPhase` are ordinary gameplay rejections: the
/// caller can retry with corrected input and the game is untouched.
/// `OutOfRange` means the caller built a move that can never exist and is a
/// bug on their side.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("illegal move {mv}: {reason}")]
    InvalidMove { mv: Move, reason: InvalidMoveReason },

    #[error("cannot {action} during {phase:?}")]
    WrongPhase { action: &'static str, phase: Phase },

    #[error("cannot end turn while {0} legal moves remain")]
    MovesRemaining(usize),

    #[error("move {0:?} uses indices outside the board")]
    OutOfRange(Move),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Dice(#[from] DiceError),

    #[error(transparent)]
    Board(#[from] BoardError),
}

impl GameError {
    /// Rejections a player can fix by choosing differently
    pub fn is_gameplay(&self) -> bool {
        matches!(
            self,
            GameError::InvalidMove { .. } | GameError::WrongPhase { .. } | GameError::MovesRemaining(_)
        )
    }
}
