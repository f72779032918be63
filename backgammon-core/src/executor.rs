//! Applying a chosen move
//!
//! [`apply`] is a pure transition `(Board, TurnState, Move) -> (Board,
//! TurnState)`: the inputs are never touched, so a rejected move cannot
//! leave anything half-applied.

use crate::board::{Board, Color, OFF};
use crate::error::GameError;
use crate::movegen::{can_bear_off, destination, Move};
use crate::turn::TurnState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a move was not in the legal set
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum InvalidMoveReason {
    #[error("die value is not among the unplayed dice")]
    WrongDie,

    #[error("pieces on the bar must enter first")]
    MustEnterFromBar,

    #[error("no piece to move there")]
    EmptySource,

    #[error("source point belongs to the opponent")]
    NotOwner,

    #[error("destination does not match the die")]
    WrongDistance,

    #[error("destination holds two or more opposing pieces")]
    Blocked,

    #[error("bearing off is not allowed from there")]
    BearOffNotAllowed,

    #[error("another move uses more of the dice")]
    NotMaximal,
}

/// One line of the move log
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveHistoryEntry {
    pub mv: Move,
    pub player: Color,
    pub capture: bool,
    pub timestamp: DateTime<Utc>,
}

/// Result of a successful [`apply`]
#[derive(Clone, Debug)]
pub struct Applied {
    pub board: Board,
    pub turn: TurnState,
    pub entry: MoveHistoryEntry,
}

/// Apply `mv` for the current player if it is in `legal`.
///
/// `legal` must be what [`crate::movegen::legal_moves`] returns for this
/// board and the turn's remaining dice.
pub fn apply(board: &Board, turn: &TurnState, legal: &[Move], mv: Move) -> Result<Applied, GameError> {
    if !mv.in_range() {
        return Err(GameError::OutOfRange(mv));
    }

    let player = turn.current_player();
    if !legal.contains(&mv) {
        let reason = diagnose(board, player, &turn.remaining_dice(), mv);
        return Err(GameError::InvalidMove { mv, reason });
    }

    let mut next_board = board.clone();
    let capture = next_board.move_piece(player, mv.from, mv.to)?;

    let mut next_turn = turn.clone();
    next_turn.dice_mut().consume(mv.die)?;

    Ok(Applied {
        board: next_board,
        turn: next_turn,
        entry: MoveHistoryEntry {
            mv,
            player,
            capture,
            timestamp: Utc::now(),
        },
    })
}

/// Explain why `mv` is not legal, checking the cheapest rules first
pub fn diagnose(board: &Board, color: Color, remaining: &[u8], mv: Move) -> InvalidMoveReason {
    if !remaining.contains(&mv.die) {
        return InvalidMoveReason::WrongDie;
    }

    if mv.is_entry() {
        if board.bar(color) == 0 {
            return InvalidMoveReason::EmptySource;
        }
    } else {
        if board.bar(color) > 0 {
            return InvalidMoveReason::MustEnterFromBar;
        }
        match board.owner_at(mv.from) {
            None => return InvalidMoveReason::EmptySource,
            Some(owner) if owner != color => return InvalidMoveReason::NotOwner,
            Some(_) => {}
        }
    }

    match destination(color, mv.from, mv.die) {
        Some(to) if to == mv.to => {
            if board.is_blocked_for(color, to) {
                return InvalidMoveReason::Blocked;
            }
        }
        Some(_) => return InvalidMoveReason::WrongDistance,
        None if mv.to != OFF => return InvalidMoveReason::WrongDistance,
        None => {
            if !can_bear_off(board, color, mv.from, mv.die) {
                return InvalidMoveReason::BearOffNotAllowed;
            }
        }
    }

    InvalidMoveReason::NotMaximal
}
