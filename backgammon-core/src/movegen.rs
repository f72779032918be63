//! Legal move generation
//!
//! Moves are generated one die at a time, then filtered by looking ahead
//! through every order in which the remaining dice can be played: a move
//! is legal only if it starts a sequence that uses as many dice as the
//! position allows, and a lone playable die must be the larger one when
//! that one can be played.

use crate::board::{Board, Color, BAR, NUM_POINTS, OFF};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// MOVE
// ============================================================================

/// A single checker move.
///
/// `from` is a point 1..=24 or [`BAR`] (0). `to` is a point 1..=24 or
/// [`OFF`] (25). Both use board numbering for either color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Move {
    pub from: u8,
    pub to: u8,
    pub die: u8,
}

impl Move {
    pub const fn new(from: u8, to: u8, die: u8) -> Self {
        Self { from, to, die }
    }

    pub fn is_entry(&self) -> bool {
        self.from == BAR
    }

    pub fn is_bear_off(&self) -> bool {
        self.to == OFF
    }

    /// Indices are within the ranges a move can ever use
    pub fn in_range(&self) -> bool {
        self.from <= NUM_POINTS as u8 && (1..=OFF).contains(&self.to) && (1..=6).contains(&self.die)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.from {
            BAR => write!(f, "bar/")?,
            from => write!(f, "{from}/")?,
        }
        match self.to {
            OFF => write!(f, "off")?,
            to => write!(f, "{to}")?,
        }
        write!(f, " ({})", self.die)
    }
}

// ============================================================================
// SINGLE-DIE GENERATION
// ============================================================================

/// Where a piece of `color` on `from` lands with `die`, if it stays on the
/// board. `None` means the move would carry it past the last point.
pub fn destination(color: Color, from: u8, die: u8) -> Option<u8> {
    let target = color.progress(from) + die;
    (target < OFF).then(|| color.location(target))
}

/// Whether `color` may bear off the piece on `from` with `die`.
///
/// Exact distance always works once everything is home. A larger die only
/// works for the rearmost piece (nothing at or beyond the die's distance).
pub fn can_bear_off(board: &Board, color: Color, from: u8, die: u8) -> bool {
    if !board.all_pieces_home(color) {
        return false;
    }
    let distance = color.pip_distance(from);
    if die == distance {
        return true;
    }
    die > distance && board.rearmost_progress(color) == Some(color.progress(from))
}

/// Every move playable with one die, ignoring what happens to the other dice
pub fn single_die_moves(board: &Board, color: Color, die: u8) -> Vec<Move> {
    let mut moves = Vec::new();

    // Bar pieces must come in before anything else moves
    if board.bar(color) > 0 {
        let entry = color.location(die);
        if !board.is_blocked_for(color, entry) {
            moves.push(Move::new(BAR, entry, die));
        }
        return moves;
    }

    for from in board.occupied_points(color) {
        match destination(color, from, die) {
            Some(to) => {
                if !board.is_blocked_for(color, to) {
                    moves.push(Move::new(from, to, die));
                }
            }
            None => {
                if can_bear_off(board, color, from, die) {
                    moves.push(Move::new(from, OFF, die));
                }
            }
        }
    }

    moves
}

// ============================================================================
// DICE LOOK-AHEAD
// ============================================================================

/// Transposition table keyed by position and sorted remaining dice
type UsageMemo = FxHashMap<(Board, Vec<u8>), usize>;

/// Distinct values in `dice`, ascending
fn distinct(dice: &[u8]) -> Vec<u8> {
    let mut values = dice.to_vec();
    values.sort_unstable();
    values.dedup();
    values
}

/// `dice` with one copy of `die` removed, sorted
fn without(dice: &[u8], die: u8) -> Vec<u8> {
    let mut rest = dice.to_vec();
    if let Some(pos) = rest.iter().position(|&d| d == die) {
        rest.remove(pos);
    }
    rest.sort_unstable();
    rest
}

fn play(board: &Board, color: Color, mv: Move) -> Option<Board> {
    let mut next = board.clone();
    next.move_piece(color, mv.from, mv.to).ok()?;
    Some(next)
}

/// Most dice `color` can play in sequence from this position
fn max_dice_usable(board: &Board, color: Color, dice: &[u8], memo: &mut UsageMemo) -> usize {
    if dice.is_empty() {
        return 0;
    }

    let key = (board.clone(), {
        let mut sorted = dice.to_vec();
        sorted.sort_unstable();
        sorted
    });
    if let Some(&cached) = memo.get(&key) {
        return cached;
    }

    let mut best = 0;
    'search: for die in distinct(dice) {
        let rest = without(dice, die);
        for mv in single_die_moves(board, color, die) {
            let Some(next) = play(board, color, mv) else {
                continue;
            };
            best = best.max(1 + max_dice_usable(&next, color, &rest, memo));
            if best == dice.len() {
                break 'search;
            }
        }
    }

    memo.insert(key, best);
    best
}

/// All legal moves for `color` with the unplayed `dice`.
///
/// An empty result means nothing can be played: the turn is a forced pass.
pub fn legal_moves(board: &Board, color: Color, dice: &[u8]) -> Vec<Move> {
    let mut memo = UsageMemo::default();
    let mut scored: Vec<(Move, usize)> = Vec::new();

    for die in distinct(dice) {
        let rest = without(dice, die);
        for mv in single_die_moves(board, color, die) {
            let Some(next) = play(board, color, mv) else {
                continue;
            };
            let usable = 1 + max_dice_usable(&next, color, &rest, &mut memo);
            scored.push((mv, usable));
        }
    }

    let Some(best) = scored.iter().map(|&(_, usable)| usable).max() else {
        return vec![];
    };

    let mut moves: Vec<Move> = scored
        .into_iter()
        .filter(|&(_, usable)| usable == best)
        .map(|(mv, _)| mv)
        .collect();

    // Only one die of a mixed roll fits: the larger must be played if it can
    if best == 1 && dice.len() == 2 && dice[0] != dice[1] {
        let high = dice[0].max(dice[1]);
        if moves.iter().any(|mv| mv.die == high) {
            moves.retain(|mv| mv.die == high);
        }
    }

    moves.sort_unstable();
    moves.dedup();
    moves
}
