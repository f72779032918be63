//! End-of-game detection and scoring

use crate::board::{Board, Color, PIECES_PER_SIDE};
use serde::{Deserialize, Serialize};

/// How a game was won
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinKind {
    Single,
    Gammon,
    Backgammon,
    /// The loser conceded or was timed out by the session
    Forfeit,
}

impl WinKind {
    /// Points per unit of stake
    pub fn multiplier(self) -> u32 {
        match self {
            WinKind::Single | WinKind::Forfeit => 1,
            WinKind::Gammon => 2,
            WinKind::Backgammon => 3,
        }
    }
}

/// Final result of a game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub winner: Color,
    pub kind: WinKind,
    pub points: u32,
}

impl Outcome {
    pub fn new(winner: Color, kind: WinKind, double_value: u32) -> Self {
        Self {
            winner,
            kind,
            points: kind.multiplier() * double_value,
        }
    }
}

/// Classify a finished game from the loser's position.
///
/// Backgammon: the loser bore nothing off and still has a piece on the bar
/// or in the winner's home. Gammon: the loser bore nothing off. Anything
/// else is a single game.
pub fn classify(board: &Board, winner: Color) -> WinKind {
    let loser = winner.opponent();
    if board.born_off(loser) > 0 {
        return WinKind::Single;
    }

    let in_winners_home = winner
        .home()
        .any(|point| board.owner_at(point) == Some(loser));
    if board.bar(loser) > 0 || in_winners_home {
        WinKind::Backgammon
    } else {
        WinKind::Gammon
    }
}

/// `Some` once `player` has borne off every piece
pub fn detect(board: &Board, player: Color, double_value: u32) -> Option<Outcome> {
    (board.born_off(player) == PIECES_PER_SIDE)
        .then(|| Outcome::new(player, classify(board, player), double_value))
}
