//! Board position: 24 signed points, bar and borne-off counts

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Number of points on the board
pub const NUM_POINTS: usize = 24;

/// Pieces each color starts with
pub const PIECES_PER_SIDE: u8 = 15;

/// Location index of the bar (move source only)
pub const BAR: u8 = 0;

/// Location index for "borne off" (move destination only)
pub const OFF: u8 = 25;

/// Width of a home quadrant
pub const HOME_SIZE: u8 = 6;

/// Standard opening placement for White, as (point, count).
/// Black mirrors it (point p becomes 25 - p).
const STANDARD_SETUP: [(u8, u8); 4] = [(1, 2), (12, 5), (17, 3), (19, 5)];

// ============================================================================
// COLOR
// ============================================================================

/// Piece color.
///
/// White (color A) is stored as positive counts and travels 1 -> 24.
/// Black (color B) is stored as negative counts and travels 24 -> 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Sign used for this color's counts in `points`
    pub fn sign(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Distance travelled by a piece at `location`, in this color's direction.
    ///
    /// The bar is progress 0 and bearing off is progress 25, so the same
    /// formula converts board locations to progress and back.
    pub fn progress(self, location: u8) -> u8 {
        match (self, location) {
            (_, BAR) => 0,
            (_, OFF) => OFF,
            (Color::White, point) => point,
            (Color::Black, point) => OFF - point,
        }
    }

    /// Inverse of [`Color::progress`]
    pub fn location(self, progress: u8) -> u8 {
        // The mapping is an involution fixing BAR and OFF
        self.progress(progress)
    }

    /// Pips a piece on `point` still has to travel to bear off
    pub fn pip_distance(self, point: u8) -> u8 {
        OFF - self.progress(point)
    }

    /// Points forming this color's home quadrant
    pub fn home(self) -> RangeInclusive<u8> {
        match self {
            Color::White => (OFF - HOME_SIZE)..=(OFF - 1),
            Color::Black => 1..=HOME_SIZE,
        }
    }
}

/// A value kept once per color
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerColor<T> {
    pub white: T,
    pub black: T,
}

impl<T: Copy> PerColor<T> {
    pub const fn new(white: T, black: T) -> Self {
        Self { white, black }
    }

    pub fn get(&self, color: Color) -> T {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    pub fn get_mut(&mut self, color: Color) -> &mut T {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("location {0} is not on the board")]
    OutOfRange(u8),

    #[error("no {color:?} piece at location {location}")]
    NoPiece { color: Color, location: u8 },

    #[error("point {point} is blocked by {count} opposing pieces")]
    Blocked { point: u8, count: u8 },

    #[error("point {0} is claimed by both colors")]
    MixedPoint(u8),

    #[error("{color:?} accounts for {count} pieces, expected {PIECES_PER_SIDE}")]
    Conservation { color: Color, count: u32 },
}

// ============================================================================
// BOARD
// ============================================================================

/// Canonical backgammon position.
///
/// The only mutation is [`Board::move_pieces`]; every other method is a
/// read-only query. A point's sign says who owns it, so one point can never
/// hold both colors.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    points: [i8; NUM_POINTS],
    bar: PerColor<u8>,
    born_off: PerColor<u8>,
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl Board {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Standard starting position
    pub fn standard() -> Self {
        let mut points = [0i8; NUM_POINTS];
        for &(point, count) in &STANDARD_SETUP {
            points[point as usize - 1] = count as i8;
            points[(OFF - point) as usize - 1] = -(count as i8);
        }

        Self {
            points,
            bar: PerColor::default(),
            born_off: PerColor::default(),
        }
    }

    /// Build a position from raw parts, rejecting anything that breaks
    /// piece conservation
    pub fn from_parts(
        points: [i8; NUM_POINTS],
        bar: PerColor<u8>,
        born_off: PerColor<u8>,
    ) -> Result<Self, BoardError> {
        let board = Self { points, bar, born_off };
        board.check_invariants()?;
        Ok(board)
    }

    /// Build a position from sparse (point, count) placements
    pub fn from_placements(
        white: &[(u8, u8)],
        black: &[(u8, u8)],
        bar: PerColor<u8>,
        born_off: PerColor<u8>,
    ) -> Result<Self, BoardError> {
        let mut points = [0i8; NUM_POINTS];

        for (color, placements) in [(Color::White, white), (Color::Black, black)] {
            for &(point, count) in placements {
                let idx = point_index(point).ok_or(BoardError::OutOfRange(point))?;
                let current = points[idx];
                if current != 0 && current.signum() != color.sign() {
                    return Err(BoardError::MixedPoint(point));
                }
                let total = current.unsigned_abs() as u32 + count as u32;
                if total > PIECES_PER_SIDE as u32 {
                    return Err(BoardError::Conservation { color, count: total });
                }
                points[idx] = color.sign() * total as i8;
            }
        }

        Self::from_parts(points, bar, born_off)
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Raw signed counts, index 0 is point 1
    pub fn points(&self) -> &[i8; NUM_POINTS] {
        &self.points
    }

    /// Signed count on a point (0 for empty or off-board indices)
    pub fn point(&self, point: u8) -> i8 {
        point_index(point).map_or(0, |idx| self.points[idx])
    }

    pub fn piece_count_at(&self, point: u8) -> u8 {
        self.point(point).unsigned_abs()
    }

    pub fn owner_at(&self, point: u8) -> Option<Color> {
        match self.point(point) {
            0 => None,
            n if n > 0 => Some(Color::White),
            _ => Some(Color::Black),
        }
    }

    pub fn is_blot(&self, point: u8) -> bool {
        self.piece_count_at(point) == 1
    }

    /// True when `color` may not land on `point`
    pub fn is_blocked_for(&self, color: Color, point: u8) -> bool {
        self.owner_at(point) == Some(color.opponent()) && self.piece_count_at(point) >= 2
    }

    pub fn bar(&self, color: Color) -> u8 {
        self.bar.get(color)
    }

    pub fn born_off(&self, color: Color) -> u8 {
        self.born_off.get(color)
    }

    pub fn bar_counts(&self) -> PerColor<u8> {
        self.bar
    }

    pub fn born_off_counts(&self) -> PerColor<u8> {
        self.born_off
    }

    /// Points holding at least one piece of `color`, in board order
    pub fn occupied_points(&self, color: Color) -> impl Iterator<Item = u8> + '_ {
        (1..=NUM_POINTS as u8).filter(move |&p| self.owner_at(p) == Some(color))
    }

    pub fn pieces_on_board(&self, color: Color) -> u32 {
        self.occupied_points(color)
            .map(|p| self.piece_count_at(p) as u32)
            .sum()
    }

    /// All of `color`'s pieces are in its home quadrant or borne off
    pub fn all_pieces_home(&self, color: Color) -> bool {
        if self.bar(color) > 0 {
            return false;
        }
        let home = color.home();
        self.occupied_points(color).all(|p| home.contains(&p))
    }

    /// Total pips `color` needs to bear everything off
    pub fn pip_count(&self, color: Color) -> u32 {
        let on_board: u32 = self
            .occupied_points(color)
            .map(|p| self.piece_count_at(p) as u32 * color.pip_distance(p) as u32)
            .sum();
        on_board + self.bar(color) as u32 * OFF as u32
    }

    /// Smallest progress among `color`'s pieces (its rearmost piece)
    pub fn rearmost_progress(&self, color: Color) -> Option<u8> {
        if self.bar(color) > 0 {
            return Some(0);
        }
        self.occupied_points(color).map(|p| color.progress(p)).min()
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    /// Move `count` pieces of `color` from `from` (a point, or [`BAR`]) to
    /// `to` (a point, or [`OFF`]).
    ///
    /// Landing on a single opposing piece sends it to the opponent's bar.
    /// Landing on two or more is rejected and nothing changes. Returns
    /// whether a capture happened.
    pub fn move_pieces(
        &mut self,
        color: Color,
        from: u8,
        to: u8,
        count: u8,
    ) -> Result<bool, BoardError> {
        if from > NUM_POINTS as u8 {
            return Err(BoardError::OutOfRange(from));
        }
        if to == BAR || to > OFF {
            return Err(BoardError::OutOfRange(to));
        }

        let available = if from == BAR {
            self.bar(color)
        } else if self.owner_at(from) == Some(color) {
            self.piece_count_at(from)
        } else {
            0
        };
        if count == 0 || available < count {
            return Err(BoardError::NoPiece { color, location: from });
        }

        if to != OFF && self.is_blocked_for(color, to) {
            return Err(BoardError::Blocked {
                point: to,
                count: self.piece_count_at(to),
            });
        }

        // Validated: from here on nothing can fail
        if from == BAR {
            *self.bar.get_mut(color) -= count;
        } else {
            self.points[from as usize - 1] -= color.sign() * count as i8;
        }

        let mut captured = false;
        if to == OFF {
            *self.born_off.get_mut(color) += count;
        } else {
            let idx = to as usize - 1;
            if self.owner_at(to) == Some(color.opponent()) {
                self.points[idx] = 0;
                *self.bar.get_mut(color.opponent()) += 1;
                captured = true;
            }
            self.points[idx] += color.sign() * count as i8;
        }

        debug_assert_eq!(self.check_invariants(), Ok(()));
        Ok(captured)
    }

    /// Move a single piece, see [`Board::move_pieces`]
    pub fn move_piece(&mut self, color: Color, from: u8, to: u8) -> Result<bool, BoardError> {
        self.move_pieces(color, from, to, 1)
    }

    // ========================================================================
    // INVARIANTS
    // ========================================================================

    /// Conservation: pieces on board + bar + borne off == 15 per color
    pub fn check_invariants(&self) -> Result<(), BoardError> {
        for color in [Color::White, Color::Black] {
            let count = self.pieces_on_board(color)
                + self.bar(color) as u32
                + self.born_off(color) as u32;
            if count != PIECES_PER_SIDE as u32 {
                return Err(BoardError::Conservation { color, count });
            }
        }
        Ok(())
    }
}

fn point_index(point: u8) -> Option<usize> {
    (1..=NUM_POINTS as u8)
        .contains(&point)
        .then(|| point as usize - 1)
}
