//! Game session: the turn state machine and public API
//!
//! A [`Game`] owns its board, turn state, history and dice source. It is
//! the only thing that mutates the board, always through
//! [`executor::apply`](crate::executor::apply). Callers read it through
//! [`Snapshot`]s.

use crate::board::{Board, Color, PerColor, NUM_POINTS};
use crate::config::GameConfig;
use crate::dice::{self, DiceSource, Roll, SeededDice};
use crate::error::GameError;
use crate::executor::{self, MoveHistoryEntry};
use crate::movegen::{legal_moves, Move};
use crate::setup::Setup;
use crate::turn::{Phase, TurnState};
use crate::win::{self, Outcome, WinKind};
use serde::{Deserialize, Serialize};

// ============================================================================
// SNAPSHOT
// ============================================================================

/// Read-only copy of everything a client needs to render the game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub points: [i8; NUM_POINTS],
    pub bar: PerColor<u8>,
    pub born_off: PerColor<u8>,
    pub dice: Vec<u8>,
    pub dice_used: Vec<bool>,
    pub phase: Phase,
    pub current_player: Color,
    pub double_value: u32,
    pub outcome: Option<Outcome>,
}

// ============================================================================
// GAME
// ============================================================================

pub struct Game<D: DiceSource = SeededDice> {
    board: Board,
    turn: TurnState,
    /// Legal moves for the current board and remaining dice (Moving only)
    legal: Vec<Move>,
    history: Vec<MoveHistoryEntry>,
    outcome: Option<Outcome>,
    config: GameConfig,
    dice: D,
}

impl Game<SeededDice> {
    /// New game from the standard position, dice seeded from `config.seed`
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let dice = match config.seed {
            Some(seed) => SeededDice::from_seed(seed),
            None => SeededDice::from_entropy(),
        };
        Self::with_dice(config, dice)
    }
}

impl<D: DiceSource> Game<D> {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// New game from the standard position with an explicit dice source
    pub fn with_dice(config: GameConfig, dice: D) -> Result<Self, GameError> {
        config.validate()?;
        let turn = TurnState::new(config.starting_player, config.double_value);

        Ok(Self {
            board: Board::standard(),
            turn,
            legal: Vec::new(),
            history: Vec::new(),
            outcome: None,
            config,
            dice,
        })
    }

    /// Start from a custom position; `setup.to_move` rolls first
    pub fn from_setup(config: GameConfig, setup: &Setup, dice: D) -> Result<Self, GameError> {
        let board = setup.to_board()?;
        let config = config.with_starting_player(setup.to_move);
        let mut game = Self::with_dice(config, dice)?;
        game.board = board;
        Ok(game)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    pub fn phase(&self) -> Phase {
        self.turn.phase()
    }

    pub fn current_player(&self) -> Color {
        self.turn.current_player()
    }

    pub fn remaining_dice(&self) -> Vec<u8> {
        self.turn.remaining_dice()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn history(&self) -> &[MoveHistoryEntry] {
        &self.history
    }

    pub fn snapshot(&self) -> Snapshot {
        let pool = self.turn.dice();
        Snapshot {
            points: *self.board.points(),
            bar: self.board.bar_counts(),
            born_off: self.board.born_off_counts(),
            dice: pool.values().to_vec(),
            dice_used: pool.used().to_vec(),
            phase: self.turn.phase(),
            current_player: self.turn.current_player(),
            double_value: self.turn.double_value(),
            outcome: self.outcome,
        }
    }

    // ========================================================================
    // TURN FLOW
    // ========================================================================

    /// Roll for the current player. A roll with no playable die ends the
    /// turn immediately (forced pass).
    pub fn roll_dice(&mut self) -> Result<Roll, GameError> {
        self.expect_phase(Phase::Rolling, "roll dice")?;

        let roll = dice::roll(&mut self.dice)?;
        self.turn.start_moving(roll);
        self.refresh_legal();

        tracing::debug!(
            "{:?} rolled {}-{} ({} legal moves)",
            self.turn.current_player(),
            roll.first,
            roll.second,
            self.legal.len()
        );

        if self.legal.is_empty() {
            tracing::debug!("{:?} cannot move, forced pass", self.turn.current_player());
            self.finish_turn();
        }

        Ok(roll)
    }

    /// Legal moves for the current player with the unplayed dice
    pub fn available_moves(&self) -> Result<Vec<Move>, GameError> {
        match self.turn.phase() {
            Phase::Moving => Ok(self.legal.clone()),
            Phase::TurnOver => Ok(Vec::new()),
            phase => Err(GameError::WrongPhase {
                action: "list moves",
                phase,
            }),
        }
    }

    /// Play one move. On rejection nothing changes.
    pub fn make_move(&mut self, mv: Move) -> Result<Snapshot, GameError> {
        self.expect_phase(Phase::Moving, "make a move")?;

        let applied = match executor::apply(&self.board, &self.turn, &self.legal, mv) {
            Ok(applied) => applied,
            Err(err) => {
                tracing::warn!("{:?} rejected: {}", self.turn.current_player(), err);
                return Err(err);
            }
        };

        tracing::debug!(
            "{:?} played {}{}",
            applied.entry.player,
            mv,
            if applied.entry.capture { " (hit)" } else { "" }
        );

        self.board = applied.board;
        self.turn = applied.turn;
        self.history.push(applied.entry);
        self.refresh_legal();

        if self.legal.is_empty() {
            self.finish_turn();
        }

        Ok(self.snapshot())
    }

    /// Pass the turn to the opponent once it is over.
    ///
    /// A turn reaches `TurnOver` as soon as no legal move is left, so in
    /// `Moving` there is always something still to play.
    pub fn end_turn(&mut self) -> Result<Snapshot, GameError> {
        match self.turn.phase() {
            Phase::TurnOver => {}
            Phase::Moving => return Err(GameError::MovesRemaining(self.legal.len())),
            phase => {
                return Err(GameError::WrongPhase {
                    action: "end the turn",
                    phase,
                })
            }
        }

        self.pass_turn();
        Ok(self.snapshot())
    }

    /// Session-imposed pass (e.g. move timeout): ends the turn even if
    /// moves remain
    pub fn force_pass(&mut self) -> Result<Snapshot, GameError> {
        if self.turn.phase() == Phase::GameOver {
            return Err(GameError::WrongPhase {
                action: "pass",
                phase: Phase::GameOver,
            });
        }

        tracing::debug!("{:?} forced to pass", self.turn.current_player());
        self.pass_turn();
        Ok(self.snapshot())
    }

    /// `loser` concedes the game
    pub fn forfeit(&mut self, loser: Color) -> Result<Snapshot, GameError> {
        if self.turn.phase() == Phase::GameOver {
            return Err(GameError::WrongPhase {
                action: "forfeit",
                phase: Phase::GameOver,
            });
        }

        let outcome = Outcome::new(loser.opponent(), WinKind::Forfeit, self.turn.double_value());
        self.end_game(outcome);
        Ok(self.snapshot())
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    fn expect_phase(&self, expected: Phase, action: &'static str) -> Result<(), GameError> {
        let phase = self.turn.phase();
        if phase == expected {
            Ok(())
        } else {
            Err(GameError::WrongPhase { action, phase })
        }
    }

    fn refresh_legal(&mut self) {
        self.legal = legal_moves(
            &self.board,
            self.turn.current_player(),
            &self.turn.remaining_dice(),
        );
    }

    /// Moving -> TurnOver, then GameOver if the mover has won
    fn finish_turn(&mut self) {
        self.turn.set_phase(Phase::TurnOver);
        self.legal.clear();

        let player = self.turn.current_player();
        if let Some(outcome) = win::detect(&self.board, player, self.turn.double_value()) {
            self.end_game(outcome);
            return;
        }

        if self.config.auto_end_turn {
            self.pass_turn();
        }
    }

    fn pass_turn(&mut self) {
        self.legal.clear();
        self.turn.flip();
    }

    fn end_game(&mut self, outcome: Outcome) {
        tracing::info!(
            "{:?} wins: {:?} for {} points",
            outcome.winner,
            outcome.kind,
            outcome.points
        );
        self.legal.clear();
        self.outcome = Some(outcome);
        self.turn.set_phase(Phase::GameOver);
    }
}
