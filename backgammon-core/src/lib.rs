//! Backgammon Core - rules engine
//!
//! This crate provides the core game logic for backgammon:
//! - Board position with piece-conservation checks
//! - Seedable, injectable dice
//! - Legal move generation (bar entry, blocking, bear-off, dice usage)
//! - Move execution and history
//! - Turn state machine with forced passes
//! - Win detection (single / gammon / backgammon)

pub mod board;
pub mod dice;
pub mod movegen;
pub mod turn;
pub mod executor;
pub mod win;
pub mod error;
pub mod config;
pub mod setup;
pub mod game;

// Re-exports for convenient access
pub use board::{Board, BoardError, Color, PerColor, BAR, OFF, PIECES_PER_SIDE};
pub use dice::{DiceError, DicePool, DiceSource, FixedDice, Roll, SeededDice};
pub use movegen::{legal_moves, Move};
pub use turn::{Phase, TurnState};
pub use executor::{InvalidMoveReason, MoveHistoryEntry};
pub use win::{Outcome, WinKind};
pub use error::GameError;
pub use config::GameConfig;
pub use setup::Setup;
pub use game::{Game, Snapshot};
