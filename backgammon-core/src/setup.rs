//! Setup - starting position definition

use crate::board::{Board, BoardError, Color, PerColor, NUM_POINTS};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A position plus the player to move, loadable from JSON
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setup {
    pub name: String,
    pub points: [i8; NUM_POINTS],
    #[serde(default)]
    pub bar: PerColor<u8>,
    #[serde(default)]
    pub born_off: PerColor<u8>,
    #[serde(default = "default_to_move")]
    pub to_move: Color,
}

fn default_to_move() -> Color {
    Color::White
}

impl Setup {
    /// Standard opening with White to move
    pub fn standard() -> Self {
        Self::from_board("standard", &Board::standard(), Color::White)
    }

    pub fn from_board(name: &str, board: &Board, to_move: Color) -> Self {
        Self {
            name: name.to_string(),
            points: *board.points(),
            bar: board.bar_counts(),
            born_off: board.born_off_counts(),
            to_move,
        }
    }

    /// Validate and convert to a [`Board`]
    pub fn to_board(&self) -> Result<Board, BoardError> {
        Board::from_parts(self.points, self.bar, self.born_off)
    }

    /// Parse JSON (dense `points` array or sparse `white`/`black` placements)
    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        // Dense format first
        if let Ok(setup) = serde_json::from_str::<Setup>(content) {
            setup.to_board()?;
            return Ok(setup);
        }

        // Sparse format: lists of [point, count] per color
        #[derive(Deserialize)]
        struct SparseSetup {
            name: Option<String>,
            white: Vec<(u8, u8)>,
            black: Vec<(u8, u8)>,
            #[serde(default)]
            bar: PerColor<u8>,
            #[serde(default)]
            born_off: PerColor<u8>,
            #[serde(default = "default_to_move")]
            to_move: Color,
        }

        if let Ok(sparse) = serde_json::from_str::<SparseSetup>(content) {
            let board = Board::from_placements(&sparse.white, &sparse.black, sparse.bar, sparse.born_off)?;
            let name = sparse.name.unwrap_or_else(|| "unnamed".to_string());
            return Ok(Self::from_board(&name, &board, sparse.to_move));
        }

        // Fall back to the dense error for debugging
        let setup: Setup = serde_json::from_str(content)?;
        Ok(setup)
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read setup: {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("Invalid setup: {}", path.display()))
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for Setup {
    fn default() -> Self {
        Self::standard()
    }
}
