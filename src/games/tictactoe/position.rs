//! Cell addressing: flat indices, (row, col) pairs and named positions.

use super::types::BOARD_SIZE;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Maps a flat row-major index to `(row, col)`.
///
/// Index 0 is the top-left cell and 8 the bottom-right one. The mapping is a
/// plain division, so it never fails.
pub fn cell_coordinates(flat_index: usize) -> (usize, usize) {
    (flat_index / BOARD_SIZE, flat_index % BOARD_SIZE)
}

/// A position on the tic-tac-toe board (0-8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
pub enum Position {
    /// Top-left (position 0)
    TopLeft,
    /// Top-center (position 1)
    TopCenter,
    /// Top-right (position 2)
    TopRight,
    /// Middle-left (position 3)
    MiddleLeft,
    /// Center (position 4)
    Center,
    /// Middle-right (position 5)
    MiddleRight,
    /// Bottom-left (position 6)
    BottomLeft,
    /// Bottom-center (position 7)
    BottomCenter,
    /// Bottom-right (position 8)
    BottomRight,
}

impl Position {
    /// All 9 positions.
    pub const ALL: [Position; 9] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// Get label for this position (for display).
    pub fn label(&self) -> &'static str {
        match self {
            Position::TopLeft => "Top-left",
            Position::TopCenter => "Top-center",
            Position::TopRight => "Top-right",
            Position::MiddleLeft => "Middle-left",
            Position::Center => "Center",
            Position::MiddleRight => "Middle-right",
            Position::BottomLeft => "Bottom-left",
            Position::BottomCenter => "Bottom-center",
            Position::BottomRight => "Bottom-right",
        }
    }

    /// Parse from a label fragment or a 1-based cell number (1-9).
    ///
    /// Words may be separated by spaces or hyphens. An exact label wins over
    /// a fragment, so `center` is the middle cell, not `Top-center`.
    #[instrument]
    pub fn from_label_or_number(s: &str) -> Option<Position> {
        if let Ok(num) = s.trim().parse::<usize>() {
            return num.checked_sub(1).and_then(Self::from_index);
        }

        let wanted = s
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        let label_of = |pos: &Position| pos.label().to_lowercase();
        <Position as strum::IntoEnumIterator>::iter()
            .find(|pos| label_of(pos) == wanted)
            .or_else(|| {
                <Position as strum::IntoEnumIterator>::iter()
                    .find(|pos| label_of(pos).contains(&wanted))
            })
    }

    /// Converts position to board index (0-8).
    pub fn to_index(self) -> usize {
        self as usize
    }

    /// Creates position from board index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Row of this position (0-2).
    pub fn row(self) -> usize {
        cell_coordinates(self.to_index()).0
    }

    /// Column of this position (0-2).
    pub fn col(self) -> usize {
        cell_coordinates(self.to_index()).1
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
