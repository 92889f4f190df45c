//! Tic-tac-toe state as declared by the authority.
//!
//! Nothing here validates moves or detects wins. The authority owns the rules;
//! these types only carry what it broadcasts.

mod position;
mod types;

pub use position::{Position, cell_coordinates};
pub use types::{Board, GameStatus, Player, Square, BOARD_SIZE};
