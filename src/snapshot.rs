//! The client's copy of authority state.

use crate::games::tictactoe::{Board, GameStatus, Player};
use serde::{Deserialize, Serialize};

/// Complete game state as last broadcast by the authority.
///
/// A snapshot is replaced whole on every broadcast; there is no field-level
/// merge. Its serialized form is the inbound state broadcast:
///
/// ```json
/// {"board":[["X",null,null],[null,null,null],[null,null,null]],
///  "currentPlayer":"O","winner":null,"playable":true}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
#[serde(rename_all = "camelCase")]
pub struct ClientSnapshot {
    /// The 3x3 board.
    board: Board,
    /// Player whose move the authority currently accepts.
    current_player: Player,
    /// Winner, once declared.
    winner: Option<Player>,
    /// Whether the authority accepts further moves.
    playable: bool,
}

impl Default for ClientSnapshot {
    fn default() -> Self {
        Self {
            board: Board::new(),
            current_player: Player::X,
            winner: None,
            playable: true,
        }
    }
}

impl ClientSnapshot {
    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player whose move the authority currently accepts.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Returns the authority's playability flag.
    pub fn playable(&self) -> bool {
        self.playable
    }

    /// Returns the declared winner, if any.
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// True when the authority stopped accepting moves.
    pub fn is_board_full(&self) -> bool {
        !self.playable
    }

    /// True iff a winner is declared or the board is no longer playable.
    pub fn is_game_over(&self) -> bool {
        self.winner.is_some() || self.is_board_full()
    }

    /// Game over without a winner.
    pub fn is_draw(&self) -> bool {
        self.winner.is_none() && self.is_board_full()
    }

    /// Summarizes the snapshot for display.
    pub fn status(&self) -> GameStatus {
        match self.winner {
            Some(player) => GameStatus::Won(player),
            None if self.is_board_full() => GameStatus::Draw,
            None => GameStatus::InProgress,
        }
    }
}
