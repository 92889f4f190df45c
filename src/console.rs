//! Line-oriented frontend bound to a [`SyncClient`].
//!
//! Reads commands, issues intents and renders from the current snapshot. It
//! never edits game state itself.

use crate::client::{MoveOutcome, SyncClient};
use crate::error::SyncError;
use crate::games::tictactoe::{GameStatus, Position};
use crate::snapshot::ClientSnapshot;
use crate::transport::Transport;
use tracing::{debug, instrument};

/// A parsed user command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Place a mark at `(row, col)`.
    Move {
        /// Row, 0-2.
        row: usize,
        /// Column, 0-2.
        col: usize,
    },
    /// Start a new game.
    Reset,
    /// Print the board.
    Board,
    /// Print usage.
    Help,
    /// Leave the session.
    Quit,
}

impl ConsoleCommand {
    /// Parses one input line.
    ///
    /// Accepts `reset`, `board`, `help`, `quit`, a `row col` pair, a cell
    /// number 1-9 or a position label such as `center`.
    #[instrument]
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        match line.to_lowercase().as_str() {
            "" => return None,
            "reset" | "r" => return Some(Self::Reset),
            "board" | "b" => return Some(Self::Board),
            "help" | "h" | "?" => return Some(Self::Help),
            "quit" | "q" | "exit" => return Some(Self::Quit),
            _ => {}
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if let [row, col] = parts.as_slice()
            && let (Ok(row), Ok(col)) = (row.parse(), col.parse())
        {
            return Some(Self::Move { row, col });
        }

        Position::from_label_or_number(line).map(|pos| Self::Move {
            row: pos.row(),
            col: pos.col(),
        })
    }
}

/// Usage text shown for `help`.
pub const HELP: &str = "Commands: 1-9 | <row> <col> | <label> | reset | board | quit";

/// Renders the board plus a status line.
pub fn render(snapshot: &ClientSnapshot) -> String {
    let status = match snapshot.status() {
        GameStatus::Won(player) => format!("Player {} wins!", player),
        GameStatus::Draw => "It's a draw!".to_string(),
        GameStatus::InProgress => format!("Player {} to move", snapshot.current_player()),
    };
    format!("{}\n{}", snapshot.board().display(), status)
}

/// Frontend session over a shared client handle.
pub struct Console<T> {
    client: SyncClient<T>,
}

impl<T: Transport> Console<T> {
    /// Binds a console to `client`.
    pub fn new(client: SyncClient<T>) -> Self {
        Self { client }
    }

    /// Runs one command and returns the text to show, if any.
    ///
    /// Board redraws after broadcasts are left to the snapshot subscriber.
    ///
    /// # Errors
    ///
    /// Send failures and reply timeouts from the client.
    #[instrument(skip(self))]
    pub async fn handle(&self, command: ConsoleCommand) -> Result<Option<String>, SyncError> {
        match command {
            ConsoleCommand::Move { row, col } => {
                if self.client.is_game_over() {
                    return Ok(Some("Game is over. Type 'reset' to play again.".to_string()));
                }
                let outcome = self.client.request_move(row, col).await?;
                debug!(?outcome, "Move request finished");
                Ok(match outcome {
                    MoveOutcome::Resolved(_) => None,
                    MoveOutcome::Coalesced => {
                        Some("Still waiting on the previous move.".to_string())
                    }
                    MoveOutcome::Superseded => Some("Move cancelled by reset.".to_string()),
                })
            }
            ConsoleCommand::Reset => {
                self.client.request_reset().await?;
                Ok(None)
            }
            ConsoleCommand::Board => Ok(Some(render(&self.client.snapshot()))),
            ConsoleCommand::Help => Ok(Some(HELP.to_string())),
            ConsoleCommand::Quit => Ok(None),
        }
    }
}
