//! Wire messages exchanged with the authority.
//!
//! Every frame is a single-line JSON object. Outbound frames are tagged by
//! `action`; the only inbound frame is a full state broadcast, which carries
//! no request identifier. The next broadcast after a move is taken as its
//! reply.

use crate::error::SyncError;
use crate::games::tictactoe::Player;
use crate::snapshot::ClientSnapshot;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Target cell and acting player of a move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct MoveData {
    /// Player making the move, read from the snapshot at request time.
    pub player: Player,
    /// Row, 0-2. Not checked client-side.
    pub row: usize,
    /// Column, 0-2. Not checked client-side.
    pub col: usize,
}

/// Messages sent from client to authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ClientMessage {
    /// `{"action":"move","data":{"player":"X","row":0,"col":0}}`
    Move {
        /// Move payload.
        data: MoveData,
    },
    /// `{"action":"reset"}`
    Reset,
}

impl ClientMessage {
    /// Builds a move request.
    pub fn move_request(player: Player, row: usize, col: usize) -> Self {
        ClientMessage::Move {
            data: MoveData::new(player, row, col),
        }
    }

    /// Serializes to a newline-free text frame.
    #[instrument(level = "debug")]
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        let frame = serde_json::to_string(self)?;
        debug!(frame = %frame, "Encoded client message");
        Ok(frame)
    }
}

/// Parses an inbound state broadcast.
///
/// All four fields must be present and well-typed; unknown extra fields are
/// ignored. On failure nothing is partially adopted.
#[instrument(level = "debug", skip(text), fields(len = text.len()))]
pub fn parse_broadcast(text: &str) -> Result<ClientSnapshot, SyncError> {
    serde_json::from_str::<ClientSnapshot>(text).map_err(|e| {
        warn!(error = %e, frame = %text, "Rejected malformed broadcast");
        SyncError::from(e)
    })
}
