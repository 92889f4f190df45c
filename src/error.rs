//! Error types for the synchronization client.

use derive_more::{Display, Error};
use tracing::instrument;

/// Transport failure with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Transport error: {} at {}:{}", message, file, line)]
pub struct TransportError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl TransportError {
    /// Creates a new transport error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for TransportError {
    #[track_caller]
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::new(format!("WebSocket error: {}", err))
    }
}

/// Errors surfaced by [`crate::SyncClient`] operations.
#[derive(Debug, Clone, Display, Error)]
pub enum SyncError {
    /// Inbound payload did not match the state broadcast schema.
    ///
    /// The message is discarded and the prior snapshot is kept.
    #[display("Malformed broadcast: {}", reason)]
    MalformedBroadcast {
        /// Parser diagnostic.
        reason: String,
    },

    /// The transport rejected or could not deliver an outbound frame.
    #[display("Send failed: {}", _0)]
    SendFailure(TransportError),

    /// No broadcast arrived within the configured bound after a move was sent.
    ///
    /// A broadcast that lands as the bound expires is still applied to the
    /// snapshot, so the local state may already reflect the move even though
    /// the caller got this error.
    #[display("No reply from authority within {} ms", waited_ms)]
    ReplyTimeout {
        /// How long the caller waited.
        waited_ms: u64,
    },
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::MalformedBroadcast {
            reason: err.to_string(),
        }
    }
}

impl From<TransportError> for SyncError {
    fn from(err: TransportError) -> Self {
        SyncError::SendFailure(err)
    }
}
