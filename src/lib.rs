//! Strictly Sync - thin client for a server-authoritative tic-tac-toe game
//!
//! A single persistent connection to the authority is the only source of
//! truth. Local actions request mutations; only inbound broadcasts change
//! state.
//!
//! # Architecture
//!
//! - **Client**: owns the snapshot and the single pending move
//! - **Protocol**: JSON frames exchanged with the authority
//! - **Transport**: send primitive plus inbound frame stream (WebSocket or in-process)
//! - **Console**: line-oriented frontend over a client handle
//!
//! # Example
//!
//! ```no_run
//! use strictly_sync::{pump, MoveOutcome, SyncClient, WebSocketTransport};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let (transport, inbound) = WebSocketTransport::connect("ws://127.0.0.1:3000").await?;
//! let client = SyncClient::new(transport);
//! tokio::spawn(pump(inbound, client.clone()));
//!
//! if let MoveOutcome::Resolved(snapshot) = client.request_move(1, 1).await? {
//!     println!("{}", snapshot.board().display());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod config;
mod console;
mod error;
mod games;
mod protocol;
mod snapshot;
mod transport;

// Crate-level exports - Synchronization client
pub use client::{MoveOutcome, SyncClient, SyncState};

// Crate-level exports - Configuration
pub use config::{ClientConfig, ConfigError};

// Crate-level exports - Frontend
pub use console::{Console, ConsoleCommand, HELP, render};

// Crate-level exports - Errors
pub use error::{SyncError, TransportError};

// Crate-level exports - Wire protocol
pub use protocol::{ClientMessage, MoveData, parse_broadcast};
pub use snapshot::ClientSnapshot;

// Crate-level exports - Transport
pub use transport::{ChannelTransport, Inbound, Transport, WebSocketTransport, pump};

// Crate-level exports - Game types (tic-tac-toe)
pub use games::tictactoe::{
    BOARD_SIZE, Board, GameStatus, Player, Position, Square, cell_coordinates,
};
