//! Outbound send primitive and inbound frame delivery.
//!
//! The client only needs `send(text)`. Inbound frames arrive on a separate
//! stream and are handed to [`pump`], which feeds the client.

mod channel;
mod websocket;

pub use channel::ChannelTransport;
pub use websocket::{Inbound, WebSocketTransport};

use crate::client::SyncClient;
use crate::error::TransportError;
use futures::{Stream, StreamExt};
use tracing::{debug, info, instrument, warn};

/// A message-framed, order-preserving link to the authority.
#[async_trait::async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Sends one text frame.
    ///
    /// Returns an error if the link is closed or the frame was rejected.
    async fn send(&self, frame: String) -> Result<(), TransportError>;
}

/// Feeds every inbound text frame to the client until the stream ends.
///
/// Malformed broadcasts are logged and skipped; the client keeps its prior
/// state for those. Returns the number of broadcasts applied.
#[instrument(skip_all)]
pub async fn pump<T, S>(mut inbound: S, client: SyncClient<T>) -> usize
where
    T: Transport,
    S: Stream<Item = String> + Unpin,
{
    let mut applied = 0;
    while let Some(frame) = inbound.next().await {
        match client.on_broadcast(&frame).await {
            Ok(()) => applied += 1,
            Err(e) => warn!(error = %e, "Discarded inbound frame"),
        }
        debug!(applied, "Inbound frame handled");
    }
    info!(applied, "Inbound stream ended");
    applied
}
