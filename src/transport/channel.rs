//! In-process transport backed by a tokio channel.

use super::Transport;
use crate::error::TransportError;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, instrument, warn};

/// Transport that hands outbound frames to an in-process receiver.
///
/// Useful for embedding an authority in the same process and for driving the
/// client in tests.
#[derive(Debug)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<String>,
    fail_sends: AtomicBool,
}

impl ChannelTransport {
    /// Creates a transport and the receiver that observes its outbound frames.
    pub fn pair() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                fail_sends: AtomicBool::new(false),
            },
            rx,
        )
    }

    /// Makes subsequent sends fail, as if the link were severed.
    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl Transport for ChannelTransport {
    #[instrument(skip(self, frame))]
    async fn send(&self, frame: String) -> Result<(), TransportError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            warn!("Channel transport marked as severed");
            return Err(TransportError::new("Link severed"));
        }
        debug!(frame = %frame, "Queued outbound frame");
        self.tx
            .send(frame)
            .map_err(|_| TransportError::new("Receiver dropped"))
    }
}
