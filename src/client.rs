//! Synchronization client: the single writer of local game state.
//!
//! The authority is the only source of truth. Local actions never touch the
//! snapshot; they send a request and wait for the next broadcast, which
//! replaces the snapshot whole and resolves the one pending move.
//!
//! State machine per game: `Idle -> AwaitingReply -> Idle`. A move request is
//! accepted only while `Idle`; any broadcast returns to `Idle`; a reset forces
//! `Idle` immediately.

use crate::config::ClientConfig;
use crate::error::{SyncError, TransportError};
use crate::games::tictactoe::Player;
use crate::protocol::{ClientMessage, parse_broadcast};
use crate::snapshot::ClientSnapshot;
use crate::transport::Transport;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, oneshot, watch};
use tracing::{debug, info, instrument, warn};

/// Whether a move request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SyncState {
    /// No pending move; a new request will be sent.
    Idle,
    /// A move was sent and the next broadcast will resolve it.
    AwaitingReply,
}

/// How a move request completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The request was sent and the next broadcast arrived.
    ///
    /// Carries that broadcast. It may or may not reflect the move; the
    /// authority does not say whether it accepted it.
    Resolved(ClientSnapshot),
    /// Another move was already pending. Nothing was sent.
    Coalesced,
    /// The request was sent, but a local reset cleared it before any broadcast.
    Superseded,
}

impl MoveOutcome {
    /// True if this request actually went out on the wire.
    pub fn was_sent(&self) -> bool {
        !matches!(self, MoveOutcome::Coalesced)
    }
}

/// The single in-flight move.
#[derive(Debug)]
struct PendingIntent {
    id: u64,
    resolver: oneshot::Sender<ClientSnapshot>,
}

#[derive(Debug, Default)]
struct SharedState {
    snapshot: ClientSnapshot,
    pending: Option<PendingIntent>,
    next_intent: u64,
}

struct Inner<T> {
    transport: T,
    state: Mutex<SharedState>,
    updates: watch::Sender<ClientSnapshot>,
    move_timeout: Option<Duration>,
}

/// Handle to the synchronization client.
///
/// Cloning is cheap and every clone shares the same state, so one instance can
/// be handed to both the UI and the inbound pump.
pub struct SyncClient<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for SyncClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport> SyncClient<T> {
    /// Creates a client with the default reply bound.
    pub fn new(transport: T) -> Self {
        Self::with_move_timeout(transport, ClientConfig::default().move_timeout())
    }

    /// Creates a client using the reply bound from `config`.
    pub fn from_config(transport: T, config: &ClientConfig) -> Self {
        Self::with_move_timeout(transport, config.move_timeout())
    }

    /// Creates a client with an explicit reply bound. `None` waits forever.
    #[instrument(skip(transport))]
    pub fn with_move_timeout(transport: T, move_timeout: Option<Duration>) -> Self {
        let (updates, _) = watch::channel(ClientSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                transport,
                state: Mutex::new(SharedState::default()),
                updates,
                move_timeout,
            }),
        }
    }

    /// Requests a move at `(row, col)` for the player currently to move.
    ///
    /// The player is read from the snapshot now, not when the authority
    /// processes the request. No bounds or legality check is done here.
    ///
    /// If a move is already pending this returns [`MoveOutcome::Coalesced`]
    /// at once without sending. Otherwise the frame is sent and the call waits
    /// for the next broadcast, up to the configured bound.
    ///
    /// # Errors
    ///
    /// [`SyncError::SendFailure`] if the transport rejects the frame or does
    /// not take it within the bound; no intent is left pending.
    /// [`SyncError::ReplyTimeout`] if the bound elapses while waiting for a
    /// broadcast; the intent is dropped so a new move can be issued. A
    /// broadcast landing in the same instant as the timeout is still applied
    /// to the snapshot, but this call reports the timeout.
    #[instrument(skip(self))]
    pub async fn request_move(&self, row: usize, col: usize) -> Result<MoveOutcome, SyncError> {
        let (intent_id, reply) = {
            let mut state = self.inner.state.lock().await;
            if state.pending.is_some() {
                debug!("Move already pending, dropping request");
                return Ok(MoveOutcome::Coalesced);
            }

            let player = state.snapshot.current_player();
            let frame = encode(ClientMessage::move_request(player, row, col))?;
            self.send_bounded(frame).await?;

            let intent_id = state.next_intent;
            state.next_intent += 1;
            let (resolver, reply) = oneshot::channel();
            state.pending = Some(PendingIntent {
                id: intent_id,
                resolver,
            });
            info!(%player, intent_id, "Move sent, awaiting broadcast");
            (intent_id, reply)
        };

        let received = match self.inner.move_timeout {
            Some(limit) => match tokio::time::timeout(limit, reply).await {
                Ok(received) => received,
                Err(_) => {
                    self.abandon(intent_id).await;
                    let waited_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
                    warn!(intent_id, waited_ms, "No broadcast before timeout");
                    return Err(SyncError::ReplyTimeout { waited_ms });
                }
            },
            None => reply.await,
        };

        match received {
            Ok(snapshot) => Ok(MoveOutcome::Resolved(snapshot)),
            Err(_) => {
                debug!(intent_id, "Pending move cleared by reset");
                Ok(MoveOutcome::Superseded)
            }
        }
    }

    /// Sends a reset request and resets local state without waiting.
    ///
    /// The snapshot returns to its default and any pending move is cleared
    /// (its caller sees [`MoveOutcome::Superseded`]). A broadcast already in
    /// flight from before the reset will still overwrite this state when it
    /// arrives.
    ///
    /// # Errors
    ///
    /// [`SyncError::SendFailure`] if the transport rejects the frame or does
    /// not take it within the bound. Local state is left unchanged in that
    /// case.
    #[instrument(skip(self))]
    pub async fn request_reset(&self) -> Result<(), SyncError> {
        let mut state = self.inner.state.lock().await;
        let frame = encode(ClientMessage::Reset)?;
        self.send_bounded(frame).await?;

        state.snapshot = ClientSnapshot::default();
        if let Some(pending) = state.pending.take() {
            debug!(intent_id = pending.id, "Dropping pending move on reset");
        }
        self.inner.updates.send_replace(state.snapshot.clone());
        info!("Local state reset");
        Ok(())
    }

    /// Parses an inbound frame and applies it.
    ///
    /// # Errors
    ///
    /// [`SyncError::MalformedBroadcast`] if the frame is not a valid state
    /// broadcast. Snapshot and pending intent are untouched in that case.
    #[instrument(skip(self, frame), fields(len = frame.len()))]
    pub async fn on_broadcast(&self, frame: &str) -> Result<(), SyncError> {
        let snapshot = parse_broadcast(frame)?;
        self.apply_broadcast(snapshot).await;
        Ok(())
    }

    /// Replaces the snapshot and resolves the pending move, if any.
    #[instrument(skip_all, fields(current_player = %snapshot.current_player(), playable = snapshot.playable()))]
    pub async fn apply_broadcast(&self, snapshot: ClientSnapshot) {
        let mut state = self.inner.state.lock().await;
        state.snapshot = snapshot;
        if let Some(pending) = state.pending.take() {
            if pending.resolver.send(state.snapshot.clone()).is_err() {
                debug!(intent_id = pending.id, "Move caller no longer waiting");
            } else {
                debug!(intent_id = pending.id, "Resolved pending move");
            }
        }
        self.inner.updates.send_replace(state.snapshot.clone());
    }

    /// Sends one frame, failing instead of stalling past the configured bound.
    ///
    /// Callers hold the state lock, so an unbounded send would also stop
    /// broadcasts from being applied.
    async fn send_bounded(&self, frame: String) -> Result<(), SyncError> {
        let Some(limit) = self.inner.move_timeout else {
            return Ok(self.inner.transport.send(frame).await?);
        };
        match tokio::time::timeout(limit, self.inner.transport.send(frame)).await {
            Ok(sent) => Ok(sent?),
            Err(_) => {
                warn!(limit_ms = limit.as_millis(), "Transport did not take frame in time");
                Err(SyncError::SendFailure(TransportError::new(format!(
                    "Send not completed within {} ms",
                    limit.as_millis()
                ))))
            }
        }
    }

    /// Drops the pending intent if it is still the one identified by `intent_id`.
    async fn abandon(&self, intent_id: u64) {
        let mut state = self.inner.state.lock().await;
        if state.pending.as_ref().is_some_and(|p| p.id == intent_id) {
            state.pending = None;
        }
    }

    /// Current state machine position.
    pub async fn sync_state(&self) -> SyncState {
        if self.inner.state.lock().await.pending.is_some() {
            SyncState::AwaitingReply
        } else {
            SyncState::Idle
        }
    }

    /// Latest snapshot.
    pub fn snapshot(&self) -> ClientSnapshot {
        self.inner.updates.borrow().clone()
    }

    /// True iff a winner is declared or the authority stopped accepting moves.
    pub fn is_game_over(&self) -> bool {
        self.inner.updates.borrow().is_game_over()
    }

    /// Declared winner, if any.
    pub fn winner(&self) -> Option<Player> {
        self.inner.updates.borrow().winner()
    }

    /// Subscribes to snapshot replacements, for re-rendering.
    pub fn subscribe(&self) -> watch::Receiver<ClientSnapshot> {
        self.inner.updates.subscribe()
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.inner.transport
    }
}

fn encode(message: ClientMessage) -> Result<String, SyncError> {
    message
        .to_frame()
        .map_err(|e| SyncError::SendFailure(TransportError::new(format!("Encode failed: {}", e))))
}
