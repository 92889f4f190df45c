//! WebSocket transport using tokio-tungstenite.
//!
//! The socket is split once. A reader task feeds [`Inbound`]; a writer task
//! owns the sink and drains a queue of outbound frames, acknowledging each one
//! so callers still see write failures.

use super::Transport;
use crate::error::TransportError;
use futures::stream::SplitSink;
use futures::{SinkExt, Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, error, info, instrument};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type Ack = oneshot::Sender<Result<(), TransportError>>;

/// Capacity of the inbound frame queue between the reader task and the pump.
const INBOUND_QUEUE: usize = 32;

/// Capacity of the outbound queue feeding the writer task.
const OUTBOUND_QUEUE: usize = 32;

/// Stream of inbound text frames.
#[derive(Debug)]
pub struct Inbound {
    rx: mpsc::Receiver<String>,
}

impl Inbound {
    /// Wraps a receiver fed by any frame source.
    pub fn from_receiver(rx: mpsc::Receiver<String>) -> Self {
        Self { rx }
    }
}

impl Stream for Inbound {
    type Item = String;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<String>> {
        self.rx.poll_recv(cx)
    }
}

/// Work item for the writer task.
#[derive(Debug)]
enum Outbound {
    /// Write one text frame.
    Frame(String, Ack),
    /// Send a close frame and stop.
    Close(Ack),
}

/// Sending half of a WebSocket connection to the authority.
#[derive(Debug)]
pub struct WebSocketTransport {
    url: String,
    tx: mpsc::Sender<Outbound>,
}

impl WebSocketTransport {
    /// Connects to the authority and starts the reader and writer tasks.
    ///
    /// Text frames are forwarded to the returned [`Inbound`] stream. The stream
    /// ends when the server closes the socket or a read fails.
    #[instrument]
    pub async fn connect(url: &str) -> Result<(Self, Inbound), TransportError> {
        let (ws_stream, _) = connect_async(url).await.map_err(|e| {
            error!(error = %e, url, "Failed to connect to authority");
            TransportError::from(e)
        })?;
        info!(url, "Connected to authority");

        let (write, mut read) = ws_stream.split();
        let (inbound_tx, inbound_rx) = mpsc::channel::<String>(INBOUND_QUEUE);
        let (outbound_tx, outbound_rx) = mpsc::channel::<Outbound>(OUTBOUND_QUEUE);

        tokio::spawn(async move {
            while let Some(msg) = read.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        if inbound_tx.send(text).await.is_err() {
                            debug!("Inbound consumer dropped, stopping reader");
                            break;
                        }
                    }
                    Ok(Message::Close(frame)) => {
                        info!(?frame, "Authority closed connection");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!(error = %e, "WebSocket read failed");
                        break;
                    }
                }
            }
        });

        tokio::spawn(write_loop(write, outbound_rx));

        Ok((
            Self {
                url: url.to_string(),
                tx: outbound_tx,
            },
            Inbound::from_receiver(inbound_rx),
        ))
    }

    /// URL this transport is connected to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends a close frame and stops the writer task.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn close(&self) -> Result<(), TransportError> {
        let (ack, done) = oneshot::channel();
        self.enqueue(Outbound::Close(ack), done).await
    }

    async fn enqueue(
        &self,
        item: Outbound,
        done: oneshot::Receiver<Result<(), TransportError>>,
    ) -> Result<(), TransportError> {
        if self.tx.send(item).await.is_err() {
            return Err(TransportError::new("Connection closed".to_string()));
        }
        done.await.unwrap_or_else(|_| Err(TransportError::new("Writer stopped".to_string())))
    }
}

/// Owns the sink until a write fails or a close is requested.
async fn write_loop(mut write: WsSink, mut rx: mpsc::Receiver<Outbound>) {
    while let Some(item) = rx.recv().await {
        match item {
            Outbound::Frame(frame, ack) => {
                let result = write.send(Message::Text(frame)).await.map_err(|e| {
                    error!(error = %e, "Failed to send frame");
                    TransportError::from(e)
                });
                let failed = result.is_err();
                let _ = ack.send(result);
                if failed {
                    break;
                }
            }
            Outbound::Close(ack) => {
                let _ = ack.send(write.close().await.map_err(TransportError::from));
                break;
            }
        }
    }
    debug!("Writer task stopped");
}

#[async_trait::async_trait]
impl Transport for WebSocketTransport {
    #[instrument(skip(self, frame), fields(url = %self.url))]
    async fn send(&self, frame: String) -> Result<(), TransportError> {
        let (ack, done) = oneshot::channel();
        self.enqueue(Outbound::Frame(frame, ack), done).await
    }
}
