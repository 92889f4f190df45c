//! End-to-end test over a real WebSocket against a stub authority.

use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use std::time::Duration;
use strictly_sync::{
    MoveOutcome, Player, Square, SyncClient, SyncError, Transport, WebSocketTransport, pump,
};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

/// Accepts one connection, forwards every request it receives to `seen` and
/// answers each with the next canned broadcast.
async fn spawn_authority(replies: Vec<&'static str>) -> (String, mpsc::UnboundedReceiver<Value>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let (seen_tx, seen_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut ws = tokio_tungstenite::accept_async(stream).await.expect("handshake");
        let mut replies = replies.into_iter();
        while let Some(Ok(msg)) = ws.next().await {
            let Message::Text(text) = msg else { continue };
            let request: Value = serde_json::from_str(&text).expect("client sends JSON");
            seen_tx.send(request).expect("test alive");
            match replies.next() {
                Some(reply) => ws.send(Message::Text(reply.to_string())).await.expect("reply"),
                None => break,
            }
        }
    });

    (format!("ws://{}", addr), seen_rx)
}

#[tokio::test]
async fn test_move_and_reset_round_trip() {
    let (url, mut seen) = spawn_authority(vec![
        r#"{"board":[[null,null,null],[null,"X",null],[null,null,null]],"currentPlayer":"O","winner":null,"playable":true}"#,
        r#"{"board":[[null,null,null],[null,null,null],[null,null,null]],"currentPlayer":"X","winner":null,"playable":true}"#,
    ])
    .await;

    let (transport, inbound) = WebSocketTransport::connect(&url).await.expect("connect");
    assert_eq!(transport.url(), url);
    let client = SyncClient::new(transport);
    let pump_handle = tokio::spawn(pump(inbound, client.clone()));

    let outcome = client.request_move(1, 1).await.expect("move");
    let MoveOutcome::Resolved(snapshot) = outcome else {
        panic!("expected resolved outcome, got {outcome:?}");
    };
    assert_eq!(snapshot.board().get(1, 1), Some(Square::Occupied(Player::X)));
    assert_eq!(client.snapshot().current_player(), Player::O);
    assert_eq!(
        seen.recv().await.expect("request"),
        json!({"action": "move", "data": {"player": "X", "row": 1, "col": 1}})
    );

    client.request_reset().await.expect("reset");
    assert_eq!(seen.recv().await.expect("request"), json!({"action": "reset"}));

    client.transport().close().await.expect("close");
    let applied = pump_handle.await.expect("pump task");
    assert_eq!(applied, 2);
    assert_eq!(client.snapshot().board().occupied(), 0);
    assert_eq!(client.snapshot().current_player(), Player::X);
}

#[tokio::test]
async fn test_send_after_server_close_fails() {
    let (url, mut seen) = spawn_authority(vec![]).await;
    let (transport, inbound) = WebSocketTransport::connect(&url).await.expect("connect");
    let client = SyncClient::with_move_timeout(transport, Some(Duration::from_millis(200)));
    let pump_handle = tokio::spawn(pump(inbound, client.clone()));

    // The authority closes after the first request without replying.
    let first = client.request_move(0, 0).await;
    seen.recv().await.expect("request seen");
    pump_handle.await.expect("pump task");

    let mut failure = None;
    for _ in 0..10 {
        match client.request_reset().await {
            Err(e @ SyncError::SendFailure(_)) => {
                failure = Some(e);
                break;
            }
            _ => tokio::time::sleep(Duration::from_millis(20)).await,
        }
    }
    assert!(failure.is_some(), "send on closed socket must fail");
    assert!(matches!(first, Err(SyncError::ReplyTimeout { .. })));
}

#[tokio::test]
async fn test_send_after_local_close_fails() {
    let (url, _seen) = spawn_authority(vec![]).await;
    let (transport, _inbound) = WebSocketTransport::connect(&url).await.expect("connect");

    transport.close().await.expect("close");
    let result = transport.send(r#"{"action":"reset"}"#.to_string()).await;
    assert!(result.is_err(), "writer stops after close");
}
