//! Tests for the line-oriented frontend.

use strictly_sync::{
    Board, ChannelTransport, ClientSnapshot, Console, ConsoleCommand, HELP, Player, Square,
    SyncClient, render,
};

#[test]
fn test_parse_commands() {
    assert_eq!(ConsoleCommand::parse("reset"), Some(ConsoleCommand::Reset));
    assert_eq!(ConsoleCommand::parse(" Q "), Some(ConsoleCommand::Quit));
    assert_eq!(ConsoleCommand::parse("board"), Some(ConsoleCommand::Board));
    assert_eq!(ConsoleCommand::parse("?"), Some(ConsoleCommand::Help));
    assert_eq!(
        ConsoleCommand::parse("2 1"),
        Some(ConsoleCommand::Move { row: 2, col: 1 })
    );
    assert_eq!(
        ConsoleCommand::parse("5"),
        Some(ConsoleCommand::Move { row: 1, col: 1 })
    );
    assert_eq!(
        ConsoleCommand::parse("top-right"),
        Some(ConsoleCommand::Move { row: 0, col: 2 })
    );
    assert_eq!(ConsoleCommand::parse(""), None);
    assert_eq!(ConsoleCommand::parse("a b"), None);
    assert_eq!(ConsoleCommand::parse("9 x"), None);
    assert_eq!(ConsoleCommand::parse("nonsense"), None);
}

#[test]
fn test_parse_position_labels() {
    assert_eq!(
        ConsoleCommand::parse("center"),
        Some(ConsoleCommand::Move { row: 1, col: 1 })
    );
    assert_eq!(
        ConsoleCommand::parse("Center"),
        Some(ConsoleCommand::Move { row: 1, col: 1 })
    );
    assert_eq!(
        ConsoleCommand::parse("top left"),
        Some(ConsoleCommand::Move { row: 0, col: 0 })
    );
    assert_eq!(
        ConsoleCommand::parse("bottom   right"),
        Some(ConsoleCommand::Move { row: 2, col: 2 })
    );
    assert_eq!(
        ConsoleCommand::parse("top-center"),
        Some(ConsoleCommand::Move { row: 0, col: 1 })
    );
}

#[test]
fn test_render_status_lines() {
    let in_progress = ClientSnapshot::new(Board::new(), Player::O, None, true);
    assert!(render(&in_progress).ends_with("Player O to move"));

    let mut rows = [[Square::Empty; 3]; 3];
    rows[0] = [Square::Occupied(Player::X); 3];
    let won = ClientSnapshot::new(Board::from_rows(rows), Player::O, Some(Player::X), false);
    let text = render(&won);
    assert!(text.starts_with("X|X|X"));
    assert!(text.ends_with("Player X wins!"));

    let draw = ClientSnapshot::new(Board::new(), Player::X, None, false);
    assert!(render(&draw).ends_with("It's a draw!"));
}

#[tokio::test]
async fn test_moves_ignored_after_game_over() {
    let (transport, mut rx) = ChannelTransport::pair();
    let client = SyncClient::with_move_timeout(transport, None);
    client
        .apply_broadcast(ClientSnapshot::new(Board::new(), Player::X, Some(Player::O), true))
        .await;

    let console = Console::new(client.clone());
    let reply = console
        .handle(ConsoleCommand::Move { row: 0, col: 0 })
        .await
        .expect("no error");
    assert!(reply.expect("message").contains("Game is over"));
    assert!(rx.try_recv().is_err(), "no frame sent after game over");

    console.handle(ConsoleCommand::Reset).await.expect("reset");
    assert_eq!(rx.try_recv().expect("reset frame"), r#"{"action":"reset"}"#);
    assert!(!client.is_game_over());
}

#[tokio::test]
async fn test_help_and_board() {
    let (transport, _rx) = ChannelTransport::pair();
    let console = Console::new(SyncClient::new(transport));
    assert_eq!(
        console.handle(ConsoleCommand::Help).await.expect("help"),
        Some(HELP.to_string())
    );
    let board = console
        .handle(ConsoleCommand::Board)
        .await
        .expect("board")
        .expect("text");
    assert!(board.starts_with("1|2|3"));
}
