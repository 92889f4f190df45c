//! Strictly Sync - terminal client
//!
//! Connects to a tic-tac-toe authority and mirrors its state.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use strictly_sync::{
    ClientConfig, Console, ConsoleCommand, HELP, SyncClient, WebSocketTransport, pump, render,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, instrument};
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured authority URL.
const URL_ENV: &str = "STRICTLY_SYNC_URL";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = ClientConfig::load_or_default(&cli.config)?;
    if let Ok(url) = std::env::var(URL_ENV) {
        config = config.with_url(url);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Play {
            url,
            move_timeout_ms,
        } => {
            if let Some(url) = url {
                config = config.with_url(url);
            }
            if let Some(ms) = move_timeout_ms {
                config = config.with_move_timeout_ms(ms);
            }
            run_play(config).await
        }
        Command::Config => {
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

/// Connects, spawns the inbound pump and renderer, then reads commands.
#[instrument(skip(config), fields(url = %config.url()))]
async fn run_play(config: ClientConfig) -> Result<()> {
    let (transport, inbound) = WebSocketTransport::connect(config.url()).await?;
    let client = SyncClient::from_config(transport, &config);

    let pump_handle = tokio::spawn(pump(inbound, client.clone()));

    let mut updates = client.subscribe();
    tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            println!("\n{}", render(&snapshot));
        }
    });

    let console = Console::new(client.clone());
    println!("{}\n{}", render(&client.snapshot()), HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = ConsoleCommand::parse(&line) else {
            println!("Unrecognized input. {}", HELP);
            continue;
        };
        if command == ConsoleCommand::Quit {
            break;
        }
        match console.handle(command).await {
            Ok(Some(text)) => println!("{}", text),
            Ok(None) => {}
            Err(e) => {
                error!(error = %e, "Command failed");
                println!("Error: {}", e);
            }
        }
        if pump_handle.is_finished() {
            println!("Connection to authority closed.");
            break;
        }
    }

    if let Err(e) = client.transport().close().await {
        error!(error = %e, "Failed to close connection cleanly");
    }
    info!("Session ended");
    Ok(())
}
