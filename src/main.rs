//! Broadcast Hub - Entry Point
//!
//! Loads configuration, starts the ChatServer actor and accepts connections.

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use broadcast_hub::{accept_loop, ChatServer, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=broadcast_hub=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("broadcast_hub=info")),
        )
        .init();

    // Flags fall back to HUB_* / PORT environment variables
    let config = Config::parse();
    let addr = config.bind_addr();

    let listener = TcpListener::bind(&addr).await?;
    info!("Broadcast hub listening on ws://{}", addr);

    let (cmd_tx, cmd_rx) = mpsc::channel(config.command_buffer);
    tokio::spawn(ChatServer::new(cmd_rx, &config).run());

    accept_loop(listener, cmd_tx, config.client_buffer).await;

    Ok(())
}
