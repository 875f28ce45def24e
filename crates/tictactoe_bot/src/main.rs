//! tictactoe_bot - Unified CLI
//!
//! Serves the Discord interactions endpoint or registers the slash command.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::sync::Arc;
use tictactoe_board::BoardStore;
use tictactoe_bot::{BotConfig, DiscordClient, Dispatcher, SignatureVerifier, register_commands};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("info,tictactoe_bot=debug,tictactoe_board=debug")
            }),
        )
        .init();

    let cli = Cli::parse();
    let config = BotConfig::from_env()?;

    match cli.command {
        Command::Serve { port, host } => {
            let config = match port {
                Some(port) => config.with_port(port),
                None => config,
            };
            run_server(config, host).await
        }
        Command::RegisterCommands => run_register(config).await,
    }
}

fn discord_client(config: &BotConfig) -> DiscordClient {
    DiscordClient::new(
        config.base_url().clone(),
        config.app_id().clone(),
        config.token().clone(),
    )
}

/// Run the interactions endpoint
#[instrument(skip(config))]
async fn run_server(config: BotConfig, host: String) -> Result<()> {
    let store = BoardStore::new();
    let dispatcher = Dispatcher::new(store, Arc::new(discord_client(&config)));
    let verifier = SignatureVerifier::new(*config.public_key());
    let app = tictactoe_bot::router(verifier, dispatcher);

    let listener = tokio::net::TcpListener::bind((host.as_str(), *config.port())).await?;
    info!(
        address = %listener.local_addr()?,
        path = tictactoe_bot::INTERACTIONS_PATH,
        "Listening for interactions"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Register the slash command
#[instrument(skip(config))]
async fn run_register(config: BotConfig) -> Result<()> {
    let client = discord_client(&config);
    let created = register_commands(&client).await?;
    let rendered = serde_json::to_string_pretty(&created)?;
    info!("Created:\n{}", rendered);
    Ok(())
}
