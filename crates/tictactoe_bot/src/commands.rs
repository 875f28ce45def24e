//! Slash command registration.

use crate::discord_client::{CommandDefinition, DiscordClient, DiscordError};
use crate::dispatcher::COMMAND_NAME;
use tracing::{info, instrument};

/// Definition of the command that opens a game.
///
/// Usable in guilds, bot DMs and private channels, for both guild and user
/// installs.
pub fn tictactoe_command() -> CommandDefinition {
    CommandDefinition {
        name: COMMAND_NAME.to_string(),
        description: "Create a tic-tac-toe game".to_string(),
        contexts: vec![0, 1, 2],
        integration_types: vec![0, 1],
    }
}

/// Registers the game command with Discord and returns what Discord stored.
#[instrument(skip_all)]
pub async fn register_commands(
    client: &DiscordClient,
) -> Result<Option<serde_json::Value>, DiscordError> {
    let command = tictactoe_command();
    let created = client.create_application_command(&command).await?;
    info!(command = %command.name, "Command registered");
    Ok(created)
}
