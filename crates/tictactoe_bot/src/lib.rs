//! Discord bot serving tic-tac-toe games on message buttons.
//!
//! # Architecture
//!
//! - **Server**: axum endpoint receiving signed interactions
//! - **Verify**: Ed25519 check of every inbound request
//! - **Dispatcher**: maps interactions onto the board store and engine
//! - **Discord client**: outbound webhook edits and command registration
//!
//! Game rules, rendering and the board store live in [`tictactoe_board`].

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod commands;
mod config;
mod discord_client;
mod dispatcher;
mod interaction;
mod server;
mod verify;

pub use commands::{register_commands, tictactoe_command};
pub use config::{BotConfig, ConfigError, DEFAULT_PORT, parse_public_key};
pub use discord_client::{CommandDefinition, DiscordClient, DiscordError, MessageClient};
pub use dispatcher::{COMMAND_NAME, DispatchError, Dispatcher, GAME_TITLE};
pub use interaction::{
    ActionRow, Button, EPHEMERAL, Embed, Interaction, InteractionData, InteractionKind,
    InteractionResponse, Member, Message, MessagePayload, ResponseKind, User, action_rows,
    button_style,
};
pub use server::{INTERACTIONS_PATH, router};
pub use verify::{SIGNATURE_HEADER, SignatureVerifier, TIMESTAMP_HEADER, VerifyError};
