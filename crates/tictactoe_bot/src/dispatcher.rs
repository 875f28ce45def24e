//! Routes verified interactions to the game engine.

use crate::discord_client::{DiscordError, MessageClient};
use crate::interaction::{
    Embed, Interaction, InteractionKind, InteractionResponse, MessagePayload,
};
use std::sync::Arc;
use tictactoe_board::{Board, BoardStore, Outcome, render};
use tracing::{debug, error, info, instrument, warn};

/// Name of the slash command that opens a game.
pub const COMMAND_NAME: &str = "tic-tac-toe";

/// Title of the embed shown above a fresh board.
pub const GAME_TITLE: &str = "Tic Tac Toe";

/// Interaction the dispatcher cannot answer.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum DispatchError {
    /// Interaction kind outside ping, command and component.
    #[display("Unsupported interaction kind {}", _0)]
    Unsupported(InteractionKind),
}

impl std::error::Error for DispatchError {}

/// Turns interactions into board updates and responses.
#[derive(Clone)]
pub struct Dispatcher {
    store: BoardStore,
    client: Arc<dyn MessageClient>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("boards", &self.store.len())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Creates a dispatcher over `store`, delivering through `client`.
    #[instrument(skip_all)]
    pub fn new(store: BoardStore, client: Arc<dyn MessageClient>) -> Self {
        info!("Creating interaction dispatcher");
        Self { store, client }
    }

    /// Board store shared with this dispatcher.
    pub fn store(&self) -> &BoardStore {
        &self.store
    }

    /// Answers one interaction.
    ///
    /// Game errors are turned into ephemeral replies here; only interaction
    /// kinds the bot does not handle at all surface as errors.
    ///
    /// Opening a game spawns a background task and must run inside a tokio
    /// runtime.
    #[instrument(skip_all, fields(interaction_id = %interaction.id, kind = %interaction.kind))]
    pub fn dispatch(
        &self,
        interaction: &Interaction,
    ) -> Result<InteractionResponse, DispatchError> {
        match interaction.kind {
            InteractionKind::Ping => {
                debug!("Answering ping");
                Ok(InteractionResponse::pong())
            }
            InteractionKind::ApplicationCommand => Ok(self.command(interaction)),
            InteractionKind::MessageComponent => Ok(self.click(interaction)),
            other => {
                warn!("Unsupported interaction");
                Err(DispatchError::Unsupported(other))
            }
        }
    }

    fn command(&self, interaction: &Interaction) -> InteractionResponse {
        if interaction.command_name() != Some(COMMAND_NAME) {
            warn!(command = ?interaction.command_name(), "Unknown command, echoing payload");
            let dump = serde_json::to_string_pretty(&interaction.raw)
                .unwrap_or_else(|_| interaction.raw.to_string());
            return InteractionResponse::ephemeral(format!("```{}```", dump));
        }

        let this = self.clone();
        let token = interaction.token.clone();
        tokio::spawn(async move {
            if let Err(e) = this.open_game(&token).await {
                error!(error = %e, "Failed to post new board");
            }
        });
        InteractionResponse::deferred()
    }

    /// Posts a fresh board into the deferred response for `token` and stores
    /// it under the id of the resulting message.
    ///
    /// # Errors
    ///
    /// Returns [`DiscordError`] if delivery fails; nothing is stored then.
    #[instrument(skip_all)]
    pub async fn open_game(&self, token: &str) -> Result<String, DiscordError> {
        let board = Board::new();
        let payload = MessagePayload::board(&render(&board)).with_embeds(vec![Embed {
            title: GAME_TITLE.to_string(),
        }]);
        let message_id = self.client.update(token, &payload).await?;
        self.store.save(message_id.clone(), board);
        info!(board_key = %message_id, "Game opened");
        Ok(message_id)
    }

    fn click(&self, interaction: &Interaction) -> InteractionResponse {
        let Some(user) = interaction.user_id() else {
            warn!("Component interaction without a user");
            return InteractionResponse::ephemeral(format!(
                "Could not get user ID from interaction {}",
                interaction.id
            ));
        };
        let (Some(key), Some(action_id)) = (interaction.message_id(), interaction.custom_id())
        else {
            warn!(user_id = %user, "Component interaction without message or custom id");
            return InteractionResponse::ephemeral("That button isn't attached to a game");
        };

        match self.store.play(key, user, action_id) {
            Ok(report) => {
                if report.outcome().is_terminal() {
                    info!(board_key = %key, outcome = %report.outcome(), "Game finished");
                }
                let payload = MessagePayload::board(report.grid());
                let payload = match report.outcome() {
                    Outcome::Continue => payload,
                    Outcome::Winner(winner) => payload
                        .with_content(format!("<@{}> Wins!", winner))
                        .with_embeds(Vec::new()),
                    Outcome::Tie => payload
                        .with_content("No winners here 😢")
                        .with_embeds(Vec::new()),
                };
                InteractionResponse::update(payload)
            }
            Err(e) => {
                info!(board_key = %key, user_id = %user, error = %e, "Move rejected");
                InteractionResponse::ephemeral(e.to_string())
            }
        }
    }
}
