//! Outbound Discord REST client.

use crate::interaction::{Message, MessagePayload};
use async_trait::async_trait;
use derive_more::{Display, Error};
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

/// Discord REST error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Discord error: {} at {}:{}", message, file, line)]
pub struct DiscordError {
    /// Error message.
    pub message: String,
    /// HTTP status, when the server answered.
    pub status: Option<u16>,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DiscordError {
    /// Creates a new error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            status: None,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Attaches the HTTP status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

impl From<reqwest::Error> for DiscordError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        let mut error = Self::new(format!("Request failed: {}", err));
        error.status = status;
        error
    }
}

/// Delivers rendered boards to the chat platform.
///
/// Both calls return the id of the message they produced; the board is
/// stored under that id from then on.
#[async_trait]
pub trait MessageClient: Send + Sync {
    /// Posts a new follow-up message for the interaction `token`.
    async fn send(&self, token: &str, payload: &MessagePayload) -> Result<String, DiscordError>;

    /// Edits the original response of the interaction `token`.
    async fn update(&self, token: &str, payload: &MessagePayload) -> Result<String, DiscordError>;
}

/// Slash command definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandDefinition {
    /// Command name as typed by users.
    pub name: String,
    /// Description shown in the command picker.
    pub description: String,
    /// Where the command can be used (guild, bot DM, private channel).
    pub contexts: Vec<u8>,
    /// Install types (guild install, user install).
    pub integration_types: Vec<u8>,
}

/// Discord REST client authenticated as the bot.
#[derive(Debug, Clone)]
pub struct DiscordClient {
    base_url: String,
    app_id: String,
    token: String,
    client: reqwest::Client,
}

impl DiscordClient {
    /// Creates a client for `base_url` (e.g. `https://discord.com/api/v10`).
    #[instrument(skip(token))]
    pub fn new(base_url: String, app_id: String, token: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            app_id,
            token,
            client: reqwest::Client::new(),
        }
    }

    /// Sends a JSON request and decodes the response body, if any.
    #[instrument(skip(self, body), fields(method = %method))]
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<Option<T>, DiscordError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(url = %url, "Sending Discord request");

        let response = self
            .client
            .request(method, &url)
            .header("Authorization", format!("Bot {}", self.token))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            warn!(status = status.as_u16(), body = %text, "Discord rejected request");
            return Err(DiscordError::new(text).with_status(status.as_u16()));
        }
        if text.is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| DiscordError::new(format!("Failed to decode response: {}", e)))
    }

    /// Like [`Self::request`] but requires a message in the response.
    async fn message_request(
        &self,
        method: Method,
        endpoint: &str,
        payload: &MessagePayload,
    ) -> Result<String, DiscordError> {
        let message: Message = self
            .request(method, endpoint, payload)
            .await?
            .ok_or_else(|| DiscordError::new("Discord returned no message"))?;
        Ok(message.id)
    }

    /// Executes the interaction webhook, creating a follow-up message.
    #[instrument(skip_all)]
    pub async fn execute_webhook(
        &self,
        token: &str,
        payload: &MessagePayload,
    ) -> Result<String, DiscordError> {
        let endpoint = format!("/webhooks/{}/{}?wait=true", self.app_id, token);
        self.message_request(Method::POST, &endpoint, payload).await
    }

    /// Edits the original interaction response.
    #[instrument(skip_all)]
    pub async fn update_webhook_message(
        &self,
        token: &str,
        payload: &MessagePayload,
    ) -> Result<String, DiscordError> {
        let endpoint = format!("/webhooks/{}/{}/messages/@original", self.app_id, token);
        self.message_request(Method::PATCH, &endpoint, payload).await
    }

    /// Registers a global application command.
    #[instrument(skip(self), fields(command = %command.name))]
    pub async fn create_application_command(
        &self,
        command: &CommandDefinition,
    ) -> Result<Option<serde_json::Value>, DiscordError> {
        let endpoint = format!("/applications/{}/commands", self.app_id);
        let created = self.request(Method::POST, &endpoint, command).await?;
        info!("Application command created");
        Ok(created)
    }
}

#[async_trait]
impl MessageClient for DiscordClient {
    async fn send(&self, token: &str, payload: &MessagePayload) -> Result<String, DiscordError> {
        self.execute_webhook(token, payload).await
    }

    async fn update(&self, token: &str, payload: &MessagePayload) -> Result<String, DiscordError> {
        self.update_webhook_message(token, payload).await
    }
}
