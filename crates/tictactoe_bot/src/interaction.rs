//! Wire types for Discord interactions and message payloads.
//!
//! Only the fields the bot reads or writes are modelled; everything else in
//! an inbound payload is ignored (but kept in [`Interaction::raw`]).

use serde::{Deserialize, Serialize};
use tictactoe_board::{CellStyle, RenderGrid};

/// Message flag making a reply visible to the invoking user only.
pub const EPHEMERAL: u64 = 1 << 6;

/// Kind of inbound interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, strum::Display)]
#[serde(from = "u8")]
pub enum InteractionKind {
    /// Liveness probe sent when the endpoint is registered.
    Ping,
    /// Slash command invocation.
    ApplicationCommand,
    /// Button click on a message component.
    MessageComponent,
    /// Anything else (autocomplete, modal submit, ...).
    Other(u8),
}

impl From<u8> for InteractionKind {
    fn from(value: u8) -> Self {
        match value {
            1 => InteractionKind::Ping,
            2 => InteractionKind::ApplicationCommand,
            3 => InteractionKind::MessageComponent,
            other => InteractionKind::Other(other),
        }
    }
}

/// A Discord user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Snowflake id.
    pub id: String,
}

/// Guild member wrapper around a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// The member's user, absent in some partial payloads.
    pub user: Option<User>,
}

/// Minimal view of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Snowflake id.
    pub id: String,
}

/// Command or component data of an interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InteractionData {
    /// Command name (application commands).
    pub name: Option<String>,
    /// Action id of the clicked component.
    pub custom_id: Option<String>,
}

/// An inbound interaction, already signature-checked.
#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    /// Interaction id.
    pub id: String,
    /// Interaction kind.
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    /// Continuation token for follow-up webhook calls.
    #[serde(default)]
    pub token: String,
    /// Command or component data.
    pub data: Option<InteractionData>,
    /// Invoking member, when sent from a guild.
    pub member: Option<Member>,
    /// Invoking user, when sent from a DM.
    pub user: Option<User>,
    /// Message the component belongs to.
    pub message: Option<Message>,
    /// Whole payload as received.
    #[serde(skip)]
    pub raw: serde_json::Value,
}

impl Interaction {
    /// Parses an interaction from a raw request body.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let raw: serde_json::Value = serde_json::from_slice(body)?;
        let mut interaction = Self::deserialize(&raw)?;
        interaction.raw = raw;
        Ok(interaction)
    }

    /// Id of the acting user, preferring the guild member.
    pub fn user_id(&self) -> Option<&str> {
        self.member
            .as_ref()
            .and_then(|member| member.user.as_ref())
            .or(self.user.as_ref())
            .map(|user| user.id.as_str())
    }

    /// Invoked command name.
    pub fn command_name(&self) -> Option<&str> {
        self.data.as_ref().and_then(|data| data.name.as_deref())
    }

    /// Action id of the clicked component.
    pub fn custom_id(&self) -> Option<&str> {
        self.data.as_ref().and_then(|data| data.custom_id.as_deref())
    }

    /// Id of the message the component belongs to.
    pub fn message_id(&self) -> Option<&str> {
        self.message.as_ref().map(|message| message.id.as_str())
    }
}

/// Kind of synchronous interaction response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum ResponseKind {
    /// Answer to a ping.
    Pong,
    /// Reply with a new message.
    ChannelMessageWithSource,
    /// Acknowledge now, edit the original response later.
    DeferredChannelMessageWithSource,
    /// Edit the message the component is attached to.
    UpdateMessage,
}

impl From<ResponseKind> for u8 {
    fn from(kind: ResponseKind) -> Self {
        match kind {
            ResponseKind::Pong => 1,
            ResponseKind::ChannelMessageWithSource => 4,
            ResponseKind::DeferredChannelMessageWithSource => 5,
            ResponseKind::UpdateMessage => 7,
        }
    }
}

/// Embed attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    /// Embed title.
    pub title: String,
}

/// Button inside an action row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    /// Component type, always 2.
    #[serde(rename = "type")]
    pub kind: u8,
    /// Action id returned on click.
    pub custom_id: String,
    /// Discord button style.
    pub style: u8,
    /// Button text.
    pub label: String,
    /// Whether the button is greyed out.
    pub disabled: bool,
}

/// Row of buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionRow {
    /// Component type, always 1.
    #[serde(rename = "type")]
    pub kind: u8,
    /// Buttons in the row.
    pub components: Vec<Button>,
}

/// Body of a message create/edit or response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MessagePayload {
    /// Text content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Embeds; `Some(vec![])` clears existing ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeds: Option<Vec<Embed>>,
    /// Component rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<ActionRow>>,
    /// Message flags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
}

impl MessagePayload {
    /// Payload showing `grid` as buttons.
    pub fn board(grid: &RenderGrid) -> Self {
        Self {
            components: Some(action_rows(grid)),
            ..Self::default()
        }
    }

    /// Ephemeral text reply.
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            flags: Some(EPHEMERAL),
            ..Self::default()
        }
    }

    /// Sets the text content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Replaces the embeds.
    pub fn with_embeds(mut self, embeds: Vec<Embed>) -> Self {
        self.embeds = Some(embeds);
        self
    }
}

/// Synchronous reply to an interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractionResponse {
    /// Response kind.
    #[serde(rename = "type")]
    pub kind: ResponseKind,
    /// Message data, if the kind carries any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<MessagePayload>,
}

impl InteractionResponse {
    /// Answer to a ping.
    pub fn pong() -> Self {
        Self {
            kind: ResponseKind::Pong,
            data: None,
        }
    }

    /// Deferred acknowledgement; the message is filled in later.
    pub fn deferred() -> Self {
        Self {
            kind: ResponseKind::DeferredChannelMessageWithSource,
            data: None,
        }
    }

    /// Edit of the component's message.
    pub fn update(data: MessagePayload) -> Self {
        Self {
            kind: ResponseKind::UpdateMessage,
            data: Some(data),
        }
    }

    /// New message visible to the invoking user only.
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            kind: ResponseKind::ChannelMessageWithSource,
            data: Some(MessagePayload::ephemeral(content)),
        }
    }
}

/// Discord button style for a cell.
pub fn button_style(style: CellStyle) -> u8 {
    match style {
        CellStyle::Primary => 1,
        CellStyle::Secondary => 2,
        CellStyle::Success => 3,
    }
}

/// Converts a render grid into 3 action rows of 3 buttons.
pub fn action_rows(grid: &RenderGrid) -> Vec<ActionRow> {
    grid.rows()
        .iter()
        .map(|row| ActionRow {
            kind: 1,
            components: row
                .iter()
                .map(|cell| Button {
                    kind: 2,
                    custom_id: cell.action_id().clone(),
                    style: button_style(*cell.style()),
                    label: cell.label().clone(),
                    disabled: *cell.disabled(),
                })
                .collect(),
        })
        .collect()
}
