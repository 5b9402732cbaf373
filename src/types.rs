//! Raw wire shapes consumed by the cache core.
//!
//! These mirror the Discord API docs so the managers and the interaction
//! classifier can read server payloads without touching `serde_json::Value`
//! in the rest of the codebase. Every field a constructor consumes is
//! enumerated here explicitly; unknown raw fields are dropped at the serde
//! boundary rather than splatted onto typed objects.

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::snowflake::Snowflake;

// ---------------------------------------------------------------------------
// Permissions
// ---------------------------------------------------------------------------

bitflags::bitflags! {
    /// Guild permission bitfield, transmitted as a decimal string in JSON.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Permissions: u64 {
        const CREATE_INSTANT_INVITE = 1 << 0;
        const KICK_MEMBERS = 1 << 1;
        const BAN_MEMBERS = 1 << 2;
        const ADMINISTRATOR = 1 << 3;
        const MANAGE_CHANNELS = 1 << 4;
        const MANAGE_GUILD = 1 << 5;
        const ADD_REACTIONS = 1 << 6;
        const VIEW_AUDIT_LOG = 1 << 7;
        const VIEW_CHANNEL = 1 << 10;
        const SEND_MESSAGES = 1 << 11;
        const MANAGE_MESSAGES = 1 << 13;
        const EMBED_LINKS = 1 << 14;
        const ATTACH_FILES = 1 << 15;
        const READ_MESSAGE_HISTORY = 1 << 16;
        const MENTION_EVERYONE = 1 << 17;
        const USE_EXTERNAL_EMOJIS = 1 << 18;
        const CONNECT = 1 << 20;
        const SPEAK = 1 << 21;
        const MUTE_MEMBERS = 1 << 22;
        const DEAFEN_MEMBERS = 1 << 23;
        const MOVE_MEMBERS = 1 << 24;
        const MANAGE_NICKNAMES = 1 << 27;
        const MANAGE_ROLES = 1 << 28;
        const MANAGE_WEBHOOKS = 1 << 29;
        const MODERATE_MEMBERS = 1 << 40;
    }
}

// The API grows new permission bits faster than we track them; serde keeps
// unknown bits intact instead of truncating.
impl Serialize for Permissions {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.bits())
    }
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let bits = raw
            .parse::<u64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid permissions: {raw:?}")))?;
        Ok(Self::from_bits_retain(bits))
    }
}

// ---------------------------------------------------------------------------
// Interaction discriminants
// ---------------------------------------------------------------------------

/// Primary interaction type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize_repr, Serialize_repr)]
#[repr(u8)]
pub enum InteractionType {
    Ping = 1,
    ApplicationCommand = 2,
    MessageComponent = 3,
    ApplicationCommandAutocomplete = 4,
    ModalSubmit = 5,
}

impl InteractionType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Ping),
            2 => Some(Self::ApplicationCommand),
            3 => Some(Self::MessageComponent),
            4 => Some(Self::ApplicationCommandAutocomplete),
            5 => Some(Self::ModalSubmit),
            _ => None,
        }
    }
}

/// Secondary tag: the component kind of a MessageComponent interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize_repr, Serialize_repr)]
#[repr(u8)]
pub enum ComponentType {
    ActionRow = 1,
    Button = 2,
    StringSelect = 3,
    TextInput = 4,
    UserSelect = 5,
    RoleSelect = 6,
    MentionableSelect = 7,
    ChannelSelect = 8,
}

impl ComponentType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::ActionRow),
            2 => Some(Self::Button),
            3 => Some(Self::StringSelect),
            4 => Some(Self::TextInput),
            5 => Some(Self::UserSelect),
            6 => Some(Self::RoleSelect),
            7 => Some(Self::MentionableSelect),
            8 => Some(Self::ChannelSelect),
            _ => None,
        }
    }

    /// Any of the five select-menu kinds.
    pub fn is_select(self) -> bool {
        matches!(
            self,
            Self::StringSelect
                | Self::UserSelect
                | Self::RoleSelect
                | Self::MentionableSelect
                | Self::ChannelSelect
        )
    }
}

/// Tertiary tag: the application-command kind carried in the data payload.
/// `User` and `Message` mark context-menu commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize_repr, Serialize_repr)]
#[repr(u8)]
pub enum CommandType {
    ChatInput = 1,
    User = 2,
    Message = 3,
}

impl CommandType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::ChatInput),
            2 => Some(Self::User),
            3 => Some(Self::Message),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// A guild role as the server sends it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawRole {
    pub id: Snowflake,
    pub name: String,
    #[serde(default)]
    pub permissions: Permissions,
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub color: u32,
    #[serde(default)]
    pub hoist: bool,
    #[serde(default)]
    pub managed: bool,
    #[serde(default)]
    pub mentionable: bool,
}

/// Caller-supplied mutable role fields for create/edit requests.
///
/// Only fields the caller actually set are serialized — the request body
/// never carries more than what was asked for.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoleFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Permissions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoist: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentionable: Option<bool>,
}

impl RoleFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = Some(permissions);
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn hoist(mut self, hoist: bool) -> Self {
        self.hoist = Some(hoist);
        self
    }

    pub fn mentionable(mut self, mentionable: bool) -> Self {
        self.mentionable = Some(mentionable);
        self
    }
}

// ---------------------------------------------------------------------------
// Guild / user / member / message sub-payloads
// ---------------------------------------------------------------------------

/// Partial guild object carried inside interaction payloads.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawGuild {
    pub id: Option<Snowflake>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawUser {
    pub id: Snowflake,
    pub username: Option<String>,
    pub global_name: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawMember {
    pub user: Option<RawUser>,
    pub nick: Option<String>,
    #[serde(default)]
    pub roles: Vec<Snowflake>,
    pub joined_at: Option<String>,
    pub permissions: Option<Permissions>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawMessage {
    pub id: Snowflake,
    pub channel_id: Option<Snowflake>,
    #[serde(default)]
    pub content: String,
    pub author: Option<RawUser>,
}

// ---------------------------------------------------------------------------
// Interaction payload
// ---------------------------------------------------------------------------

/// The raw INTERACTION_CREATE payload — a superset union of all interaction
/// shapes. Discriminant fields are optional here so classification can fail
/// fast with a named field instead of a serde error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInteraction {
    pub id: Option<Snowflake>,
    pub application_id: Option<Snowflake>,
    #[serde(rename = "type")]
    pub kind: Option<u8>,
    pub token: Option<String>,
    pub version: Option<u8>,
    pub app_permissions: Option<Permissions>,
    pub locale: Option<String>,
    pub guild_locale: Option<String>,
    pub guild_id: Option<Snowflake>,
    pub guild: Option<RawGuild>,
    pub member: Option<RawMember>,
    pub user: Option<RawUser>,
    pub message: Option<RawMessage>,
    pub data: Option<RawInteractionData>,
}

/// The nested `data` payload of an interaction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInteractionData {
    pub id: Option<Snowflake>,
    pub name: Option<String>,
    /// Command kind ([`CommandType`]) for application commands.
    #[serde(rename = "type")]
    pub kind: Option<u8>,
    pub custom_id: Option<String>,
    /// Component kind ([`ComponentType`]) for component interactions.
    pub component_type: Option<u8>,
    /// Target of a context-menu command.
    pub target_id: Option<Snowflake>,
    #[serde(default)]
    pub values: Vec<String>,
}
