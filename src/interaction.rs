//! Interaction classification.
//!
//! One raw `INTERACTION_CREATE` payload becomes one immutable [`Interaction`]
//! with every discriminant resolved up front. Classification fails fast when
//! the payload lacks an id or a recognizable primary type — there is no
//! partial object. Downstream code branches on the predicate methods, which
//! re-evaluate the stored tags on every call rather than caching one boolean
//! per question.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

use crate::entities::{Guild, GuildMember, Message, User};
use crate::error::CacheError;
use crate::group::Group;
use crate::snowflake::Snowflake;
use crate::types::{
    CommandType, ComponentType, InteractionType, Permissions, RawInteraction,
};

/// A classified interaction. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Interaction {
    pub id: Snowflake,
    pub application_id: Option<Snowflake>,
    pub kind: InteractionType,
    pub token: Option<String>,
    pub version: Option<u8>,
    pub app_permissions: Option<Permissions>,
    pub locale: Option<String>,
    pub guild_locale: Option<String>,

    /// Always present; an interaction outside any guild carries the
    /// empty-id wrapper. Use [`Interaction::in_guild`], not a null check.
    pub guild: Guild,
    pub member: Option<GuildMember>,
    pub user: Option<User>,
    pub message: Option<Message>,

    pub command_name: Option<String>,
    pub custom_id: Option<String>,
    pub values: Vec<String>,

    component_type: Option<ComponentType>,
    command_type: Option<CommandType>,
    target_id: Option<Snowflake>,
}

impl Interaction {
    /// Classify a raw payload straight from the wire.
    pub fn classify(raw: Value) -> Result<Self, CacheError> {
        let raw: RawInteraction =
            serde_json::from_value(raw).map_err(|_| CacheError::MalformedPayload("interaction"))?;
        Self::from_raw(raw)
    }

    /// Classify an already-deserialized payload.
    pub fn from_raw(raw: RawInteraction) -> Result<Self, CacheError> {
        let id = match raw.id {
            Some(id) if !id.is_empty() => id,
            _ => return Err(CacheError::MalformedPayload("id")),
        };
        let kind = raw
            .kind
            .and_then(InteractionType::from_u8)
            .ok_or(CacheError::MalformedPayload("type"))?;

        // Unconditional guild wrapper; absent guild data yields the empty id.
        let guild = Guild::from_raw(raw.guild.unwrap_or_default(), raw.guild_id);
        let member = raw
            .member
            .map(|m| GuildMember::from_raw(m, guild.id.clone()));
        let user = raw.user.map(User::from_raw);
        let message = raw.message.map(Message::from_raw);

        let data = raw.data.unwrap_or_default();
        let component_type = data.component_type.and_then(|value| {
            let parsed = ComponentType::from_u8(value);
            if parsed.is_none() {
                warn!(interaction = %id, component_type = value, "unrecognized component type");
            }
            parsed
        });
        let command_type = data.kind.and_then(CommandType::from_u8);

        Ok(Self {
            id,
            application_id: raw.application_id,
            kind,
            token: raw.token,
            version: raw.version,
            app_permissions: raw.app_permissions,
            locale: raw.locale,
            guild_locale: raw.guild_locale,
            guild,
            member,
            user,
            message,
            command_name: data.name,
            custom_id: data.custom_id,
            values: data.values,
            component_type,
            command_type,
            target_id: data.target_id,
        })
    }

    // ------------------------------------------------------------------
    // Derived scalars
    // ------------------------------------------------------------------

    /// Unix-millisecond creation timestamp embedded in the interaction id.
    pub fn created_at_ms(&self) -> Option<u64> {
        self.id.timestamp_ms()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.id.created_at()
    }

    pub fn component_type(&self) -> Option<ComponentType> {
        self.component_type
    }

    pub fn command_type(&self) -> Option<CommandType> {
        self.command_type
    }

    pub fn target_id(&self) -> Option<&Snowflake> {
        self.target_id.as_ref()
    }

    // ------------------------------------------------------------------
    // Guild predicates
    // ------------------------------------------------------------------

    /// Whether the interaction carries a real guild id, cached or not.
    pub fn in_guild(&self) -> bool {
        !self.guild.id.is_empty()
    }

    /// Whether the guild is present in the client-wide guild cache.
    pub fn in_cached_guild(&self, guilds: &Group<Snowflake, Guild>) -> bool {
        self.in_guild() && guilds.contains(&self.guild.id)
    }

    pub fn in_uncached_guild(&self, guilds: &Group<Snowflake, Guild>) -> bool {
        self.in_guild() && !guilds.contains(&self.guild.id)
    }

    // ------------------------------------------------------------------
    // Primary-type predicates
    // ------------------------------------------------------------------

    pub fn is_application_command(&self) -> bool {
        self.kind == InteractionType::ApplicationCommand
    }

    pub fn is_autocomplete(&self) -> bool {
        self.kind == InteractionType::ApplicationCommandAutocomplete
    }

    pub fn is_message_component(&self) -> bool {
        self.kind == InteractionType::MessageComponent
    }

    pub fn is_modal_submit(&self) -> bool {
        self.kind == InteractionType::ModalSubmit
    }

    // ------------------------------------------------------------------
    // Component predicates
    // ------------------------------------------------------------------

    pub fn is_button(&self) -> bool {
        self.component_type == Some(ComponentType::Button)
    }

    pub fn is_string_select_menu(&self) -> bool {
        self.component_type == Some(ComponentType::StringSelect)
    }

    pub fn is_user_select_menu(&self) -> bool {
        self.component_type == Some(ComponentType::UserSelect)
    }

    pub fn is_role_select_menu(&self) -> bool {
        self.component_type == Some(ComponentType::RoleSelect)
    }

    pub fn is_mentionable_select_menu(&self) -> bool {
        self.component_type == Some(ComponentType::MentionableSelect)
    }

    pub fn is_channel_select_menu(&self) -> bool {
        self.component_type == Some(ComponentType::ChannelSelect)
    }

    pub fn is_any_select_menu(&self) -> bool {
        self.component_type.is_some_and(ComponentType::is_select)
    }

    pub fn is_text_input(&self) -> bool {
        self.component_type == Some(ComponentType::TextInput)
    }

    // ------------------------------------------------------------------
    // Context-menu predicates
    // ------------------------------------------------------------------

    pub fn is_user_context_menu(&self) -> bool {
        self.is_application_command()
            && self.target_id.is_some()
            && self.command_type == Some(CommandType::User)
    }

    pub fn is_message_context_menu(&self) -> bool {
        self.is_application_command()
            && self.target_id.is_some()
            && self.command_type == Some(CommandType::Message)
    }

    pub fn is_any_context_menu(&self) -> bool {
        self.target_id.is_some()
    }
}
