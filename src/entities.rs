//! Constructed entities.
//!
//! Thin typed views over the raw wire shapes in [`crate::types`]. Each
//! constructor copies an explicit field list from its raw counterpart —
//! construction is infallible, missing optional raw fields become their
//! defaults. Entities carry only the fields the cache and classifier read.

use chrono::{DateTime, Utc};

use crate::error::CacheError;
use crate::http::{Rest, Transport};
use crate::snowflake::Snowflake;
use crate::types::{Permissions, RawGuild, RawMember, RawMessage, RawRole, RawUser, RoleFields};

// ---------------------------------------------------------------------------
// Guild
// ---------------------------------------------------------------------------

/// Guild reference attached to interactions.
///
/// An interaction that arrived outside any guild still gets a wrapper, keyed
/// by the empty id — check [`Snowflake::is_empty`] (or the interaction's
/// `in_guild`) rather than wrapping this in another `Option`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Guild {
    pub id: Snowflake,
    pub name: Option<String>,
}

impl Guild {
    pub fn new(id: Snowflake) -> Self {
        Self { id, name: None }
    }

    /// Build from a partial guild payload, preferring `fallback_id` (the
    /// envelope's `guild_id`) when the payload has no id of its own.
    pub fn from_raw(raw: RawGuild, fallback_id: Option<Snowflake>) -> Self {
        Self {
            id: raw.id.or(fallback_id).unwrap_or_default(),
            name: raw.name,
        }
    }
}

// ---------------------------------------------------------------------------
// User / member / message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: Option<String>,
    pub global_name: Option<String>,
    pub bot: bool,
}

impl User {
    pub fn from_raw(raw: RawUser) -> Self {
        Self {
            id: raw.id,
            username: raw.username,
            global_name: raw.global_name,
            bot: raw.bot,
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.id.created_at()
    }
}

/// A guild member: a user plus guild-scoped state.
#[derive(Debug, Clone)]
pub struct GuildMember {
    pub guild_id: Snowflake,
    pub user: Option<User>,
    pub nick: Option<String>,
    pub roles: Vec<Snowflake>,
    pub joined_at: Option<DateTime<Utc>>,
    pub permissions: Option<Permissions>,
}

impl GuildMember {
    pub fn from_raw(raw: RawMember, guild_id: Snowflake) -> Self {
        Self {
            guild_id,
            user: raw.user.map(User::from_raw),
            nick: raw.nick,
            roles: raw.roles,
            joined_at: raw
                .joined_at
                .as_deref()
                .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
                .map(|dt| dt.with_timezone(&Utc)),
            permissions: raw.permissions,
        }
    }

    /// Display name: nick, then global name, then username.
    pub fn display_name(&self) -> Option<&str> {
        self.nick
            .as_deref()
            .or_else(|| self.user.as_ref().and_then(|u| u.global_name.as_deref()))
            .or_else(|| self.user.as_ref().and_then(|u| u.username.as_deref()))
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub id: Snowflake,
    pub channel_id: Option<Snowflake>,
    pub content: String,
    pub author: Option<User>,
}

impl Message {
    pub fn from_raw(raw: RawMessage) -> Self {
        Self {
            id: raw.id,
            channel_id: raw.channel_id,
            content: raw.content,
            author: raw.author.map(User::from_raw),
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.id.created_at()
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// A cached guild role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    pub name: String,
    pub permissions: Permissions,
    pub position: i64,
    pub color: u32,
    pub hoist: bool,
    pub managed: bool,
    pub mentionable: bool,
}

impl Role {
    pub fn from_raw(raw: RawRole, guild_id: Snowflake) -> Self {
        Self {
            id: raw.id,
            guild_id,
            name: raw.name,
            permissions: raw.permissions,
            position: raw.position,
            color: raw.color,
            hoist: raw.hoist,
            managed: raw.managed,
            mentionable: raw.mentionable,
        }
    }

    /// The guild's default role shares the guild's own id.
    pub fn is_everyone(&self) -> bool {
        self.id == self.guild_id
    }

    pub fn created_at_ms(&self) -> Option<u64> {
        self.id.timestamp_ms()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.id.created_at()
    }

    /// Patch this role remotely and return the fresh authoritative instance.
    ///
    /// `self` is left untouched; the caller (normally the manager) decides
    /// what to do with the returned instance.
    pub async fn edit<T: Transport>(
        &self,
        rest: &Rest<T>,
        fields: &RoleFields,
        audit_reason: Option<&str>,
    ) -> Result<Role, CacheError> {
        let raw = rest
            .modify_role(&self.guild_id, &self.id, fields, audit_reason)
            .await?;
        Ok(Role::from_raw(raw, self.guild_id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::StubTransport;
    use futures_lite::future::block_on;
    use serde_json::json;
    use std::sync::Arc;

    fn raw_role(id: &str, name: &str, position: i64) -> RawRole {
        serde_json::from_value(json!({ "id": id, "name": name, "position": position }))
            .unwrap()
    }

    // -- guild wrapper -----------------------------------------------------

    #[test]
    fn guild_wrapper_prefers_its_own_id() {
        let raw: RawGuild =
            serde_json::from_value(json!({ "id": "5", "name": "testing" })).unwrap();
        let guild = Guild::from_raw(raw, Some(Snowflake::from("9")));
        assert_eq!(guild.id, Snowflake::from("5"));
        assert_eq!(guild.name.as_deref(), Some("testing"));
    }

    #[test]
    fn guild_wrapper_without_any_id_is_the_empty_placeholder() {
        let guild = Guild::from_raw(RawGuild::default(), None);
        assert!(guild.id.is_empty());
    }

    // -- member ------------------------------------------------------------

    #[test]
    fn member_parses_joined_at_and_resolves_display_name() {
        let raw: RawMember = serde_json::from_value(json!({
            "user": { "id": "20", "username": "alice" },
            "nick": "Al",
            "roles": ["1", "2"],
            "joined_at": "2021-03-01T12:00:00+00:00"
        }))
        .unwrap();
        let member = GuildMember::from_raw(raw, Snowflake::from("10"));
        assert_eq!(member.display_name(), Some("Al"));
        assert_eq!(member.roles.len(), 2);
        assert_eq!(member.joined_at.unwrap().to_rfc3339(), "2021-03-01T12:00:00+00:00");
    }

    #[test]
    fn member_display_name_falls_back_to_username() {
        let raw: RawMember =
            serde_json::from_value(json!({ "user": { "id": "20", "username": "alice" } }))
                .unwrap();
        let member = GuildMember::from_raw(raw, Snowflake::from("10"));
        assert_eq!(member.display_name(), Some("alice"));
    }

    // -- role --------------------------------------------------------------

    #[test]
    fn everyone_is_the_role_sharing_the_guild_id() {
        let everyone = Role::from_raw(raw_role("10", "@everyone", 0), Snowflake::from("10"));
        let other = Role::from_raw(raw_role("42", "Admin", 3), Snowflake::from("10"));
        assert!(everyone.is_everyone());
        assert!(!other.is_everyone());
    }

    #[test]
    fn role_created_at_comes_from_its_snowflake() {
        let role = Role::from_raw(
            raw_role("175928847299117063", "old", 1),
            Snowflake::from("10"),
        );
        assert_eq!(role.created_at_ms(), Some(1_462_015_105_796));
    }

    #[test]
    fn edit_patches_remotely_and_returns_a_fresh_instance() {
        let stub = Arc::new(StubTransport::new());
        stub.push_ok(json!({ "id": "42", "name": "Renamed", "position": 3 }));
        let rest = Rest::new(stub.clone());
        let role = Role::from_raw(raw_role("42", "Admin", 3), Snowflake::from("10"));

        let fresh = block_on(role.edit(&rest, &RoleFields::new().name("Renamed"), None)).unwrap();
        assert_eq!(fresh.name, "Renamed");
        assert_eq!(role.name, "Admin");

        let calls = stub.calls();
        assert_eq!(calls[0].method, "PATCH");
        assert_eq!(calls[0].path, "guilds/10/roles/42");
        assert_eq!(calls[0].body, Some(json!({ "name": "Renamed" })));
    }
}
