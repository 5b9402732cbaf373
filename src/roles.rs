//! Guild role manager.
//!
//! One manager instance owns the role cache for one guild. The cache is a
//! read-through, write-after mirror of the authoritative store: every
//! mutating operation completes the remote call first, and only a successful
//! response touches the cache. A failed or abandoned call leaves the cache
//! exactly as it was. Nothing here retries.

use std::cmp::Ordering;
use tracing::debug;

use crate::entities::Role;
use crate::error::CacheError;
use crate::group::Group;
use crate::http::{Rest, Transport};
use crate::snowflake::Snowflake;
use crate::types::RoleFields;

// ---------------------------------------------------------------------------
// RoleResolvable
// ---------------------------------------------------------------------------

/// Anything that carries a role id: the id itself or an entity exposing one.
///
/// Resolution is a pure projection — it never consults the cache or the
/// remote store.
pub trait RoleResolvable {
    fn resolve_id(&self) -> Snowflake;
}

impl RoleResolvable for Snowflake {
    fn resolve_id(&self) -> Snowflake {
        self.clone()
    }
}

impl RoleResolvable for Role {
    fn resolve_id(&self) -> Snowflake {
        self.id.clone()
    }
}

impl RoleResolvable for &str {
    fn resolve_id(&self) -> Snowflake {
        Snowflake::from(*self)
    }
}

impl RoleResolvable for String {
    fn resolve_id(&self) -> Snowflake {
        Snowflake::from(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RoleManager
// ---------------------------------------------------------------------------

/// Remote-synced role collection for a single guild.
#[derive(Debug)]
pub struct RoleManager<T> {
    guild_id: Snowflake,
    rest: Rest<T>,
    cache: Group<Snowflake, Role>,
}

impl<T: Transport> RoleManager<T> {
    pub fn new(rest: Rest<T>, guild_id: Snowflake) -> Self {
        Self {
            guild_id,
            rest,
            cache: Group::new(),
        }
    }

    pub fn guild_id(&self) -> &Snowflake {
        &self.guild_id
    }

    /// The backing cache, for the full query algebra.
    pub fn cache(&self) -> &Group<Snowflake, Role> {
        &self.cache
    }

    /// Identity projection over a [`RoleResolvable`]; no lookups of any kind.
    pub fn resolve_id(&self, role: &impl RoleResolvable) -> Snowflake {
        role.resolve_id()
    }

    // ------------------------------------------------------------------
    // Remote-synced mutations
    // ------------------------------------------------------------------

    /// Fetch the guild's full role list and upsert every entry.
    pub async fn fetch(&mut self) -> Result<&Group<Snowflake, Role>, CacheError> {
        let raws = self.rest.get_roles(&self.guild_id).await?;
        debug!(guild = %self.guild_id, count = raws.len(), "refreshed role cache");
        for raw in raws {
            let role = Role::from_raw(raw, self.guild_id.clone());
            self.cache.set(role.id.clone(), role);
        }
        Ok(&self.cache)
    }

    /// Create a role remotely from exactly the supplied fields, then cache
    /// the server's authoritative instance.
    pub async fn create(&mut self, fields: &RoleFields) -> Result<&Role, CacheError> {
        let raw = self.rest.create_role(&self.guild_id, fields).await?;
        let role = Role::from_raw(raw, self.guild_id.clone());
        let id = role.id.clone();
        debug!(guild = %self.guild_id, role = %id, "created role");
        self.cache.set(id.clone(), role);
        self.cache.get(&id).ok_or(CacheError::NotFound(id))
    }

    /// Delete a role remotely, then drop it from the cache. `reason` travels
    /// as the audit-log header and carries no business meaning.
    pub async fn delete(
        &mut self,
        role: &impl RoleResolvable,
        reason: Option<&str>,
    ) -> Result<(), CacheError> {
        let id = role.resolve_id();
        self.rest.delete_role(&self.guild_id, &id, reason).await?;
        self.cache.remove(&id);
        debug!(guild = %self.guild_id, role = %id, "deleted role");
        Ok(())
    }

    /// Edit a cached role by delegating to [`Role::edit`], then upsert the
    /// fresh instance. An id with no cached entry is `NotFound` — this never
    /// constructs a blank entity to patch.
    pub async fn edit(
        &mut self,
        role: &impl RoleResolvable,
        fields: &RoleFields,
        reason: Option<&str>,
    ) -> Result<&Role, CacheError> {
        let id = role.resolve_id();
        let current = self
            .cache
            .get(&id)
            .ok_or_else(|| CacheError::NotFound(id.clone()))?;
        let fresh = current.edit(&self.rest, fields, reason).await?;
        let fresh_id = fresh.id.clone();
        self.cache.set(fresh_id.clone(), fresh);
        self.cache.get(&fresh_id).ok_or(CacheError::NotFound(fresh_id))
    }

    // ------------------------------------------------------------------
    // Derived views — recomputed from the cache on every call
    // ------------------------------------------------------------------

    /// The role currently highest in the hierarchy, or `None` on an empty
    /// cache.
    pub fn highest(&self) -> Option<&Role> {
        self.cache.values().max_by(|a, b| {
            match self.compare_positions(a, b) {
                d if d > 0 => Ordering::Greater,
                0 => Ordering::Equal,
                _ => Ordering::Less,
            }
        })
    }

    /// The guild's default role — the one whose id equals the guild id.
    pub fn everyone(&self) -> Option<&Role> {
        self.cache.get(&self.guild_id)
    }

    /// Signed hierarchy comparison: positive when `a` outranks `b`, negative
    /// when `b` outranks `a`, zero only for the same role. Equal positions
    /// fall back to age — the older snowflake outranks. The delta saturates,
    /// since positions arrive from the wire unvalidated.
    pub fn compare_positions(&self, a: &Role, b: &Role) -> i64 {
        if a.position != b.position {
            return a.position.saturating_sub(b.position);
        }
        match b.id.cmp(&a.id) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        }
    }
}
