//! Client-side model cache for the Discord API.
//!
//! Mirrors server-owned entities (guild roles, interaction payloads, members,
//! messages) in insertion-ordered local caches and classifies raw
//! `INTERACTION_CREATE` payloads into strongly discriminated objects. The
//! cache is never the source of truth: every mutation completes its remote
//! call through a caller-supplied [`Transport`](http::Transport) before the
//! local state changes.
//!
//! Three pillars:
//! - [`Group`](group::Group): the insertion-ordered unique-key container and
//!   its query/transform algebra, used by every manager.
//! - [`RoleManager`](roles::RoleManager): the remote-sync contract —
//!   read-through, write-after, no retries.
//! - [`Interaction`](interaction::Interaction): one raw payload in, one
//!   fully classified object out.

pub mod entities;
pub mod error;
pub mod group;
pub mod http;
pub mod interaction;
pub mod roles;
pub mod snowflake;
pub mod types;

pub use entities::{Guild, GuildMember, Message, Role, User};
pub use error::{CacheError, TransportError};
pub use group::Group;
pub use http::{Method, Rest, Transport};
pub use interaction::Interaction;
pub use roles::{RoleManager, RoleResolvable};
pub use snowflake::Snowflake;
pub use types::{
    CommandType, ComponentType, InteractionType, Permissions, RoleFields,
};
