//! Error taxonomy for the cache core.
//!
//! Every fallible operation in this crate surfaces one of the kinds below so
//! callers can branch on it — nothing is swallowed or logged-and-ignored
//! internally, and nothing here retries. A `RemoteRejected` caused by rate
//! limiting, for example, is the caller's decision to retry.

use thiserror::Error;

use crate::snowflake::Snowflake;

// ---------------------------------------------------------------------------
// Transport boundary
// ---------------------------------------------------------------------------

/// Failure reported by the [`Transport`] collaborator.
///
/// [`Transport`]: crate::http::Transport
#[derive(Debug, Error)]
pub enum TransportError {
    /// Non-success status from the remote API.
    #[error("API error {status} on {route}: {body}")]
    Status {
        status: u16,
        route: String,
        body: String,
    },

    /// Network-level failure before a status was received.
    #[error("transport error: {0}")]
    Network(String),

    /// The response body could not be decoded into the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// Core taxonomy
// ---------------------------------------------------------------------------

/// Errors produced by the cache core itself.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The authoritative store refused or failed the operation. Surfaced
    /// verbatim; the pending cache mutation is aborted.
    #[error("remote rejected the operation: {0}")]
    RemoteRejected(#[from] TransportError),

    /// A resolve-by-identifier operation found no cached entry.
    #[error("no cached entry with id {0}")]
    NotFound(Snowflake),

    /// `reduce`/`reduce_right` invoked on a zero-length group.
    #[error("reduce of an empty group")]
    EmptyReduce,

    /// A classification input is missing a required discriminant field.
    #[error("malformed interaction payload: missing or invalid `{0}`")]
    MalformedPayload(&'static str),
}
