//! Transport boundary and REST funnel.
//!
//! The cache core never owns an HTTP stack. It talks to the authoritative
//! store through the [`Transport`] trait — one `request` method the embedding
//! application implements with whatever client it already runs. [`Rest`]
//! wraps a transport with the typed endpoints the managers and entities
//! call, so route building and response decoding live in one place.
//!
//! Retry, backoff, and rate-limit handling belong to the transport
//! implementation, not to this layer: a failed request here simply aborts
//! the pending cache mutation.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

use crate::error::TransportError;
use crate::snowflake::Snowflake;
use crate::types::{RawRole, RoleFields};

// ---------------------------------------------------------------------------
// Method
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// The external collaborator that actually reaches the remote API.
///
/// `path` is relative to the API base (e.g. `guilds/{id}/roles`).
/// `audit_reason`, when present, travels as the audit-log header — it is
/// request metadata, never part of the body.
pub trait Transport {
    fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        audit_reason: Option<&str>,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send;
}

// A shared transport is still a transport.
impl<T> Transport for Arc<T>
where
    T: Transport + Send + Sync,
{
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        audit_reason: Option<&str>,
    ) -> Result<Value, TransportError> {
        (**self).request(method, path, body, audit_reason).await
    }
}

// ---------------------------------------------------------------------------
// Rest — the single funnel every remote call goes through
// ---------------------------------------------------------------------------

/// Typed REST endpoints over a [`Transport`].
#[derive(Debug, Clone)]
pub struct Rest<T> {
    transport: T,
}

impl<T: Transport> Rest<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Send a request and decode the response body.
    async fn request_json<D: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        audit_reason: Option<&str>,
    ) -> Result<D, TransportError> {
        debug!(method = %method, path, "dispatching request");
        let value = self
            .transport
            .request(method, path, body, audit_reason)
            .await?;
        serde_json::from_value(value)
            .map_err(|e| TransportError::Decode(format!("{method} {path}: {e}")))
    }

    fn encode(body: &impl serde::Serialize) -> Result<Value, TransportError> {
        serde_json::to_value(body).map_err(|e| TransportError::Decode(e.to_string()))
    }

    // ------------------------------------------------------------------
    // Roles
    // ------------------------------------------------------------------

    /// Fetch every role in a guild.
    pub async fn get_roles(&self, guild_id: &Snowflake) -> Result<Vec<RawRole>, TransportError> {
        self.request_json(Method::Get, &format!("guilds/{guild_id}/roles"), None, None)
            .await
    }

    /// Create a role from exactly the supplied fields. The response is the
    /// server's authoritative role object.
    pub async fn create_role(
        &self,
        guild_id: &Snowflake,
        fields: &RoleFields,
    ) -> Result<RawRole, TransportError> {
        let body = Self::encode(fields)?;
        self.request_json(
            Method::Post,
            &format!("guilds/{guild_id}/roles"),
            Some(&body),
            None,
        )
        .await
    }

    /// Patch a role; returns the fresh authoritative role object.
    pub async fn modify_role(
        &self,
        guild_id: &Snowflake,
        role_id: &Snowflake,
        fields: &RoleFields,
        audit_reason: Option<&str>,
    ) -> Result<RawRole, TransportError> {
        let body = Self::encode(fields)?;
        self.request_json(
            Method::Patch,
            &format!("guilds/{guild_id}/roles/{role_id}"),
            Some(&body),
            audit_reason,
        )
        .await
    }

    /// Delete a role. The API answers 204 No Content, so the body is ignored.
    pub async fn delete_role(
        &self,
        guild_id: &Snowflake,
        role_id: &Snowflake,
        audit_reason: Option<&str>,
    ) -> Result<(), TransportError> {
        let path = format!("guilds/{guild_id}/roles/{role_id}");
        debug!(method = %Method::Delete, path = %path, "dispatching request");
        self.transport
            .request(Method::Delete, &path, None, audit_reason)
            .await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Test support
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// One request as the stub saw it.
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedCall {
        pub method: &'static str,
        pub path: String,
        pub body: Option<Value>,
        pub audit_reason: Option<String>,
    }

    /// Scripted transport: pops one queued response per request and records
    /// every call for assertions. Answers `Value::Null` when the script
    /// runs dry.
    #[derive(Default)]
    pub struct StubTransport {
        responses: Mutex<VecDeque<Result<Value, TransportError>>>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl StubTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_ok(&self, value: Value) {
            self.responses.lock().unwrap().push_back(Ok(value));
        }

        pub fn push_err(&self, err: TransportError) {
            self.responses.lock().unwrap().push_back(Err(err));
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Transport for StubTransport {
        async fn request(
            &self,
            method: Method,
            path: &str,
            body: Option<&Value>,
            audit_reason: Option<&str>,
        ) -> Result<Value, TransportError> {
            self.calls.lock().unwrap().push(RecordedCall {
                method: method.as_str(),
                path: path.to_string(),
                body: body.cloned(),
                audit_reason: audit_reason.map(str::to_string),
            });
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(Value::Null))
        }
    }
}
