//! Per-request publishing context.
//!
//! A [`RequestContext`] is an immutable snapshot captured once per publish
//! operation and threaded explicitly through every call. Nothing here reads
//! ambient request state; the session layer that knows who the caller is
//! constructs the snapshot and hands it in.
//!
//! The snapshot drives mirror partitioning through its context hash:
//! - anonymous requests all share the literal hash `"0"`, so they collapse
//!   onto the same mirror entry (shared public cache)
//! - authenticated requests hash their opaque access token, so two sessions
//!   with distinct tokens land in distinct subtrees and can never reuse each
//!   other's cached entries

use serde::{Deserialize, Serialize};

use crate::publish::obfuscate::sha1_hex;

/// Context hash segment used for every anonymous request.
pub const ANONYMOUS_CONTEXT_HASH: &str = "0";

/// Immutable request context snapshot.
///
/// Authentication state is carried by the presence of the access token:
/// a context built with [`RequestContext::authenticated`] always has one,
/// one built with [`RequestContext::anonymous`] never does. There is no way
/// to end up authenticated with an empty token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// tenant/site identifier, the top-level partition of the mirror tree
    location_id: String,
    /// opaque per-session token; `None` for anonymous requests
    access_token: Option<String>,
}

impl RequestContext {
    /// Build a context for an anonymous (not logged in) request.
    pub fn anonymous(location_id: impl Into<String>) -> Self {
        Self {
            location_id: location_id.into(),
            access_token: None,
        }
    }

    /// Build a context for an authenticated request carrying a session token.
    pub fn authenticated(location_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            location_id: location_id.into(),
            access_token: Some(access_token.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn location_id(&self) -> &str {
        &self.location_id
    }

    /// The partitioning key for this context.
    ///
    /// `"0"` for anonymous requests, `sha1(access_token)` in lowercase hex
    /// for authenticated ones. Kept as its own path segment so an operator
    /// can bulk-delete all anonymous or all per-session mirror entries by
    /// removing one subtree.
    pub fn context_hash(&self) -> String {
        match &self.access_token {
            Some(token) => sha1_hex(token.as_bytes()),
            None => ANONYMOUS_CONTEXT_HASH.to_string(),
        }
    }
}
