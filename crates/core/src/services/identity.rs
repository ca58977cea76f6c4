//! Identity resolver.
//!
//! Maps a request's caller (verified identity or bare client IP) onto the
//! actor key used for likes.

use std::sync::Arc;

use quill_db::entities::post_like::LikerKind;
use sha2::{Digest, Sha256};

use crate::services::auth::Identity;

/// Prefix distinguishing authenticated actor keys from hashed IPs.
pub const AUTHENTICATED_KEY_PREFIX: &str = "user_";

/// The resolved actor behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Key stored on like rows.
    pub key: String,
    pub kind: LikerKind,
    /// Subject of the verified identity, if any.
    pub subject: Option<String>,
}

/// Resolves actors using a process-wide salt.
#[derive(Clone)]
pub struct IdentityResolver {
    salt: Arc<str>,
}

impl IdentityResolver {
    /// Create a resolver with the configured salt.
    #[must_use]
    pub fn new(salt: &str) -> Self {
        Self { salt: salt.into() }
    }

    /// Resolve the actor for a request.
    #[must_use]
    pub fn resolve(&self, identity: Option<&Identity>, client_ip: &str) -> Actor {
        match identity {
            Some(identity) => Actor {
                key: Self::authenticated_key(&identity.subject),
                kind: LikerKind::Authenticated,
                subject: Some(identity.subject.clone()),
            },
            None => Actor {
                key: self.anonymous_key(client_ip),
                kind: LikerKind::Anonymous,
                subject: None,
            },
        }
    }

    /// Namespaced key for an authenticated subject.
    #[must_use]
    pub fn authenticated_key(subject: &str) -> String {
        format!("{AUTHENTICATED_KEY_PREFIX}{subject}")
    }

    /// Hex-encoded `sha256(ip || salt)`.
    #[must_use]
    pub fn anonymous_key(&self, client_ip: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(client_ip.as_bytes());
        hasher.update(self.salt.as_bytes());
        hex::encode(hasher.finalize())
    }
}
