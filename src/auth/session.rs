//! In-memory bearer-token sessions.
//!
//! A login issues a random token; only its SHA-256 hash is retained
//! server-side. Logout revokes the presented token. Sessions do not
//! survive a process restart.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::Role;

/// Identity bound to a session token.
#[derive(Debug, Clone, Copy)]
pub struct SessionEntry {
    pub account_id: Uuid,
    pub role: Role,
}

#[derive(Default)]
pub struct SessionStore {
    sessions: HashMap<[u8; 32], SessionEntry>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token for the account. Returns the raw token; the
    /// store keeps only its hash.
    pub fn issue(&mut self, account_id: Uuid, role: Role) -> String {
        let token = generate_token();
        self.sessions
            .insert(hash_token(&token), SessionEntry { account_id, role });
        token
    }

    pub fn resolve(&self, token: &str) -> Option<SessionEntry> {
        self.sessions.get(&hash_token(token)).copied()
    }

    /// Revoke the token. Returns whether a session existed for it.
    pub fn revoke(&mut self, token: &str) -> bool {
        self.sessions.remove(&hash_token(token)).is_some()
    }
}

/// Generate a random bearer token (URL-safe base64, 32 bytes of entropy).
pub fn generate_token() -> String {
    use base64::Engine;
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

pub fn hash_token(token: &str) -> [u8; 32] {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().into()
}
