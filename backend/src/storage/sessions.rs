//! In-memory session registry.
//!
//! Tokens live only for the lifetime of the process: nothing is persisted,
//! nothing expires, and there is no rotation. Restarting the server
//! invalidates every outstanding token. Concurrent requests bearing the
//! same token are all honored.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

pub struct SessionRegistry {
    tokens: Mutex<HashMap<String, String>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            tokens: Mutex::new(HashMap::new()),
        }
    }

    /// Mint an opaque token for `user_id` and record the mapping.
    pub fn create(&self, user_id: &str) -> String {
        let token = Uuid::new_v4().to_string();
        self.tokens
            .lock()
            .unwrap()
            .insert(token.clone(), user_id.to_string());
        token
    }

    /// Look up the user id a token was minted for.
    pub fn user_id_for(&self, token: &str) -> Option<String> {
        self.tokens.lock().unwrap().get(token).cloned()
    }

    /// Remove a token. Returns whether it existed.
    pub fn revoke(&self, token: &str) -> bool {
        self.tokens.lock().unwrap().remove(token).is_some()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_validate_token() {
        let registry = SessionRegistry::new();
        let token = registry.create("user::1");

        assert_eq!(registry.user_id_for(&token).as_deref(), Some("user::1"));
        assert!(registry.user_id_for("user-supplied-guess").is_none());
    }

    #[test]
    fn test_tokens_are_unique() {
        let registry = SessionRegistry::new();
        let a = registry.create("user::1");
        let b = registry.create("user::1");
        assert_ne!(a, b);
        // Both remain valid; there is no single-use behavior.
        assert!(registry.user_id_for(&a).is_some());
        assert!(registry.user_id_for(&b).is_some());
    }

    #[test]
    fn test_revoke_removes_mapping() {
        let registry = SessionRegistry::new();
        let token = registry.create("user::1");

        assert!(registry.revoke(&token));
        assert!(registry.user_id_for(&token).is_none());
        assert!(!registry.revoke(&token));
    }

    #[test]
    fn test_fresh_registry_rejects_old_tokens() {
        // Simulates a process restart: a new registry knows nothing about
        // tokens minted by the previous one.
        let old = SessionRegistry::new();
        let token = old.create("user::1");

        let restarted = SessionRegistry::new();
        assert!(restarted.user_id_for(&token).is_none());
    }
}
