//! In-memory session tracking.
//!
//! Sessions live from login to logout. They are held in process memory
//! only, so a restart signs everyone out; the database never sees them.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

/// A live session for a logged-in user.
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque session token (UUID v4), presented by the client on each
    /// request.
    pub token: String,
    /// User ID associated with this session.
    pub user_id: i32,
    /// Username captured at login.
    pub username: String,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

impl Session {
    fn new(user_id: i32, username: &str) -> Self {
        Self {
            token: Uuid::new_v4().to_string(),
            user_id,
            username: username.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Shared map of active sessions, keyed by token.
///
/// Clones share the same underlying map, which is what lets every handler
/// see the sessions through `AppState`. The lock is only ever held for the
/// duration of a map operation, never across an await point.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    /// Create an empty session store.
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a session for a user and return it, token included.
    ///
    /// Logging in again while an older session is still live leaves the
    /// older session untouched; each login gets its own token.
    pub fn create(&self, user_id: i32, username: &str) -> Session {
        let session = Session::new(user_id, username);

        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(session.token.clone(), session.clone());

        info!(
            username = %session.username,
            user_id = session.user_id,
            "Session created"
        );
        session
    }

    /// Look up the session for a token.
    pub fn resolve(&self, token: &str) -> Option<Session> {
        let sessions = self.sessions.read().unwrap();
        sessions.get(token).cloned()
    }

    /// Remove a session. Returns whether the token named a live session.
    pub fn destroy(&self, token: &str) -> bool {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(session) = sessions.remove(token) {
            info!(
                username = %session.username,
                user_id = session.user_id,
                "Session destroyed"
            );
            true
        } else {
            debug!("Session destroy: token not found");
            false
        }
    }

    /// Number of live sessions.
    pub fn count(&self) -> usize {
        let sessions = self.sessions.read().unwrap();
        sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_resolve() {
        let store = SessionStore::new();
        let session = store.create(1, "alice");

        assert!(!session.token.is_empty());
        assert_eq!(session.user_id, 1);
        assert_eq!(session.username, "alice");

        let resolved = store.resolve(&session.token).unwrap();
        assert_eq!(resolved.user_id, 1);
        assert_eq!(resolved.username, "alice");
    }

    #[test]
    fn test_resolve_unknown_token() {
        let store = SessionStore::new();
        assert!(store.resolve("no-such-token").is_none());
    }

    #[test]
    fn test_tokens_are_unique() {
        let store = SessionStore::new();
        let session1 = store.create(1, "alice");
        let session2 = store.create(1, "alice");

        assert_ne!(session1.token, session2.token);
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn test_destroy() {
        let store = SessionStore::new();
        let session = store.create(1, "alice");

        assert!(store.destroy(&session.token));
        assert!(store.resolve(&session.token).is_none());

        // Destroying again reports the token as unknown
        assert!(!store.destroy(&session.token));
    }

    #[test]
    fn test_destroy_leaves_other_sessions() {
        let store = SessionStore::new();
        let session1 = store.create(1, "alice");
        let session2 = store.create(2, "bob");

        assert!(store.destroy(&session1.token));
        assert!(store.resolve(&session2.token).is_some());
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_clones_share_state() {
        let store = SessionStore::new();
        let clone = store.clone();

        let session = store.create(1, "alice");
        assert!(clone.resolve(&session.token).is_some());

        clone.destroy(&session.token);
        assert!(store.resolve(&session.token).is_none());
    }
}
