//! In-process session store.
//!
//! Each session sits behind its own async mutex. A turn holds that lock from
//! start to finish, so turns for one session id run strictly one after
//! another while different ids proceed in parallel. Nothing survives a
//! restart.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;

use crate::models::Session;

pub type SessionHandle = Arc<AsyncMutex<Session>>;

#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `id`, creating an idle session under it (or under a fresh id
    /// when none is given) if it does not exist yet.
    pub fn get_or_create(&self, id: Option<&str>) -> (String, SessionHandle) {
        let id = match id.map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => id.to_string(),
            None => new_session_id(),
        };

        let mut sessions = self.sessions.lock();
        let handle = sessions
            .entry(id.clone())
            .or_insert_with(|| Arc::new(AsyncMutex::new(Session::new(id.clone()))))
            .clone();
        (id, handle)
    }

    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        self.sessions.lock().get(id).cloned()
    }

    /// Discard `prior` (if present) and start a new idle session.
    pub fn reset(&self, prior: Option<&str>) -> String {
        let id = new_session_id();
        let mut sessions = self.sessions.lock();
        if let Some(prior) = prior {
            sessions.remove(prior);
        }
        sessions.insert(id.clone(), Arc::new(AsyncMutex::new(Session::new(id.clone()))));
        id
    }
}

fn new_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Stage;

    #[test]
    fn test_get_or_create_reuses_existing() {
        let store = SessionStore::new();
        let (id, _) = store.get_or_create(None);
        let (same, _) = store.get_or_create(Some(&id));
        assert_eq!(id, same);
        assert_eq!(store.sessions.lock().len(), 1);
    }

    #[test]
    fn test_client_supplied_id_is_kept() {
        let store = SessionStore::new();
        let (id, _) = store.get_or_create(Some("abc"));
        assert_eq!(id, "abc");
        assert!(store.get("abc").is_some());
    }

    #[tokio::test]
    async fn test_reset_discards_prior() {
        let store = SessionStore::new();
        let (old, handle) = store.get_or_create(None);
        handle.lock().await.stage = Stage::AskBreed;

        let new = store.reset(Some(&old));
        assert_ne!(old, new);
        assert!(store.get(&old).is_none());
        let fresh = store.get(&new).unwrap();
        assert_eq!(fresh.lock().await.stage, Stage::Idle);
    }

    #[tokio::test]
    async fn test_same_id_turns_are_serialized() {
        let store = Arc::new(SessionStore::new());
        let (id, _) = store.get_or_create(Some("shared"));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            let id = id.clone();
            tasks.push(tokio::spawn(async move {
                let (_, handle) = store.get_or_create(Some(&id));
                let mut session = handle.lock().await;
                let seen = session.slots.pet_name.clone().unwrap_or_default();
                tokio::task::yield_now().await;
                session.slots.pet_name = Some(format!("{seen}x"));
            }));
        }
        for t in tasks {
            t.await.unwrap();
        }

        let handle = store.get(&id).unwrap();
        assert_eq!(handle.lock().await.slots.pet_name.as_deref(), Some("xxxxxxxx"));
    }
}
