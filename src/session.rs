//! In-memory session state.
//!
//! A [`SessionStore`] maps opaque session ids to [`Session`] records behind a
//! single mutex. Reads hand out clones, so a request that mutates its copy
//! of a session never races with another request reading the same id; the
//! change becomes visible only once it is written back with
//! [`SessionStore::save`].
//!
//! Sessions do not expire. They live until [`SessionStore::delete`] or
//! until the process exits.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::rngs::OsRng;
use rand::RngCore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::model::User;

/// Random bytes behind every session id; the id is their hex form.
pub const SESSION_ID_BYTES: usize = 32;

/// Bag key holding the authenticated user's id.
pub const USER_ID_KEY: &str = "userId";

/// Bag key holding the authenticated user's administrator flag.
pub const IS_ADMINISTRATOR_KEY: &str = "isAdministrator";

/// Errors raised by [`SessionStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// [`SessionStore::save`] was handed a session that was never created.
    #[error("session {id} does not exist")]
    NotFound {
        /// Id of the missing session.
        id: String,
    },
}

/// A session id plus its key/value bag.
///
/// `Session::default()` is the empty record: no id, no values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    id: String,
    values: HashMap<String, Value>,
}

impl Session {
    /// A new session with a fresh random id and an empty bag.
    pub fn new() -> Self {
        Self::with_id(generate_session_id())
    }

    /// A session with a caller-chosen id and an empty bag.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values: HashMap::new(),
        }
    }

    /// The opaque session id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// True for the empty record returned for unknown ids.
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: T,
    ) -> Result<(), serde_json::Error> {
        self.values.insert(key.into(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Returns the value under `key`, or `None` if it is absent or does not
    /// deserialize as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// The raw JSON value under `key`.
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Records `user` as the session's authenticated user.
    pub fn login(&mut self, user: &User) {
        self.values
            .insert(USER_ID_KEY.to_string(), Value::from(user.id));
        self.values.insert(
            IS_ADMINISTRATOR_KEY.to_string(),
            Value::Bool(user.is_administrator),
        );
    }

    /// Id of the logged-in user, if any.
    pub fn user_id(&self) -> Option<i64> {
        self.get(USER_ID_KEY)
    }

    /// Whether the logged-in user is an administrator.
    pub fn is_administrator(&self) -> bool {
        self.get(IS_ADMINISTRATOR_KEY).unwrap_or(false)
    }

    /// Removes this session from `store`.
    pub fn delete(self, store: &SessionStore) {
        store.delete(&self.id);
    }
}

/// Process-wide session map. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, Session>>>,
}

impl SessionStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        // The map is never left half-written, so a poisoned lock is still usable.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts `session`, replacing any record with the same id.
    pub fn create(&self, session: Session) {
        debug!("session created");
        self.sessions().insert(session.id.clone(), session);
    }

    /// A copy of the record stored under `id`, if any.
    pub fn get(&self, id: &str) -> Option<Session> {
        self.sessions().get(id).cloned()
    }

    /// Like [`get`](Self::get), but yields the empty record for unknown ids.
    pub fn get_or_empty(&self, id: &str) -> Session {
        self.get(id).unwrap_or_default()
    }

    /// Writes back a session that was previously created.
    pub fn save(&self, session: Session) -> Result<(), SessionError> {
        let mut sessions = self.sessions();
        match sessions.get_mut(&session.id) {
            Some(stored) => {
                *stored = session;
                Ok(())
            }
            None => Err(SessionError::NotFound { id: session.id }),
        }
    }

    /// Removes `id`. Unknown ids are ignored.
    pub fn delete(&self, id: &str) {
        if self.sessions().remove(id).is_some() {
            debug!("session deleted");
        }
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions().is_empty()
    }
}

fn generate_session_id() -> String {
    let mut id = [0u8; SESSION_ID_BYTES];
    OsRng.fill_bytes(&mut id);
    hex::encode(id)
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn new_ids_are_64_hex_chars() {
        let a = Session::new();
        let b = Session::new();

        assert_eq!(a.id().len(), SESSION_ID_BYTES * 2);
        assert!(a.id().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn bag_get_and_set() {
        let mut session = Session::new();
        session.set("userId", 7).unwrap();
        session.set("name", "ridge").unwrap();

        assert_eq!(session.get::<i64>("userId"), Some(7));
        assert_eq!(session.get::<String>("name").as_deref(), Some("ridge"));
        assert_eq!(session.get::<i64>("name"), None);
        assert_eq!(session.get::<i64>("missing"), None);

        assert!(session.remove("name").is_some());
        assert_eq!(session.get_value("name"), None);
    }

    #[test]
    fn login_records_user_and_flag() {
        let mut user = User::new("admin", "admin", true);
        user.id = 1;

        let mut session = Session::new();
        assert!(!session.is_administrator());
        session.login(&user);

        assert_eq!(session.user_id(), Some(1));
        assert!(session.is_administrator());
    }

    #[test]
    fn get_returns_independent_copies() {
        let store = SessionStore::new();
        let mut session = Session::new();
        session.set("userId", 7).unwrap();
        let id = session.id().to_string();
        store.create(session);

        let mut copies: Vec<Session> = thread::scope(|scope| {
            let handles: Vec<_> = (0..2)
                .map(|_| scope.spawn(|| store.get(&id).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for copy in &copies {
            assert_eq!(copy.get::<i64>("userId"), Some(7));
        }

        copies[0].set("userId", 8).unwrap();

        assert_eq!(copies[0].get::<i64>("userId"), Some(8));
        assert_eq!(copies[1].get::<i64>("userId"), Some(7));
        assert_eq!(store.get(&id).unwrap().get::<i64>("userId"), Some(7));
    }

    #[test]
    fn save_requires_existing_session() {
        let store = SessionStore::new();
        let session = Session::new();
        let id = session.id().to_string();

        assert_eq!(
            store.save(session.clone()),
            Err(SessionError::NotFound { id: id.clone() })
        );
        assert!(store.get(&id).is_none());

        store.create(session.clone());
        let mut changed = session;
        changed.set("isAdministrator", true).unwrap();
        store.save(changed).unwrap();

        assert!(store.get(&id).unwrap().is_administrator());
    }

    #[test]
    fn delete_is_idempotent() {
        let store = SessionStore::new();
        store.delete("no-such-session");

        let session = Session::new();
        let id = session.id().to_string();
        store.create(session.clone());
        assert_eq!(store.len(), 1);

        session.delete(&store);
        assert!(store.get(&id).is_none());
        assert!(store.get_or_empty(&id).is_empty());
        assert!(store.is_empty());

        store.delete(&id);
    }

    #[test]
    fn concurrent_writers_last_write_wins_per_key() {
        let store = SessionStore::new();
        let session = Session::new();
        let id = session.id().to_string();
        store.create(session);

        thread::scope(|scope| {
            for n in 0..8i64 {
                let store = store.clone();
                let id = id.clone();
                scope.spawn(move || {
                    let mut copy = store.get(&id).unwrap();
                    copy.set("counter", n).unwrap();
                    store.save(copy).unwrap();
                });
            }
        });

        let counter = store.get(&id).unwrap().get::<i64>("counter");
        assert!(matches!(counter, Some(0..=7)));
        assert_eq!(store.len(), 1);
    }
}
