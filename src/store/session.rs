//! Per-conversation session storage, keyed by chat and user.

use crate::errors::{AppError, AppResult};
use crate::models::{ConversationKey, Session};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

pub trait SessionStore: Send + Sync {
    fn load(&self, key: ConversationKey) -> AppResult<Option<Session>>;
    fn save(&self, key: ConversationKey, session: &Session) -> AppResult<()>;
    fn clear(&self, key: ConversationKey) -> AppResult<()>;
}

fn lock<T>(m: &Mutex<T>) -> AppResult<MutexGuard<'_, T>> {
    m.lock()
        .map_err(|_| AppError::Other("session store lock poisoned".into()))
}

/// Sessions kept only in memory; lost on restart.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<ConversationKey, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self, key: ConversationKey) -> AppResult<Option<Session>> {
        Ok(lock(&self.sessions)?.get(&key).cloned())
    }

    fn save(&self, key: ConversationKey, session: &Session) -> AppResult<()> {
        lock(&self.sessions)?.insert(key, session.clone());
        Ok(())
    }

    fn clear(&self, key: ConversationKey) -> AppResult<()> {
        lock(&self.sessions)?.remove(&key);
        Ok(())
    }
}

/// On-disk form: JSON object keys must be strings, so entries are a list.
#[derive(Serialize, Deserialize)]
struct StoredSession {
    #[serde(flatten)]
    key: ConversationKey,
    session: Session,
}

/// Sessions mirrored to a JSON file so open conversations survive a restart.
///
/// Every change rewrites the whole file through a temporary file and a rename.
pub struct JsonSessionStore {
    path: PathBuf,
    sessions: Mutex<HashMap<ConversationKey, Session>>,
}

impl JsonSessionStore {
    /// Open the store, loading existing sessions if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let mut sessions = HashMap::new();
        if path.is_file() {
            let content = fs::read_to_string(&path)?;
            if !content.trim().is_empty() {
                let stored: Vec<StoredSession> = serde_json::from_str(&content)?;
                sessions.extend(stored.into_iter().map(|s| (s.key, s.session)));
            }
        }

        Ok(Self {
            path,
            sessions: Mutex::new(sessions),
        })
    }

    fn persist(&self, sessions: &HashMap<ConversationKey, Session>) -> AppResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut stored: Vec<StoredSession> = sessions
            .iter()
            .map(|(key, session)| StoredSession {
                key: *key,
                session: session.clone(),
            })
            .collect();
        stored.sort_by_key(|s| (s.key.chat_id, s.key.user_id));

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&stored)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SessionStore for JsonSessionStore {
    fn load(&self, key: ConversationKey) -> AppResult<Option<Session>> {
        Ok(lock(&self.sessions)?.get(&key).cloned())
    }

    fn save(&self, key: ConversationKey, session: &Session) -> AppResult<()> {
        let mut guard = lock(&self.sessions)?;
        guard.insert(key, session.clone());
        self.persist(&guard)
    }

    fn clear(&self, key: ConversationKey) -> AppResult<()> {
        let mut guard = lock(&self.sessions)?;
        if guard.remove(&key).is_some() {
            self.persist(&guard)?;
        }
        Ok(())
    }
}
