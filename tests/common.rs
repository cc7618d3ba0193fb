#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeZone};
use geoattend::bot::Bot;
use geoattend::config::Config;
use geoattend::errors::{AppError, AppResult};
use geoattend::models::{ConversationKey, Coordinate, Session};
use geoattend::store::{MemorySessionStore, RecordStore, SessionStore};
use geoattend::transport::{Keyboard, Messenger, Update, User};
use geoattend::utils::FixedClock;
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

pub const ADMIN_ID: i64 = 641_817_858;
pub const TARGET: Coordinate = Coordinate {
    latitude: 33.311317,
    longitude: 44.330635,
};

pub fn gat() -> Command {
    cargo_bin_cmd!("geoattend")
}

/// Create a unique path inside the system temp dir and remove any existing file
pub fn temp_path(name: &str, ext: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("geoattend_{}_{}.{}", name, std::process::id(), ext));
    fs::remove_file(&path).ok();
    path
}

pub fn offset() -> FixedOffset {
    FixedOffset::east_opt(3 * 3600).unwrap()
}

pub fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<FixedOffset> {
    offset().with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

pub fn fixed_now() -> DateTime<FixedOffset> {
    at(2024, 5, 1, 9, 15, 0)
}

pub fn test_config(admin: Option<i64>) -> Config {
    Config {
        admin_id: admin,
        target: TARGET,
        max_distance_meters: 25.0,
        export_interval_secs: 600,
        ..Config::default()
    }
}

pub fn user(id: i64, name: &str) -> User {
    User {
        id,
        first_name: name.to_string(),
    }
}

/// Everything a messenger was asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text {
        chat_id: i64,
        text: String,
        keyboard: Keyboard,
    },
    Document {
        chat_id: i64,
        file_name: String,
        bytes: Vec<u8>,
        caption: Option<String>,
    },
    Edit {
        chat_id: i64,
        message_id: i64,
        text: String,
    },
    CallbackAnswer(String),
}

/// Records outgoing traffic; chats in `failing` reject every delivery.
#[derive(Default)]
pub struct FakeMessenger {
    sent: Mutex<Vec<Sent>>,
    failing: Mutex<HashSet<i64>>,
    fail_documents: AtomicBool,
}

impl FakeMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_chat(&self, chat_id: i64) {
        self.failing.lock().unwrap().insert(chat_id);
    }

    pub fn fail_documents(&self, on: bool) {
        self.fail_documents.store(on, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts_to(&self, chat_id: i64) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { chat_id: c, text, .. } if c == chat_id => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn documents_to(&self, chat_id: i64) -> Vec<(String, Vec<u8>, Option<String>)> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Document {
                    chat_id: c,
                    file_name,
                    bytes,
                    caption,
                } if c == chat_id => Some((file_name, bytes, caption)),
                _ => None,
            })
            .collect()
    }

    pub fn last_text(&self, chat_id: i64) -> Option<String> {
        self.texts_to(chat_id).pop()
    }

    fn check(&self, chat_id: i64) -> AppResult<()> {
        if self.failing.lock().unwrap().contains(&chat_id) {
            return Err(AppError::Api(format!("chat {chat_id} unreachable")));
        }
        Ok(())
    }
}

#[async_trait]
impl Messenger for FakeMessenger {
    async fn send_text(&self, chat_id: i64, text: &str, keyboard: Keyboard) -> AppResult<()> {
        self.check(chat_id)?;
        self.sent.lock().unwrap().push(Sent::Text {
            chat_id,
            text: text.to_string(),
            keyboard,
        });
        Ok(())
    }

    async fn send_document(
        &self,
        chat_id: i64,
        file_name: &str,
        bytes: Vec<u8>,
        caption: Option<&str>,
    ) -> AppResult<()> {
        self.check(chat_id)?;
        if self.fail_documents.load(Ordering::SeqCst) {
            return Err(AppError::Api("document upload failed".into()));
        }
        self.sent.lock().unwrap().push(Sent::Document {
            chat_id,
            file_name: file_name.to_string(),
            bytes,
            caption: caption.map(str::to_string),
        });
        Ok(())
    }

    async fn edit_message_text(&self, chat_id: i64, message_id: i64, text: &str) -> AppResult<()> {
        self.check(chat_id)?;
        self.sent.lock().unwrap().push(Sent::Edit {
            chat_id,
            message_id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> AppResult<()> {
        self.sent
            .lock()
            .unwrap()
            .push(Sent::CallbackAnswer(callback_id.to_string()));
        Ok(())
    }
}

/// A bot wired to in-memory sessions, a fake messenger and a fixed clock.
pub struct Harness {
    pub bot: Bot,
    pub messenger: Arc<FakeMessenger>,
    pub sessions: Arc<MemorySessionStore>,
    pub clock: Arc<FixedClock>,
    pub store: RecordStore,
}

impl Harness {
    pub fn new(name: &str, cfg: Config) -> Self {
        let store = RecordStore::new(temp_path(name, "csv"), offset());
        let messenger = Arc::new(FakeMessenger::new());
        let sessions = Arc::new(MemorySessionStore::new());
        let clock = Arc::new(FixedClock::new(fixed_now()));

        let bot = Bot::new(
            Arc::new(cfg),
            store.clone(),
            sessions.clone(),
            messenger.clone(),
            clock.clone(),
        );

        Self {
            bot,
            messenger,
            sessions,
            clock,
            store,
        }
    }

    pub async fn command(&self, chat_id: i64, from: &User, name: &str) {
        self.bot
            .handle(Update::Command {
                chat_id,
                user: from.clone(),
                name: name.to_string(),
            })
            .await
            .expect("command handled");
    }

    pub async fn location(&self, chat_id: i64, from: &User, lat: f64, lon: f64, forwarded: bool) {
        self.bot
            .handle(Update::Location {
                chat_id,
                user: from.clone(),
                coordinate: Coordinate::new(lat, lon),
                forwarded,
            })
            .await
            .expect("location handled");
    }

    pub async fn select(&self, chat_id: i64, from: &User, data: &str) {
        self.bot
            .handle(Update::Callback {
                chat_id,
                user: from.clone(),
                callback_id: format!("cb-{data}"),
                message_id: Some(77),
                data: data.to_string(),
            })
            .await
            .expect("callback handled");
    }

    /// Open session of `user_id` inside `chat_id`, if any.
    pub fn session(&self, chat_id: i64, user_id: i64) -> Option<Session> {
        self.sessions
            .load(ConversationKey::new(chat_id, user_id))
            .expect("load session")
    }

    pub fn record_count(&self) -> usize {
        self.store
            .scan_all_or_empty()
            .expect("scan store")
            .records
            .len()
    }
}
