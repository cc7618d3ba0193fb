//! The messaging seam: what the bot receives and what it can send back.
//!
//! Workflows only talk to [`Messenger`]; the Telegram client is one
//! implementation, test doubles are another.

pub mod telegram;

use crate::errors::AppResult;
use crate::models::Coordinate;
use async_trait::async_trait;

pub use telegram::TelegramClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub first_name: String,
}

/// Inbound event, already stripped of transport details.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    Command {
        chat_id: i64,
        user: User,
        name: String,
    },
    Location {
        chat_id: i64,
        user: User,
        coordinate: Coordinate,
        /// Relayed from another message rather than the sender's live position.
        forwarded: bool,
    },
    Callback {
        chat_id: i64,
        user: User,
        callback_id: String,
        message_id: Option<i64>,
        data: String,
    },
}

impl Update {
    pub fn chat_id(&self) -> i64 {
        match self {
            Update::Command { chat_id, .. }
            | Update::Location { chat_id, .. }
            | Update::Callback { chat_id, .. } => *chat_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub data: String,
}

/// Client-side affordance attached to an outgoing text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Keyboard {
    #[default]
    None,
    /// One button that makes the client send its current location.
    RequestLocation(String),
    /// Hide a previously shown reply keyboard.
    Remove,
    /// One option per row.
    Inline(Vec<InlineButton>),
}

#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str, keyboard: Keyboard) -> AppResult<()>;

    async fn send_document(
        &self,
        chat_id: i64,
        file_name: &str,
        bytes: Vec<u8>,
        caption: Option<&str>,
    ) -> AppResult<()>;

    async fn edit_message_text(&self, chat_id: i64, message_id: i64, text: &str) -> AppResult<()>;

    async fn answer_callback(&self, callback_id: &str) -> AppResult<()>;
}
