//! Telegram Bot API client over `reqwest`.

use super::{InlineButton, Keyboard, Messenger, Update, User};
use crate::errors::{AppError, AppResult};
use crate::models::Coordinate;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawUpdate {
    pub update_id: i64,
    pub message: Option<RawMessage>,
    pub callback_query: Option<RawCallbackQuery>,
}

#[derive(Debug, Deserialize)]
pub struct RawMessage {
    pub message_id: i64,
    pub from: Option<RawUser>,
    pub chat: RawChat,
    pub text: Option<String>,
    pub location: Option<RawLocation>,
    pub forward_date: Option<i64>,
    pub forward_origin: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct RawChat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct RawUser {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
}

#[derive(Debug, Deserialize)]
pub struct RawLocation {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
pub struct RawCallbackQuery {
    pub id: String,
    pub from: RawUser,
    pub message: Option<RawMessage>,
    pub data: Option<String>,
}

impl From<&RawUser> for User {
    fn from(u: &RawUser) -> Self {
        User {
            id: u.id,
            first_name: u.first_name.clone(),
        }
    }
}

/// Extract the command name from `/name`, `/name@botname` or `/name args`.
pub fn parse_command(text: &str) -> Option<String> {
    let first = text.trim().split_whitespace().next()?;
    let name = first.strip_prefix('/')?;
    let name = name.split('@').next().unwrap_or(name);
    if name.is_empty() {
        return None;
    }
    Some(name.to_ascii_lowercase())
}

impl RawUpdate {
    /// Map to the bot's own model. Updates the bot does not react to give `None`.
    pub fn into_update(self) -> Option<Update> {
        if let Some(q) = self.callback_query {
            let msg = q.message.as_ref();
            return Some(Update::Callback {
                chat_id: msg.map(|m| m.chat.id).unwrap_or(q.from.id),
                user: User::from(&q.from),
                callback_id: q.id,
                message_id: msg.map(|m| m.message_id),
                data: q.data.unwrap_or_default(),
            });
        }

        let msg = self.message?;
        let user = msg.from.as_ref().map(User::from)?;

        if let Some(loc) = &msg.location {
            return Some(Update::Location {
                chat_id: msg.chat.id,
                user,
                coordinate: Coordinate::new(loc.latitude, loc.longitude),
                forwarded: msg.forward_date.is_some() || msg.forward_origin.is_some(),
            });
        }

        let name = parse_command(msg.text.as_deref()?)?;
        Some(Update::Command {
            chat_id: msg.chat.id,
            user,
            name,
        })
    }
}

fn reply_markup(keyboard: &Keyboard) -> Option<Value> {
    match keyboard {
        Keyboard::None => None,
        Keyboard::RequestLocation(label) => Some(json!({
            "keyboard": [[{ "text": label, "request_location": true }]],
            "resize_keyboard": true,
            "one_time_keyboard": true,
        })),
        Keyboard::Remove => Some(json!({ "remove_keyboard": true })),
        Keyboard::Inline(buttons) => {
            let rows: Vec<Value> = buttons
                .iter()
                .map(|InlineButton { label, data }| json!([{ "text": label, "callback_data": data }]))
                .collect();
            Some(json!({ "inline_keyboard": rows }))
        }
    }
}

pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl TelegramClient {
    pub fn new(base_url: &str, token: &str, poll_timeout_secs: u64) -> AppResult<Self> {
        // the HTTP timeout must outlive the long-poll window
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(poll_timeout_secs + 15))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> AppResult<T> {
        let body: ApiResponse<T> = resp.json().await?;
        if !body.ok {
            return Err(AppError::Api(
                body.description.unwrap_or_else(|| "unknown error".into()),
            ));
        }
        body.result
            .ok_or_else(|| AppError::Api("response without result".into()))
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, payload: Value) -> AppResult<T> {
        debug!(method, "bot api call");
        let resp = self
            .http
            .post(self.method_url(method))
            .json(&payload)
            .send()
            .await?;
        Self::decode(resp).await
    }

    /// Long-poll for updates after `offset`.
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> AppResult<Vec<RawUpdate>> {
        self.call(
            "getUpdates",
            json!({
                "offset": offset,
                "timeout": timeout_secs,
                "allowed_updates": ["message", "callback_query"],
            }),
        )
        .await
    }

    /// Identity of the bot behind the token.
    pub async fn get_me(&self) -> AppResult<Value> {
        self.call("getMe", json!({})).await
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_text(&self, chat_id: i64, text: &str, keyboard: Keyboard) -> AppResult<()> {
        let mut payload = json!({ "chat_id": chat_id, "text": text });
        if let Some(markup) = reply_markup(&keyboard) {
            payload["reply_markup"] = markup;
        }
        let _: Value = self.call("sendMessage", payload).await?;
        Ok(())
    }

    async fn send_document(
        &self,
        chat_id: i64,
        file_name: &str,
        bytes: Vec<u8>,
        caption: Option<&str>,
    ) -> AppResult<()> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let mut form = Form::new()
            .text("chat_id", chat_id.to_string())
            .part("document", part);
        if let Some(c) = caption {
            form = form.text("caption", c.to_string());
        }

        debug!(chat_id, file_name, "bot api call: sendDocument");
        let resp = self
            .http
            .post(self.method_url("sendDocument"))
            .multipart(form)
            .send()
            .await?;
        let _: Value = Self::decode(resp).await?;
        Ok(())
    }

    async fn edit_message_text(&self, chat_id: i64, message_id: i64, text: &str) -> AppResult<()> {
        let _: Value = self
            .call(
                "editMessageText",
                json!({ "chat_id": chat_id, "message_id": message_id, "text": text }),
            )
            .await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> AppResult<()> {
        let _: bool = self
            .call("answerCallbackQuery", json!({ "callback_query_id": callback_id }))
            .await?;
        Ok(())
    }
}
