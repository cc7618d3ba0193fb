//! Conversation handling: routes each inbound update to the attendance
//! workflow, the remote check-in workflow or a plain command.

pub mod attendance;
pub mod commands;
pub mod remote;
pub mod texts;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::{Action, ConversationKey, Session};
use crate::store::{RecordStore, SessionStore};
use crate::transport::{Keyboard, Messenger, Update};
use crate::utils::Clock;
use std::sync::Arc;
use tracing::{debug, warn};

/// Everything a handler needs, built once at startup.
pub struct Bot {
    pub(crate) cfg: Arc<Config>,
    pub(crate) store: RecordStore,
    pub(crate) sessions: Arc<dyn SessionStore>,
    pub(crate) messenger: Arc<dyn Messenger>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl Bot {
    pub fn new(
        cfg: Arc<Config>,
        store: RecordStore,
        sessions: Arc<dyn SessionStore>,
        messenger: Arc<dyn Messenger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cfg,
            store,
            sessions,
            messenger,
            clock,
        }
    }

    /// Handle one inbound update. Errors are confined to this update.
    pub async fn handle(&self, update: Update) -> AppResult<()> {
        match update {
            Update::Command {
                chat_id,
                user,
                name,
            } => match name.as_str() {
                "checkin" => self.begin_attendance(chat_id, &user, Action::CheckIn).await,
                "checkout" => self.begin_attendance(chat_id, &user, Action::CheckOut).await,
                "remotecheckin" => self.begin_remote(chat_id, &user).await,
                "cancel" => self.cancel(chat_id, &user).await,
                "start" | "help" => self.start(chat_id, &user).await,
                "records" => self.own_records(chat_id, &user).await,
                "myid" => self.my_id(chat_id, &user).await,
                "getrecordsfile" => self.records_file(chat_id, &user).await,
                "gettoday" => self.today_file(chat_id, &user).await,
                other => {
                    debug!(chat_id, command = other, "ignoring unknown command");
                    Ok(())
                }
            },
            Update::Location {
                chat_id,
                user,
                coordinate,
                forwarded,
            } => {
                self.receive_location(chat_id, &user, coordinate, forwarded)
                    .await
            }
            Update::Callback {
                chat_id,
                user,
                callback_id,
                message_id,
                data,
            } => {
                self.receive_selection(chat_id, &user, &callback_id, message_id, &data)
                    .await
            }
        }
    }

    /// Open session of this conversation, dropping it when it has timed out.
    pub(crate) fn active_session(&self, key: ConversationKey) -> AppResult<Option<Session>> {
        let Some(session) = self.sessions.load(key)? else {
            return Ok(None);
        };
        if session.is_expired(self.clock.now(), self.cfg.session_timeout_secs) {
            debug!(conversation = %key, "session expired");
            self.sessions.clear(key)?;
            return Ok(None);
        }
        Ok(Some(session))
    }

    pub(crate) async fn reply(&self, chat_id: i64, text: &str) -> AppResult<()> {
        self.messenger.send_text(chat_id, text, Keyboard::None).await
    }

    /// Admin-only gate: replies with the denial text when `user_id` is not the admin.
    pub(crate) async fn require_admin(&self, chat_id: i64, user_id: i64) -> AppResult<bool> {
        if self.cfg.is_admin(user_id) {
            return Ok(true);
        }
        let err = AppError::PermissionDenied(user_id);
        warn!(chat_id, "{err}");
        self.reply(chat_id, texts::ADMIN_ONLY).await?;
        Ok(false)
    }

    /// Best effort: a failed notification is logged, never surfaced.
    pub(crate) async fn notify_admin(&self, text: &str) {
        let Some(admin) = self.cfg.admin_id else {
            debug!("admin_id not configured, notification skipped");
            return;
        };
        if let Err(e) = self.messenger.send_text(admin, text, Keyboard::None).await {
            let err = AppError::NotificationDeliveryFailed(e.to_string());
            warn!(admin, "{err}");
        }
    }
}
