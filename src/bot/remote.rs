//! Administrator-only remote check-in: pick a known user, record a
//! `RemoteCheckIn` on their behalf without a location step.
//!
//! `Idle --remotecheckin--> AwaitingUserSelection --selection--> Idle`

use super::{Bot, texts};
use crate::errors::AppResult;
use crate::models::{Action, AttendanceRecord, ConversationKey, Session, SessionState};
use crate::transport::{InlineButton, Keyboard, User};
use tracing::{info, warn};

impl Bot {
    pub(crate) async fn begin_remote(&self, chat_id: i64, user: &User) -> AppResult<()> {
        if !self.require_admin(chat_id, user.id).await? {
            return Ok(());
        }

        let key = ConversationKey::new(chat_id, user.id);
        let subjects = self.store.distinct_subjects()?;
        if subjects.is_empty() {
            self.sessions.clear(key)?;
            return self.reply(chat_id, texts::NO_KNOWN_USERS).await;
        }

        let buttons: Vec<InlineButton> = subjects
            .iter()
            .map(|s| InlineButton {
                label: s.name.clone(),
                data: s.id.clone(),
            })
            .collect();

        // buttons only carry the id; names are resolved from the session
        self.sessions
            .save(key, &Session::awaiting_selection(subjects, self.clock.now()))?;

        self.messenger
            .send_text(chat_id, texts::CHOOSE_REMOTE_USER, Keyboard::Inline(buttons))
            .await
    }

    pub(crate) async fn receive_selection(
        &self,
        chat_id: i64,
        user: &User,
        callback_id: &str,
        message_id: Option<i64>,
        selected_id: &str,
    ) -> AppResult<()> {
        if let Err(e) = self.messenger.answer_callback(callback_id).await {
            warn!(chat_id, error = %e, "failed to answer callback");
        }

        // a button pressed by anyone but the user who opened the list finds no session
        let key = ConversationKey::new(chat_id, user.id);
        let subjects = match self.active_session(key)? {
            Some(Session {
                state: SessionState::AwaitingUserSelection { subjects },
                ..
            }) => subjects,
            _ => return self.reply(chat_id, texts::SELECTION_LOST).await,
        };

        if !self.require_admin(chat_id, user.id).await? {
            return Ok(());
        }
        self.sessions.clear(key)?;

        let name = subjects
            .get(selected_id)
            .unwrap_or(texts::UNKNOWN_SUBJECT)
            .to_string();

        let record = AttendanceRecord::new(
            selected_id,
            name.clone(),
            Action::RemoteCheckIn,
            self.clock.now(),
        );
        self.store.append(&record)?;

        info!(chat_id, subject = selected_id, name = %name, "remote check-in recorded");

        let done = texts::remote_done(&name);
        match message_id {
            Some(mid) => {
                self.messenger
                    .edit_message_text(chat_id, mid, &done)
                    .await?
            }
            None => self.reply(chat_id, &done).await?,
        }

        self.notify_admin(&texts::admin_remote_notice(&name)).await;
        Ok(())
    }
}
