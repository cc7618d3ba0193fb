//! Commands that answer directly without opening a conversation.

use super::{Bot, texts};
use crate::errors::{AppError, AppResult};
use crate::models::ConversationKey;
use crate::store::RecordStore;
use crate::transport::{Keyboard, User};
use crate::utils::date::iso_date;
use tracing::{info, warn};

impl Bot {
    /// Greeting. Also drops any open session, acting as cancel-and-restart.
    pub(crate) async fn start(&self, chat_id: i64, user: &User) -> AppResult<()> {
        self.sessions.clear(ConversationKey::new(chat_id, user.id))?;
        self.reply(
            chat_id,
            &texts::welcome(&user.first_name, self.cfg.is_admin(user.id)),
        )
        .await
    }

    pub(crate) async fn cancel(&self, chat_id: i64, user: &User) -> AppResult<()> {
        self.sessions.clear(ConversationKey::new(chat_id, user.id))?;
        self.messenger
            .send_text(chat_id, texts::CANCELLED, Keyboard::Remove)
            .await
    }

    pub(crate) async fn own_records(&self, chat_id: i64, user: &User) -> AppResult<()> {
        let scan = match self.store.scan_by_subject(&user.id.to_string()) {
            Err(AppError::StoreMissing(_)) => return self.reply(chat_id, texts::NO_OWN_RECORDS).await,
            other => other?,
        };

        if scan.is_empty() {
            return self.reply(chat_id, texts::NO_OWN_RECORDS).await;
        }

        let lines: Vec<String> = scan
            .records
            .iter()
            .map(|r| format!("- {}: {}", r.action.label(), r.timestamp_str()))
            .collect();
        self.reply(chat_id, &texts::own_records(&lines)).await
    }

    pub(crate) async fn my_id(&self, chat_id: i64, user: &User) -> AppResult<()> {
        self.reply(chat_id, &texts::my_id(user.id)).await
    }

    /// Admin: send the whole store file.
    pub(crate) async fn records_file(&self, chat_id: i64, user: &User) -> AppResult<()> {
        if !self.require_admin(chat_id, user.id).await? {
            return Ok(());
        }

        let bytes = match self.store.read_bytes() {
            Ok(b) => b,
            Err(AppError::StoreMissing(_)) => return self.reply(chat_id, texts::STORE_EMPTY).await,
            Err(e) => return Err(e),
        };

        if let Err(e) = self
            .messenger
            .send_document(chat_id, &self.store.file_name(), bytes, None)
            .await
        {
            warn!(chat_id, error = %e, "failed to send records file");
            self.reply(chat_id, &texts::send_failed(&e.to_string()))
                .await?;
        }
        Ok(())
    }

    /// Admin: send header plus today's rows as `attendance_<date>.csv`.
    pub(crate) async fn today_file(&self, chat_id: i64, user: &User) -> AppResult<()> {
        if !self.require_admin(chat_id, user.id).await? {
            return Ok(());
        }

        let today = iso_date(&self.clock.now());
        let scan = match self.store.scan_by_date_prefix(&today) {
            Err(AppError::StoreMissing(_)) => return self.reply(chat_id, texts::STORE_EMPTY).await,
            other => other?,
        };

        if scan.is_empty() {
            return self.reply(chat_id, texts::NO_RECORDS_TODAY).await;
        }

        info!(chat_id, date = %today, rows = scan.records.len(), "sending daily slice");
        let bytes = RecordStore::render_csv(&scan.records)?;
        if let Err(e) = self
            .messenger
            .send_document(chat_id, &format!("attendance_{today}.csv"), bytes, None)
            .await
        {
            warn!(chat_id, error = %e, "failed to send daily slice");
            self.reply(chat_id, &texts::send_failed(&e.to_string()))
                .await?;
        }
        Ok(())
    }
}
