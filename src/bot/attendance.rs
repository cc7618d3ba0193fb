//! Check-in / check-out: request a live location, verify it against the
//! geofence and append the record.
//!
//! `Idle --checkin|checkout--> AwaitingLocation --location--> Idle`

use super::{Bot, texts};
use crate::errors::{AppError, AppResult};
use crate::geo;
use crate::models::{Action, AttendanceRecord, ConversationKey, Coordinate, Session};
use crate::transport::{Keyboard, User};
use tracing::{info, warn};

impl Bot {
    /// Enter `AwaitingLocation`. Re-entering replaces any open session.
    pub(crate) async fn begin_attendance(
        &self,
        chat_id: i64,
        user: &User,
        action: Action,
    ) -> AppResult<()> {
        self.sessions.save(
            ConversationKey::new(chat_id, user.id),
            &Session::awaiting_location(action, self.clock.now()),
        )?;

        self.messenger
            .send_text(
                chat_id,
                &texts::request_location(action),
                Keyboard::RequestLocation(texts::SHARE_LOCATION_BUTTON.to_string()),
            )
            .await
    }

    pub(crate) async fn receive_location(
        &self,
        chat_id: i64,
        user: &User,
        position: Coordinate,
        forwarded: bool,
    ) -> AppResult<()> {
        // every outcome below is terminal; only the sender's own session counts
        let key = ConversationKey::new(chat_id, user.id);
        let session = self.active_session(key)?;
        self.sessions.clear(key)?;

        if forwarded {
            let err = AppError::ForwardedLocationRejected(user.id);
            warn!(chat_id, "{err}");
            return self
                .messenger
                .send_text(chat_id, texts::FORWARDED_LOCATION, Keyboard::Remove)
                .await;
        }

        let Some(action) = session.as_ref().and_then(Session::pending_action) else {
            let err = AppError::SessionLost(chat_id);
            warn!(user = user.id, "{err}");
            return self
                .messenger
                .send_text(chat_id, texts::SESSION_LOST, Keyboard::Remove)
                .await;
        };

        if !position.is_valid() {
            let err = AppError::InvalidCoordinate(position.to_string());
            warn!(chat_id, user = user.id, "{err}");
            return self
                .messenger
                .send_text(chat_id, texts::INVALID_LOCATION, Keyboard::Remove)
                .await;
        }

        let check = geo::evaluate(position, self.cfg.target, self.cfg.max_distance_meters);

        self.messenger
            .send_text(chat_id, texts::VERIFYING, Keyboard::Remove)
            .await?;

        if !check.passed {
            info!(
                chat_id,
                user = user.id,
                action = action.to_store_str(),
                distance = check.distance,
                "location outside geofence"
            );
            return self
                .reply(chat_id, &texts::rejected(check.distance, check.threshold))
                .await;
        }

        let record = AttendanceRecord::new(
            user.id.to_string(),
            user.first_name.clone(),
            action,
            self.clock.now(),
        );
        self.store.append(&record)?;

        info!(
            chat_id,
            user = user.id,
            action = action.to_store_str(),
            distance = check.distance,
            "attendance recorded"
        );

        self.reply(chat_id, &texts::accepted(action, check.distance))
            .await?;
        self.notify_admin(&texts::admin_notice(&user.first_name, user.id, action))
            .await;
        Ok(())
    }
}
