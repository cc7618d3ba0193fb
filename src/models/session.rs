use super::action::Action;
use super::subject::SubjectDirectory;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One conversation: a user inside a chat. In a group chat every member
/// has a separate conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationKey {
    pub chat_id: i64,
    pub user_id: i64,
}

impl ConversationKey {
    pub fn new(chat_id: i64, user_id: i64) -> Self {
        Self { chat_id, user_id }
    }
}

impl std::fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.chat_id, self.user_id)
    }
}

/// Where an open conversation is waiting. No session at all means `Idle`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionState {
    AwaitingLocation { action: Action },
    AwaitingUserSelection { subjects: SubjectDirectory },
}

/// Per-conversation transient state, created on workflow entry and
/// cleared on every terminal transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub state: SessionState,
    pub started_at: DateTime<FixedOffset>,
}

impl Session {
    pub fn awaiting_location(action: Action, now: DateTime<FixedOffset>) -> Self {
        Self {
            state: SessionState::AwaitingLocation { action },
            started_at: now,
        }
    }

    pub fn awaiting_selection(subjects: SubjectDirectory, now: DateTime<FixedOffset>) -> Self {
        Self {
            state: SessionState::AwaitingUserSelection { subjects },
            started_at: now,
        }
    }

    pub fn pending_action(&self) -> Option<Action> {
        match &self.state {
            SessionState::AwaitingLocation { action } => Some(*action),
            SessionState::AwaitingUserSelection { .. } => None,
        }
    }

    /// `timeout_secs = None` means the session never expires.
    pub fn is_expired(&self, now: DateTime<FixedOffset>, timeout_secs: Option<u64>) -> bool {
        match timeout_secs {
            Some(secs) => (now - self.started_at).num_seconds() > secs as i64,
            None => false,
        }
    }
}
