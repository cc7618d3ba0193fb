use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Action {
    CheckIn,
    CheckOut,
    RemoteCheckIn,
}

impl Action {
    /// Convert enum → store string (the `Action` column)
    pub fn to_store_str(&self) -> &'static str {
        match self {
            Action::CheckIn => "CheckIn",
            Action::CheckOut => "CheckOut",
            Action::RemoteCheckIn => "RemoteCheckIn",
        }
    }

    /// Convert store string → enum.
    ///
    /// Older record files were written with Arabic labels; those are
    /// still understood so that history keeps counting for `records`
    /// and the known-users lookup.
    pub fn from_store_str(s: &str) -> Option<Self> {
        match s.trim() {
            "CheckIn" | "حضور" => Some(Action::CheckIn),
            "CheckOut" | "انصراف" => Some(Action::CheckOut),
            "RemoteCheckIn" | "حضور (عن بعد)" => Some(Action::RemoteCheckIn),
            _ => None,
        }
    }

    /// Human label used in chat replies.
    pub fn label(&self) -> &'static str {
        match self {
            Action::CheckIn => "check-in",
            Action::CheckOut => "check-out",
            Action::RemoteCheckIn => "remote check-in",
        }
    }
}
