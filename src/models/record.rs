use super::action::Action;
use crate::utils::date::{format_timestamp, parse_timestamp};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// Column names of the record store, in order.
pub const HEADER: [&str; 4] = ["UserID", "UserName", "Action", "Timestamp"];

/// One attendance event. Immutable once appended.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AttendanceRecord {
    pub subject_id: String,           // ⇔ UserID
    pub display_name: String,         // ⇔ UserName
    pub action: Action,               // ⇔ Action
    pub timestamp: DateTime<FixedOffset>, // ⇔ Timestamp ("YYYY-MM-DD HH:MM:SS")
}

impl AttendanceRecord {
    pub fn new(
        subject_id: impl Into<String>,
        display_name: impl Into<String>,
        action: Action,
        timestamp: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            display_name: display_name.into(),
            action,
            timestamp,
        }
    }

    pub fn timestamp_str(&self) -> String {
        format_timestamp(&self.timestamp)
    }

    pub fn date_str(&self) -> String {
        self.timestamp.format("%Y-%m-%d").to_string()
    }

    pub fn to_row(&self) -> [String; 4] {
        [
            self.subject_id.clone(),
            self.display_name.clone(),
            self.action.to_store_str().to_string(),
            self.timestamp_str(),
        ]
    }

    /// Parse one data row. The error string describes why the row was rejected.
    pub fn from_row(row: &csv::StringRecord, offset: FixedOffset) -> Result<Self, String> {
        if row.len() != HEADER.len() {
            return Err(format!("expected {} fields, found {}", HEADER.len(), row.len()));
        }

        let action = Action::from_store_str(&row[2])
            .ok_or_else(|| format!("unknown action '{}'", &row[2]))?;
        let timestamp = parse_timestamp(&row[3], offset)
            .ok_or_else(|| format!("unparsable timestamp '{}'", &row[3]))?;

        Ok(Self {
            subject_id: row[0].trim().to_string(),
            display_name: row[1].to_string(),
            action,
            timestamp,
        })
    }
}
