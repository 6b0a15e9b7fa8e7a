use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One immutable audit-log row. Entries are never updated after creation
/// and deliberately outlive the application they describe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub history_id: String,
    pub application_id: String,
    pub action: HistoryAction,
    pub detail: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    NewRecord,
    StatusUpdate,
    NoteUpdate,
}

impl HistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewRecord => "new_record",
            Self::StatusUpdate => "status_update",
            Self::NoteUpdate => "note_update",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "new_record" => Some(Self::NewRecord),
            "status_update" => Some(Self::StatusUpdate),
            "note_update" => Some(Self::NoteUpdate),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NewRecord => "New record",
            Self::StatusUpdate => "Status update",
            Self::NoteUpdate => "Note update",
        }
    }
}
