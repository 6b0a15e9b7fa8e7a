use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub company: String,
    pub position: String,
    pub status: Status,
    pub last_action_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Applied,
    Interviewed,
    InterviewPending,
    OfferReceived,
    Rejected,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Self::Applied,
        Self::Interviewed,
        Self::InterviewPending,
        Self::OfferReceived,
        Self::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Interviewed => "interviewed",
            Self::InterviewPending => "interview_pending",
            Self::OfferReceived => "offer_received",
            Self::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "applied" => Some(Self::Applied),
            "interviewed" => Some(Self::Interviewed),
            "interview_pending" => Some(Self::InterviewPending),
            "offer_received" => Some(Self::OfferReceived),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Human-readable form used in history details and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::Interviewed => "Interviewed",
            Self::InterviewPending => "Interview Pending",
            Self::OfferReceived => "Offer Received",
            Self::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateApplicationInput {
    pub company: String,
    pub position: String,
    pub status: Status,
    pub notes: Option<String>,
    pub link: Option<String>,
}

/// Full overwrite of the mutable fields; the edit form always submits the
/// whole record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateApplicationInput {
    pub company: String,
    pub position: String,
    pub status: Status,
    pub notes: Option<String>,
    pub link: Option<String>,
}
