//! Error taxonomy for the tracker.
//!
//! Store-level failures propagate through the service unmodified; the only
//! reclassification anywhere is `delete_application`, which swallows
//! `NotFound` to stay idempotent.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    /// A required field was missing or blank. No mutation was attempted.
    #[error("validation error: {0}")]
    Validation(String),

    /// The identifier is absent from the store. Not transient.
    #[error("not found: {0}")]
    NotFound(String),

    /// The backing store could not be reached or the call failed mid-flight.
    #[error("store connection error: {0}")]
    Connection(String),

    /// A stored row could not be decoded into a typed record.
    #[error("malformed row {row} in sheet '{sheet}': {reason}")]
    MalformedRow {
        sheet: &'static str,
        row: usize,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, TrackerError>;
