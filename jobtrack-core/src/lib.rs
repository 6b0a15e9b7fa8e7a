//! Core library for jobtrack.
//!
//! This crate provides the domain models, the sheet-backed store and the
//! business rules for the job-application tracker, independent of any
//! transport layer (HTTP, TUI).
//!
//! # Usage
//!
//! ```no_run
//! use jobtrack_core::{Store, Tracker};
//!
//! let store = Store::open_default()?;
//! let tracker = Tracker::new(store);
//!
//! let applications = tracker.list_applications()?;
//! # Ok::<(), jobtrack_core::TrackerError>(())
//! ```

pub mod dashboard;
pub mod error;
pub mod models;
pub mod report;
pub mod service;
pub mod store;

// Re-export commonly used types at crate root
pub use error::{Result, TrackerError};
pub use service::Tracker;
pub use store::Store;
