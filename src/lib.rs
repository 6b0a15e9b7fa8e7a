//! jobtrack binary crate: the HTTP API and CLI around jobtrack-core.

pub mod api;
