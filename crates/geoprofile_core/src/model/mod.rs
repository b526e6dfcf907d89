//! Profile directory domain model.
//!
//! # Responsibility
//! - Define the canonical profile record exchanged with stores, forms and
//!   the map adapter.
//! - Keep validation rules next to the data they guard.
//!
//! # Invariants
//! - Every profile is identified by a stable `ProfileId`.
//! - Locations stay within WGS84 latitude/longitude ranges.

pub mod credential;
pub mod profile;
