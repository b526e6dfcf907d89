//! Profile search entry points.
//!
//! # Responsibility
//! - Expose field-scoped substring filtering used by list and map views.

pub mod filter;
