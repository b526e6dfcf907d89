//! Repository layer abstractions and storage implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Keep the canonical profile collection separate from persisted settings.
//!
//! # Invariants
//! - Profile writes enforce `Profile::validate()` before mutation.
//! - Repository APIs return semantic errors (`NotFound`) instead of
//!   silently ignoring missing records.

pub mod profile_repo;
pub mod settings_repo;
