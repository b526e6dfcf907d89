//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep host UI/FFI layers decoupled from storage details.

pub mod credential_service;
pub mod profile_form;
pub mod profile_service;
