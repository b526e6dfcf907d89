//! Headless application shell composing the store, search and map.

pub mod directory;
pub mod notice;
