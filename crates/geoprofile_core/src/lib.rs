//! Core domain logic for the GeoProfile directory.
//! Profiles, search, settings persistence and the map marker adapter live
//! here; hosts only render.

pub mod db;
pub mod logging;
pub mod map;
pub mod model;
pub mod repo;
pub mod search;
pub mod seed;
pub mod service;
pub mod shell;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use map::adapter::{
    AdapterConfig, AdapterState, InitRequest, MapAdapter, MapError, MapResult, ReconcileOutcome,
    ReconcileReport,
};
pub use map::sdk::{MapContainer, MapSdk, SdkError, SdkResult};
pub use model::credential::{is_valid_credential, Credential, CredentialError};
pub use model::profile::{Address, GeoLocation, Profile, ProfileId, ProfileValidationError};
pub use repo::profile_repo::{InMemoryProfileRepository, ProfileRepository, RepoError, RepoResult};
pub use search::filter::{filter_profiles, ProfileQuery, SearchField};
pub use service::profile_service::ProfileService;
pub use shell::directory::{ActiveView, DirectoryController};
pub use shell::notice::{Notice, NoticeLevel};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
