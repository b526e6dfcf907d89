//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the profile directory and credential use-cases to Dart via FRB.
//! - Map core errors to plain response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - The directory is process-wide and seeded with the sample profiles on
//!   first use.
//! - Map rendering stays on the host; only data crosses this boundary.

use geoprofile_core::db::open_db;
use geoprofile_core::repo::settings_repo::{SettingsRepository, SqliteSettingsRepository};
use geoprofile_core::seed::sample_profiles;
use geoprofile_core::service::credential_service::CredentialService;
use geoprofile_core::service::profile_form::ProfileForm;
use geoprofile_core::shell::directory::{
    CREDENTIAL_ACCEPTED_MESSAGE, CREDENTIAL_REJECTED_MESSAGE, PROFILE_DELETED_MESSAGE,
    PROFILE_NOT_FOUND_MESSAGE,
};
use geoprofile_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    InMemoryProfileRepository, Profile, ProfileService, RepoError, RepoResult, SearchField,
};
use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};

const SETTINGS_DB_FILE_NAME: &str = "geoprofile_settings.sqlite3";
const SETTINGS_DB_ENV_VAR: &str = "GEOPROFILE_DB_PATH";

type Directory = ProfileService<InMemoryProfileRepository>;

static DIRECTORY: OnceLock<Mutex<Directory>> = OnceLock::new();
static SETTINGS_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// List row for the profile directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSummary {
    pub id: String,
    pub name: String,
    pub avatar: String,
    /// Shown when the avatar image fails to load.
    pub initials: String,
    pub city: String,
    pub state: String,
    pub occupation: Option<String>,
    pub lat: f64,
    pub lng: f64,
}

/// Search response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileListResponse {
    pub items: Vec<ProfileSummary>,
    /// Field actually applied (`name|location|occupation`).
    pub applied_field: String,
    pub message: String,
}

/// Mutation response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileActionResponse {
    pub ok: bool,
    pub profile_id: Option<String>,
    /// User-facing notice text.
    pub message: String,
}

impl ProfileActionResponse {
    fn success(message: impl Into<String>, profile_id: Option<String>) -> Self {
        Self {
            ok: true,
            profile_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            profile_id: None,
            message: message.into(),
        }
    }
}

/// Searches the directory.
///
/// Unknown `field` values fall back to `name`; blank `query` lists all.
#[flutter_rust_bridge::frb(sync)]
pub fn profiles_search(query: String, field: String) -> ProfileListResponse {
    let field = SearchField::parse_lenient(&field);
    let result = with_directory(|directory| {
        directory
            .search(query.as_str(), field)
            .map_err(|err| err.to_string())
    });

    match result {
        Ok(profiles) => {
            let message = if profiles.is_empty() {
                "No profiles found.".to_string()
            } else {
                format!("Found {} profile(s).", profiles.len())
            };
            ProfileListResponse {
                items: profiles.iter().map(to_summary).collect(),
                applied_field: field.as_str().to_string(),
                message,
            }
        }
        Err(message) => ProfileListResponse {
            items: Vec::new(),
            applied_field: field.as_str().to_string(),
            message: format!("profiles_search failed: {message}"),
        },
    }
}

/// Full profile as camelCase JSON, `None` when unknown.
#[flutter_rust_bridge::frb(sync)]
pub fn profile_get(id: String) -> Option<String> {
    let found = with_directory(|directory| {
        directory
            .find(id.trim())
            .map_err(|err| err.to_string())
    });
    match found {
        Ok(Some(profile)) => match serde_json::to_string(&profile) {
            Ok(json) => Some(json),
            Err(err) => {
                warn!("event=ffi_profile_get module=ffi status=error error={err}");
                None
            }
        },
        Ok(None) => None,
        Err(message) => {
            warn!("event=ffi_profile_get module=ffi status=error error={message}");
            None
        }
    }
}

/// Creates (blank `id`) or updates a profile from camelCase JSON.
///
/// `latitude`/`longitude`/`interests` are the raw form inputs; interests are
/// comma-separated.
#[flutter_rust_bridge::frb(sync)]
pub fn profile_save(
    profile_json: String,
    latitude: String,
    longitude: String,
    interests: String,
) -> ProfileActionResponse {
    let profile: Profile = match serde_json::from_str(&profile_json) {
        Ok(profile) => profile,
        Err(err) => return ProfileActionResponse::failure(format!("invalid profile JSON: {err}")),
    };

    let mut form = if profile.id.is_blank() {
        ProfileForm::create_from(&profile)
    } else {
        ProfileForm::edit(&profile)
    };
    form.set_latitude_input(latitude);
    form.set_longitude_input(longitude);
    form.set_interests_input(interests);

    let result = with_directory(|directory| Ok(form.submit(directory)));
    match result {
        Ok(Ok(outcome)) => ProfileActionResponse::success(
            outcome.message(),
            Some(outcome.profile_id().to_string()),
        ),
        Ok(Err(err)) => ProfileActionResponse::failure(err.user_message()),
        Err(message) => ProfileActionResponse::failure(message),
    }
}

/// Deletes a profile by id.
#[flutter_rust_bridge::frb(sync)]
pub fn profile_delete(id: String) -> ProfileActionResponse {
    let result = with_directory(|directory| Ok(directory.delete(id.trim())));
    match result {
        Ok(Ok(())) => ProfileActionResponse::success(PROFILE_DELETED_MESSAGE, Some(id)),
        Ok(Err(RepoError::NotFound(_))) => ProfileActionResponse::failure(PROFILE_NOT_FOUND_MESSAGE),
        Ok(Err(err)) => ProfileActionResponse::failure(err.to_string()),
        Err(message) => ProfileActionResponse::failure(message),
    }
}

/// Startup credential for the host map SDK, `None` to show the prompt.
///
/// Checks `GEOPROFILE_MAPS_API_KEY` first, then the settings DB.
#[flutter_rust_bridge::frb(sync)]
pub fn map_credential() -> Option<String> {
    let conn = match open_db(resolve_settings_db_path()) {
        Ok(conn) => conn,
        Err(err) => {
            warn!("event=ffi_credential module=ffi status=error error={err}");
            return CredentialService::new(NoSettings)
                .resolve_startup()
                .map(|(credential, _)| credential.expose().to_string());
        }
    };
    CredentialService::new(SqliteSettingsRepository::new(&conn))
        .resolve_startup()
        .map(|(credential, _)| credential.expose().to_string())
}

/// Validates and persists a credential typed into the prompt.
#[flutter_rust_bridge::frb(sync)]
pub fn credential_submit(raw: String) -> ProfileActionResponse {
    let submitted = match open_db(resolve_settings_db_path()) {
        Ok(conn) => CredentialService::new(SqliteSettingsRepository::new(&conn))
            .submit(&raw)
            .map(|_| ()),
        Err(err) => {
            warn!("event=ffi_credential module=ffi status=degraded error={err}");
            CredentialService::new(NoSettings).submit(&raw).map(|_| ())
        }
    };
    match submitted {
        Ok(()) => ProfileActionResponse::success(CREDENTIAL_ACCEPTED_MESSAGE, None),
        Err(_) => ProfileActionResponse::failure(CREDENTIAL_REJECTED_MESSAGE),
    }
}

/// Forgets the persisted credential. Returns empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn credential_clear() -> String {
    let conn = match open_db(resolve_settings_db_path()) {
        Ok(conn) => conn,
        Err(err) => return format!("credential_clear failed: {err}"),
    };
    match CredentialService::new(SqliteSettingsRepository::new(&conn)).clear() {
        Ok(()) => String::new(),
        Err(err) => format!("credential_clear failed: {err}"),
    }
}

/// Settings store used when the DB cannot be opened; persists nothing.
struct NoSettings;

impl SettingsRepository for NoSettings {
    fn get(&self, _key: &str) -> RepoResult<Option<String>> {
        Ok(None)
    }

    fn put(&self, _key: &str, _value: &str) -> RepoResult<()> {
        Err(RepoError::InvalidData(
            "settings database unavailable".to_string(),
        ))
    }

    fn remove(&self, _key: &str) -> RepoResult<()> {
        Ok(())
    }
}

fn with_directory<T>(f: impl FnOnce(&mut Directory) -> Result<T, String>) -> Result<T, String> {
    let directory = match DIRECTORY.get() {
        Some(directory) => directory,
        None => {
            let seeded = ProfileService::seeded(sample_profiles())
                .map_err(|err| format!("directory seed failed: {err}"))?;
            DIRECTORY.get_or_init(|| Mutex::new(seeded))
        }
    };
    let mut guard: MutexGuard<'_, Directory> = directory
        .lock()
        .map_err(|_| "directory lock poisoned".to_string())?;
    f(&mut guard)
}

fn resolve_settings_db_path() -> PathBuf {
    SETTINGS_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(SETTINGS_DB_ENV_VAR) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(SETTINGS_DB_FILE_NAME)
        })
        .clone()
}

fn to_summary(profile: &Profile) -> ProfileSummary {
    let location = profile.location();
    ProfileSummary {
        id: profile.id.to_string(),
        name: profile.name.clone(),
        avatar: profile.avatar.clone(),
        initials: profile.initials(),
        city: profile.address.city.clone(),
        state: profile.address.state.clone(),
        occupation: profile.occupation.clone(),
        lat: location.lat,
        lng: location.lng,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, credential_submit, init_logging, ping, profile_delete, profile_get,
        profile_save, profiles_search,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn search_by_location_and_unknown_field_fallback() {
        let response = profiles_search("wa".to_string(), "location".to_string());
        assert_eq!(response.applied_field, "location");
        assert!(response.items.iter().any(|item| item.name == "Michael Brown"));

        let response = profiles_search("Emma".to_string(), "nickname".to_string());
        assert_eq!(response.applied_field, "name");
        assert!(response.items.iter().any(|item| item.id == "1"));
    }

    #[test]
    fn save_get_delete_round_trip() {
        let name = unique_name("Test Person");
        let json = serde_json::json!({
            "id": "",
            "name": name,
            "avatar": "https://randomuser.me/api/portraits/lego/1.jpg",
            "description": "Created through FFI",
            "address": {
                "street": "1 Test Way",
                "city": "Reno",
                "state": "NV",
                "zipCode": "89501",
                "country": "USA",
                "location": { "lat": 0.0, "lng": 0.0 }
            }
        });

        let saved = profile_save(
            json.to_string(),
            "39.5296".to_string(),
            "-119.8138".to_string(),
            "Skiing, Poker".to_string(),
        );
        assert!(saved.ok, "{}", saved.message);
        assert_eq!(saved.message, "Profile created successfully");
        let id = saved.profile_id.expect("created id");

        let stored = profile_get(id.clone()).expect("stored profile");
        let stored: serde_json::Value = serde_json::from_str(&stored).expect("valid json");
        assert_eq!(stored["name"], name.as_str());
        assert_eq!(stored["interests"][1], "Poker");

        let deleted = profile_delete(id.clone());
        assert!(deleted.ok);
        assert!(profile_get(id.clone()).is_none());
        assert_eq!(profile_delete(id).message, "Profile not found");
    }

    #[test]
    fn save_reports_missing_fields() {
        let json = serde_json::json!({
            "id": "",
            "name": "",
            "avatar": "",
            "description": "",
            "address": {
                "street": "", "city": "", "state": "", "zipCode": "", "country": "",
                "location": { "lat": 0.0, "lng": 0.0 }
            }
        });
        let response = profile_save(json.to_string(), "0".into(), "0".into(), String::new());
        assert!(!response.ok);
        assert_eq!(response.message, "Please fill out all required fields");
    }

    #[test]
    fn short_credentials_are_rejected() {
        let response = credential_submit("YOUR_KEY".to_string());
        assert!(!response.ok);
        assert_eq!(response.message, "Please enter a valid Google Maps API key");
    }

    fn unique_name(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix} {nanos}")
    }
}
