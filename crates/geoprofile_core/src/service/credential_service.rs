//! Map credential use-cases.
//!
//! # Responsibility
//! - Resolve the credential available at startup.
//! - Validate and persist credentials submitted from the prompt.
//!
//! # Invariants
//! - Only valid credentials are ever returned or persisted.
//! - Persistence failures degrade to a session-only credential; they never
//!   block the map from loading.
//! - The secret never reaches the log; only its length does.

use crate::model::credential::{Credential, CredentialError};
use crate::repo::profile_repo::RepoResult;
use crate::repo::settings_repo::SettingsRepository;
use log::{info, warn};

/// Settings key holding the persisted map credential.
pub const CREDENTIAL_SETTING_KEY: &str = "google_maps_api_key";
/// Environment override consulted before the persisted value.
pub const CREDENTIAL_ENV_VAR: &str = "GEOPROFILE_MAPS_API_KEY";

/// Where a startup credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Environment,
    Settings,
}

pub struct CredentialService<S: SettingsRepository> {
    settings: S,
}

impl<S: SettingsRepository> CredentialService<S> {
    pub fn new(settings: S) -> Self {
        Self { settings }
    }

    /// Resolves the credential to use at startup.
    ///
    /// Returns `None` when the host must show the credential prompt.
    pub fn resolve_startup(&self) -> Option<(Credential, CredentialSource)> {
        self.resolve_with_env(std::env::var(CREDENTIAL_ENV_VAR).ok())
    }

    fn resolve_with_env(&self, env_value: Option<String>) -> Option<(Credential, CredentialSource)> {
        if let Some(raw) = env_value {
            match Credential::parse(&raw) {
                Ok(credential) => {
                    info!(
                        "event=credential_resolve module=credential status=ok source=env len={}",
                        credential.len()
                    );
                    return Some((credential, CredentialSource::Environment));
                }
                Err(err) => warn!(
                    "event=credential_resolve module=credential status=ignored source=env error={err}"
                ),
            }
        }

        self.load_persisted()
            .map(|credential| (credential, CredentialSource::Settings))
    }

    /// Reads the persisted credential, ignoring unreadable or invalid values.
    pub fn load_persisted(&self) -> Option<Credential> {
        let raw = match self.settings.get(CREDENTIAL_SETTING_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(
                    "event=credential_resolve module=credential status=error source=settings error={err}"
                );
                return None;
            }
        };

        match Credential::parse(&raw) {
            Ok(credential) => {
                info!(
                    "event=credential_resolve module=credential status=ok source=settings len={}",
                    credential.len()
                );
                Some(credential)
            }
            Err(err) => {
                warn!(
                    "event=credential_resolve module=credential status=ignored source=settings error={err}"
                );
                None
            }
        }
    }

    /// Validates prompt input and persists it on success.
    pub fn submit(&self, raw: &str) -> Result<Credential, CredentialError> {
        let credential = Credential::parse(raw)?;
        if let Err(err) = self
            .settings
            .put(CREDENTIAL_SETTING_KEY, credential.expose())
        {
            warn!(
                "event=credential_submit module=credential status=degraded persisted=false error={err}"
            );
        } else {
            info!(
                "event=credential_submit module=credential status=ok persisted=true len={}",
                credential.len()
            );
        }
        Ok(credential)
    }

    /// Forgets the persisted credential.
    pub fn clear(&self) -> RepoResult<()> {
        self.settings.remove(CREDENTIAL_SETTING_KEY)
    }
}
