use geoprofile_core::db::open_db;
use geoprofile_core::model::credential::CredentialError;
use geoprofile_core::repo::settings_repo::{SettingsRepository, SqliteSettingsRepository};
use geoprofile_core::service::credential_service::{CredentialService, CREDENTIAL_SETTING_KEY};

const KEY: &str = "AIzaSyPersistedCredential12345";

#[test]
fn submitted_credential_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.db");

    {
        let conn = open_db(&path).unwrap();
        let service = CredentialService::new(SqliteSettingsRepository::new(&conn));
        let credential = service.submit(&format!("  {KEY}\n")).unwrap();
        assert_eq!(credential.expose(), KEY);
    }

    let conn = open_db(&path).unwrap();
    let service = CredentialService::new(SqliteSettingsRepository::new(&conn));
    let restored = service.load_persisted().expect("credential persisted");
    assert_eq!(restored.expose(), KEY);
}

#[test]
fn rejected_credential_is_not_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(dir.path().join("settings.db")).unwrap();
    let settings = SqliteSettingsRepository::new(&conn);
    let service = CredentialService::new(SqliteSettingsRepository::new(&conn));

    let err = service.submit("YOUR_API_KEY").unwrap_err();
    assert_eq!(err, CredentialError::TooShort { len: 12 });
    assert_eq!(service.submit("   ").unwrap_err(), CredentialError::Empty);
    assert_eq!(settings.get(CREDENTIAL_SETTING_KEY).unwrap(), None);
}

#[test]
fn resubmitting_overwrites_and_clear_forgets() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(dir.path().join("settings.db")).unwrap();
    let service = CredentialService::new(SqliteSettingsRepository::new(&conn));

    service.submit(KEY).unwrap();
    let replacement = format!("{KEY}-rotated");
    service.submit(&replacement).unwrap();
    assert_eq!(
        service.load_persisted().map(|c| c.expose().to_string()),
        Some(replacement)
    );

    service.clear().unwrap();
    assert!(service.load_persisted().is_none());
}

#[test]
fn credential_debug_output_hides_the_secret() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(dir.path().join("settings.db")).unwrap();
    let service = CredentialService::new(SqliteSettingsRepository::new(&conn));

    let credential = service.submit(KEY).unwrap();
    let debug = format!("{credential:?}");
    assert!(!debug.contains(KEY));
    assert!(debug.contains(&KEY.len().to_string()));
}
