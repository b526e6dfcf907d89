//! Profile repository contracts and in-memory implementation.
//!
//! # Responsibility
//! - Own the canonical profile collection for one directory instance.
//! - Keep insertion order stable; it is the list/search display order.
//!
//! # Invariants
//! - Write paths call `Profile::validate()` before mutating.
//! - Ids are unique within one repository.
//! - Missing ids on replace/remove surface as `RepoError::NotFound`.

use crate::db::DbError;
use crate::model::profile::{Profile, ProfileId, ProfileValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by profile and settings storage.
#[derive(Debug)]
pub enum RepoError {
    Validation(ProfileValidationError),
    Db(DbError),
    NotFound(ProfileId),
    DuplicateId(ProfileId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "profile not found: {id}"),
            Self::DuplicateId(id) => write!(f, "profile id already exists: {id}"),
            Self::InvalidData(message) => write!(f, "invalid stored data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::DuplicateId(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ProfileValidationError> for RepoError {
    fn from(value: ProfileValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for profile CRUD.
pub trait ProfileRepository {
    /// Appends a validated profile keeping its id.
    fn insert(&mut self, profile: Profile) -> RepoResult<ProfileId>;
    /// Replaces the whole record with the same id.
    fn replace(&mut self, profile: Profile) -> RepoResult<()>;
    fn get(&self, id: &str) -> RepoResult<Option<Profile>>;
    /// Returns every record in insertion order.
    fn list(&self) -> RepoResult<Vec<Profile>>;
    fn remove(&mut self, id: &str) -> RepoResult<()>;
    fn count(&self) -> usize;
}

/// Vec-backed repository; single-threaded, owned by one service.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileRepository {
    records: Vec<Profile>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|profile| profile.id.as_str() == id)
    }
}

impl ProfileRepository for InMemoryProfileRepository {
    fn insert(&mut self, profile: Profile) -> RepoResult<ProfileId> {
        if profile.id.is_blank() {
            return Err(ProfileValidationError::BlankId.into());
        }
        profile.validate()?;
        if self.position(profile.id.as_str()).is_some() {
            return Err(RepoError::DuplicateId(profile.id));
        }

        let id = profile.id.clone();
        self.records.push(profile);
        Ok(id)
    }

    fn replace(&mut self, profile: Profile) -> RepoResult<()> {
        if profile.id.is_blank() {
            return Err(ProfileValidationError::BlankId.into());
        }
        profile.validate()?;

        let Some(index) = self.position(profile.id.as_str()) else {
            return Err(RepoError::NotFound(profile.id));
        };
        self.records[index] = profile;
        Ok(())
    }

    fn get(&self, id: &str) -> RepoResult<Option<Profile>> {
        Ok(self.position(id).map(|index| self.records[index].clone()))
    }

    fn list(&self) -> RepoResult<Vec<Profile>> {
        Ok(self.records.clone())
    }

    fn remove(&mut self, id: &str) -> RepoResult<()> {
        let Some(index) = self.position(id) else {
            return Err(RepoError::NotFound(ProfileId::new(id)));
        };
        self.records.remove(index);
        Ok(())
    }

    fn count(&self) -> usize {
        self.records.len()
    }
}
