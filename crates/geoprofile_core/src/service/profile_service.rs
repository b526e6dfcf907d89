//! Profile store use-case service.
//!
//! # Responsibility
//! - Provide the directory's find/search/add/update/delete entry points.
//! - Assign identities to new profiles; callers never choose them.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - `add` ignores any caller-supplied id.
//! - Not-found on update/delete is reported, never swallowed.

use crate::model::profile::{Profile, ProfileId};
use crate::repo::profile_repo::{InMemoryProfileRepository, ProfileRepository, RepoResult};
use crate::search::filter::{filter_profiles, ProfileQuery, SearchField};
use log::{info, warn};

/// Use-case service wrapper for the profile collection.
pub struct ProfileService<R: ProfileRepository> {
    repo: R,
}

impl ProfileService<InMemoryProfileRepository> {
    /// Creates an in-memory store pre-populated with `profiles`.
    ///
    /// Seeded records keep their ids (import path).
    pub fn seeded(profiles: impl IntoIterator<Item = Profile>) -> RepoResult<Self> {
        let mut repo = InMemoryProfileRepository::new();
        for profile in profiles {
            repo.insert(profile)?;
        }
        info!(
            "event=profile_seed module=service status=ok count={}",
            repo.count()
        );
        Ok(Self::new(repo))
    }
}

impl<R: ProfileRepository> ProfileService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Looks up one profile by id.
    pub fn find(&self, id: &str) -> RepoResult<Option<Profile>> {
        self.repo.get(id)
    }

    /// Returns every profile in insertion order.
    pub fn list(&self) -> RepoResult<Vec<Profile>> {
        self.repo.list()
    }

    pub fn count(&self) -> usize {
        self.repo.count()
    }

    /// Case-insensitive substring search on one field.
    ///
    /// A blank `query` returns the full collection in insertion order.
    pub fn search(&self, query: &str, field: SearchField) -> RepoResult<Vec<Profile>> {
        self.search_query(&ProfileQuery::new(query, field))
    }

    pub fn search_query(&self, query: &ProfileQuery) -> RepoResult<Vec<Profile>> {
        let all = self.repo.list()?;
        if query.is_blank() {
            return Ok(all);
        }
        Ok(filter_profiles(&all, query))
    }

    /// Adds a new profile under a freshly generated id.
    ///
    /// Returns the assigned id.
    pub fn add(&mut self, mut profile: Profile) -> RepoResult<ProfileId> {
        profile.id = ProfileId::generate();
        match self.repo.insert(profile) {
            Ok(id) => {
                info!("event=profile_add module=service status=ok profile_id={id}");
                Ok(id)
            }
            Err(err) => {
                warn!("event=profile_add module=service status=error error={err}");
                Err(err)
            }
        }
    }

    /// Replaces the record with the same id.
    pub fn update(&mut self, profile: Profile) -> RepoResult<()> {
        let id = profile.id.clone();
        let result = self.repo.replace(profile);
        match &result {
            Ok(()) => info!("event=profile_update module=service status=ok profile_id={id}"),
            Err(err) => warn!(
                "event=profile_update module=service status=error profile_id={id} error={err}"
            ),
        }
        result
    }

    /// Removes the record with `id`.
    pub fn delete(&mut self, id: &str) -> RepoResult<()> {
        let result = self.repo.remove(id);
        match &result {
            Ok(()) => info!("event=profile_delete module=service status=ok profile_id={id}"),
            Err(err) => warn!(
                "event=profile_delete module=service status=error profile_id={id} error={err}"
            ),
        }
        result
    }
}
