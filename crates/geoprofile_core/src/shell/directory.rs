//! Directory screen controller.
//!
//! # Responsibility
//! - Turn user actions (search, select, save, delete, credential entry) into
//!   store queries and mutations.
//! - Keep the map adapter reconciled with the filtered list and selection.
//! - Serve the single-profile detail page: solo map marker, in-place edit.
//! - Report outcomes as non-blocking notices.
//!
//! # Invariants
//! - `visible` always equals the store filtered by the current query.
//! - A deleted profile never stays selected.
//! - While the detail page is open the map shows only the selected profile.
//! - Marker activations are queued by the adapter callback and applied on
//!   the next `process_map_events`, never re-entrantly.

use crate::map::adapter::{InitRequest, MapAdapter, MapError};
use crate::map::sdk::{MapContainer, MapSdk};
use crate::model::credential::Credential;
use crate::model::profile::{Profile, ProfileId};
use crate::repo::profile_repo::{ProfileRepository, RepoError};
use crate::repo::settings_repo::SettingsRepository;
use crate::search::filter::{ProfileQuery, SearchField};
use crate::service::credential_service::CredentialService;
use crate::service::profile_form::{FormError, ProfileForm, SaveOutcome};
use crate::service::profile_service::ProfileService;
use crate::shell::notice::Notice;
use log::{debug, info, warn};
use std::cell::RefCell;
use std::rc::Rc;

pub const CREDENTIAL_REQUIRED_MESSAGE: &str =
    "Please enter a valid Google Maps API key to enable the map functionality.";
pub const CREDENTIAL_ACCEPTED_MESSAGE: &str = "Google Maps API key has been set";
pub const CREDENTIAL_REJECTED_MESSAGE: &str = "Please enter a valid Google Maps API key";
pub const MAP_FAILED_MESSAGE: &str = "Failed to initialize map. Please check your API key.";
pub const PROFILE_DELETED_MESSAGE: &str = "Profile deleted successfully";
pub const PROFILE_NOT_FOUND_MESSAGE: &str = "Profile not found";

/// Tab shown in the main area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Profiles,
    Map,
}

/// Screen state for the profile directory.
pub struct DirectoryController<R: ProfileRepository, S: MapSdk + 'static> {
    service: ProfileService<R>,
    adapter: MapAdapter<S>,
    query: ProfileQuery,
    visible: Vec<Profile>,
    selected: Option<Profile>,
    view: ActiveView,
    detail_open: bool,
    credential_prompt: bool,
    notices: Vec<Notice>,
    activations: Rc<RefCell<Vec<ProfileId>>>,
}

impl<R: ProfileRepository, S: MapSdk + 'static> DirectoryController<R, S> {
    pub fn new(service: ProfileService<R>, adapter: MapAdapter<S>) -> Self {
        let activations = Rc::new(RefCell::new(Vec::new()));
        let queue = Rc::clone(&activations);
        adapter.set_selection_callback(move |id| queue.borrow_mut().push(id.clone()));

        let mut controller = Self {
            service,
            adapter,
            query: ProfileQuery::default(),
            visible: Vec::new(),
            selected: None,
            view: ActiveView::default(),
            detail_open: false,
            credential_prompt: false,
            notices: Vec::new(),
            activations,
        };
        controller.refresh_visible();
        controller
    }

    pub fn service(&self) -> &ProfileService<R> {
        &self.service
    }

    pub fn adapter(&self) -> &MapAdapter<S> {
        &self.adapter
    }

    pub fn query(&self) -> &ProfileQuery {
        &self.query
    }

    /// Profiles matching the current query, in store order.
    pub fn visible_profiles(&self) -> &[Profile] {
        &self.visible
    }

    pub fn selected(&self) -> Option<&Profile> {
        self.selected.as_ref()
    }

    pub fn active_view(&self) -> ActiveView {
        self.view
    }

    /// Switches tabs; leaves the detail page when it is open.
    pub fn set_active_view(&mut self, view: ActiveView) {
        self.view = view;
        if self.detail_open {
            self.close_detail();
        }
    }

    pub fn is_detail_open(&self) -> bool {
        self.detail_open
    }

    /// Opens the detail page of `id` with the map showing it alone.
    ///
    /// An unknown id reports "Profile not found" and returns to the list.
    pub fn open_detail(&mut self, id: &str) -> bool {
        if !self.select_by_id(id) {
            self.detail_open = false;
            self.selected = None;
            self.view = ActiveView::Profiles;
            self.sync_map();
            return false;
        }
        self.detail_open = true;
        self.sync_map();
        true
    }

    /// Leaves the detail page and shows the filtered list again.
    pub fn close_detail(&mut self) {
        if !self.detail_open {
            return;
        }
        debug!("event=profile_detail module=shell status=closed");
        self.detail_open = false;
        self.selected = None;
        self.sync_map();
    }

    /// Edit form for the profile on the detail page.
    pub fn detail_form(&self) -> Option<ProfileForm> {
        if !self.detail_open {
            return None;
        }
        self.selected.as_ref().map(ProfileForm::edit)
    }

    /// Whether the host should show the credential prompt.
    pub fn needs_credential(&self) -> bool {
        self.credential_prompt
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Hands pending notices to the host, leaving the queue empty.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn set_query_text(&mut self, text: impl Into<String>) {
        self.query.text = text.into();
        self.refresh_and_sync();
    }

    pub fn set_search_field(&mut self, field: SearchField) {
        self.query.field = field;
        self.refresh_and_sync();
    }

    /// Selects a profile from the list and switches to the map tab.
    pub fn select_from_list(&mut self, id: &str) -> bool {
        if !self.select_by_id(id) {
            return false;
        }
        self.detail_open = false;
        self.view = ActiveView::Map;
        self.sync_map();
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.sync_map();
    }

    /// Applies marker activations queued by the adapter.
    pub fn process_map_events(&mut self) -> usize {
        let pending = std::mem::take(&mut *self.activations.borrow_mut());
        let handled = pending.len();
        for id in pending {
            self.handle_marker_activation(id.as_str());
        }
        handled
    }

    /// Selects the profile behind an activated marker.
    pub fn handle_marker_activation(&mut self, id: &str) {
        if self.select_by_id(id) {
            self.sync_map();
        }
    }

    /// Creates or updates the profile held by `form`.
    pub fn save_profile(&mut self, form: &ProfileForm) -> Result<SaveOutcome, FormError> {
        match form.submit(&mut self.service) {
            Ok(outcome) => {
                self.notices.push(Notice::success(outcome.message()));
                if let SaveOutcome::Updated(id) = &outcome {
                    if self.selected.as_ref().is_some_and(|p| &p.id == id) {
                        self.selected = self.lookup(id.as_str());
                    }
                }
                self.refresh_and_sync();
                Ok(outcome)
            }
            Err(err) => {
                warn!("event=profile_save module=shell status=error error={err}");
                self.notices.push(Notice::error(err.user_message()));
                Err(err)
            }
        }
    }

    /// Deletes `id`, dropping it from the selection when needed.
    pub fn delete_profile(&mut self, id: &str) -> bool {
        match self.service.delete(id) {
            Ok(()) => {
                if self.selected.as_ref().is_some_and(|p| p.id.as_str() == id) {
                    self.selected = None;
                    if self.detail_open {
                        self.detail_open = false;
                        self.view = ActiveView::Profiles;
                    }
                }
                self.notices.push(Notice::success(PROFILE_DELETED_MESSAGE));
                self.refresh_and_sync();
                true
            }
            Err(RepoError::NotFound(_)) => {
                self.notices.push(Notice::error(PROFILE_NOT_FOUND_MESSAGE));
                false
            }
            Err(err) => {
                self.notices.push(Notice::error(err.to_string()));
                false
            }
        }
    }

    /// Starts the map with a resolved startup credential, or requests one.
    pub async fn open_map(
        &mut self,
        container: MapContainer,
        credential: Option<&Credential>,
    ) -> Result<(), MapError> {
        match credential {
            Some(credential) => {
                self.start_map(container, credential.expose().to_string())
                    .await
            }
            None => {
                info!("event=map_open module=shell status=needs_credential");
                self.credential_prompt = true;
                self.notices.push(Notice::info(CREDENTIAL_REQUIRED_MESSAGE));
                Ok(())
            }
        }
    }

    /// Validates, persists and uses a credential typed into the prompt.
    pub async fn submit_credential<T: SettingsRepository>(
        &mut self,
        container: MapContainer,
        raw: &str,
        credentials: &CredentialService<T>,
    ) -> Result<(), MapError> {
        let credential = match credentials.submit(raw) {
            Ok(credential) => credential,
            Err(err) => {
                self.credential_prompt = true;
                self.notices.push(Notice::error(CREDENTIAL_REJECTED_MESSAGE));
                return Err(MapError::InvalidCredential(err));
            }
        };
        self.notices.push(Notice::success(CREDENTIAL_ACCEPTED_MESSAGE));
        self.start_map(container, credential.expose().to_string())
            .await
    }

    async fn start_map(
        &mut self,
        container: MapContainer,
        credential: String,
    ) -> Result<(), MapError> {
        self.sync_map();
        match self
            .adapter
            .initialize(InitRequest::new(container, credential))
            .await
        {
            Ok(()) => {
                self.credential_prompt = false;
                Ok(())
            }
            Err(err) => {
                if err.is_recoverable() {
                    self.credential_prompt = true;
                    self.notices.push(Notice::error(MAP_FAILED_MESSAGE));
                }
                Err(err)
            }
        }
    }

    fn select_by_id(&mut self, id: &str) -> bool {
        match self.lookup(id) {
            Some(profile) => {
                info!("event=profile_select module=shell status=ok profile_id={}", profile.id);
                self.selected = Some(profile);
                true
            }
            None => {
                self.notices.push(Notice::error(PROFILE_NOT_FOUND_MESSAGE));
                false
            }
        }
    }

    fn lookup(&self, id: &str) -> Option<Profile> {
        match self.service.find(id) {
            Ok(found) => found,
            Err(err) => {
                warn!("event=profile_select module=shell status=error profile_id={id} error={err}");
                None
            }
        }
    }

    fn refresh_and_sync(&mut self) {
        self.refresh_visible();
        self.sync_map();
    }

    fn refresh_visible(&mut self) {
        match self.service.search_query(&self.query) {
            Ok(profiles) => self.visible = profiles,
            Err(err) => {
                warn!("event=profile_search module=shell status=error error={err}");
                self.notices.push(Notice::error(err.to_string()));
            }
        }
    }

    fn sync_map(&self) {
        let listed = if self.detail_open {
            None
        } else {
            Some(self.visible.as_slice())
        };
        if let Err(err) = self.adapter.reconcile(listed, self.selected.as_ref()) {
            warn!("event=map_sync module=shell status=error error={err}");
        }
    }
}
