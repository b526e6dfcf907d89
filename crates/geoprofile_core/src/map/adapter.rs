//! Map adapter: marker/overlay lifecycle on top of an imperative map SDK.
//!
//! # Responsibility
//! - Own one map instance and a keyed set of marker entries.
//! - Reconcile that set against the desired profile list and selection with
//!   minimal SDK edits.
//! - Forward marker activations to the host's selection callback.
//!
//! # Invariants
//! - Marker keys always equal the last applied desired id set, minus
//!   entries whose SDK creation failed.
//! - At most one overlay is open at any time.
//! - A pending `initialize` whose generation is stale never touches the SDK
//!   after its load completes.
//! - One failing SDK call never aborts a reconcile or teardown pass.

use crate::map::overlay::{OverlayContent, OverlayDetail};
use crate::map::sdk::{
    ListenerTarget, MapContainer, MapHandle, MapOptions, MapSdk, MarkerEmphasis, MarkerHandle,
    MarkerStyle, OverlayHandle, SdkError,
};
use crate::map::viewport::{fit_zoom, GeoBounds, MAX_SDK_ZOOM};
use crate::model::credential::{Credential, CredentialError};
use crate::model::profile::{GeoLocation, Profile, ProfileId};
use log::{debug, info, warn};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type MapResult<T> = Result<T, MapError>;

/// Host callback receiving the id of an activated marker.
pub type SelectionCallback = Rc<dyn Fn(&ProfileId)>;

/// Adapter lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterState {
    Uninitialized,
    /// Waiting for the SDK load.
    Loading,
    Ready,
    /// A reconcile pass is mutating markers.
    Reconciling,
    /// Last initialize failed; a new credential is expected.
    Failed,
    /// Terminal; every SDK object has been released.
    TornDown,
}

impl AdapterState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Reconciling => "reconciling",
            Self::Failed => "failed",
            Self::TornDown => "torn_down",
        }
    }
}

/// Adapter-level failures surfaced to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    InvalidCredential(CredentialError),
    Load(SdkError),
    CreateMap(SdkError),
    /// The load completed after teardown or a newer initialize.
    Cancelled,
    TornDown,
    /// Re-entrant call while the adapter is mid-mutation.
    Busy,
}

impl MapError {
    /// Whether the host should show the credential prompt and retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredential(_) | Self::Load(_) | Self::CreateMap(_)
        )
    }
}

impl Display for MapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredential(err) => write!(f, "{err}"),
            Self::Load(err) => write!(f, "{err}"),
            Self::CreateMap(err) => write!(f, "map could not be created: {err}"),
            Self::Cancelled => write!(f, "map initialization was cancelled"),
            Self::TornDown => write!(f, "map adapter has been torn down"),
            Self::Busy => write!(f, "map adapter is busy"),
        }
    }
}

impl Error for MapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidCredential(err) => Some(err),
            Self::Load(err) | Self::CreateMap(err) => Some(err),
            Self::Cancelled | Self::TornDown | Self::Busy => None,
        }
    }
}

/// Viewport and overlay policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdapterConfig {
    /// Zoom applied when centering on the selected profile.
    pub selected_zoom: f64,
    /// Upper bound after fitting all markers.
    pub max_fit_zoom: f64,
    pub fit_padding_px: u32,
    pub overlay_summary_chars: usize,
    pub initial_center: GeoLocation,
    pub initial_zoom: f64,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            selected_zoom: 14.0,
            max_fit_zoom: 15.0,
            fit_padding_px: 50,
            overlay_summary_chars: 100,
            initial_center: GeoLocation::new(39.8283, -98.5795),
            initial_zoom: 3.0,
        }
    }
}

/// Arguments for [`MapAdapter::initialize`].
#[derive(Debug, Clone)]
pub struct InitRequest {
    pub container: MapContainer,
    /// Raw credential text as entered or persisted.
    pub credential: String,
    pub center: Option<GeoLocation>,
    pub zoom: Option<f64>,
}

impl InitRequest {
    pub fn new(container: MapContainer, credential: impl Into<String>) -> Self {
        Self {
            container,
            credential: credential.into(),
            center: None,
            zoom: None,
        }
    }

    pub fn with_view(mut self, center: GeoLocation, zoom: f64) -> Self {
        self.center = Some(center);
        self.zoom = Some(zoom);
        self
    }
}

/// Counters for one reconcile or teardown pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: usize,
    pub removed: usize,
    /// Entries restyled, moved or re-captioned in place.
    pub updated: usize,
    /// Profiles not drawn (invalid location or duplicate id).
    pub skipped: usize,
    /// SDK calls that failed and were ignored.
    pub failures: usize,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.skipped == 0 && self.failures == 0
    }
}

/// Result of a reconcile request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Applied(ReconcileReport),
    /// Stored and replayed once the adapter becomes Ready.
    Deferred,
}

struct MarkerEntry {
    marker: MarkerHandle,
    overlay: Option<OverlayHandle>,
    style: MarkerStyle,
    position: GeoLocation,
    overlay_text: String,
}

#[derive(Clone)]
struct DesiredView {
    profiles: Option<Vec<Profile>>,
    selected: Option<Profile>,
}

struct AdapterCore {
    state: AdapterState,
    generation: u64,
    map: Option<MapHandle>,
    container: Option<MapContainer>,
    entries: BTreeMap<ProfileId, MarkerEntry>,
    open_overlay: Option<ProfileId>,
    /// Selection of the last applied reconcile.
    selected: Option<ProfileId>,
    pending: Option<DesiredView>,
}

struct Shared<S: MapSdk> {
    sdk: S,
    config: AdapterConfig,
    core: RefCell<AdapterCore>,
    on_select: RefCell<Option<SelectionCallback>>,
}

/// Owner of one map instance and its markers.
///
/// All methods take `&self`; state lives behind a `RefCell` so `teardown`
/// can run while an `initialize` future is still pending. Dropping the
/// adapter tears it down.
pub struct MapAdapter<S: MapSdk + 'static> {
    shared: Rc<Shared<S>>,
}

impl<S: MapSdk + 'static> MapAdapter<S> {
    pub fn new(sdk: S) -> Self {
        Self::with_config(sdk, AdapterConfig::default())
    }

    pub fn with_config(sdk: S, config: AdapterConfig) -> Self {
        Self {
            shared: Rc::new(Shared {
                sdk,
                config,
                core: RefCell::new(AdapterCore {
                    state: AdapterState::Uninitialized,
                    generation: 0,
                    map: None,
                    container: None,
                    entries: BTreeMap::new(),
                    open_overlay: None,
                    selected: None,
                    pending: None,
                }),
                on_select: RefCell::new(None),
            }),
        }
    }

    pub fn sdk(&self) -> &S {
        &self.shared.sdk
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.shared.config
    }

    /// Current lifecycle state (`Reconciling` while a pass is running).
    pub fn state(&self) -> AdapterState {
        self.shared
            .core
            .try_borrow()
            .map(|core| core.state)
            .unwrap_or(AdapterState::Reconciling)
    }

    /// Ids that currently own a marker, sorted.
    pub fn marker_ids(&self) -> Vec<ProfileId> {
        self.shared
            .core
            .try_borrow()
            .map(|core| core.entries.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Id whose overlay is open, if any.
    pub fn open_overlay_id(&self) -> Option<ProfileId> {
        self.shared
            .core
            .try_borrow()
            .ok()
            .and_then(|core| core.open_overlay.clone())
    }

    /// Registers the callback receiving marker activations.
    pub fn set_selection_callback(&self, callback: impl Fn(&ProfileId) + 'static) {
        *self.shared.on_select.borrow_mut() = Some(Rc::new(callback));
    }

    /// Loads the SDK and creates the map.
    ///
    /// Any previous map/markers are released first. On failure the adapter
    /// is `Failed` and the error is recoverable with a new credential.
    /// Returns `Cancelled` when teardown or a newer initialize happened
    /// while the load was pending.
    pub async fn initialize(&self, request: InitRequest) -> MapResult<()> {
        let shared = &self.shared;
        let (generation, credential) = {
            let mut core = shared.core.try_borrow_mut().map_err(|_| MapError::Busy)?;
            if core.state == AdapterState::TornDown {
                return Err(MapError::TornDown);
            }

            let mut discarded = ReconcileReport::default();
            shared.release_all(&mut core, &mut discarded);
            core.generation += 1;

            let credential = match Credential::parse(&request.credential) {
                Ok(credential) => credential,
                Err(err) => {
                    core.state = AdapterState::Failed;
                    warn!(
                        "event=map_init module=map status=error error_code=invalid_credential error={err}"
                    );
                    return Err(MapError::InvalidCredential(err));
                }
            };

            core.state = AdapterState::Loading;
            core.container = Some(request.container.clone());
            (core.generation, credential)
        };

        info!(
            "event=map_init module=map status=start generation={generation} container={}",
            request.container.id
        );
        let loaded = shared.sdk.load(&credential).await;

        let mut core = shared.core.try_borrow_mut().map_err(|_| MapError::Busy)?;
        if core.generation != generation || core.state != AdapterState::Loading {
            info!(
                "event=map_init module=map status=discarded generation={generation} state={}",
                core.state.as_str()
            );
            return Err(MapError::Cancelled);
        }

        if let Err(err) = loaded {
            core.state = AdapterState::Failed;
            warn!(
                "event=map_init module=map status=error error_code={} error={err}",
                err.code()
            );
            return Err(MapError::Load(err));
        }

        let options = MapOptions {
            center: request.center.unwrap_or(shared.config.initial_center),
            zoom: request.zoom.unwrap_or(shared.config.initial_zoom),
        };
        let map = match shared.sdk.create_map(&request.container, options) {
            Ok(map) => map,
            Err(err) => {
                core.state = AdapterState::Failed;
                warn!(
                    "event=map_init module=map status=error error_code=create_map_failed error={err}"
                );
                return Err(MapError::CreateMap(err));
            }
        };

        core.map = Some(map);
        core.state = AdapterState::Ready;
        let pending = core.pending.take();
        drop(core);
        info!("event=map_init module=map status=ok generation={generation}");

        if let Some(view) = pending {
            let outcome = self.reconcile(view.profiles.as_deref(), view.selected.as_ref());
            debug!("event=map_reconcile module=map status=replayed outcome={outcome:?}");
        }
        Ok(())
    }

    /// Brings markers in line with `profiles` and `selected`.
    ///
    /// Idempotent: repeating the same arguments creates and removes nothing.
    /// Before the adapter is Ready the request is stored and `Deferred`.
    pub fn reconcile(
        &self,
        profiles: Option<&[Profile]>,
        selected: Option<&Profile>,
    ) -> MapResult<ReconcileOutcome> {
        let mut core = self
            .shared
            .core
            .try_borrow_mut()
            .map_err(|_| MapError::Busy)?;

        let map = match (core.state, core.map) {
            (AdapterState::TornDown, _) => return Err(MapError::TornDown),
            (AdapterState::Ready, Some(map)) => map,
            (state, _) => {
                debug!(
                    "event=map_reconcile module=map status=deferred state={}",
                    state.as_str()
                );
                core.pending = Some(DesiredView {
                    profiles: profiles.map(<[Profile]>::to_vec),
                    selected: selected.cloned(),
                });
                return Ok(ReconcileOutcome::Deferred);
            }
        };

        core.state = AdapterState::Reconciling;
        let report = self.shared.apply(&self.shared, &mut core, map, profiles, selected);
        core.state = AdapterState::Ready;

        info!(
            "event=map_reconcile module=map status=ok markers={} created={} removed={} updated={} skipped={} failures={}",
            core.entries.len(),
            report.created,
            report.removed,
            report.updated,
            report.skipped,
            report.failures
        );
        Ok(ReconcileOutcome::Applied(report))
    }

    /// Handles activation of the marker for `profile_id`.
    ///
    /// Opens its overlay (closing any other) and forwards the id to the
    /// selection callback.
    pub fn on_marker_activated(&self, profile_id: &str) {
        self.shared.activate(&ProfileId::new(profile_id));
    }

    /// Records a new container size and lets the SDK re-layout.
    pub fn resize(&self, width_px: u32, height_px: u32) {
        let Ok(mut core) = self.shared.core.try_borrow_mut() else {
            warn!("event=map_resize module=map status=busy");
            return;
        };
        if let Some(container) = core.container.as_mut() {
            container.width_px = width_px;
            container.height_px = height_px;
        }
        if let (AdapterState::Ready, Some(map)) = (core.state, core.map) {
            if let Err(err) = self.shared.sdk.resize(map) {
                warn!(
                    "event=map_resize module=map status=error error_code={} error={err}",
                    err.code()
                );
            }
        }
    }

    /// Releases every SDK object owned by this adapter.
    ///
    /// Idempotent and safe while `initialize` is pending; a pending load is
    /// discarded when it completes.
    pub fn teardown(&self) {
        let Ok(mut core) = self.shared.core.try_borrow_mut() else {
            warn!("event=map_teardown module=map status=busy");
            return;
        };
        if core.state == AdapterState::TornDown {
            return;
        }

        let previous = core.state;
        core.state = AdapterState::TornDown;
        core.generation += 1;
        core.pending = None;

        let mut report = ReconcileReport::default();
        self.shared.release_all(&mut core, &mut report);
        info!(
            "event=map_teardown module=map status=ok previous_state={} released={} failures={}",
            previous.as_str(),
            report.removed,
            report.failures
        );
    }
}

impl<S: MapSdk + 'static> Drop for MapAdapter<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

struct DesiredMarker<'a> {
    profile: &'a Profile,
    style: MarkerStyle,
    detail: OverlayDetail,
}

impl<S: MapSdk + 'static> Shared<S> {
    fn apply(
        &self,
        this: &Rc<Self>,
        core: &mut AdapterCore,
        map: MapHandle,
        profiles: Option<&[Profile]>,
        selected: Option<&Profile>,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        let listed = profiles.unwrap_or(&[]);
        let desired = self.desired_markers(listed, selected, &mut report);

        let desired_ids: HashSet<&str> = desired.iter().map(|d| d.profile.id.as_str()).collect();
        let stale: Vec<ProfileId> = core
            .entries
            .keys()
            .filter(|id| !desired_ids.contains(id.as_str()))
            .cloned()
            .collect();
        for id in stale {
            if let Some(entry) = core.entries.remove(&id) {
                let was_open = core.open_overlay.as_ref() == Some(&id);
                if was_open {
                    core.open_overlay = None;
                }
                self.release_entry(&id, entry, was_open, &mut report);
            }
        }

        for marker in &desired {
            let id = &marker.profile.id;
            let overlay_text = OverlayContent::for_profile(
                marker.profile,
                marker.detail,
                self.config.overlay_summary_chars,
            )
            .to_text();

            match core.entries.get_mut(id) {
                Some(entry) => {
                    self.refresh_entry(id, entry, marker, overlay_text, &mut report)
                }
                None => {
                    if let Some(entry) =
                        self.create_entry(this, map, marker, overlay_text, &mut report)
                    {
                        core.entries.insert(id.clone(), entry);
                        report.created += 1;
                    }
                }
            }
        }

        if listed.len() > 1 && selected.is_none() {
            let points = desired.iter().map(|d| d.profile.location());
            self.fit_all(core, map, points, &mut report);
        }

        match selected {
            Some(target) => self.focus(core, map, target, &mut report),
            None if core.selected.is_some() => self.close_open_overlay(core, &mut report),
            None => {}
        }
        core.selected = selected.map(|profile| profile.id.clone());

        report
    }

    fn desired_markers<'a>(
        &self,
        listed: &'a [Profile],
        selected: Option<&'a Profile>,
        report: &mut ReconcileReport,
    ) -> Vec<DesiredMarker<'a>> {
        let selected_id = selected.map(|profile| profile.id.as_str());
        let candidates: Vec<(&Profile, MarkerEmphasis, OverlayDetail)> = if !listed.is_empty() {
            listed
                .iter()
                .map(|profile| {
                    let emphasis = if Some(profile.id.as_str()) == selected_id {
                        MarkerEmphasis::Selected
                    } else {
                        MarkerEmphasis::Normal
                    };
                    (profile, emphasis, OverlayDetail::Summary)
                })
                .collect()
        } else {
            selected
                .map(|profile| (profile, MarkerEmphasis::Solo, OverlayDetail::Full))
                .into_iter()
                .collect()
        };

        let mut seen = HashSet::new();
        let mut desired = Vec::with_capacity(candidates.len());
        for (profile, emphasis, detail) in candidates {
            if !profile.location().is_valid() {
                warn!(
                    "event=map_reconcile module=map status=skipped reason=invalid_location profile_id={}",
                    profile.id
                );
                report.skipped += 1;
                continue;
            }
            if !seen.insert(profile.id.as_str()) {
                warn!(
                    "event=map_reconcile module=map status=skipped reason=duplicate_id profile_id={}",
                    profile.id
                );
                report.skipped += 1;
                continue;
            }
            desired.push(DesiredMarker {
                profile,
                style: MarkerStyle::new(profile.marker_glyph(), emphasis),
                detail,
            });
        }
        desired
    }

    fn create_entry(
        &self,
        this: &Rc<Self>,
        map: MapHandle,
        desired: &DesiredMarker<'_>,
        overlay_text: String,
        report: &mut ReconcileReport,
    ) -> Option<MarkerEntry> {
        let id = &desired.profile.id;
        let position = desired.profile.location();
        let marker = match self.sdk.create_marker(map, position, &desired.style) {
            Ok(marker) => marker,
            Err(err) => {
                note_failure(report, "create_marker", Some(id), &err);
                return None;
            }
        };

        let overlay = match self.sdk.create_overlay(&overlay_text) {
            Ok(overlay) => Some(overlay),
            Err(err) => {
                note_failure(report, "create_overlay", Some(id), &err);
                None
            }
        };

        let weak = Rc::downgrade(this);
        let listener_id = id.clone();
        let listener = Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.activate(&listener_id);
            }
        });
        if let Err(err) = self.sdk.on_activate(marker, listener) {
            note_failure(report, "on_activate", Some(id), &err);
        }

        Some(MarkerEntry {
            marker,
            overlay,
            style: desired.style.clone(),
            position,
            overlay_text,
        })
    }

    fn refresh_entry(
        &self,
        id: &ProfileId,
        entry: &mut MarkerEntry,
        desired: &DesiredMarker<'_>,
        overlay_text: String,
        report: &mut ReconcileReport,
    ) {
        let mut changed = false;

        if entry.style != desired.style {
            match self.sdk.set_marker_style(entry.marker, &desired.style) {
                Ok(()) => {
                    entry.style = desired.style.clone();
                    changed = true;
                }
                Err(err) => note_failure(report, "set_marker_style", Some(id), &err),
            }
        }

        let position = desired.profile.location();
        if entry.position != position {
            match self.sdk.set_marker_position(entry.marker, position) {
                Ok(()) => {
                    entry.position = position;
                    changed = true;
                }
                Err(err) => note_failure(report, "set_marker_position", Some(id), &err),
            }
        }

        if entry.overlay_text != overlay_text {
            let result = match entry.overlay {
                Some(overlay) => self.sdk.set_overlay_content(overlay, &overlay_text),
                None => self.sdk.create_overlay(&overlay_text).map(|overlay| {
                    entry.overlay = Some(overlay);
                }),
            };
            match result {
                Ok(()) => {
                    entry.overlay_text = overlay_text;
                    changed = true;
                }
                Err(err) => note_failure(report, "set_overlay_content", Some(id), &err),
            }
        }

        if changed {
            report.updated += 1;
        }
    }

    fn fit_all(
        &self,
        core: &AdapterCore,
        map: MapHandle,
        points: impl IntoIterator<Item = GeoLocation>,
        report: &mut ReconcileReport,
    ) {
        let Some(bounds) = GeoBounds::covering(points) else {
            return;
        };
        let padding = self.config.fit_padding_px;
        if let Err(err) = self.sdk.fit_bounds(map, &bounds, padding) {
            note_failure(report, "fit_bounds", None, &err);
            return;
        }

        let projected = core
            .container
            .as_ref()
            .map(|c| fit_zoom(&bounds, c.width_px, c.height_px, padding))
            .unwrap_or(MAX_SDK_ZOOM);
        let zoom = self.sdk.zoom(map).unwrap_or_else(|err| {
            debug!(
                "event=map_fit module=map status=fallback error_code={} projected_zoom={projected:.2}",
                err.code()
            );
            projected
        });

        if zoom > self.config.max_fit_zoom {
            if let Err(err) = self.sdk.set_zoom(map, self.config.max_fit_zoom) {
                note_failure(report, "set_zoom", None, &err);
            }
        }
    }

    fn focus(
        &self,
        core: &mut AdapterCore,
        map: MapHandle,
        target: &Profile,
        report: &mut ReconcileReport,
    ) {
        let position = target.location();
        if position.is_valid() {
            if let Err(err) = self.sdk.pan_to(map, position) {
                note_failure(report, "pan_to", Some(&target.id), &err);
            }
            if let Err(err) = self.sdk.set_zoom(map, self.config.selected_zoom) {
                note_failure(report, "set_zoom", Some(&target.id), &err);
            }
        }
        self.open_exclusive(core, &target.id, report);
    }

    /// Opens the overlay of `id`, closing whichever other overlay is open.
    ///
    /// An overlay already recorded as open is opened again: the user may
    /// have closed it from the map since.
    fn open_exclusive(&self, core: &mut AdapterCore, id: &ProfileId, report: &mut ReconcileReport) {
        if core.open_overlay.as_ref() != Some(id) {
            self.close_open_overlay(core, report);
        }

        let Some(entry) = core.entries.get_mut(id) else {
            return;
        };
        let overlay = match entry.overlay {
            Some(overlay) => overlay,
            None => match self.sdk.create_overlay(&entry.overlay_text) {
                Ok(overlay) => {
                    entry.overlay = Some(overlay);
                    overlay
                }
                Err(err) => {
                    note_failure(report, "create_overlay", Some(id), &err);
                    return;
                }
            },
        };

        match self.sdk.open_overlay(overlay, entry.marker) {
            Ok(()) => core.open_overlay = Some(id.clone()),
            Err(err) => {
                note_failure(report, "open_overlay", Some(id), &err);
                if core.open_overlay.as_ref() == Some(id) {
                    core.open_overlay = None;
                }
            }
        }
    }

    fn close_open_overlay(&self, core: &mut AdapterCore, report: &mut ReconcileReport) {
        let Some(previous) = core.open_overlay.take() else {
            return;
        };
        if let Some(overlay) = core.entries.get(&previous).and_then(|e| e.overlay) {
            if let Err(err) = self.sdk.close_overlay(overlay) {
                note_failure(report, "close_overlay", Some(&previous), &err);
            }
        }
    }

    fn activate(&self, id: &ProfileId) {
        let forward = match self.core.try_borrow_mut() {
            Ok(mut core) => {
                let known = core.state == AdapterState::Ready && core.entries.contains_key(id);
                if known {
                    let mut report = ReconcileReport::default();
                    self.open_exclusive(&mut core, id, &mut report);
                }
                known
            }
            Err(_) => {
                warn!("event=map_activate module=map status=busy profile_id={id}");
                true
            }
        };

        if !forward {
            debug!("event=map_activate module=map status=ignored profile_id={id}");
            return;
        }
        info!("event=map_activate module=map status=ok profile_id={id}");

        let callback = self.on_select.borrow().clone();
        if let Some(callback) = callback {
            callback(id);
        }
    }

    fn release_all(&self, core: &mut AdapterCore, report: &mut ReconcileReport) {
        let open = core.open_overlay.take();
        core.selected = None;
        for (id, entry) in std::mem::take(&mut core.entries) {
            let was_open = open.as_ref() == Some(&id);
            self.release_entry(&id, entry, was_open, report);
        }

        if let Some(map) = core.map.take() {
            if let Err(err) = self.sdk.clear_listeners(ListenerTarget::Map(map)) {
                note_failure(report, "clear_listeners", None, &err);
            }
            if let Err(err) = self.sdk.release_map(map) {
                note_failure(report, "release_map", None, &err);
            }
        }
        core.container = None;
    }

    fn release_entry(
        &self,
        id: &ProfileId,
        entry: MarkerEntry,
        was_open: bool,
        report: &mut ReconcileReport,
    ) {
        if let Err(err) = self.sdk.clear_listeners(ListenerTarget::Marker(entry.marker)) {
            note_failure(report, "clear_listeners", Some(id), &err);
        }
        if let (true, Some(overlay)) = (was_open, entry.overlay) {
            if let Err(err) = self.sdk.close_overlay(overlay) {
                note_failure(report, "close_overlay", Some(id), &err);
            }
        }
        if let Err(err) = self.sdk.remove_marker(entry.marker) {
            note_failure(report, "remove_marker", Some(id), &err);
        }
        report.removed += 1;
    }
}

fn note_failure(
    report: &mut ReconcileReport,
    op: &'static str,
    profile_id: Option<&ProfileId>,
    err: &SdkError,
) {
    report.failures += 1;
    match profile_id {
        Some(id) => warn!(
            "event=map_sdk_call module=map status=error op={op} profile_id={id} error_code={} error={err}",
            err.code()
        ),
        None => warn!(
            "event=map_sdk_call module=map status=error op={op} error_code={} error={err}",
            err.code()
        ),
    }
}
