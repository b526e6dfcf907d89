//! Map SDK capability contract.
//!
//! # Responsibility
//! - Describe the imperative map toolkit the adapter drives (Google Maps,
//!   Mapbox GL, or a test double).
//! - Keep SDK objects opaque: the adapter only sees copyable handles.
//!
//! # Invariants
//! - Every call may fail independently with `SdkError`; a failure on one
//!   handle says nothing about other handles.
//! - Methods take `&self`: SDK objects behave like shared UI-thread objects.

use crate::map::viewport::GeoBounds;
use crate::model::credential::Credential;
use crate::model::profile::GeoLocation;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SdkResult<T> = Result<T, SdkError>;

/// Callback run when the user activates a marker.
pub type ActivateListener = Box<dyn Fn()>;

/// Opaque map instance handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MapHandle(pub u64);

/// Opaque marker handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerHandle(pub u64);

/// Opaque info-window/popup handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayHandle(pub u64);

/// Any handle that can own event listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    Map(MapHandle),
    Marker(MarkerHandle),
}

/// Screen region the map renders into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapContainer {
    /// Host element id.
    pub id: String,
    pub width_px: u32,
    pub height_px: u32,
}

impl MapContainer {
    pub fn new(id: impl Into<String>, width_px: u32, height_px: u32) -> Self {
        Self {
            id: id.into(),
            width_px,
            height_px,
        }
    }
}

/// Options passed when creating the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapOptions {
    pub center: GeoLocation,
    pub zoom: f64,
}

/// Visual weight of a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerEmphasis {
    /// Regular list marker.
    Normal,
    /// Selected list marker; larger glyph.
    Selected,
    /// One-off marker for a selection shown without a list; accent color.
    Solo,
}

/// Marker appearance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarkerStyle {
    /// Short text drawn inside the marker.
    pub glyph: String,
    pub emphasis: MarkerEmphasis,
}

impl MarkerStyle {
    pub fn new(glyph: impl Into<String>, emphasis: MarkerEmphasis) -> Self {
        Self {
            glyph: glyph.into(),
            emphasis,
        }
    }
}

/// SDK call failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkError {
    /// The SDK script/client could not be loaded.
    LoadFailed(String),
    /// The provider rejected the credential.
    Unauthorized(String),
    /// The handle refers to an object that was already removed/disposed.
    StaleHandle(String),
    /// Any other toolkit-level failure.
    Call(String),
}

impl SdkError {
    /// Stable code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::LoadFailed(_) => "load_failed",
            Self::Unauthorized(_) => "unauthorized",
            Self::StaleHandle(_) => "stale_handle",
            Self::Call(_) => "call_failed",
        }
    }
}

impl Display for SdkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoadFailed(message) => write!(f, "map SDK could not be loaded: {message}"),
            Self::Unauthorized(message) => write!(f, "map SDK rejected credential: {message}"),
            Self::StaleHandle(message) => write!(f, "stale map SDK handle: {message}"),
            Self::Call(message) => write!(f, "map SDK call failed: {message}"),
        }
    }
}

impl Error for SdkError {}

/// Capability set of an embeddable map toolkit.
///
/// `load` is the only suspending call; everything else is synchronous from
/// the caller's perspective, mirroring browser map SDKs.
#[async_trait(?Send)]
pub trait MapSdk {
    /// Fetches/handshakes the SDK client with `credential`.
    async fn load(&self, credential: &Credential) -> SdkResult<()>;

    fn create_map(&self, container: &MapContainer, options: MapOptions) -> SdkResult<MapHandle>;
    fn release_map(&self, map: MapHandle) -> SdkResult<()>;
    fn resize(&self, map: MapHandle) -> SdkResult<()>;

    fn create_marker(
        &self,
        map: MapHandle,
        position: GeoLocation,
        style: &MarkerStyle,
    ) -> SdkResult<MarkerHandle>;
    fn set_marker_style(&self, marker: MarkerHandle, style: &MarkerStyle) -> SdkResult<()>;
    fn set_marker_position(&self, marker: MarkerHandle, position: GeoLocation) -> SdkResult<()>;
    fn remove_marker(&self, marker: MarkerHandle) -> SdkResult<()>;

    fn create_overlay(&self, content: &str) -> SdkResult<OverlayHandle>;
    fn set_overlay_content(&self, overlay: OverlayHandle, content: &str) -> SdkResult<()>;
    /// Shows `overlay` anchored to `anchor`.
    fn open_overlay(&self, overlay: OverlayHandle, anchor: MarkerHandle) -> SdkResult<()>;
    fn close_overlay(&self, overlay: OverlayHandle) -> SdkResult<()>;

    fn pan_to(&self, map: MapHandle, position: GeoLocation) -> SdkResult<()>;
    fn set_zoom(&self, map: MapHandle, zoom: f64) -> SdkResult<()>;
    fn zoom(&self, map: MapHandle) -> SdkResult<f64>;
    /// Moves the viewport so `bounds` is visible with `padding_px` margin.
    fn fit_bounds(&self, map: MapHandle, bounds: &GeoBounds, padding_px: u32) -> SdkResult<()>;

    fn on_activate(&self, marker: MarkerHandle, listener: ActivateListener) -> SdkResult<()>;
    fn clear_listeners(&self, target: ListenerTarget) -> SdkResult<()>;
}
