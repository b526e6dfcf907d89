//! Recording map SDK double shared by the adapter and shell tests.

#![allow(dead_code)]

use async_trait::async_trait;
use geoprofile_core::map::sdk::{
    ActivateListener, ListenerTarget, MapContainer, MapHandle, MapOptions, MapSdk, MarkerHandle,
    MarkerStyle, OverlayHandle, SdkError, SdkResult,
};
use geoprofile_core::map::viewport::{fit_zoom, GeoBounds};
use geoprofile_core::model::credential::Credential;
use geoprofile_core::model::profile::GeoLocation;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;
use tokio::sync::oneshot;

pub const VALID_KEY: &str = "AIzaSyTestCredentialValue0123";

#[derive(Debug, Clone, PartialEq)]
pub struct FakeMarker {
    pub position: GeoLocation,
    pub style: MarkerStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeOverlay {
    pub content: String,
    /// Anchor marker while open.
    pub open_on: Option<u64>,
}

#[derive(Default)]
pub struct FakeState {
    next_id: u64,
    pub maps: BTreeMap<u64, MapContainer>,
    pub markers: BTreeMap<u64, FakeMarker>,
    pub overlays: BTreeMap<u64, FakeOverlay>,
    pub listeners: BTreeMap<u64, Vec<Rc<dyn Fn()>>>,
    pub calls: Vec<&'static str>,
    pub failing: HashSet<&'static str>,
    pub load_result: Option<SdkResult<()>>,
    pub load_gate: Option<oneshot::Receiver<SdkResult<()>>>,
    pub zoom: f64,
    pub center: Option<GeoLocation>,
}

impl FakeState {
    fn call(&mut self, op: &'static str) -> SdkResult<()> {
        self.calls.push(op);
        if self.failing.contains(op) {
            return Err(SdkError::Call(format!("{op} rejected by fake")));
        }
        Ok(())
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory SDK that records every call and can be told to fail.
#[derive(Clone, Default)]
pub struct FakeMapSdk {
    pub state: Rc<RefCell<FakeState>>,
}

impl FakeMapSdk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every future call of `op` fail.
    pub fn fail(&self, op: &'static str) {
        self.state.borrow_mut().failing.insert(op);
    }

    pub fn heal(&self, op: &'static str) {
        self.state.borrow_mut().failing.remove(op);
    }

    pub fn set_load_result(&self, result: SdkResult<()>) {
        self.state.borrow_mut().load_result = Some(result);
    }

    /// Holds the next `load` until the returned sender fires.
    pub fn gate_load(&self) -> oneshot::Sender<SdkResult<()>> {
        let (tx, rx) = oneshot::channel();
        self.state.borrow_mut().load_gate = Some(rx);
        tx
    }

    pub fn count(&self, op: &str) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|call| **call == op)
            .count()
    }

    pub fn marker_count(&self) -> usize {
        self.state.borrow().markers.len()
    }

    pub fn map_count(&self) -> usize {
        self.state.borrow().maps.len()
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.values().map(Vec::len).sum()
    }

    pub fn zoom_level(&self) -> f64 {
        self.state.borrow().zoom
    }

    pub fn center(&self) -> Option<GeoLocation> {
        self.state.borrow().center
    }

    /// Overlays currently open, as their content text.
    pub fn open_overlays(&self) -> Vec<String> {
        self.state
            .borrow()
            .overlays
            .values()
            .filter(|overlay| overlay.open_on.is_some())
            .map(|overlay| overlay.content.clone())
            .collect()
    }

    pub fn marker_at(&self, position: GeoLocation) -> Option<MarkerHandle> {
        self.state
            .borrow()
            .markers
            .iter()
            .find(|(_, marker)| marker.position == position)
            .map(|(id, _)| MarkerHandle(*id))
    }

    pub fn marker_style_at(&self, position: GeoLocation) -> Option<MarkerStyle> {
        self.state
            .borrow()
            .markers
            .values()
            .find(|marker| marker.position == position)
            .map(|marker| marker.style.clone())
    }

    /// Closes every overlay the way a user would from the map.
    pub fn dismiss_overlays(&self) {
        for overlay in self.state.borrow_mut().overlays.values_mut() {
            overlay.open_on = None;
        }
    }

    /// Fires the activation listeners of `marker` like a user click.
    pub fn click(&self, marker: MarkerHandle) {
        let listeners = self
            .state
            .borrow()
            .listeners
            .get(&marker.0)
            .cloned()
            .unwrap_or_default();
        for listener in listeners {
            listener();
        }
    }
}

fn stale(kind: &str, id: u64) -> SdkError {
    SdkError::StaleHandle(format!("{kind} {id}"))
}

#[async_trait(?Send)]
impl MapSdk for FakeMapSdk {
    async fn load(&self, _credential: &Credential) -> SdkResult<()> {
        let gate = {
            let mut state = self.state.borrow_mut();
            state.call("load")?;
            state.load_gate.take()
        };
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(SdkError::LoadFailed("gate dropped".to_string()))),
            None => self.state.borrow().load_result.clone().unwrap_or(Ok(())),
        }
    }

    fn create_map(&self, container: &MapContainer, options: MapOptions) -> SdkResult<MapHandle> {
        let mut state = self.state.borrow_mut();
        state.call("create_map")?;
        let id = state.next();
        state.maps.insert(id, container.clone());
        state.zoom = options.zoom;
        state.center = Some(options.center);
        Ok(MapHandle(id))
    }

    fn release_map(&self, map: MapHandle) -> SdkResult<()> {
        let mut state = self.state.borrow_mut();
        state.call("release_map")?;
        state.maps.remove(&map.0).map(|_| ()).ok_or(stale("map", map.0))
    }

    fn resize(&self, map: MapHandle) -> SdkResult<()> {
        let mut state = self.state.borrow_mut();
        state.call("resize")?;
        if state.maps.contains_key(&map.0) {
            Ok(())
        } else {
            Err(stale("map", map.0))
        }
    }

    fn create_marker(
        &self,
        map: MapHandle,
        position: GeoLocation,
        style: &MarkerStyle,
    ) -> SdkResult<MarkerHandle> {
        let mut state = self.state.borrow_mut();
        state.call("create_marker")?;
        if !state.maps.contains_key(&map.0) {
            return Err(stale("map", map.0));
        }
        let id = state.next();
        state.markers.insert(
            id,
            FakeMarker {
                position,
                style: style.clone(),
            },
        );
        Ok(MarkerHandle(id))
    }

    fn set_marker_style(&self, marker: MarkerHandle, style: &MarkerStyle) -> SdkResult<()> {
        let mut state = self.state.borrow_mut();
        state.call("set_marker_style")?;
        let entry = state
            .markers
            .get_mut(&marker.0)
            .ok_or(stale("marker", marker.0))?;
        entry.style = style.clone();
        Ok(())
    }

    fn set_marker_position(&self, marker: MarkerHandle, position: GeoLocation) -> SdkResult<()> {
        let mut state = self.state.borrow_mut();
        state.call("set_marker_position")?;
        let entry = state
            .markers
            .get_mut(&marker.0)
            .ok_or(stale("marker", marker.0))?;
        entry.position = position;
        Ok(())
    }

    fn remove_marker(&self, marker: MarkerHandle) -> SdkResult<()> {
        let mut state = self.state.borrow_mut();
        state.call("remove_marker")?;
        state
            .markers
            .remove(&marker.0)
            .map(|_| ())
            .ok_or(stale("marker", marker.0))
    }

    fn create_overlay(&self, content: &str) -> SdkResult<OverlayHandle> {
        let mut state = self.state.borrow_mut();
        state.call("create_overlay")?;
        let id = state.next();
        state.overlays.insert(
            id,
            FakeOverlay {
                content: content.to_string(),
                open_on: None,
            },
        );
        Ok(OverlayHandle(id))
    }

    fn set_overlay_content(&self, overlay: OverlayHandle, content: &str) -> SdkResult<()> {
        let mut state = self.state.borrow_mut();
        state.call("set_overlay_content")?;
        let entry = state
            .overlays
            .get_mut(&overlay.0)
            .ok_or(stale("overlay", overlay.0))?;
        entry.content = content.to_string();
        Ok(())
    }

    fn open_overlay(&self, overlay: OverlayHandle, anchor: MarkerHandle) -> SdkResult<()> {
        let mut state = self.state.borrow_mut();
        state.call("open_overlay")?;
        if !state.markers.contains_key(&anchor.0) {
            return Err(stale("marker", anchor.0));
        }
        let entry = state
            .overlays
            .get_mut(&overlay.0)
            .ok_or(stale("overlay", overlay.0))?;
        entry.open_on = Some(anchor.0);
        Ok(())
    }

    fn close_overlay(&self, overlay: OverlayHandle) -> SdkResult<()> {
        let mut state = self.state.borrow_mut();
        state.call("close_overlay")?;
        let entry = state
            .overlays
            .get_mut(&overlay.0)
            .ok_or(stale("overlay", overlay.0))?;
        entry.open_on = None;
        Ok(())
    }

    fn pan_to(&self, _map: MapHandle, position: GeoLocation) -> SdkResult<()> {
        let mut state = self.state.borrow_mut();
        state.call("pan_to")?;
        state.center = Some(position);
        Ok(())
    }

    fn set_zoom(&self, _map: MapHandle, zoom: f64) -> SdkResult<()> {
        let mut state = self.state.borrow_mut();
        state.call("set_zoom")?;
        state.zoom = zoom;
        Ok(())
    }

    fn zoom(&self, _map: MapHandle) -> SdkResult<f64> {
        let mut state = self.state.borrow_mut();
        state.call("zoom")?;
        Ok(state.zoom)
    }

    fn fit_bounds(&self, map: MapHandle, bounds: &GeoBounds, padding_px: u32) -> SdkResult<()> {
        let mut state = self.state.borrow_mut();
        state.call("fit_bounds")?;
        let container = state.maps.get(&map.0).cloned().ok_or(stale("map", map.0))?;
        state.zoom = fit_zoom(bounds, container.width_px, container.height_px, padding_px);
        state.center = Some(bounds.center());
        Ok(())
    }

    fn on_activate(&self, marker: MarkerHandle, listener: ActivateListener) -> SdkResult<()> {
        let mut state = self.state.borrow_mut();
        state.call("on_activate")?;
        state
            .listeners
            .entry(marker.0)
            .or_default()
            .push(Rc::from(listener));
        Ok(())
    }

    fn clear_listeners(&self, target: ListenerTarget) -> SdkResult<()> {
        let mut state = self.state.borrow_mut();
        state.call("clear_listeners")?;
        if let ListenerTarget::Marker(marker) = target {
            state.listeners.remove(&marker.0);
        }
        Ok(())
    }
}

pub fn container() -> MapContainer {
    MapContainer::new("map", 1024, 768)
}
