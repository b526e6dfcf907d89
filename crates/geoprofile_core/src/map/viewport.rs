//! Viewport geometry helpers.
//!
//! Web Mercator math shared by the adapter (zoom clamping fallback) and by
//! SDK implementations that have no native fit-bounds.

use crate::model::profile::GeoLocation;
use std::f64::consts::PI;

/// Tile edge length of zoom level 0 in pixels.
const WORLD_TILE_PX: f64 = 256.0;
/// Deepest zoom level any supported SDK renders.
pub const MAX_SDK_ZOOM: f64 = 22.0;

/// Axis-aligned lat/lng rectangle (no antimeridian wrapping).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    /// Degenerate bounds covering exactly `point`.
    pub fn from_point(point: GeoLocation) -> Self {
        Self {
            south: point.lat,
            west: point.lng,
            north: point.lat,
            east: point.lng,
        }
    }

    /// Smallest bounds covering every point, `None` for no points.
    pub fn covering(points: impl IntoIterator<Item = GeoLocation>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::from_point(first), |mut bounds, point| {
            bounds.extend(point);
            bounds
        }))
    }

    pub fn extend(&mut self, point: GeoLocation) {
        self.south = self.south.min(point.lat);
        self.north = self.north.max(point.lat);
        self.west = self.west.min(point.lng);
        self.east = self.east.max(point.lng);
    }

    pub fn center(&self) -> GeoLocation {
        GeoLocation::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }
}

/// Zoom level at which `bounds` fills a `width_px` x `height_px` viewport
/// minus `padding_px` on each side.
///
/// Degenerate bounds (single point) yield [`MAX_SDK_ZOOM`].
pub fn fit_zoom(bounds: &GeoBounds, width_px: u32, height_px: u32, padding_px: u32) -> f64 {
    let usable_w = f64::from(width_px.saturating_sub(padding_px.saturating_mul(2)).max(1));
    let usable_h = f64::from(height_px.saturating_sub(padding_px.saturating_mul(2)).max(1));

    let lat_fraction = (mercator_y(bounds.north) - mercator_y(bounds.south)) / PI;
    let lng_span = bounds.east - bounds.west;
    let lng_span = if lng_span < 0.0 { lng_span + 360.0 } else { lng_span };
    let lng_fraction = lng_span / 360.0;

    let lat_zoom = zoom_for(usable_h, lat_fraction);
    let lng_zoom = zoom_for(usable_w, lng_fraction);
    lat_zoom.min(lng_zoom).min(MAX_SDK_ZOOM)
}

fn zoom_for(map_px: f64, fraction: f64) -> f64 {
    if fraction <= 0.0 {
        return MAX_SDK_ZOOM;
    }
    (map_px / WORLD_TILE_PX / fraction).log2()
}

fn mercator_y(lat: f64) -> f64 {
    let sin = lat.to_radians().sin();
    let rad_x2 = ((1.0 + sin) / (1.0 - sin)).ln() / 2.0;
    rad_x2.clamp(-PI, PI) / 2.0
}
