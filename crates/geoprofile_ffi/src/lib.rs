//! Flutter bridge for the GeoProfile core.

pub mod api;
