//! Map presentation: SDK contract, viewport math, overlays and the adapter
//! that keeps markers in sync with the directory.

pub mod adapter;
pub mod overlay;
pub mod sdk;
pub mod viewport;
