//! Point-in-Polygon (PIP) IRIS lookup.
//!
//! Loads IRIS zones into an immutable store, indexes their bounding boxes
//! in an R-tree and resolves points to the zone containing them.

mod geometry;
mod index;
mod service;
mod store;

pub use geometry::{boundary_distance_km, contains_point, ring_distance_km};
pub use index::{IndexedFeature, IrisSpatialIndex};
pub use service::{IrisService, LookupOptions, DEFAULT_CANDIDATES, DEFAULT_MAX_DISTANCE};
pub use store::FeatureStore;
