//! IRIS lookup service: resolves a point and a municipality code to a zone.

use std::sync::Arc;

use geo::Point;
use tracing::{debug, trace};

use super::geometry::{boundary_distance_km, contains_point};
use super::{FeatureStore, IrisSpatialIndex};
use crate::error::LookupError;
use crate::models::{IrisFeature, IrisProperties};

/// Number of bounding-box candidates examined per lookup
pub const DEFAULT_CANDIDATES: usize = 10;

/// Bounding boxes farther than this from the point (in degrees) are ignored
pub const DEFAULT_MAX_DISTANCE: f64 = 10.0;

/// Candidate shortlist settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookupOptions {
    pub candidates: usize,
    pub max_distance: Option<f64>,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            candidates: DEFAULT_CANDIDATES,
            max_distance: Some(DEFAULT_MAX_DISTANCE),
        }
    }
}

/// Point-in-IRIS lookup over a loaded store and its index.
///
/// Holds only read-only state, so one instance serves any number of
/// concurrent lookups.
pub struct IrisService {
    store: Arc<FeatureStore>,
    index: IrisSpatialIndex,
    options: LookupOptions,
}

impl IrisService {
    /// Create a service from a store and an index built over it
    pub fn new(store: Arc<FeatureStore>, index: IrisSpatialIndex, options: LookupOptions) -> Self {
        Self {
            store,
            index,
            options,
        }
    }

    /// Build the index for the store and wrap both in a service
    pub fn from_store(store: FeatureStore, options: LookupOptions) -> Self {
        let index = IrisSpatialIndex::build(&store);
        Self::new(Arc::new(store), index, options)
    }

    /// Find the IRIS zone of a point within the given municipality.
    ///
    /// Among the nearest candidates belonging to the municipality, the first
    /// one containing the point wins. Failing that, the candidate whose
    /// boundary is closest to the point is returned.
    pub fn resolve(
        &self,
        lat: f64,
        lon: f64,
        code_commune: &str,
    ) -> Result<&IrisProperties, LookupError> {
        validate(lat, lon)?;

        let point = Point::new(lon, lat);

        let candidates: Vec<&IrisFeature> = self
            .index
            .candidates(lon, lat, self.options.candidates, self.options.max_distance)
            .into_iter()
            .filter_map(|id| self.store.get(id))
            .filter(|feature| feature.properties.code_commune == code_commune)
            .collect();

        debug!(
            "IRIS lookup at ({}, {}) in {}: {} candidates",
            lon,
            lat,
            code_commune,
            candidates.len()
        );

        if candidates.is_empty() {
            return Err(LookupError::NotFound);
        }

        if let Some(feature) = candidates
            .iter()
            .copied()
            .find(|feature| contains_point(&feature.geometry, &point))
        {
            debug!("Exact match: {}", feature.properties.code_iris);
            return Ok(&feature.properties);
        }

        let mut nearest: Option<(&IrisFeature, f64)> = None;
        for &feature in &candidates {
            let Some(distance) = boundary_distance_km(&feature.geometry, &point) else {
                trace!(
                    "Skipping {}: no boundary to measure",
                    feature.properties.code_iris
                );
                continue;
            };

            // Strict comparison keeps the first candidate on ties.
            if nearest.map_or(true, |(_, best)| distance < best) {
                nearest = Some((feature, distance));
            }
        }

        match nearest {
            Some((feature, distance)) => {
                debug!(
                    "Nearest boundary match: {} at {:.4} km",
                    feature.properties.code_iris, distance
                );
                Ok(&feature.properties)
            }
            None => Err(LookupError::NotFound),
        }
    }

    pub fn store(&self) -> &FeatureStore {
        &self.store
    }

    /// Get the spatial index (for stats/debugging)
    pub fn index(&self) -> &IrisSpatialIndex {
        &self.index
    }

    pub fn options(&self) -> LookupOptions {
        self.options
    }
}

fn validate(lat: f64, lon: f64) -> Result<(), LookupError> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(LookupError::InvalidInput(format!(
            "latitude {} is outside [-90, 90]",
            lat
        )));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(LookupError::InvalidInput(format!(
            "longitude {} is outside [-180, 180]",
            lon
        )));
    }
    Ok(())
}
