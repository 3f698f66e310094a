//! IRIS zone records served by the lookup.

use geo::{BoundingRect, MultiPolygon};
use serde::{Deserialize, Serialize};

/// Attributes of an IRIS zone, as emitted by the upstream extraction.
///
/// Values are opaque codes and labels; nothing here is validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrisProperties {
    /// Municipality name
    pub nom_commune: String,
    /// INSEE municipality code, used as the lookup filter
    pub code_commune: String,
    /// IRIS code local to the municipality
    pub iris: String,
    /// Full IRIS code (municipality + local code)
    pub code_iris: String,
    pub nom_iris: String,
    pub type_iris: String,
}

/// A single IRIS zone with its polygonal footprint.
///
/// Single polygons are stored as a one-element multi-polygon.
#[derive(Debug, Clone)]
pub struct IrisFeature {
    pub properties: IrisProperties,
    pub geometry: MultiPolygon<f64>,
}

impl IrisFeature {
    pub fn new(properties: IrisProperties, geometry: MultiPolygon<f64>) -> Self {
        Self {
            properties,
            geometry,
        }
    }

    /// Bounding box over every ring of every component polygon,
    /// as `(min_lon, min_lat, max_lon, max_lat)`.
    ///
    /// `None` when the geometry has no coordinates at all.
    pub fn bbox(&self) -> Option<(f64, f64, f64, f64)> {
        self.geometry
            .bounding_rect()
            .map(|rect| (rect.min().x, rect.min().y, rect.max().x, rect.max().y))
    }

    /// Number of rings (exteriors and holes) across all component polygons
    pub fn ring_count(&self) -> usize {
        self.geometry
            .iter()
            .map(|polygon| {
                let exterior = usize::from(!polygon.exterior().0.is_empty());
                exterior + polygon.interiors().len()
            })
            .sum()
    }
}
