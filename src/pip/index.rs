//! Spatial index over feature bounding boxes.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use tracing::info;

use super::FeatureStore;

/// Bounding box of one feature, keyed by its position in the store
#[derive(Debug, Clone)]
pub struct IndexedFeature {
    pub id: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedFeature {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl PointDistance for IndexedFeature {
    // Distance to the box, zero when the point is inside it.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        self.envelope.distance_2(point)
    }
}

impl IndexedFeature {
    pub fn new(id: usize, bbox: (f64, f64, f64, f64)) -> Self {
        let (min_x, min_y, max_x, max_y) = bbox;
        Self {
            id,
            envelope: AABB::from_corners([min_x, min_y], [max_x, max_y]),
        }
    }
}

/// Static R-tree over the bounding boxes of every feature with a geometry.
///
/// Built once with a bulk load and never modified afterwards.
pub struct IrisSpatialIndex {
    tree: RTree<IndexedFeature>,
}

impl IrisSpatialIndex {
    /// Build the index from the store. Features without coordinates are left out.
    pub fn build(store: &FeatureStore) -> Self {
        info!("Building spatial index for {} features...", store.len());

        let indexed: Vec<IndexedFeature> = store
            .features()
            .iter()
            .enumerate()
            .filter_map(|(id, feature)| feature.bbox().map(|bbox| IndexedFeature::new(id, bbox)))
            .collect();

        let tree = RTree::bulk_load(indexed);

        info!("Spatial index built with {} entries", tree.size());

        Self { tree }
    }

    /// Ids of up to `k` features whose bounding boxes are nearest to the point.
    ///
    /// Nearest boxes come first. Boxes containing the point are all at
    /// distance zero and come back in tree order. When `max_distance` is set,
    /// boxes farther than that (in coordinate units) are not returned.
    pub fn candidates(&self, lon: f64, lat: f64, k: usize, max_distance: Option<f64>) -> Vec<usize> {
        let max_distance_2 = max_distance.map(|d| d * d).unwrap_or(f64::INFINITY);

        self.tree
            .nearest_neighbor_iter_with_distance_2(&[lon, lat])
            .take_while(|(_, distance_2)| *distance_2 <= max_distance_2)
            .take(k)
            .map(|(entry, _)| entry.id)
            .collect()
    }

    /// Get total number of indexed features
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IrisFeature, IrisProperties};
    use geo::{polygon, MultiPolygon};

    fn square(code: &str, x: f64, y: f64, size: f64) -> IrisFeature {
        let properties = IrisProperties {
            nom_commune: format!("Commune {}", code),
            code_commune: code.to_string(),
            iris: "0000".to_string(),
            code_iris: format!("{}0000", code),
            nom_iris: format!("Commune {}", code),
            type_iris: "Z".to_string(),
        };
        let geometry = polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
            (x: x, y: y),
        ];
        IrisFeature::new(properties, MultiPolygon::new(vec![geometry]))
    }

    fn store() -> FeatureStore {
        FeatureStore::from_features(vec![
            square("00001", 0.0, 0.0, 1.0),
            square("00002", 5.0, 0.0, 1.0),
            square("00003", 2.0, 0.0, 1.0),
            IrisFeature::new(square("00004", 0.0, 0.0, 1.0).properties, MultiPolygon::new(vec![])),
        ])
    }

    #[test]
    fn test_empty_index() {
        let index = IrisSpatialIndex::build(&FeatureStore::default());
        assert!(index.is_empty());
        assert!(index.candidates(0.5, 0.5, 10, None).is_empty());
    }

    #[test]
    fn test_features_without_geometry_are_skipped() {
        let index = IrisSpatialIndex::build(&store());
        assert_eq!(index.len(), 3);
        assert!(!index.candidates(0.5, 0.5, 10, None).contains(&3));
    }

    #[test]
    fn test_candidates_nearest_first() {
        let index = IrisSpatialIndex::build(&store());
        assert_eq!(index.candidates(0.5, 0.5, 10, None), vec![0, 2, 1]);
        assert_eq!(index.candidates(4.5, 0.5, 10, None), vec![1, 2, 0]);
    }

    #[test]
    fn test_candidates_limited_to_k() {
        let index = IrisSpatialIndex::build(&store());
        assert_eq!(index.candidates(0.5, 0.5, 2, None), vec![0, 2]);
        assert!(index.candidates(0.5, 0.5, 0, None).is_empty());
    }

    #[test]
    fn test_candidates_within_max_distance() {
        let index = IrisSpatialIndex::build(&store());
        // Box 2 starts 1.5 away, box 1 starts 4.5 away.
        assert_eq!(index.candidates(0.5, 0.5, 10, Some(2.0)), vec![0, 2]);
        assert_eq!(index.candidates(-20.0, 0.5, 10, Some(10.0)), Vec::<usize>::new());
    }
}
