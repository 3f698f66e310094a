//! Geometric predicates used by the lookup.

use geo::{Closest, ClosestPoint, Distance, Haversine, Intersects, Line, LineString, MultiPolygon, Point};

const METERS_PER_KILOMETER: f64 = 1000.0;

/// Whether the point lies inside any component polygon.
///
/// Points inside a hole are outside. Points on a boundary, exterior or
/// hole, are inside.
pub fn contains_point(geometry: &MultiPolygon<f64>, point: &Point<f64>) -> bool {
    geometry.intersects(point)
}

/// Great-circle distance in kilometers from the point to the nearest ring
/// of the geometry, holes included.
///
/// `None` when no ring has a segment to measure against.
pub fn boundary_distance_km(geometry: &MultiPolygon<f64>, point: &Point<f64>) -> Option<f64> {
    geometry
        .iter()
        .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
        .filter_map(|ring| ring_distance_km(ring, point))
        .min_by(|a, b| a.total_cmp(b))
}

/// Distance in kilometers from the point to a ring, taken as a path of segments
pub fn ring_distance_km(ring: &LineString<f64>, point: &Point<f64>) -> Option<f64> {
    ring.lines()
        .map(|line| segment_distance_km(line, point))
        .min_by(|a, b| a.total_cmp(b))
}

/// The foot of the point on the segment is found in the plane, then measured
/// along the great circle.
fn segment_distance_km(line: Line<f64>, point: &Point<f64>) -> f64 {
    let nearest = match line.closest_point(point) {
        Closest::Intersection(p) | Closest::SinglePoint(p) => p,
        // Zero-length segment
        Closest::Indeterminate => line.start_point(),
    };

    Haversine.distance(*point, nearest) / METERS_PER_KILOMETER
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Polygon};

    fn square_with_hole() -> MultiPolygon<f64> {
        let polygon: Polygon<f64> = polygon!(
            exterior: [
                (x: 0.0, y: 0.0),
                (x: 0.0, y: 1.0),
                (x: 1.0, y: 1.0),
                (x: 1.0, y: 0.0),
                (x: 0.0, y: 0.0),
            ],
            interiors: [
                [
                    (x: 0.4, y: 0.4),
                    (x: 0.6, y: 0.4),
                    (x: 0.6, y: 0.6),
                    (x: 0.4, y: 0.6),
                    (x: 0.4, y: 0.4),
                ],
            ],
        );
        MultiPolygon::new(vec![polygon])
    }

    #[test]
    fn test_contains_interior_point() {
        let geometry = square_with_hole();
        assert!(contains_point(&geometry, &Point::new(0.2, 0.2)));
        assert!(contains_point(&geometry, &Point::new(0.9, 0.5)));
    }

    #[test]
    fn test_hole_is_not_contained() {
        let geometry = square_with_hole();
        assert!(!contains_point(&geometry, &Point::new(0.5, 0.5)));
    }

    #[test]
    fn test_boundary_is_contained() {
        let geometry = square_with_hole();
        assert!(contains_point(&geometry, &Point::new(1.0, 0.5)));
        assert!(contains_point(&geometry, &Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_outside_point() {
        let geometry = square_with_hole();
        assert!(!contains_point(&geometry, &Point::new(1.0000001, 0.5)));
        assert!(!contains_point(&geometry, &Point::new(-3.0, 2.0)));
    }

    #[test]
    fn test_any_component_contains() {
        let second = polygon![(x: 5.0, y: 5.0), (x: 6.0, y: 5.0), (x: 6.0, y: 6.0), (x: 5.0, y: 5.0)];
        let mut geometry = square_with_hole();
        geometry.0.push(second);
        assert!(contains_point(&geometry, &Point::new(5.9, 5.1)));
    }

    #[test]
    fn test_distance_to_edge() {
        let geometry = square_with_hole();
        // One degree of longitude at the equator is about 111.2 km.
        let distance = boundary_distance_km(&geometry, &Point::new(2.0, 0.5)).unwrap();
        assert!((distance - 111.19).abs() < 0.1, "distance was {}", distance);
    }

    #[test]
    fn test_distance_to_vertex() {
        let geometry = square_with_hole();
        let distance = boundary_distance_km(&geometry, &Point::new(-1.0, -1.0)).unwrap();
        let expected = Haversine.distance(Point::new(-1.0, -1.0), Point::new(0.0, 0.0)) / 1000.0;
        assert!((distance - expected).abs() < 1e-9);
    }

    #[test]
    fn test_distance_counts_holes() {
        let geometry = square_with_hole();
        // Center of the hole: 0.1 degree from the hole ring, 0.5 from the exterior.
        let distance = boundary_distance_km(&geometry, &Point::new(0.5, 0.5)).unwrap();
        assert!(distance < 12.0, "distance was {}", distance);
    }

    #[test]
    fn test_distance_just_outside_is_small() {
        let geometry = square_with_hole();
        let distance = boundary_distance_km(&geometry, &Point::new(1.0000001, 0.5)).unwrap();
        assert!(distance < 0.001);
    }

    #[test]
    fn test_degenerate_geometry_has_no_distance() {
        let empty = MultiPolygon::<f64>::new(vec![]);
        assert!(boundary_distance_km(&empty, &Point::new(0.0, 0.0)).is_none());

        let no_rings = MultiPolygon::new(vec![Polygon::new(LineString::new(vec![]), vec![])]);
        assert!(boundary_distance_km(&no_rings, &Point::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_zero_length_segment() {
        let ring = LineString::from(vec![(1.0, 1.0), (1.0, 1.0)]);
        let distance = ring_distance_km(&ring, &Point::new(1.0, 2.0)).unwrap();
        assert!((distance - 111.19).abs() < 0.1, "distance was {}", distance);
    }
}
