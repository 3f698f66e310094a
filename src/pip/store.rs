//! Feature store: the ordered, immutable set of IRIS zones.
//!
//! Loads the GeoJSON feature collection produced by the extraction step,
//! gzipped or not. A feature's position in the collection is its id for the
//! lifetime of the process.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use tracing::info;

use crate::error::LoadError;
use crate::models::{IrisFeature, IrisProperties};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Deserialize)]
struct RawCollection {
    features: Vec<RawFeature>,
}

#[derive(Deserialize)]
struct RawFeature {
    properties: IrisProperties,
    geometry: Option<RawGeometry>,
}

#[derive(Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    geo_type: String,
    #[serde(default)]
    coordinates: serde_json::Value,
}

type RawRing = Vec<Vec<f64>>;

/// Read-only store of IRIS features, addressed by position
#[derive(Debug, Default)]
pub struct FeatureStore {
    features: Vec<IrisFeature>,
}

impl FeatureStore {
    /// Load a feature collection file, decompressing it if it is gzipped
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        info!("Loading IRIS features from {}", path.display());

        let io_error = |source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(io_error)?;
        let mut reader = BufReader::new(file);
        let gzipped = reader.fill_buf().map_err(io_error)?.starts_with(&GZIP_MAGIC);

        if gzipped {
            Self::from_reader(BufReader::new(GzDecoder::new(reader)))
        } else {
            Self::from_reader(reader)
        }
    }

    /// Parse an uncompressed GeoJSON feature collection
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let collection: RawCollection = serde_json::from_reader(reader)?;

        let features = collection
            .features
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                let geometry = match raw.geometry {
                    Some(geometry) => convert_geometry(index, geometry)?,
                    None => MultiPolygon::new(vec![]),
                };
                Ok::<_, LoadError>(IrisFeature::new(raw.properties, geometry))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let store = Self::from_features(features);
        let empty = store
            .features
            .iter()
            .filter(|f| f.ring_count() == 0)
            .count();
        info!(
            "Loaded {} IRIS features ({} without geometry)",
            store.len(),
            empty
        );

        Ok(store)
    }

    /// Build a store from features already in memory
    pub fn from_features(features: Vec<IrisFeature>) -> Self {
        Self { features }
    }

    pub fn get(&self, id: usize) -> Option<&IrisFeature> {
        self.features.get(id)
    }

    pub fn features(&self) -> &[IrisFeature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

fn convert_geometry(index: usize, raw: RawGeometry) -> Result<MultiPolygon<f64>, LoadError> {
    match raw.geo_type.as_str() {
        "Polygon" => {
            let rings: Vec<RawRing> = serde_json::from_value(raw.coordinates)?;
            Ok(MultiPolygon::new(vec![convert_polygon(index, rings)?]))
        }
        "MultiPolygon" => {
            let polygons: Vec<Vec<RawRing>> = serde_json::from_value(raw.coordinates)?;
            let polygons = polygons
                .into_iter()
                .map(|rings| convert_polygon(index, rings))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(MultiPolygon::new(polygons))
        }
        other => Err(LoadError::UnsupportedGeometry {
            index,
            kind: other.to_string(),
        }),
    }
}

/// First ring is the exterior, the rest are holes. A polygon without rings
/// gets an empty exterior.
fn convert_polygon(index: usize, rings: Vec<RawRing>) -> Result<Polygon<f64>, LoadError> {
    let mut rings = rings.into_iter().map(|ring| convert_ring(index, ring));

    let exterior = match rings.next() {
        Some(ring) => ring?,
        None => LineString::new(vec![]),
    };
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;

    Ok(Polygon::new(exterior, interiors))
}

fn convert_ring(index: usize, ring: RawRing) -> Result<LineString<f64>, LoadError> {
    ring.into_iter()
        .map(|position| match position.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => Err(LoadError::InvalidPosition { index }),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}
