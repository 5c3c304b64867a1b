//! State outlines drawn under the accident points.
//!
//! Outlines come from a GeoJSON `FeatureCollection` whose features carry the
//! FARS state code in a `STATE` (or census-style `STATEFP`) property, either
//! as a number or a zero-padded string. `Polygon` and `MultiPolygon`
//! geometries are kept; features of one state are merged.

use crate::data::GeoPoint;
use crate::error::{FarsError, Result};
use geo::{ConvexHull, Geometry, MultiPoint, MultiPolygon};
use geojson::{Feature, GeoJson};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

const STATE_KEYS: [&str; 3] = ["STATE", "STATEFP", "state"];

#[derive(Debug, Clone, Default)]
pub struct BaseMap {
    outlines: HashMap<u8, MultiPolygon<f64>>,
}

impl BaseMap {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_geojson(&text).map_err(|source| FarsError::Boundaries {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_geojson(text: &str) -> std::result::Result<Self, geojson::Error> {
        let features = match text.parse::<GeoJson>()? {
            GeoJson::FeatureCollection(fc) => fc.features,
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::Geometry(_) => Vec::new(),
        };

        let mut outlines: HashMap<u8, MultiPolygon<f64>> = HashMap::new();
        for feature in features {
            let Some(state) = state_code(&feature) else {
                debug!(id = ?feature.id, "boundary feature without a state code");
                continue;
            };
            let Some(geometry) = feature.geometry else {
                continue;
            };
            let polygons = match Geometry::<f64>::try_from(geometry)? {
                Geometry::Polygon(p) => vec![p],
                Geometry::MultiPolygon(mp) => mp.0,
                other => {
                    debug!(state, kind = ?other, "skipping non-polygonal boundary");
                    continue;
                }
            };
            outlines
                .entry(state)
                .or_insert_with(|| MultiPolygon(Vec::new()))
                .0
                .extend(polygons);
        }

        Ok(Self { outlines })
    }

    pub fn outline(&self, state: u8) -> Option<&MultiPolygon<f64>> {
        self.outlines.get(&state)
    }

    pub fn len(&self) -> usize {
        self.outlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outlines.is_empty()
    }
}

fn state_code(feature: &Feature) -> Option<u8> {
    let props = feature.properties.as_ref()?;
    STATE_KEYS.iter().find_map(|key| match props.get(*key)? {
        Value::Number(n) => n.as_u64().and_then(|n| u8::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Convex hull of the points, used as the base layer when no outline is known.
pub fn hull_outline(points: &[GeoPoint]) -> MultiPolygon<f64> {
    let points: MultiPoint<f64> = points
        .iter()
        .map(|p| (p.longitude, p.latitude))
        .collect::<Vec<_>>()
        .into();
    MultiPolygon(vec![points.convex_hull()])
}
