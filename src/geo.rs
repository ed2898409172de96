use std::f64::consts::FRAC_PI_4;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result};

/// A ring of `(longitude, latitude)` positions.
pub type Ring = Vec<(f64, f64)>;

/// A named region shape; the name joins against `creatorCountry`.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    /// Polygons, each an outer ring followed by its holes.
    pub polygons: Vec<Vec<Ring>>,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
    #[serde(other)]
    Unsupported,
}

pub fn load_regions(path: &Path) -> Result<Vec<Region>> {
    let contents = std::fs::read_to_string(path)?;
    parse_regions(&contents)
}

pub fn parse_regions(input: &str) -> Result<Vec<Region>> {
    let collection: FeatureCollection = serde_json::from_str(input)?;
    let mut regions = Vec::with_capacity(collection.features.len());
    for feature in collection.features {
        let name = feature
            .properties
            .as_ref()
            .and_then(|props| props.get("name"))
            .and_then(Value::as_str);
        let Some(name) = name else {
            debug!("skipping unnamed feature");
            continue;
        };
        let polygons = match feature.geometry {
            Some(Geometry::Polygon { coordinates }) => vec![rings(name, coordinates)?],
            Some(Geometry::MultiPolygon { coordinates }) => coordinates
                .into_iter()
                .map(|polygon| rings(name, polygon))
                .collect::<Result<Vec<_>>>()?,
            Some(Geometry::Unsupported) | None => Vec::new(),
        };
        regions.push(Region {
            name: name.to_string(),
            polygons,
        });
    }
    Ok(regions)
}

fn rings(region: &str, raw: Vec<Vec<Vec<f64>>>) -> Result<Vec<Ring>> {
    raw.into_iter()
        .map(|ring| {
            ring.into_iter()
                .map(|position| match position.as_slice() {
                    [lon, lat, ..] => Ok((*lon, *lat)),
                    _ => Err(Error::InvalidGeometry {
                        region: region.to_string(),
                        reason: format!("position with {} coordinate(s)", position.len()),
                    }),
                })
                .collect()
        })
        .collect()
}

/// Spherical Mercator with a configurable center, scale and translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mercator {
    /// `[longitude, latitude]` that lands on `translate`.
    pub center: [f64; 2],
    pub scale: f64,
    pub translate: [f64; 2],
}

const MAX_LATITUDE: f64 = 85.051_128_78;

impl Mercator {
    /// Framing used for the Europe map at a given viewport size.
    pub fn europe(viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            center: [2.6, 46.0],
            scale: 0.1 * viewport_width + 90.0,
            translate: [0.1 * viewport_width, 0.24 * viewport_height],
        }
    }

    fn raw(lon: f64, lat: f64) -> (f64, f64) {
        let phi = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        (lon.to_radians(), (FRAC_PI_4 + phi / 2.0).tan().ln())
    }

    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (x, y) = Self::raw(lon, lat);
        let (cx, cy) = Self::raw(self.center[0], self.center[1]);
        (
            self.translate[0] + self.scale * (x - cx),
            self.translate[1] - self.scale * (y - cy),
        )
    }

    /// SVG path data for every ring of the region; empty if it has no shape.
    pub fn path(&self, region: &Region) -> String {
        let mut d = String::new();
        for ring in region.polygons.iter().flatten() {
            for (idx, (lon, lat)) in ring.iter().enumerate() {
                let (x, y) = self.project(*lon, *lat);
                let cmd = if idx == 0 { 'M' } else { 'L' };
                d.push_str(&format!("{cmd}{x:.2},{y:.2}"));
            }
            if !ring.is_empty() {
                d.push('Z');
            }
        }
        d
    }
}
