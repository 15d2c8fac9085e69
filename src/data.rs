//! GeoJSON feature collections and the numeric views the scale needs.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use geo::{BoundingRect, LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::Error;

/// Property value meaning "no data" in the source dataset.
pub const NA_SENTINEL: &str = "NA";

/// One geographic entity: areal geometry plus its attribute map.
///
/// Features whose geometry is missing or not areal keep an empty
/// multipolygon, so their properties still take part in domain computation.
#[derive(Debug, Clone)]
pub struct Feature {
    pub geometry: MultiPolygon<f64>,
    pub properties: Map<String, Value>,
}

impl Feature {
    /// Numeric value of `field`, or `None` when the property is absent,
    /// null, the `"NA"` sentinel, or otherwise not a finite number.
    /// Numeric strings count; joined attribute tables often store them.
    pub fn numeric(&self, field: &str) -> Option<f64> {
        match self.properties.get(field)? {
            Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
            Value::String(v) if v != NA_SENTINEL => {
                v.parse::<f64>().ok().filter(|v| v.is_finite())
            }
            _ => None,
        }
    }

    pub fn has(&self, field: &str) -> bool {
        self.properties.contains_key(field)
    }

    /// Display name for tooltips.
    pub fn name(&self) -> Option<&str> {
        self.properties.get("NAME").and_then(Value::as_str)
    }
}

/// A loaded feature collection.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub features: Vec<Feature>,
}

#[derive(Deserialize)]
struct RawCollection {
    features: Vec<RawFeature>,
}

#[derive(Deserialize)]
struct RawFeature {
    geometry: Option<RawGeometry>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

type RawRing = Vec<Vec<f64>>;

#[derive(Deserialize)]
#[serde(tag = "type")]
enum RawGeometry {
    Polygon { coordinates: Vec<RawRing> },
    MultiPolygon { coordinates: Vec<Vec<RawRing>> },
    #[serde(other)]
    Other,
}

fn ring_to_line(ring: &[Vec<f64>]) -> LineString<f64> {
    ring.iter()
        .filter(|position| position.len() >= 2)
        .map(|position| (position[0], position[1]))
        .collect()
}

fn rings_to_polygon(rings: &[RawRing]) -> Option<Polygon<f64>> {
    let (exterior, interiors) = rings.split_first()?;
    Some(Polygon::new(
        ring_to_line(exterior),
        interiors.iter().map(|ring| ring_to_line(ring)).collect(),
    ))
}

fn to_multi_polygon(geometry: Option<RawGeometry>) -> MultiPolygon<f64> {
    match geometry {
        Some(RawGeometry::Polygon { coordinates }) => {
            MultiPolygon(rings_to_polygon(&coordinates).into_iter().collect())
        }
        Some(RawGeometry::MultiPolygon { coordinates }) => MultiPolygon(
            coordinates
                .iter()
                .filter_map(|rings| rings_to_polygon(rings))
                .collect(),
        ),
        _ => MultiPolygon(Vec::new()),
    }
}

impl Dataset {
    /// Decode a GeoJSON feature collection.
    pub fn from_geojson_str(src: &str) -> Result<Self, serde_json::Error> {
        let raw: RawCollection = serde_json::from_str(src)?;
        let features = raw
            .features
            .into_iter()
            .map(|feature| Feature {
                geometry: to_multi_polygon(feature.geometry),
                properties: feature.properties.unwrap_or_default(),
            })
            .collect();
        Ok(Dataset { features })
    }

    /// Read and decode the dataset at `path`.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let src = fs::read_to_string(path).map_err(|source| Error::Fetch {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_geojson_str(&src).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// [min, max] over the non-sentinel numeric values of `field`.
    ///
    /// Distinguishes a field nobody has (`MissingField`) from a field whose
    /// every value is no-data (`EmptyDomain`); neither gets a fallback
    /// domain.
    pub fn numeric_domain(&self, field: &str) -> Result<(f64, f64), Error> {
        let mut domain: Option<(f64, f64)> = None;
        let mut field_seen = false;
        for feature in &self.features {
            if feature.has(field) {
                field_seen = true;
            }
            if let Some(v) = feature.numeric(field) {
                domain = Some(match domain {
                    Some((min, max)) => (min.min(v), max.max(v)),
                    None => (v, v),
                });
            }
        }
        match domain {
            Some(d) => Ok(d),
            None if field_seen => Err(Error::EmptyDomain(field.to_string())),
            None => Err(Error::MissingField(field.to_string())),
        }
    }

    /// Property keys numeric on at least one feature, sorted.
    pub fn numeric_fields(&self) -> Vec<String> {
        let mut fields = BTreeSet::new();
        for feature in &self.features {
            for key in feature.properties.keys() {
                if feature.numeric(key).is_some() {
                    fields.insert(key.clone());
                }
            }
        }
        fields.into_iter().collect()
    }

    /// Bounding box over every feature geometry.
    pub fn bounds(&self) -> Option<geo::Rect<f64>> {
        let mut bounds: Option<geo::Rect<f64>> = None;
        for feature in &self.features {
            if let Some(b) = feature.geometry.bounding_rect() {
                bounds = Some(match bounds {
                    Some(acc) => geo::Rect::new(
                        (acc.min().x.min(b.min().x), acc.min().y.min(b.min().y)),
                        (acc.max().x.max(b.max().x), acc.max().y.max(b.max().y)),
                    ),
                    None => b,
                });
            }
        }
        bounds
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACTS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]]
                },
                "properties": { "NAME": "Alpha", "medincome": 10, "pop": "1200" }
            },
            {
                "type": "Feature",
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[[2.0, 2.0], [3.0, 2.0], [3.0, 3.0], [2.0, 3.0], [2.0, 2.0]]]]
                },
                "properties": { "NAME": "Beta", "medincome": "NA", "pop": 900 }
            },
            {
                "type": "Feature",
                "geometry": null,
                "properties": { "NAME": "Gamma", "medincome": 20, "pop": null }
            }
        ]
    }"#;

    fn dataset() -> Dataset {
        Dataset::from_geojson_str(TRACTS).unwrap()
    }

    #[test]
    fn decodes_features_and_geometries() {
        let dataset = dataset();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.features[0].geometry.0.len(), 1);
        assert_eq!(dataset.features[1].geometry.0.len(), 1);
        assert!(dataset.features[2].geometry.0.is_empty());
        assert_eq!(dataset.features[0].name(), Some("Alpha"));
    }

    #[test]
    fn sentinel_values_are_excluded_from_the_domain() {
        assert_eq!(dataset().numeric_domain("medincome").unwrap(), (10.0, 20.0));
    }

    #[test]
    fn numeric_strings_count() {
        assert_eq!(dataset().numeric_domain("pop").unwrap(), (900.0, 1200.0));
    }

    #[test]
    fn all_sentinel_values_is_an_empty_domain() {
        let src = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": null, "properties": {"v": "NA"}},
            {"type": "Feature", "geometry": null, "properties": {"v": "NA"}}
        ]}"#;
        let dataset = Dataset::from_geojson_str(src).unwrap();
        let err = dataset.numeric_domain("v").unwrap_err();
        assert!(matches!(err, Error::EmptyDomain(field) if field == "v"));
    }

    #[test]
    fn absent_field_is_missing_not_empty() {
        let err = dataset().numeric_domain("nothere").unwrap_err();
        assert!(matches!(err, Error::MissingField(field) if field == "nothere"));
    }

    #[test]
    fn null_and_missing_behave_like_the_sentinel() {
        let dataset = dataset();
        assert_eq!(dataset.features[1].numeric("medincome"), None);
        assert_eq!(dataset.features[2].numeric("pop"), None);
        assert_eq!(dataset.features[2].numeric("absent"), None);
    }

    #[test]
    fn discovers_numeric_fields() {
        assert_eq!(dataset().numeric_fields(), vec!["medincome", "pop"]);
    }

    #[test]
    fn bounds_cover_every_geometry() {
        let bounds = dataset().bounds().unwrap();
        assert_eq!((bounds.min().x, bounds.min().y), (0.0, 0.0));
        assert_eq!((bounds.max().x, bounds.max().y), (3.0, 3.0));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Dataset::load(Path::new("/nonexistent/f.geojson")).unwrap_err();
        assert!(matches!(err, Error::Fetch { .. }));
    }
}
