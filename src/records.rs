//! Searchable geotagged records.
//!
//! Records are owned by the caller; the core only reads their coordinates.
//! A GeoJSON `FeatureCollection` of `Point` features (e.g. a bundled
//! listings file) can be turned into records with [`records_from_geojson`].

use std::collections::HashSet;

use geojson::feature::Id;
use geojson::GeoJson;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RegionSearchError, Result};
use crate::GeoCoordinate;

/// A searchable entity with a coordinate and an opaque payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoRecord {
    pub id: String,
    pub coordinate: GeoCoordinate,
    /// Opaque attributes (GeoJSON `properties` when loaded from a file)
    #[serde(default)]
    pub attributes: Value,
}

impl GeoRecord {
    /// Create a record with no attributes.
    pub fn new(id: impl Into<String>, coordinate: GeoCoordinate) -> Self {
        Self {
            id: id.into(),
            coordinate,
            attributes: Value::Null,
        }
    }

    pub fn with_attributes(mut self, attributes: Value) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Parse a GeoJSON `FeatureCollection` into records.
///
/// Each `Point` feature becomes one record. Its id is the feature `id`,
/// falling back to `properties.id`, then to the feature's position in the
/// collection. Other geometry types are skipped. Ids must be unique across
/// the collection; a repeated id is rejected so matches always have a
/// deterministic order.
///
/// # Example
/// ```
/// use region_search::records_from_geojson;
///
/// let geojson = r#"{
///     "type": "FeatureCollection",
///     "features": [{
///         "type": "Feature",
///         "id": 7,
///         "properties": {"price": 1200},
///         "geometry": {"type": "Point", "coordinates": [-104.98, 39.74]}
///     }]
/// }"#;
/// let records = records_from_geojson(geojson).unwrap();
/// assert_eq!(records[0].id, "7");
/// assert_eq!(records[0].attributes["price"], 1200);
/// ```
pub fn records_from_geojson(geojson: &str) -> Result<Vec<GeoRecord>> {
    let parsed = geojson.parse::<GeoJson>().map_err(|e| invalid(e.to_string()))?;

    let GeoJson::FeatureCollection(collection) = parsed else {
        return Err(invalid("expected a FeatureCollection"));
    };

    let mut seen = HashSet::with_capacity(collection.features.len());
    let mut records = Vec::with_capacity(collection.features.len());
    for (index, feature) in collection.features.into_iter().enumerate() {
        let position = match feature.geometry.map(|g| g.value) {
            Some(geojson::Value::Point(position)) => position,
            _ => {
                debug!("[Records] Skipping non-point feature {}", index);
                continue;
            }
        };

        let coordinate = match position.as_slice() {
            [lng, lat, ..] => GeoCoordinate::new(*lng, *lat),
            _ => {
                return Err(invalid(format!(
                    "feature {} has malformed point coordinates",
                    index
                )))
            }
        };

        let id = match feature.id {
            Some(Id::String(s)) => s,
            Some(Id::Number(n)) => n.to_string(),
            None => feature
                .properties
                .as_ref()
                .and_then(|p| p.get("id"))
                .and_then(property_id)
                .unwrap_or_else(|| index.to_string()),
        };

        if !seen.insert(id.clone()) {
            return Err(invalid(format!("duplicate record id {:?} at feature {}", id, index)));
        }

        records.push(GeoRecord {
            id,
            coordinate,
            attributes: feature.properties.map(Value::Object).unwrap_or(Value::Null),
        });
    }

    info!("[Records] Loaded {} records from GeoJSON", records.len());
    Ok(records)
}

fn invalid(message: impl Into<String>) -> RegionSearchError {
    RegionSearchError::InvalidGeoJson {
        message: message.into(),
    }
}

fn property_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTINGS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": "a",
                "properties": {"price": 950},
                "geometry": {"type": "Point", "coordinates": [-104.99, 39.75]}
            },
            {
                "type": "Feature",
                "properties": {"id": 42, "price": 1800},
                "geometry": {"type": "Point", "coordinates": [-104.95, 39.70]}
            },
            {
                "type": "Feature",
                "properties": {"price": 700},
                "geometry": {"type": "Point", "coordinates": [-105.01, 39.77, 1609.0]}
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}
            }
        ]
    }"#;

    #[test]
    fn test_parse_listings() {
        let records = records_from_geojson(LISTINGS).unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].id, "a");
        assert_eq!(records[0].coordinate, GeoCoordinate::new(-104.99, 39.75));
        assert_eq!(records[0].attributes["price"], 950);

        assert_eq!(records[1].id, "42");
        // Falls back to feature index
        assert_eq!(records[2].id, "2");
        assert_eq!(records[2].coordinate, GeoCoordinate::new(-105.01, 39.77));
    }

    #[test]
    fn test_invalid_json() {
        let err = records_from_geojson("{not json").unwrap_err();
        assert!(matches!(err, RegionSearchError::InvalidGeoJson { .. }));
    }

    #[test]
    fn test_wrong_root_type() {
        let err = records_from_geojson(r#"{"type": "Feature"}"#).unwrap_err();
        assert!(matches!(err, RegionSearchError::InvalidGeoJson { .. }));
    }

    #[test]
    fn test_malformed_point() {
        let geojson = r#"{
            "type": "FeatureCollection",
            "features": [{"type": "Feature", "geometry": {"type": "Point", "coordinates": [1.0]}}]
        }"#;
        assert!(records_from_geojson(geojson).is_err());
    }

    #[test]
    fn test_empty_collection() {
        let geojson = r#"{"type": "FeatureCollection", "features": []}"#;
        let records = records_from_geojson(geojson).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_record_builder() {
        let record = GeoRecord::new("x", GeoCoordinate::new(1.0, 2.0))
            .with_attributes(serde_json::json!({"price": 10}));
        assert_eq!(record.attributes["price"], 10);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        // The id-less second feature falls back to its index, "1"
        let geojson = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "id": "1", "properties": {"p": 1},
                 "geometry": {"type": "Point", "coordinates": [5.0, 5.0]}},
                {"type": "Feature", "properties": {"p": 2},
                 "geometry": {"type": "Point", "coordinates": [5.0, 5.0]}}
            ]
        }"#;
        let err = records_from_geojson(geojson).unwrap_err();
        assert!(matches!(err, RegionSearchError::InvalidGeoJson { .. }));

        let explicit = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "id": "x", "properties": null,
                 "geometry": {"type": "Point", "coordinates": [1.0, 1.0]}},
                {"type": "Feature", "id": "x", "properties": null,
                 "geometry": {"type": "Point", "coordinates": [2.0, 2.0]}}
            ]
        }"#;
        assert!(records_from_geojson(explicit).is_err());
    }

    #[test]
    fn test_missing_properties_are_null() {
        let geojson = r#"{
            "type": "FeatureCollection",
            "features": [{"type": "Feature", "id": 3, "properties": null,
                          "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}}]
        }"#;
        let records = records_from_geojson(geojson).unwrap();
        assert_eq!(records[0].id, "3");
        assert!(records[0].attributes.is_null());
    }
}
