//! Polygon construction from a projected gesture path.
//!
//! The ring is stored exactly as drawn: no deduplication, no simplification,
//! and no repeated closing vertex. The edge from the last vertex back to the
//! first is still part of the boundary, and is also exposed separately as a
//! [`ClosingEdge`] so a renderer can stroke it with its own style.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use serde::{Deserialize, Serialize};

use crate::error::{OptionExt, Result};
use crate::{GeoBounds, GeoCoordinate};

/// Minimum number of input points accepted by [`build_polygon`].
pub const MIN_POLYGON_INPUT_POINTS: usize = 2;

/// Minimum ring size with a non-empty interior.
pub const MIN_RING_VERTICES: usize = 3;

/// An implicitly closed ring of geographic coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    ring: Vec<GeoCoordinate>,
}

/// Segment from the ring's last vertex back to its first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosingEdge {
    pub from: GeoCoordinate,
    pub to: GeoCoordinate,
}

impl Polygon {
    /// Wrap a ring as-is.
    pub fn new(ring: Vec<GeoCoordinate>) -> Self {
        Self { ring }
    }

    pub fn vertices(&self) -> &[GeoCoordinate] {
        &self.ring
    }

    pub fn vertex_count(&self) -> usize {
        self.ring.len()
    }

    /// A ring with fewer than three vertices encloses nothing.
    pub fn has_interior(&self) -> bool {
        self.ring.len() >= MIN_RING_VERTICES
    }

    /// Every boundary edge, ending with the implicit closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (GeoCoordinate, GeoCoordinate)> + '_ {
        let n = self.ring.len();
        (0..n).map(move |i| (self.ring[i], self.ring[(i + 1) % n]))
    }

    pub fn closing_edge(&self) -> Option<ClosingEdge> {
        Some(ClosingEdge {
            from: *self.ring.last()?,
            to: *self.ring.first()?,
        })
    }

    pub fn bounds(&self) -> Option<GeoBounds> {
        GeoBounds::from_coordinates(&self.ring)
    }

    /// Convert into a `geo` polygon (the exterior gets an explicit closing point).
    pub fn to_geo(&self) -> geo::Polygon<f64> {
        let coords: Vec<geo::Coord<f64>> = self.ring.iter().map(|&c| c.into()).collect();
        geo::Polygon::new(geo::LineString::new(coords), vec![])
    }

    /// GeoJSON `FeatureCollection` holding this ring as a single `Polygon`
    /// feature, with the closing vertex repeated as GeoJSON requires.
    pub fn to_geojson(&self) -> FeatureCollection {
        let mut ring: Vec<Vec<f64>> = self
            .ring
            .iter()
            .map(|c| vec![c.longitude, c.latitude])
            .collect();
        if let Some(first) = ring.first().cloned() {
            ring.push(first);
        }

        let feature = Feature {
            bbox: None,
            geometry: Some(Geometry::new(geojson::Value::Polygon(vec![ring]))),
            id: None,
            properties: Some(JsonObject::new()),
            foreign_members: None,
        };
        FeatureCollection {
            bbox: None,
            foreign_members: None,
            features: vec![feature],
        }
    }
}

/// Build a polygon and its closing edge from ordered geographic points.
///
/// Two points are accepted and yield a degenerate ring with no interior.
///
/// # Example
/// ```
/// use region_search::{build_polygon, GeoCoordinate};
///
/// let points = vec![
///     GeoCoordinate::new(0.0, 0.0),
///     GeoCoordinate::new(0.0, 10.0),
///     GeoCoordinate::new(10.0, 10.0),
/// ];
/// let (polygon, closing) = build_polygon(&points).unwrap();
/// assert_eq!(polygon.vertex_count(), 3);
/// assert_eq!(closing.from, GeoCoordinate::new(10.0, 10.0));
/// assert_eq!(closing.to, GeoCoordinate::new(0.0, 0.0));
/// ```
pub fn build_polygon(points: &[GeoCoordinate]) -> Result<(Polygon, ClosingEdge)> {
    let polygon = Polygon::new(points.to_vec());
    let closing = polygon
        .closing_edge()
        .filter(|_| points.len() >= MIN_POLYGON_INPUT_POINTS)
        .ok_or_insufficient_points("polygon input", points.len(), MIN_POLYGON_INPUT_POINTS)?;
    Ok((polygon, closing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RegionSearchError;

    fn square() -> Vec<GeoCoordinate> {
        vec![
            GeoCoordinate::new(0.0, 0.0),
            GeoCoordinate::new(10.0, 0.0),
            GeoCoordinate::new(10.0, 10.0),
            GeoCoordinate::new(0.0, 10.0),
        ]
    }

    #[test]
    fn test_ring_preserves_input() {
        let mut points = square();
        points.insert(1, GeoCoordinate::new(0.0, 0.0)); // consecutive duplicate
        let (polygon, _) = build_polygon(&points).unwrap();
        assert_eq!(polygon.vertex_count(), points.len());
        assert_eq!(polygon.vertices(), points.as_slice());
    }

    #[test]
    fn test_closing_edge() {
        let (_, closing) = build_polygon(&square()).unwrap();
        assert_eq!(closing.from, GeoCoordinate::new(0.0, 10.0));
        assert_eq!(closing.to, GeoCoordinate::new(0.0, 0.0));
    }

    #[test]
    fn test_two_points_is_degenerate() {
        let points = vec![GeoCoordinate::new(0.0, 0.0), GeoCoordinate::new(1.0, 1.0)];
        let (polygon, closing) = build_polygon(&points).unwrap();
        assert!(!polygon.has_interior());
        assert_eq!(closing.from, points[1]);
    }

    #[test]
    fn test_too_few_points() {
        let err = build_polygon(&[GeoCoordinate::new(0.0, 0.0)]).unwrap_err();
        assert!(matches!(
            err,
            RegionSearchError::InsufficientPoints {
                point_count: 1,
                minimum_required: 2,
                ..
            }
        ));
        assert!(build_polygon(&[]).is_err());
    }

    #[test]
    fn test_edges_include_closing_edge() {
        let polygon = Polygon::new(square());
        let edges: Vec<_> = polygon.edges().collect();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3], (GeoCoordinate::new(0.0, 10.0), GeoCoordinate::new(0.0, 0.0)));
    }

    #[test]
    fn test_to_geo_closes_ring() {
        let polygon = Polygon::new(square());
        let geo_poly = polygon.to_geo();
        assert_eq!(geo_poly.exterior().0.len(), 5);
    }

    #[test]
    fn test_to_geojson() {
        let collection = Polygon::new(square()).to_geojson();
        assert_eq!(collection.features.len(), 1);
        match collection.features[0].geometry.as_ref().map(|g| &g.value) {
            Some(geojson::Value::Polygon(rings)) => assert_eq!(rings[0].len(), 5),
            other => panic!("expected polygon geometry, got {:?}", other),
        }

        let json = serde_json::to_value(&collection).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        let geometry = &json["features"][0]["geometry"];
        assert_eq!(geometry["type"], "Polygon");
        let ring = geometry["coordinates"][0].as_array().unwrap();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring[0], ring[4]);
        assert_eq!(ring[1][0], 10.0);
    }
}
