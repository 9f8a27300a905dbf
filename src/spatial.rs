//! Point-in-polygon filtering of geotagged records.
//!
//! Containment uses even-odd ray casting with a horizontal ray towards +x
//! (longitude = x, latitude = y). Edges are every consecutive vertex pair
//! plus the implicit closing edge, so self-intersecting and either-winding
//! freehand rings are handled.
//!
//! ## Boundary rule
//!
//! An edge counts as crossed iff exactly one of its endpoints lies strictly
//! above the query latitude and the query longitude is strictly left of the
//! edge at that latitude. Horizontal edges never count. For an axis-aligned
//! square this places the bottom and left sides inside and the top and right
//! sides outside. The rule depends only on the inputs, so repeated calls
//! always agree.
//!
//! Matches are returned in canonical order (by id, then longitude, then
//! latitude, then attributes) so results don't depend on the order of the
//! input records.
//!
//! ## Antimeridian
//!
//! A ring drawn across the antimeridian is stored with continuous
//! longitudes, so some vertices lie beyond ±180. Records are tested at their
//! own longitude and at the ±360 image that falls on the ring's side.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::polygon::Polygon;
use crate::records::GeoRecord;
use crate::{GeoBounds, GeoCoordinate};

/// Precomputed edge list and bounds of a polygon for repeated containment tests.
#[derive(Debug, Clone)]
pub struct PointInPolygonIndex {
    edges: Vec<(GeoCoordinate, GeoCoordinate)>,
    bounds: Option<GeoBounds>,
}

impl PointInPolygonIndex {
    /// Prepare a polygon. Rings with fewer than three vertices contain nothing.
    pub fn new(polygon: &Polygon) -> Self {
        if !polygon.has_interior() {
            return Self {
                edges: Vec::new(),
                bounds: None,
            };
        }
        Self {
            edges: polygon.edges().collect(),
            bounds: polygon.bounds(),
        }
    }

    pub fn bounds(&self) -> Option<GeoBounds> {
        self.bounds
    }

    /// Whether `point` lies inside the polygon (even-odd rule).
    pub fn contains(&self, point: GeoCoordinate) -> bool {
        if !point.is_valid() {
            return false;
        }
        let Some(bounds) = self.bounds else {
            return false;
        };
        world_shifts(&bounds)
            .map(|shift| GeoCoordinate::new(point.longitude - shift, point.latitude))
            .filter(|image| bounds.contains(image))
            .any(|image| self.crossings_odd(image))
    }

    fn crossings_odd(&self, point: GeoCoordinate) -> bool {
        let (px, py) = (point.longitude, point.latitude);
        let mut inside = false;
        for (a, b) in &self.edges {
            if (a.latitude > py) != (b.latitude > py) {
                let x_at_py = a.longitude
                    + (py - a.latitude) * (b.longitude - a.longitude) / (b.latitude - a.latitude);
                if px < x_at_py {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Records whose coordinate lies inside the polygon, sequential scan.
    pub fn filter(&self, records: &[GeoRecord]) -> Vec<GeoRecord> {
        let mut matches: Vec<GeoRecord> = records
            .iter()
            .filter(|r| self.contains(r.coordinate))
            .cloned()
            .collect();
        sort_canonical(&mut matches);
        matches
    }

    /// Same result as [`filter`](Self::filter), using an R-tree over record
    /// coordinates to skip records outside the polygon's bounds.
    pub fn filter_indexed(&self, records: &[GeoRecord]) -> Vec<GeoRecord> {
        let index = RecordIndex::new(records);
        self.filter_with_index(records, &index)
    }

    /// Filter against a prebuilt [`RecordIndex`] over `records`.
    pub fn filter_with_index(
        &self,
        records: &[GeoRecord],
        index: &RecordIndex,
    ) -> Vec<GeoRecord> {
        let Some(bounds) = self.bounds else {
            return Vec::new();
        };
        let mut candidates: Vec<usize> = world_shifts(&bounds)
            .flat_map(|shift| index.candidates(&bounds.shift_longitude(shift)))
            .collect();
        candidates.sort_unstable();
        candidates.dedup();

        let mut matches: Vec<GeoRecord> = candidates
            .into_iter()
            .filter_map(|idx| records.get(idx))
            .filter(|r| self.contains(r.coordinate))
            .cloned()
            .collect();
        sort_canonical(&mut matches);
        matches
    }

    /// Same result as [`filter`](Self::filter), scanning records on the rayon pool.
    #[cfg(feature = "parallel")]
    pub fn filter_parallel(&self, records: &[GeoRecord]) -> Vec<GeoRecord> {
        let mut matches: Vec<GeoRecord> = records
            .par_iter()
            .filter(|r| self.contains(r.coordinate))
            .cloned()
            .collect();
        sort_canonical(&mut matches);
        matches
    }
}

/// Order matches by id, then longitude, then latitude, then attributes.
///
/// Attributes compare by their serialized JSON, which is stable because
/// object keys serialize in sorted order.
pub fn sort_canonical(records: &mut [GeoRecord]) {
    records.sort_by(|a, b| {
        a.id.cmp(&b.id)
            .then_with(|| a.coordinate.longitude.total_cmp(&b.coordinate.longitude))
            .then_with(|| a.coordinate.latitude.total_cmp(&b.coordinate.latitude))
            .then_with(|| a.attributes.to_string().cmp(&b.attributes.to_string()))
    });
}

/// Longitude shifts that bring the ring's bounds back over [-180, 180].
///
/// Always yields 0; yields -360 when the ring extends past +180 and +360
/// when it extends past -180.
fn world_shifts(bounds: &GeoBounds) -> impl Iterator<Item = f64> {
    let east = bounds.max_lng > 180.0;
    let west = bounds.min_lng < -180.0;
    [(0.0, true), (-360.0, east), (360.0, west)]
        .into_iter()
        .filter_map(|(shift, needed)| needed.then_some(shift))
}

// ============================================================================
// R-tree over record coordinates
// ============================================================================

/// A record coordinate with its position in the record slice.
#[derive(Debug, Clone, Copy)]
pub struct IndexedCoordinate {
    pub idx: usize,
    pub lng: f64,
    pub lat: f64,
}

impl RTreeObject for IndexedCoordinate {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.lng, self.lat])
    }
}

impl PointDistance for IndexedCoordinate {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlng = self.lng - point[0];
        let dlat = self.lat - point[1];
        dlng * dlng + dlat * dlat
    }
}

/// Spatial index over a record slice. Records with invalid coordinates are left out.
pub struct RecordIndex {
    tree: RTree<IndexedCoordinate>,
}

impl RecordIndex {
    pub fn new(records: &[GeoRecord]) -> Self {
        let indexed: Vec<IndexedCoordinate> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.coordinate.is_valid())
            .map(|(i, r)| IndexedCoordinate {
                idx: i,
                lng: r.coordinate.longitude,
                lat: r.coordinate.latitude,
            })
            .collect();
        Self {
            tree: RTree::bulk_load(indexed),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Indices of records inside `bounds` (inclusive).
    pub fn candidates(&self, bounds: &GeoBounds) -> Vec<usize> {
        let envelope = AABB::from_corners(
            [bounds.min_lng, bounds.min_lat],
            [bounds.max_lng, bounds.max_lat],
        );
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|p| p.idx)
            .collect()
    }
}
