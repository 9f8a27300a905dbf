//! Region search orchestration.
//!
//! Sequences the pipeline for one finished gesture: project the path,
//! build the polygon, filter the records. The call is synchronous and has no
//! side effects beyond its return value.
//!
//! Projected longitudes are made continuous along the path before the
//! polygon is built: a step of more than 180 degrees is taken as a crossing
//! of the antimeridian, not a trip around the world.

use std::time::Instant;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{RegionSearchError, Result};
use crate::polygon::{build_polygon, ClosingEdge, Polygon, MIN_POLYGON_INPUT_POINTS};
use crate::projection::CoordinateTransformer;
use crate::records::GeoRecord;
use crate::spatial::PointInPolygonIndex;
use crate::{GeoCoordinate, SurfacePoint};

/// Configuration for region searches.
///
/// Thresholds only select how the filter runs; every strategy returns the
/// same matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct SearchConfig {
    /// Record count at which the R-tree prefilter is used.
    /// Default: 512
    pub spatial_index_threshold: u32,

    /// Record count at which records are scanned in parallel
    /// (only with the `parallel` feature).
    /// Default: 10_000
    pub parallel_threshold: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            spatial_index_threshold: 512,
            parallel_threshold: 10_000,
        }
    }
}

/// Output of a successful region search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Records inside the drawn region, in canonical order
    pub matches: Vec<GeoRecord>,
    pub polygon: Polygon,
    pub closing_edge: ClosingEdge,
}

impl SearchResult {
    pub fn match_ids(&self) -> Vec<&str> {
        self.matches.iter().map(|r| r.id.as_str()).collect()
    }

    /// Serialize for hand-off across the FFI boundary.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Runs region searches with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct RegionSearch {
    config: SearchConfig,
}

impl RegionSearch {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search `records` for those inside the region drawn by `path`.
    ///
    /// Returns `Ok(None)` when the path has fewer than two points (no region
    /// drawn). Fails with [`RegionSearchError::InvalidCoordinate`] if the
    /// transformer yields a non-finite or out-of-range coordinate for any
    /// point; nothing is dropped and no partial result is returned.
    pub fn search<T>(
        &self,
        path: &[SurfacePoint],
        transformer: &T,
        records: &[GeoRecord],
    ) -> Result<Option<SearchResult>>
    where
        T: CoordinateTransformer + ?Sized,
    {
        if path.len() < MIN_POLYGON_INPUT_POINTS {
            debug!(
                "[RegionSearch] Path has {} points, no region drawn",
                path.len()
            );
            return Ok(None);
        }

        let start = Instant::now();
        let coordinates = project_path(path, transformer)?;
        let (polygon, closing_edge) = build_polygon(&coordinates)?;
        let index = PointInPolygonIndex::new(&polygon);
        let matches = self.run_filter(&index, records);

        info!(
            "[RegionSearch] {} of {} records inside {}-vertex region in {:?}",
            matches.len(),
            records.len(),
            polygon.vertex_count(),
            start.elapsed()
        );

        Ok(Some(SearchResult {
            matches,
            polygon,
            closing_edge,
        }))
    }

    #[cfg(feature = "parallel")]
    fn run_filter(&self, index: &PointInPolygonIndex, records: &[GeoRecord]) -> Vec<GeoRecord> {
        if records.len() >= self.config.parallel_threshold as usize {
            return index.filter_parallel(records);
        }
        self.run_sequential(index, records)
    }

    #[cfg(not(feature = "parallel"))]
    fn run_filter(&self, index: &PointInPolygonIndex, records: &[GeoRecord]) -> Vec<GeoRecord> {
        self.run_sequential(index, records)
    }

    fn run_sequential(&self, index: &PointInPolygonIndex, records: &[GeoRecord]) -> Vec<GeoRecord> {
        if records.len() >= self.config.spatial_index_threshold as usize {
            index.filter_indexed(records)
        } else {
            index.filter(records)
        }
    }
}

/// Project every path point in order, failing on the first invalid result.
fn project_path<T>(path: &[SurfacePoint], transformer: &T) -> Result<Vec<GeoCoordinate>>
where
    T: CoordinateTransformer + ?Sized,
{
    let mut coordinates = path
        .iter()
        .enumerate()
        .map(|(index, &point)| {
            let coordinate = transformer.surface_to_geo(point);
            if coordinate.is_valid() {
                Ok(coordinate)
            } else {
                Err(RegionSearchError::InvalidCoordinate {
                    index,
                    longitude: coordinate.longitude,
                    latitude: coordinate.latitude,
                })
            }
        })
        .collect::<Result<Vec<_>>>()?;
    unwrap_longitudes(&mut coordinates);
    Ok(coordinates)
}

/// Shift longitudes by whole turns so consecutive points are never more than
/// 180 degrees apart.
fn unwrap_longitudes(coordinates: &mut [GeoCoordinate]) {
    for i in 1..coordinates.len() {
        let previous = coordinates[i - 1].longitude;
        let current = &mut coordinates[i].longitude;
        while *current - previous > 180.0 {
            *current -= 360.0;
        }
        while previous - *current > 180.0 {
            *current += 360.0;
        }
    }
}
