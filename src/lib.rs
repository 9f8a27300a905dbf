//! # Region Search
//!
//! Freehand-region spatial queries for map viewers.
//!
//! This library provides:
//! - Touch gesture capture into an ordered surface-space path
//! - Projection of that path into geographic coordinates
//! - Polygon construction with a separate closing edge for rendering
//! - Point-in-polygon filtering (even-odd ray casting) of geotagged records
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel filtering with rayon
//! - **`ffi`** - Enable FFI bindings for mobile platforms (iOS/Android)
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use region_search::{
//!     GeoCoordinate, GeoRecord, IdentityTransform, RegionSearch, SurfacePoint, TouchPathRecorder,
//! };
//!
//! let mut recorder = TouchPathRecorder::new();
//! recorder.on_gesture_start(SurfacePoint::new(0.0, 0.0));
//! recorder.on_gesture_point(SurfacePoint::new(0.0, 10.0));
//! recorder.on_gesture_point(SurfacePoint::new(10.0, 10.0));
//! let path = recorder.on_gesture_end(SurfacePoint::new(10.0, 0.0)).unwrap();
//!
//! let records = vec![
//!     GeoRecord::new("inside", GeoCoordinate::new(5.0, 5.0)),
//!     GeoRecord::new("outside", GeoCoordinate::new(50.0, 50.0)),
//! ];
//!
//! let result = RegionSearch::default()
//!     .search(&path, &IdentityTransform, &records)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(result.match_ids(), vec!["inside"]);
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{OptionExt, RegionSearchError, Result};

// Touch gesture state machine
pub mod gesture;
pub use gesture::{
    GestureEvent, GestureEventKind, GestureOutput, GestureState, Path, StrokeSegment,
    TouchPathRecorder,
};

// Surface <-> geographic projection
pub mod projection;
pub use projection::{CoordinateTransformer, IdentityTransform, WebMercatorViewport};

// Polygon construction
pub mod polygon;
pub use polygon::{build_polygon, ClosingEdge, Polygon};

// Point-in-polygon filtering
pub mod spatial;
pub use spatial::PointInPolygonIndex;

// Searchable records and GeoJSON loading
pub mod records;
pub use records::{records_from_geojson, GeoRecord};

// Search orchestration
pub mod search;
pub use search::{RegionSearch, SearchConfig, SearchResult};

// Stateful search engine (singleton for FFI callers)
pub mod engine;
pub use engine::{with_engine, EngineStats, RegionSearchEngine, ENGINE};

// FFI bindings for mobile platforms (iOS/Android)
#[cfg(feature = "ffi")]
pub mod ffi;

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!();

/// Initialize logging for Android (only used in FFI)
#[cfg(all(feature = "ffi", target_os = "android"))]
pub(crate) fn init_logging() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("RegionSearchRust"),
    );
}

#[cfg(all(feature = "ffi", not(target_os = "android")))]
pub(crate) fn init_logging() {
    // No-op on non-Android platforms
}

// ============================================================================
// Core Types
// ============================================================================

/// A point in 2D screen/view space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct SurfacePoint {
    pub x: f64,
    pub y: f64,
}

impl SurfacePoint {
    /// Create a new surface point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A geographic coordinate.
///
/// Longitude is the x axis and latitude the y axis for every planar
/// computation in this crate.
///
/// # Example
/// ```
/// use region_search::GeoCoordinate;
/// let denver = GeoCoordinate::new(-104.981105, 39.74185);
/// assert!(denver.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct GeoCoordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoCoordinate {
    /// Create a new coordinate from longitude and latitude (x, y order).
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Check if the coordinate is finite and within geographic range.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

impl From<GeoCoordinate> for geo::Coord<f64> {
    fn from(c: GeoCoordinate) -> Self {
        geo::Coord {
            x: c.longitude,
            y: c.latitude,
        }
    }
}

/// Axis-aligned geographic bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl GeoBounds {
    /// Create bounds from coordinates.
    pub fn from_coordinates(coords: &[GeoCoordinate]) -> Option<Self> {
        if coords.is_empty() {
            return None;
        }
        let mut min_lng = f64::MAX;
        let mut min_lat = f64::MAX;
        let mut max_lng = f64::MIN;
        let mut max_lat = f64::MIN;

        for c in coords {
            min_lng = min_lng.min(c.longitude);
            min_lat = min_lat.min(c.latitude);
            max_lng = max_lng.max(c.longitude);
            max_lat = max_lat.max(c.latitude);
        }

        Some(Self {
            min_lng,
            min_lat,
            max_lng,
            max_lat,
        })
    }

    /// Inclusive containment test.
    pub fn contains(&self, c: &GeoCoordinate) -> bool {
        c.longitude >= self.min_lng
            && c.longitude <= self.max_lng
            && c.latitude >= self.min_lat
            && c.latitude <= self.max_lat
    }

    /// The same bounds moved east by `delta` degrees of longitude.
    pub fn shift_longitude(&self, delta: f64) -> Self {
        Self {
            min_lng: self.min_lng + delta,
            max_lng: self.max_lng + delta,
            ..*self
        }
    }

    /// Get the center of the bounds.
    pub fn center(&self) -> GeoCoordinate {
        GeoCoordinate::new(
            (self.min_lng + self.max_lng) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
