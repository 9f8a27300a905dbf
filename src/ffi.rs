//! FFI bindings for mobile platforms (iOS/Android).
//!
//! This module provides the UniFFI bindings that expose the search engine
//! to Kotlin and Swift. Paths cross the boundary as flat `[x0, y0, x1, y1, ...]`
//! buffers and results come back as JSON, so the platform side never has to
//! mirror the record types.

use log::{debug, info, warn};

use crate::engine::{with_engine, EngineStats};
use crate::{
    init_logging, records_from_geojson, RegionSearch, RegionSearchError, SearchConfig,
    SearchResult, SurfacePoint, WebMercatorViewport,
};

/// Errors raised to Kotlin/Swift callers.
///
/// "No region drawn" is not an error: searches return `None` for it.
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FfiError {
    /// A path point projected outside the valid coordinate range
    #[error("path point {index} projected to an invalid coordinate")]
    InvalidCoordinate { index: u32 },
    /// The record GeoJSON could not be loaded
    #[error("invalid records: {reason}")]
    InvalidRecords { reason: String },
    #[error("internal error: {reason}")]
    Internal { reason: String },
}

impl From<RegionSearchError> for FfiError {
    fn from(err: RegionSearchError) -> Self {
        match err {
            RegionSearchError::InvalidCoordinate { index, .. } => FfiError::InvalidCoordinate {
                index: index as u32,
            },
            RegionSearchError::InvalidGeoJson { message } => {
                FfiError::InvalidRecords { reason: message }
            }
            other => FfiError::Internal {
                reason: other.to_string(),
            },
        }
    }
}

fn result_json(result: crate::Result<Option<SearchResult>>) -> Result<Option<String>, FfiError> {
    match result {
        Ok(Some(result)) => Ok(Some(result.to_json()?)),
        Ok(None) => Ok(None),
        Err(e) => {
            warn!("[RegionSearchRust] Search failed: {}", e);
            Err(e.into())
        }
    }
}

fn path_from_flat(path_xy: &[f64]) -> Vec<SurfacePoint> {
    path_xy
        .chunks_exact(2)
        .map(|chunk| SurfacePoint::new(chunk[0], chunk[1]))
        .collect()
}

// ============================================================================
// Stateless search
// ============================================================================

/// Search a GeoJSON record set with a finished path.
///
/// Returns the result as JSON, or `None` when the path is too short to draw
/// a region.
#[uniffi::export]
pub fn ffi_search_region(
    path_xy: Vec<f64>,
    viewport: WebMercatorViewport,
    records_geojson: String,
) -> Result<Option<String>, FfiError> {
    init_logging();
    let records = match records_from_geojson(&records_geojson) {
        Ok(records) => records,
        Err(e) => {
            warn!("[RegionSearchRust] {}", e);
            return Err(e.into());
        }
    };
    let path = path_from_flat(&path_xy);
    debug!(
        "[RegionSearchRust] ffi_search_region: {} points, {} records",
        path.len(),
        records.len()
    );
    result_json(RegionSearch::default().search(&path, &viewport, &records))
}

// ============================================================================
// Engine
// ============================================================================

/// Initialize the engine (call once at app startup).
#[uniffi::export]
pub fn engine_init() {
    init_logging();
    info!("[RegionSearchEngine] Initialized");
}

/// Clear all engine state.
#[uniffi::export]
pub fn engine_clear() {
    with_engine(|e| e.clear());
    info!("[RegionSearchEngine] Cleared");
}

/// Load records from GeoJSON. Returns the number loaded; on error the
/// previous records are kept.
#[uniffi::export]
pub fn engine_load_records_geojson(geojson: String) -> Result<u32, FfiError> {
    match with_engine(|e| e.load_records_geojson(&geojson)) {
        Ok(count) => Ok(count as u32),
        Err(e) => {
            warn!("[RegionSearchEngine] Failed to load records: {}", e);
            Err(e.into())
        }
    }
}

#[uniffi::export]
pub fn engine_get_record_count() -> u32 {
    with_engine(|e| e.record_count() as u32)
}

#[uniffi::export]
pub fn engine_gesture_start(x: f64, y: f64) {
    with_engine(|e| e.gesture_start(SurfacePoint::new(x, y)));
}

/// Record a drag sample. Returns the segment to draw as
/// `[prev_x, prev_y, x, y]`, or an empty vector when no gesture is active.
#[uniffi::export]
pub fn engine_gesture_point(x: f64, y: f64) -> Vec<f64> {
    with_engine(|e| e.gesture_point(SurfacePoint::new(x, y)))
        .map(|s| vec![s.previous.x, s.previous.y, s.current.x, s.current.y])
        .unwrap_or_default()
}

/// Finish the gesture and search the loaded records in `viewport`.
/// Returns the result JSON, or `None` when no region was drawn.
#[uniffi::export]
pub fn engine_gesture_end(
    x: f64,
    y: f64,
    viewport: WebMercatorViewport,
) -> Result<Option<String>, FfiError> {
    result_json(with_engine(|e| {
        e.gesture_end(SurfacePoint::new(x, y), &viewport)
    }))
}

#[uniffi::export]
pub fn engine_cancel_gesture() {
    with_engine(|e| e.cancel_gesture());
}

#[uniffi::export]
pub fn engine_get_stats() -> EngineStats {
    with_engine(|e| e.stats())
}

#[uniffi::export]
pub fn engine_set_config(config: SearchConfig) {
    with_engine(|e| e.set_config(config));
}
