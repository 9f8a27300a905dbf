//! # Region Search Engine
//!
//! Stateful holder for everything a map screen needs between touch events:
//! the searchable records, the gesture recorder and the search
//! configuration. Mobile code drives it through thin FFI calls, so record
//! sets are loaded once instead of crossing the boundary on every search.

use std::sync::Mutex;

use log::info;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::gesture::{GestureState, StrokeSegment, TouchPathRecorder};
use crate::projection::CoordinateTransformer;
use crate::records::{records_from_geojson, GeoRecord};
use crate::search::{RegionSearch, SearchConfig, SearchResult};
use crate::SurfacePoint;

/// The main stateful search engine.
#[derive(Debug, Default)]
pub struct RegionSearchEngine {
    records: Vec<GeoRecord>,
    recorder: TouchPathRecorder,
    search: RegionSearch,
    searches_run: u64,
}

impl RegionSearchEngine {
    /// Create a new engine with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new engine with custom configuration.
    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            search: RegionSearch::new(config),
            ..Self::default()
        }
    }

    // ========================================================================
    // Records
    // ========================================================================

    /// Replace the searchable record set.
    pub fn set_records(&mut self, records: Vec<GeoRecord>) {
        info!("[RegionSearchEngine] Loaded {} records", records.len());
        self.records = records;
    }

    /// Replace the record set from a GeoJSON `FeatureCollection`.
    ///
    /// On error the current records are kept.
    pub fn load_records_geojson(&mut self, geojson: &str) -> Result<usize> {
        let records = records_from_geojson(geojson)?;
        let count = records.len();
        self.set_records(records);
        Ok(count)
    }

    pub fn records(&self) -> &[GeoRecord] {
        &self.records
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Drop all records and any gesture in progress.
    pub fn clear(&mut self) {
        self.records.clear();
        self.recorder.cancel();
    }

    // ========================================================================
    // Gestures
    // ========================================================================

    pub fn gesture_start(&mut self, point: SurfacePoint) {
        self.recorder.on_gesture_start(point);
    }

    pub fn gesture_point(&mut self, point: SurfacePoint) -> Option<StrokeSegment> {
        self.recorder.on_gesture_point(point)
    }

    /// Finish the gesture and search the loaded records.
    ///
    /// `Ok(None)` if no gesture was in progress or the path was too short to
    /// enclose a region.
    pub fn gesture_end<T>(
        &mut self,
        point: SurfacePoint,
        transformer: &T,
    ) -> Result<Option<SearchResult>>
    where
        T: CoordinateTransformer + ?Sized,
    {
        let Some(path) = self.recorder.on_gesture_end(point) else {
            return Ok(None);
        };
        self.searches_run += 1;
        self.search.search(&path, transformer, &self.records)
    }

    pub fn cancel_gesture(&mut self) {
        self.recorder.cancel();
    }

    pub fn gesture_state(&self) -> GestureState {
        self.recorder.state()
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    pub fn set_config(&mut self, config: SearchConfig) {
        self.search = RegionSearch::new(config);
    }

    pub fn config(&self) -> &SearchConfig {
        self.search.config()
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            record_count: self.records.len() as u32,
            path_points: self.recorder.points().len() as u32,
            capturing: self.recorder.state() == GestureState::Capturing,
            searches_run: self.searches_run,
        }
    }
}

/// Engine statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct EngineStats {
    pub record_count: u32,
    pub path_points: u32,
    pub capturing: bool,
    pub searches_run: u64,
}

// ============================================================================
// Global Singleton
// ============================================================================

/// Global engine instance.
///
/// This singleton allows FFI calls to access a shared engine without
/// passing state back and forth across the FFI boundary.
pub static ENGINE: Lazy<Mutex<RegionSearchEngine>> =
    Lazy::new(|| Mutex::new(RegionSearchEngine::new()));

/// Get a lock on the global engine.
pub fn with_engine<F, R>(f: F) -> R
where
    F: FnOnce(&mut RegionSearchEngine) -> R,
{
    let mut engine = ENGINE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut engine)
}

// ============================================================================
// Tests
// ============================================================================
