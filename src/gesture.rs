//! Touch gesture capture.
//!
//! `TouchPathRecorder` turns a press-drag-release event stream into one
//! finished [`Path`] per gesture. A new press always resets the path, so
//! nothing leaks from one gesture into the next.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::SurfacePoint;

/// Ordered surface-space points of one gesture, in event order.
pub type Path = Vec<SurfacePoint>;

/// Recorder state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureState {
    Idle,
    Capturing,
}

/// Incremental stroke segment to draw after a move event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeSegment {
    pub previous: SurfacePoint,
    pub current: SurfacePoint,
}

/// Kind of a raw touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureEventKind {
    Start,
    Move,
    End,
}

/// A raw touch event from the platform input layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    pub kind: GestureEventKind,
    pub point: SurfacePoint,
}

impl GestureEvent {
    pub fn new(kind: GestureEventKind, point: SurfacePoint) -> Self {
        Self { kind, point }
    }
}

/// What the recorder produced for a single event.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutput {
    /// Nothing to do (start events, or misuse while idle)
    None,
    /// A new segment to draw
    Segment(StrokeSegment),
    /// The gesture finished with this path
    Finished(Path),
}

/// Three-event state machine accumulating a touch path.
///
/// Must be driven from a single event stream. Out-of-order `point`/`end`
/// calls while idle are ignored.
///
/// # Example
/// ```
/// use region_search::{SurfacePoint, TouchPathRecorder};
///
/// let mut recorder = TouchPathRecorder::new();
/// recorder.on_gesture_start(SurfacePoint::new(0.0, 0.0));
/// let segment = recorder.on_gesture_point(SurfacePoint::new(4.0, 2.0)).unwrap();
/// assert_eq!(segment.previous, SurfacePoint::new(0.0, 0.0));
/// let path = recorder.on_gesture_end(SurfacePoint::new(5.0, 5.0)).unwrap();
/// assert_eq!(path.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct TouchPathRecorder {
    state: GestureState,
    path: Path,
}

impl TouchPathRecorder {
    pub fn new() -> Self {
        Self {
            state: GestureState::Idle,
            path: Vec::new(),
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Points recorded so far in the current gesture.
    pub fn points(&self) -> &[SurfacePoint] {
        &self.path
    }

    /// Begin a gesture, discarding any path in progress.
    pub fn on_gesture_start(&mut self, point: SurfacePoint) {
        if self.state == GestureState::Capturing {
            debug!(
                "[Gesture] Restarted while capturing, discarding {} points",
                self.path.len()
            );
        }
        self.path.clear();
        self.path.push(point);
        self.state = GestureState::Capturing;
    }

    /// Append a drag sample and return the segment to draw.
    pub fn on_gesture_point(&mut self, point: SurfacePoint) -> Option<StrokeSegment> {
        if self.state != GestureState::Capturing {
            debug!("[Gesture] Move event while idle, ignoring");
            return None;
        }
        let previous = *self.path.last()?;
        self.path.push(point);
        Some(StrokeSegment {
            previous,
            current: point,
        })
    }

    /// Append the release point and hand back the finished path.
    pub fn on_gesture_end(&mut self, point: SurfacePoint) -> Option<Path> {
        if self.state != GestureState::Capturing {
            debug!("[Gesture] End event while idle, ignoring");
            return None;
        }
        self.path.push(point);
        self.state = GestureState::Idle;
        Some(std::mem::take(&mut self.path))
    }

    /// Abandon the gesture in progress.
    pub fn cancel(&mut self) {
        self.path.clear();
        self.state = GestureState::Idle;
    }

    /// Dispatch a raw event to the matching transition.
    pub fn handle(&mut self, event: GestureEvent) -> GestureOutput {
        match event.kind {
            GestureEventKind::Start => {
                self.on_gesture_start(event.point);
                GestureOutput::None
            }
            GestureEventKind::Move => self
                .on_gesture_point(event.point)
                .map_or(GestureOutput::None, GestureOutput::Segment),
            GestureEventKind::End => self
                .on_gesture_end(event.point)
                .map_or(GestureOutput::None, GestureOutput::Finished),
        }
    }
}

impl Default for TouchPathRecorder {
    fn default() -> Self {
        Self::new()
    }
}
