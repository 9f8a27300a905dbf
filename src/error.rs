//! Unified error handling for the region-search library.
//!
//! The core is pure geometry, so the taxonomy is narrow: degenerate input
//! that callers asked to build anyway, coordinates the projection could not
//! produce, and malformed record sources.

use thiserror::Error;

/// Unified error type for region-search operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegionSearchError {
    /// Too few points to build the requested geometry
    #[error("{what} has {point_count} points, minimum {minimum_required} required")]
    InsufficientPoints {
        what: &'static str,
        point_count: usize,
        minimum_required: usize,
    },
    /// The coordinate transformer produced an unusable coordinate
    #[error("path point {index} projected to invalid coordinate ({longitude}, {latitude})")]
    InvalidCoordinate {
        index: usize,
        longitude: f64,
        latitude: f64,
    },
    /// Record source could not be parsed
    #[error("Invalid GeoJSON: {message}")]
    InvalidGeoJson { message: String },
    /// Serialization of a result failed
    #[error("Serialization error: {message}")]
    Serialization { message: String },
    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<serde_json::Error> for RegionSearchError {
    fn from(err: serde_json::Error) -> Self {
        RegionSearchError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Result type alias for region-search operations.
pub type Result<T> = std::result::Result<T, RegionSearchError>;

/// Extension trait for converting Option to RegionSearchError.
pub trait OptionExt<T> {
    /// Convert Option to Result with insufficient points error.
    fn ok_or_insufficient_points(
        self,
        what: &'static str,
        point_count: usize,
        minimum: usize,
    ) -> Result<T>;

    /// Convert Option to Result with generic internal error.
    fn ok_or_internal(self, message: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_insufficient_points(
        self,
        what: &'static str,
        point_count: usize,
        minimum: usize,
    ) -> Result<T> {
        self.ok_or(RegionSearchError::InsufficientPoints {
            what,
            point_count,
            minimum_required: minimum,
        })
    }

    fn ok_or_internal(self, message: &str) -> Result<T> {
        self.ok_or_else(|| RegionSearchError::Internal {
            message: message.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RegionSearchError::InsufficientPoints {
            what: "polygon input",
            point_count: 1,
            minimum_required: 2,
        };
        assert!(err.to_string().contains("polygon input"));
        assert!(err.to_string().contains("1 points"));
    }

    #[test]
    fn test_invalid_coordinate_display() {
        let err = RegionSearchError::InvalidCoordinate {
            index: 3,
            longitude: f64::NAN,
            latitude: 0.0,
        };
        assert!(err.to_string().contains("path point 3"));
    }

    #[test]
    fn test_option_ext() {
        let none: Option<i32> = None;
        let result = none.ok_or_insufficient_points("ring", 0, 2);
        assert!(matches!(
            result,
            Err(RegionSearchError::InsufficientPoints { .. })
        ));

        let some = Some(5).ok_or_internal("unreachable");
        assert_eq!(some, Ok(5));
    }

    #[test]
    fn test_from_serde_error() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let converted: RegionSearchError = err.into();
        assert!(matches!(converted, RegionSearchError::Serialization { .. }));
    }
}
