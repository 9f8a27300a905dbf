//! Surface-space to geographic projection.
//!
//! The map view owns the camera, so the core only sees a
//! [`CoordinateTransformer`] injected at search time. Closures implement the
//! trait directly; [`WebMercatorViewport`] is a concrete viewport for callers
//! (and tests) that don't have a live map view.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::{GeoCoordinate, SurfacePoint};

/// Latitude limit of the square Web Mercator world.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

/// Maps surface points to geographic coordinates for the current viewport.
pub trait CoordinateTransformer {
    fn surface_to_geo(&self, point: SurfacePoint) -> GeoCoordinate;

    /// Inverse mapping, when the collaborator supports it.
    fn geo_to_surface(&self, _coordinate: GeoCoordinate) -> Option<SurfacePoint> {
        None
    }
}

impl<F> CoordinateTransformer for F
where
    F: Fn(SurfacePoint) -> GeoCoordinate,
{
    fn surface_to_geo(&self, point: SurfacePoint) -> GeoCoordinate {
        self(point)
    }
}

/// Treats `x` as longitude and `y` as latitude.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

impl CoordinateTransformer for IdentityTransform {
    fn surface_to_geo(&self, point: SurfacePoint) -> GeoCoordinate {
        GeoCoordinate::new(point.x, point.y)
    }

    fn geo_to_surface(&self, coordinate: GeoCoordinate) -> Option<SurfacePoint> {
        Some(SurfacePoint::new(coordinate.longitude, coordinate.latitude))
    }
}

/// A Web Mercator map viewport.
///
/// Surface origin is the top-left corner, `y` grows downwards, and the
/// viewport center maps to `center`. Longitudes are wrapped into
/// [-180, 180], so a path dragged across the antimeridian jumps from +180 to
/// -180; [`RegionSearch`](crate::RegionSearch) unwraps such jumps before
/// building the polygon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct WebMercatorViewport {
    /// Coordinate at the middle of the surface
    pub center: GeoCoordinate,
    /// Zoom level (fractional zooms allowed)
    pub zoom: f64,
    /// Surface width in points
    pub width: f64,
    /// Surface height in points
    pub height: f64,
    /// World size in points at zoom 0. Default: 512 (vector tiles)
    pub tile_size: f64,
}

impl Default for WebMercatorViewport {
    fn default() -> Self {
        Self {
            center: GeoCoordinate::new(0.0, 0.0),
            zoom: 0.0,
            width: 512.0,
            height: 512.0,
            tile_size: 512.0,
        }
    }
}

impl WebMercatorViewport {
    pub fn new(center: GeoCoordinate, zoom: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom,
            width,
            height,
            ..Self::default()
        }
    }

    fn world_size(&self) -> f64 {
        self.tile_size * 2f64.powf(self.zoom)
    }

    /// Project a coordinate to absolute world pixels.
    fn project(&self, c: GeoCoordinate) -> (f64, f64) {
        let world = self.world_size();
        let lat = c
            .latitude
            .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE)
            .to_radians();
        let x = (c.longitude + 180.0) / 360.0 * world;
        let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * world;
        (x, y)
    }

    fn unproject(&self, x: f64, y: f64) -> GeoCoordinate {
        let world = self.world_size();
        let lng = x / world * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * y / world)).sinh().atan().to_degrees();
        GeoCoordinate::new(wrap_longitude(lng), lat)
    }
}

impl CoordinateTransformer for WebMercatorViewport {
    fn surface_to_geo(&self, point: SurfacePoint) -> GeoCoordinate {
        let (cx, cy) = self.project(self.center);
        self.unproject(
            cx + point.x - self.width / 2.0,
            cy + point.y - self.height / 2.0,
        )
    }

    fn geo_to_surface(&self, coordinate: GeoCoordinate) -> Option<SurfacePoint> {
        if !coordinate.is_valid() {
            return None;
        }
        let (cx, cy) = self.project(self.center);
        let (x, y) = self.project(coordinate);
        Some(SurfacePoint::new(
            x - cx + self.width / 2.0,
            y - cy + self.height / 2.0,
        ))
    }
}

/// Wrap a longitude into [-180, 180].
fn wrap_longitude(lng: f64) -> f64 {
    if (-180.0..=180.0).contains(&lng) {
        lng
    } else {
        (lng + 180.0).rem_euclid(360.0) - 180.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn denver_viewport() -> WebMercatorViewport {
        WebMercatorViewport::new(GeoCoordinate::new(-104.981105, 39.74185), 10.0, 375.0, 667.0)
    }

    #[test]
    fn test_identity() {
        let c = IdentityTransform.surface_to_geo(SurfacePoint::new(3.0, 4.0));
        assert_eq!(c, GeoCoordinate::new(3.0, 4.0));
    }

    #[test]
    fn test_closure_transformer() {
        let shift = |p: SurfacePoint| GeoCoordinate::new(p.x + 1.0, p.y - 1.0);
        let c = shift.surface_to_geo(SurfacePoint::new(0.0, 0.0));
        assert_eq!(c, GeoCoordinate::new(1.0, -1.0));
        assert!(shift.geo_to_surface(c).is_none());
    }

    #[test]
    fn test_viewport_center_maps_to_center() {
        let vp = denver_viewport();
        let c = vp.surface_to_geo(SurfacePoint::new(vp.width / 2.0, vp.height / 2.0));
        assert!((c.longitude - vp.center.longitude).abs() < EPS);
        assert!((c.latitude - vp.center.latitude).abs() < EPS);
    }

    #[test]
    fn test_viewport_orientation() {
        let vp = denver_viewport();
        let top_left = vp.surface_to_geo(SurfacePoint::new(0.0, 0.0));
        let bottom_right = vp.surface_to_geo(SurfacePoint::new(vp.width, vp.height));
        // y grows downwards on screen, latitude grows upwards
        assert!(top_left.latitude > bottom_right.latitude);
        assert!(top_left.longitude < bottom_right.longitude);
    }

    #[test]
    fn test_viewport_round_trip() {
        let vp = denver_viewport();
        let point = SurfacePoint::new(42.0, 600.0);
        let geo = vp.surface_to_geo(point);
        let back = vp.geo_to_surface(geo).unwrap();
        assert!((back.x - point.x).abs() < 1e-6);
        assert!((back.y - point.y).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_zero_world_edges() {
        let vp = WebMercatorViewport::default();
        let left = vp.surface_to_geo(SurfacePoint::new(0.0, 256.0));
        assert!((left.longitude + 180.0).abs() < EPS);
        assert!(left.latitude.abs() < EPS);
        let top = vp.surface_to_geo(SurfacePoint::new(256.0, 0.0));
        assert!((top.latitude - MAX_MERCATOR_LATITUDE).abs() < 1e-6);
    }

    #[test]
    fn test_nan_propagates() {
        let vp = denver_viewport();
        let c = vp.surface_to_geo(SurfacePoint::new(f64::NAN, 0.0));
        assert!(!c.is_valid());
        assert!(vp.geo_to_surface(GeoCoordinate::new(f64::NAN, 0.0)).is_none());
    }

    #[test]
    fn test_wrap_longitude() {
        assert_eq!(wrap_longitude(10.0), 10.0);
        assert!((wrap_longitude(190.0) + 170.0).abs() < EPS);
        assert!((wrap_longitude(-190.0) - 170.0).abs() < EPS);
    }
}
