//! Equirectangular camera math for the map canvas.

use coveragecore::prelude::GeoPoint;
use coveragecore::record::ViewportBound;

/// Canvas width-to-height ratio the initial camera is shaped for.
const ASPECT: f64 = 1.6;
const MIN_LON_SPAN: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

/// Camera roughly matching a slippy-map zoom level around `center`.
pub fn camera_from_center(center: GeoPoint, zoom: u8) -> ViewportBound {
    let lon_span = (360.0 / 2f64.powi(i32::from(zoom)) * 2.0).max(MIN_LON_SPAN);
    let lat_span = lon_span / ASPECT;
    framed(center.latitude, center.longitude, lat_span, lon_span)
}

pub fn pan(bound: &ViewportBound, direction: Direction) -> ViewportBound {
    let (lat, lon) = bound.center();
    let lat_span = bound.north - bound.south;
    let lon_span = bound.east - bound.west;
    let (lat, lon) = match direction {
        Direction::North => (lat + lat_span / 2.0, lon),
        Direction::South => (lat - lat_span / 2.0, lon),
        Direction::East => (lat, lon + lon_span / 2.0),
        Direction::West => (lat, lon - lon_span / 2.0),
    };
    framed(lat, lon, lat_span, lon_span)
}

/// `factor` < 1 zooms in, > 1 zooms out.
pub fn zoom(bound: &ViewportBound, factor: f64) -> ViewportBound {
    let (lat, lon) = bound.center();
    let lon_span = ((bound.east - bound.west) * factor).clamp(MIN_LON_SPAN, 360.0);
    let lat_span = ((bound.north - bound.south) * factor).clamp(MIN_LON_SPAN / ASPECT, 180.0);
    framed(lat, lon, lat_span, lon_span)
}

/// Canvas coordinates of a position, `None` when it lies outside the camera.
pub fn project(
    bound: &ViewportBound,
    position: GeoPoint,
    width: f32,
    height: f32,
) -> Option<(f32, f32)> {
    if !bound.contains(position.latitude, position.longitude) {
        return None;
    }
    let lon_span = (bound.east - bound.west).max(f64::EPSILON);
    let lat_span = (bound.north - bound.south).max(f64::EPSILON);
    let x = (position.longitude - bound.west) / lon_span * f64::from(width);
    let y = (bound.north - position.latitude) / lat_span * f64::from(height);
    Some((x as f32, y as f32))
}

/// Builds a bound of the given spans around a center, shifted to stay on the globe.
fn framed(lat: f64, lon: f64, lat_span: f64, lon_span: f64) -> ViewportBound {
    let lat_span = lat_span.min(180.0);
    let lon_span = lon_span.min(360.0);
    let south = (lat - lat_span / 2.0).clamp(-90.0, 90.0 - lat_span);
    let west = (lon - lon_span / 2.0).clamp(-180.0, 180.0 - lon_span);
    ViewportBound {
        south,
        north: south + lat_span,
        west,
        east: west + lon_span,
    }
}
