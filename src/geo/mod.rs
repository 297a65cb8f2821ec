//! Geospatial distance collaborator.
//!
//! Pure function over WGS84 coordinates. The geo-velocity speed limit is
//! calibrated against the ellipsoidal geodesic; swapping in a spherical
//! (haversine) implementation shifts distances by up to ~0.5% and must be
//! treated as a recalibration.

use crate::score::ScoreError;
use geo::{point, GeodesicDistance};

/// Surface distance in kilometers between two WGS84 points (Karney geodesic).
///
/// Rejects non-finite or out-of-range coordinates with `InvalidCoordinate`
/// rather than producing a meaningless distance.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<f64, ScoreError> {
    validate(lat1, lon1)?;
    validate(lat2, lon2)?;

    let a = point!(x: lon1, y: lat1);
    let b = point!(x: lon2, y: lat2);
    Ok(a.geodesic_distance(&b) / 1000.0)
}

fn validate(lat: f64, lon: f64) -> Result<(), ScoreError> {
    let in_range = lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon);
    if in_range {
        Ok(())
    } else {
        Err(ScoreError::InvalidCoordinate { lat, lon })
    }
}
