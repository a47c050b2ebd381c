//! Pure geofence evaluation: great-circle distance between GPS coordinates
//! and on-premises classification against the configured office location.

use serde::Serialize;
use utoipa::ToSchema;

use crate::config::OfficeLocation;

/// Mean Earth radius in meters, as used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Verdict of a geofence check for a single coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeofenceCheck {
    /// True when the point is within the configured radius (inclusive).
    pub is_within_geofence: bool,
    /// Distance from the office, rounded to the nearest meter for display.
    /// The within/without comparison uses the unrounded distance.
    #[schema(example = 42)]
    pub distance_from_office: i64,
}

/// Great-circle distance in meters between two coordinates, via the
/// haversine formula. Deterministic, no I/O. The `atan2(sqrt(a), sqrt(1-a))`
/// form is well-defined at zero separation, so identical points yield
/// exactly 0 rather than dividing by zero.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin() * (d_phi / 2.0).sin()
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin() * (d_lambda / 2.0).sin();
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Classifies a reported coordinate against the office geofence.
pub fn classify(office: &OfficeLocation, latitude: f64, longitude: f64) -> GeofenceCheck {
    let distance = haversine_distance(latitude, longitude, office.latitude, office.longitude);

    GeofenceCheck {
        is_within_geofence: distance <= office.geofence_radius_m,
        distance_from_office: distance.round() as i64,
    }
}
