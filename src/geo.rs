//! Geofence evaluation: geodesic distance on the WGS-84 ellipsoid and the
//! inclusive radius check.
//!
//! Distances use Vincenty's inverse formula, which agrees with Karney's
//! geodesic solution to well under a millimetre for the short ranges a
//! geofence deals with. For nearly antipodal points where the iteration
//! does not converge, a spherical haversine distance is returned instead.

use crate::models::Coordinate;

/// WGS-84 semi-major axis (m).
const WGS84_A: f64 = 6_378_137.0;
/// WGS-84 flattening.
const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// IUGG mean Earth radius (m), used by the haversine fallback.
const MEAN_EARTH_RADIUS: f64 = 6_371_008.8;

const MAX_ITERATIONS: usize = 200;
const CONVERGENCE: f64 = 1e-12;

/// Distance in meters between two valid coordinates. Always `>= 0`.
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    vincenty_inverse(a, b).unwrap_or_else(|| haversine(a, b))
}

/// Inclusive boundary: a distance equal to the threshold passes.
pub fn within_radius(distance: f64, threshold: f64) -> bool {
    distance <= threshold
}

/// Result of checking one reported position against the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeofenceCheck {
    pub distance: f64,
    pub threshold: f64,
    pub passed: bool,
}

pub fn evaluate(position: Coordinate, target: Coordinate, threshold: f64) -> GeofenceCheck {
    let distance = distance_meters(position, target);
    GeofenceCheck {
        distance,
        threshold,
        passed: within_radius(distance, threshold),
    }
}

fn vincenty_inverse(p1: Coordinate, p2: Coordinate) -> Option<f64> {
    let b = (1.0 - WGS84_F) * WGS84_A;

    let l = (p2.longitude - p1.longitude).to_radians();
    let u1 = ((1.0 - WGS84_F) * p1.latitude.to_radians().tan()).atan();
    let u2 = ((1.0 - WGS84_F) * p2.latitude.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    let mut converged = false;

    let (mut sin_sigma, mut cos_sigma, mut sigma) = (0.0_f64, 0.0_f64, 0.0_f64);
    let (mut cos_sq_alpha, mut cos_2sigma_m) = (0.0_f64, 0.0_f64);

    for _ in 0..MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();

        sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        if sin_sigma == 0.0 {
            // coincident points
            return Some(0.0);
        }

        cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        sigma = sin_sigma.atan2(cos_sigma);

        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;

        // equatorial line: cos_sq_alpha = 0
        cos_2sigma_m = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            0.0
        };

        let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));
        let previous = lambda;
        lambda = l
            + (1.0 - c)
                * WGS84_F
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));

        if (lambda - previous).abs() < CONVERGENCE {
            converged = true;
            break;
        }
    }

    if !converged {
        return None;
    }

    let u_sq = cos_sq_alpha * (WGS84_A.powi(2) - b.powi(2)) / b.powi(2);
    let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
    let delta_sigma = big_b
        * sin_sigma
        * (cos_2sigma_m
            + big_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))
                    - big_b / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma.powi(2))
                        * (-3.0 + 4.0 * cos_2sigma_m.powi(2))));

    Some((b * big_a * (sigma - delta_sigma)).max(0.0))
}

fn haversine(p1: Coordinate, p2: Coordinate) -> f64 {
    let phi1 = p1.latitude.to_radians();
    let phi2 = p2.latitude.to_radians();
    let d_phi = (p2.latitude - p1.latitude).to_radians();
    let d_lambda = (p2.longitude - p1.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * MEAN_EARTH_RADIUS * h.sqrt().min(1.0).asin()
}
