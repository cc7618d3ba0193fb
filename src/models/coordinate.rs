use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// A (latitude, longitude) pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build a coordinate, rejecting values outside the valid ranges.
    pub fn checked(latitude: f64, longitude: f64) -> AppResult<Self> {
        let c = Self::new(latitude, longitude);
        if c.is_valid() {
            Ok(c)
        } else {
            Err(AppError::InvalidCoordinate(format!(
                "({latitude}, {longitude}) is outside [-90,90] x [-180,180]"
            )))
        }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}
