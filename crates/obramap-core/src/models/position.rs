//! Geographic coordinates and live position samples.

use serde::{Deserialize, Serialize};

/// A geographic coordinate with latitude and longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns true if the coordinate has valid values.
    pub fn is_valid(&self) -> bool {
        self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    /// Converts degrees to radians for distance calculations.
    pub fn to_radians(&self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

/// One fix from the platform's location source.
///
/// Transient: only the most recent sample matters for proximity
/// evaluation, no history is retained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub latitude: f64,
    pub longitude: f64,
    /// Altitude in meters, when the platform provides one.
    pub altitude: Option<f64>,
    /// Reported accuracy radius in meters.
    pub accuracy: f64,
}

impl PositionSample {
    pub fn new(latitude: f64, longitude: f64, accuracy: f64) -> Self {
        Self { latitude, longitude, altitude: None, accuracy }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(0.0, 0.0).is_valid());
        assert!(Coordinate::new(-90.0, 180.0).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -181.0).is_valid());
    }

    #[test]
    fn test_sample_coordinate() {
        let sample = PositionSample::new(-8.0476, -34.877, 12.0);
        let coord = sample.coordinate();
        assert_eq!(coord.latitude, -8.0476);
        assert_eq!(coord.longitude, -34.877);
    }
}
