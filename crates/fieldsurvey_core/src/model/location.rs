//! Geographic value types (WGS84 degrees).

use serde::{Deserialize, Serialize};

/// One device location report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoFix {
    pub lat: f64,
    pub lng: f64,
    /// Horizontal accuracy radius in meters, as reported by the device.
    pub accuracy: Option<f64>,
}

impl GeoFix {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            accuracy: None,
        }
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }
}

/// Visible map viewport reported by the mapping surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl MapBounds {
    /// Inclusive containment on both axes.
    ///
    /// Viewports crossing the antimeridian are not handled; `west <= east`
    /// is assumed.
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.south && lat <= self.north && lng >= self.west && lng <= self.east
    }
}

/// Returns whether `lat`/`lng` are finite and inside WGS84 ranges.
pub fn is_valid_coordinate(lat: f64, lng: f64) -> bool {
    lat.is_finite()
        && lng.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lng)
}

#[cfg(test)]
mod tests {
    use super::{is_valid_coordinate, MapBounds};

    #[test]
    fn bounds_are_inclusive() {
        let bounds = MapBounds {
            north: 29.0,
            south: 28.0,
            east: 78.0,
            west: 77.0,
        };
        assert!(bounds.contains(28.0, 77.0));
        assert!(bounds.contains(29.0, 78.0));
        assert!(!bounds.contains(29.0001, 77.5));
        assert!(!bounds.contains(28.5, 76.9999));
    }

    #[test]
    fn coordinate_validation_rejects_nan_and_out_of_range() {
        assert!(is_valid_coordinate(28.6139, 77.209));
        assert!(!is_valid_coordinate(f64::NAN, 0.0));
        assert!(!is_valid_coordinate(91.0, 0.0));
        assert!(!is_valid_coordinate(0.0, -180.5));
    }
}
