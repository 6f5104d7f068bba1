//! Capture workflow: GPS fix tracking and blank-record creation.
//!
//! # Invariants
//! - A failed fix stops tracking and keeps a UI-facing error string.
//! - Captured records start `Offline` with a fresh id.

use crate::model::household::Household;
use crate::model::location::{is_valid_coordinate, GeoFix};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Device-location failure classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeolocationError {
    Unsupported,
    PermissionDenied(String),
    PositionUnavailable(String),
    Timeout(String),
}

impl GeolocationError {
    /// Message shown to the field agent.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unsupported => "Geolocation is not supported by this device".to_string(),
            other => format!("GPS Error: {other}"),
        }
    }
}

impl Display for GeolocationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported => write!(f, "geolocation unsupported"),
            Self::PermissionDenied(message)
            | Self::PositionUnavailable(message)
            | Self::Timeout(message) => write!(f, "{message}"),
        }
    }
}

impl Error for GeolocationError {}

/// Tracks the latest device fix while the agent is capturing.
#[derive(Debug, Clone, Default)]
pub struct LocationTracker {
    supported: bool,
    tracking: bool,
    current: Option<GeoFix>,
    last_error: Option<String>,
}

impl LocationTracker {
    pub fn new(supported: bool) -> Self {
        Self {
            supported,
            ..Self::default()
        }
    }

    pub fn start(&mut self) -> Result<(), GeolocationError> {
        if !self.supported {
            let err = GeolocationError::Unsupported;
            self.last_error = Some(err.user_message());
            return Err(err);
        }
        self.tracking = true;
        self.last_error = None;
        debug!("event=gps_tracking module=capture status=start");
        Ok(())
    }

    pub fn stop(&mut self) {
        self.tracking = false;
        debug!("event=gps_tracking module=capture status=stop");
    }

    /// Records a position update; ignored while not tracking or when the
    /// coordinates are not valid WGS84.
    pub fn on_fix(&mut self, fix: GeoFix) -> bool {
        if !self.tracking || !is_valid_coordinate(fix.lat, fix.lng) {
            return false;
        }
        self.current = Some(fix);
        self.last_error = None;
        true
    }

    pub fn on_error(&mut self, err: GeolocationError) {
        warn!("event=gps_tracking module=capture status=error error={err}");
        self.last_error = Some(err.user_message());
        self.tracking = false;
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn current_fix(&self) -> Option<GeoFix> {
        self.current
    }

    pub fn accuracy(&self) -> Option<f64> {
        self.current.and_then(|fix| fix.accuracy)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

/// Builds the blank household for a new capture at `fix`.
pub fn new_household_at(fix: GeoFix, surveyed_by: &str, now: DateTime<Utc>) -> Household {
    Household::blank_at(fix, surveyed_by, now)
}

#[cfg(test)]
mod tests {
    use super::{GeolocationError, LocationTracker};
    use crate::model::location::GeoFix;

    #[test]
    fn fixes_are_ignored_until_tracking_starts() {
        let mut tracker = LocationTracker::new(true);
        assert!(!tracker.on_fix(GeoFix::new(28.6, 77.2)));
        tracker.start().unwrap();
        assert!(tracker.on_fix(GeoFix::new(28.6, 77.2).with_accuracy(12.0)));
        assert_eq!(tracker.accuracy(), Some(12.0));
    }

    #[test]
    fn error_stops_tracking_and_keeps_message() {
        let mut tracker = LocationTracker::new(true);
        tracker.start().unwrap();
        tracker.on_error(GeolocationError::PermissionDenied(
            "User denied Geolocation".to_string(),
        ));
        assert!(!tracker.is_tracking());
        assert_eq!(
            tracker.last_error(),
            Some("GPS Error: User denied Geolocation")
        );
    }

    #[test]
    fn unsupported_platform_cannot_start() {
        let mut tracker = LocationTracker::new(false);
        assert_eq!(tracker.start(), Err(GeolocationError::Unsupported));
        assert!(!tracker.is_tracking());
        assert!(tracker.last_error().is_some());
    }

    #[test]
    fn invalid_coordinates_are_dropped() {
        let mut tracker = LocationTracker::new(true);
        tracker.start().unwrap();
        assert!(!tracker.on_fix(GeoFix::new(f64::NAN, 77.2)));
        assert!(tracker.current_fix().is_none());
    }
}
