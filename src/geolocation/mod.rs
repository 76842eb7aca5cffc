//! Host geolocation capability
//!
//! Abstracts the environment's "get current position once" service so the
//! tracker view can run against a real host, a simulation or a scripted mock.

pub mod provider;
pub mod mock;
pub mod simulated;
pub mod error;

pub use provider::{GeolocationProvider, PositionFuture, PositionOptions};
pub use mock::{MockGeolocation, MockResponse};
pub use simulated::SimulatedGeolocation;
pub use error::{FailureCode, GeoError, GeoResult};

use crate::core::UserPosition;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Successful reading returned by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoReading {
    pub lat: f64,
    pub lon: f64,
    /// Accuracy radius in meters
    pub accuracy_m: f64,
    pub timestamp_ms: u64,
}

impl GeoReading {
    pub fn new(lat: f64, lon: f64, accuracy_m: f64) -> Self {
        Self {
            lat,
            lon,
            accuracy_m,
            timestamp_ms: 0,
        }
    }

    pub fn with_timestamp(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    /// Stamp the reading with the current wall clock
    pub fn stamped_now(self) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.with_timestamp(now)
    }
}

impl From<GeoReading> for UserPosition {
    fn from(reading: GeoReading) -> Self {
        UserPosition::new(reading.lat, reading.lon, reading.accuracy_m)
    }
}
