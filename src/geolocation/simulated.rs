//! Simulated geolocation host used by the command-line driver

use crate::core::Position;
use crate::geolocation::{
    GeoError, GeoReading, GeolocationProvider, PositionFuture, PositionOptions,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Answers every request with a jittered reading around a fixed home location
pub struct SimulatedGeolocation {
    home: Position,
    /// Maximum jitter applied to the home location (degrees)
    jitter_deg: f64,
    /// Accuracy range reported by the host (meters)
    accuracy_range_m: (f64, f64),
    latency: Duration,
    deny_permission: bool,
    rng: Arc<Mutex<StdRng>>,
}

impl SimulatedGeolocation {
    pub fn new(home: Position) -> Self {
        Self {
            home,
            jitter_deg: 0.0002,
            accuracy_range_m: (5.0, 50.0),
            latency: Duration::from_millis(400),
            deny_permission: false,
            rng: Arc::new(Mutex::new(StdRng::from_entropy())),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Arc::new(Mutex::new(StdRng::seed_from_u64(seed)));
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_accuracy_range(mut self, min_m: f64, max_m: f64) -> Self {
        let min_m = min_m.max(0.0);
        self.accuracy_range_m = (min_m, max_m.max(min_m));
        self
    }

    /// Simulate a user who refuses the permission prompt
    pub fn denying_permission(mut self) -> Self {
        self.deny_permission = true;
        self
    }

    fn sample_reading(&self, high_accuracy: bool) -> GeoReading {
        let mut guard = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let rng: &mut StdRng = &mut guard;

        let jitter = |rng: &mut StdRng, width: f64| {
            if width > 0.0 {
                rng.gen_range(-width..width)
            } else {
                0.0
            }
        };
        let lat = self.home.lat + jitter(&mut *rng, self.jitter_deg);
        let lon = self.home.lon + jitter(&mut *rng, self.jitter_deg);

        let (min_m, mut max_m) = self.accuracy_range_m;
        if high_accuracy {
            max_m = min_m + (max_m - min_m) / 2.0;
        }
        let accuracy_m = if max_m > min_m {
            rng.gen_range(min_m..max_m)
        } else {
            min_m
        };

        GeoReading::new(lat, lon, accuracy_m)
    }
}

impl GeolocationProvider for SimulatedGeolocation {
    fn is_available(&self) -> bool {
        true
    }

    fn current_position(&self, options: &PositionOptions) -> PositionFuture {
        let latency = self.latency;
        let timeout = options.timeout_ms.map(Duration::from_millis);

        if self.deny_permission {
            return Box::pin(async move {
                tokio::time::sleep(latency).await;
                Err::<GeoReading, _>(GeoError::permission_denied())
            });
        }

        let reading = self.sample_reading(options.enable_high_accuracy);
        Box::pin(async move {
            match timeout {
                Some(limit) if limit < latency => {
                    tokio::time::sleep(limit).await;
                    Err(GeoError::timeout())
                }
                _ => {
                    tokio::time::sleep(latency).await;
                    Ok(reading.stamped_now())
                }
            }
        })
    }
}
