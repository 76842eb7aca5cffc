//! Geolocation capability trait and request options

use crate::geolocation::{GeoReading, GeoResult};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// One-shot position lookup in flight
pub type PositionFuture = Pin<Box<dyn Future<Output = GeoResult<GeoReading>> + Send + 'static>>;

/// Host-provided geolocation capability
pub trait GeolocationProvider {
    /// Whether the host exposes a geolocation capability at all
    fn is_available(&self) -> bool;

    /// Issue a single request for the current position.
    /// The returned future resolves exactly once, or never if the host never answers.
    fn current_position(&self, options: &PositionOptions) -> PositionFuture;
}

impl<P: GeolocationProvider + ?Sized> GeolocationProvider for Box<P> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn current_position(&self, options: &PositionOptions) -> PositionFuture {
        (**self).current_position(options)
    }
}

/// Options forwarded to the host with each request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionOptions {
    /// Ask the host for its most accurate source
    pub enable_high_accuracy: bool,
    /// Host-side timeout; `None` waits indefinitely
    pub timeout_ms: Option<u64>,
    /// Accept a cached reading up to this age
    pub maximum_age_ms: u64,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout_ms: Some(10_000),
            maximum_age_ms: 0,
        }
    }
}
