//! Simulated IoT Asset Tracker
//!
//! A map view of a remote device whose position is simulated by bounded random
//! drift, with an optional overlay of the user's own location as reported by a
//! host geolocation capability.

pub mod core;
pub mod geolocation;
pub mod map;
pub mod tracker;
pub mod utils;

// Re-export commonly used types
pub use core::{Position, Status, StatusKind, UserPosition};
pub use geolocation::{GeoError, GeoReading, GeolocationProvider, PositionOptions};
pub use map::{MapScene, MapSurface};
pub use tracker::{TrackerEvent, TrackerView};
pub use utils::{ConfigurationManager, TrackerConfig};
