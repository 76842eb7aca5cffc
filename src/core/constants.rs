/// Seed position of the simulated device (Bengaluru)
pub const DEFAULT_SEED_LAT: f64 = 12.9716;
pub const DEFAULT_SEED_LON: f64 = 77.5946;

pub const DEFAULT_ZOOM: f64 = 13.0;
pub const MAX_ZOOM: f64 = 22.0;

/// Half-width of the uniform refresh drift, roughly 110 m of latitude
pub const DEFAULT_DRIFT_DEG: f64 = 0.001;

pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const DEFAULT_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

pub const MSG_READY: &str = "Tracker online. Press Refresh to ping the device.";
pub const MSG_REFRESHED: &str = "Tracker position refreshed.";
pub const MSG_LOCATING: &str = "Requesting your location...";
pub const MSG_UNSUPPORTED: &str = "Geolocation is not supported by this browser.";
