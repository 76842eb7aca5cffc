//! Core data types for the asset tracker

use serde::{Deserialize, Serialize};

/// Geodetic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True when latitude and longitude are inside the WGS84 ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// The user's own position as reported by the host, with its accuracy radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserPosition {
    pub position: Position,
    /// Accuracy radius in meters
    pub accuracy_m: f64,
}

impl UserPosition {
    pub fn new(lat: f64, lon: f64, accuracy_m: f64) -> Self {
        Self {
            position: Position::new(lat, lon),
            accuracy_m: accuracy_m.max(0.0),
        }
    }
}

/// Category of the status message, drives presentation styling only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Normal,
    Loading,
    Success,
    Error,
}

impl StatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Normal => "normal",
            StatusKind::Loading => "loading",
            StatusKind::Success => "success",
            StatusKind::Error => "error",
        }
    }
}

/// Current user-facing message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub message: String,
    pub kind: StatusKind,
}

impl Status {
    pub fn new(message: impl Into<String>, kind: StatusKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    pub fn normal(message: impl Into<String>) -> Self {
        Self::new(message, StatusKind::Normal)
    }

    pub fn loading(message: impl Into<String>) -> Self {
        Self::new(message, StatusKind::Loading)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, StatusKind::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, StatusKind::Error)
    }
}
