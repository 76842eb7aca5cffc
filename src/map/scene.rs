//! Declarative description of what the map shows

use crate::core::{Position, StatusKind};
use crate::map::MapCamera;
use serde::{Deserialize, Serialize};

/// Everything needed to draw one frame of the tracker page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapScene {
    pub title: String,
    pub camera: MapCamera,
    pub tiles: TileLayer,
    pub marker: Marker,
    /// Present only when the user has been located
    pub accuracy_circle: Option<Circle>,
    pub status: StatusBanner,
    pub actions: Vec<ActionButton>,
}

/// Templated tile source and its required attribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub title: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerIcon {
    pub url: String,
    pub size_px: [u32; 2],
}

impl Default for MarkerIcon {
    fn default() -> Self {
        Self {
            url: "https://unpkg.com/leaflet@1.9.4/dist/images/marker-icon.png".to_string(),
            size_px: [25, 41],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub position: Position,
    pub icon: MarkerIcon,
    pub popup: Popup,
}

/// Stroke and fill of the accuracy circle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleStyle {
    pub color: String,
    pub fill_color: String,
    pub fill_opacity: f64,
}

impl Default for CircleStyle {
    fn default() -> Self {
        Self {
            color: "#2563eb".to_string(),
            fill_color: "#3b82f6".to_string(),
            fill_opacity: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Position,
    pub radius_m: f64,
    pub style: CircleStyle,
    pub popup: Popup,
}

/// Status text with its styling class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusBanner {
    pub message: String,
    pub kind: StatusKind,
    pub css_class: String,
}

impl StatusBanner {
    pub fn new(message: impl Into<String>, kind: StatusKind) -> Self {
        Self {
            message: message.into(),
            kind,
            css_class: format!("status status-{}", kind.as_str()),
        }
    }
}

/// A user-triggered action shown next to the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionButton {
    /// Command name understood by the driver
    pub command: String,
    pub label: String,
}

impl ActionButton {
    pub fn new(command: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            label: label.into(),
        }
    }
}
