//! Status messages, popup contents and scene text output

use crate::core::{Position, UserPosition};
use crate::geolocation::{GeoError, GeoReading};
use crate::map::{MapScene, Popup};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Status text after a successful lookup, coordinates at 4 decimals
pub fn located_message(reading: &GeoReading) -> String {
    format!("Location found: {:.4}, {:.4}", reading.lat, reading.lon)
}

/// Status text after a failed lookup, embeds the host's description
pub fn locate_failed_message(error: &GeoError) -> String {
    format!("Unable to retrieve your location: {}", error)
}

/// Device marker popup, coordinates at 5 decimals
pub fn device_popup(device_name: &str, position: &Position) -> Popup {
    Popup {
        title: device_name.to_string(),
        lines: vec![
            "Signal: online (simulated)".to_string(),
            format!("Lat: {:.5}", position.lat),
            format!("Lng: {:.5}", position.lon),
        ],
    }
}

pub fn user_popup(user: &UserPosition) -> Popup {
    Popup {
        title: "You are here".to_string(),
        lines: vec![
            format!("Lat: {:.5}", user.position.lat),
            format!("Lng: {:.5}", user.position.lon),
            format!("Accuracy: ±{:.0} m", user.accuracy_m),
        ],
    }
}

/// Output format for scene summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Renders a scene for terminals or machine consumers
pub struct SceneFormatter {
    pub format: OutputFormat,
}

impl SceneFormatter {
    pub fn text() -> Self {
        Self { format: OutputFormat::Text }
    }

    pub fn json() -> Self {
        Self { format: OutputFormat::Json }
    }

    pub fn format(&self, scene: &MapScene) -> Result<String, serde_json::Error> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(scene),
            OutputFormat::Text => Ok(format_text(scene)),
        }
    }
}

fn format_text(scene: &MapScene) -> String {
    let mut out = String::new();
    let marker = &scene.marker;
    // Writing into a String cannot fail
    let _ = writeln!(
        out,
        "[device] {} at {:.5}, {:.5} (zoom {})",
        marker.popup.title, marker.position.lat, marker.position.lon, scene.camera.zoom
    );
    match &scene.accuracy_circle {
        Some(circle) => {
            let _ = writeln!(
                out,
                "[user]   {:.5}, {:.5} circle r={:.1} m",
                circle.center.lat, circle.center.lon, circle.radius_m
            );
        }
        None => {
            let _ = writeln!(out, "[user]   not located");
        }
    }
    let _ = write!(out, "[{}] {}", scene.status.kind.as_str(), scene.status.message);
    out
}
