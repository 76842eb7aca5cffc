//! Map rendering capability
//!
//! The map widget itself lives in the host page; this module describes what it
//! should show and how the tracker asks it to move.

pub mod surface;
pub mod scene;
pub mod html;

pub use surface::{MapCamera, MapSurface, RecordingMap};
pub use scene::{
    ActionButton, Circle, CircleStyle, MapScene, Marker, MarkerIcon, Popup, StatusBanner, TileLayer,
};
pub use html::render_page;
