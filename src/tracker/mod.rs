//! Tracker view and its supporting pieces

pub mod state;
pub mod drift;
pub mod view;
pub mod formatting;

pub use state::{TrackerAction, TrackerState};
pub use drift::{clamp_position, DriftGenerator};
pub use view::{LocateRequestId, TrackerEvent, TrackerView};
pub use formatting::{OutputFormat, SceneFormatter};
