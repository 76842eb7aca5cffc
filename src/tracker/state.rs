//! Tracker state container and its update function

use crate::core::{Position, Status, UserPosition, MSG_READY};
use serde::{Deserialize, Serialize};

/// All state owned by one tracker view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerState {
    /// Simulated device position
    pub device: Position,
    /// Last successful user lookup
    pub user: Option<UserPosition>,
    pub status: Status,
}

/// State transitions
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerAction {
    DeviceMoved(Position),
    StatusChanged(Status),
    /// Replaces any previous user position wholesale
    UserLocated(UserPosition),
}

impl TrackerState {
    pub fn new(seed: Position) -> Self {
        Self {
            device: seed,
            user: None,
            status: Status::normal(MSG_READY),
        }
    }

    /// Apply an action. Returns true when the device position changed.
    pub fn apply(&mut self, action: TrackerAction) -> bool {
        match action {
            TrackerAction::DeviceMoved(position) => {
                let moved = self.device != position;
                self.device = position;
                moved
            }
            TrackerAction::StatusChanged(status) => {
                self.status = status;
                false
            }
            TrackerAction::UserLocated(user) => {
                self.user = Some(user);
                false
            }
        }
    }
}
