//! Map surface capability and an in-memory camera implementation

use crate::core::Position;
use serde::{Deserialize, Serialize};

/// What the map is currently looking at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapCamera {
    pub center: Position,
    pub zoom: f64,
}

/// Map widget the tracker view drives
pub trait MapSurface {
    /// Current zoom level of the widget
    fn zoom(&self) -> f64;

    /// Smoothly pan the view to `center` at `zoom`
    fn fly_to(&mut self, center: Position, zoom: f64);
}

impl<M: MapSurface + ?Sized> MapSurface for Box<M> {
    fn zoom(&self) -> f64 {
        (**self).zoom()
    }

    fn fly_to(&mut self, center: Position, zoom: f64) {
        (**self).fly_to(center, zoom)
    }
}

/// Map surface that keeps the camera in memory and records every move
#[derive(Debug, Clone)]
pub struct RecordingMap {
    camera: MapCamera,
    moves: Vec<MapCamera>,
}

impl RecordingMap {
    pub fn new(center: Position, zoom: f64) -> Self {
        Self {
            camera: MapCamera { center, zoom },
            moves: Vec::new(),
        }
    }

    pub fn camera(&self) -> MapCamera {
        self.camera
    }

    /// Every `fly_to` received, oldest first
    pub fn moves(&self) -> &[MapCamera] {
        &self.moves
    }

    /// User zoom interaction; does not count as a move
    pub fn set_zoom(&mut self, zoom: f64) {
        self.camera.zoom = zoom;
    }
}

impl MapSurface for RecordingMap {
    fn zoom(&self) -> f64 {
        self.camera.zoom
    }

    fn fly_to(&mut self, center: Position, zoom: f64) {
        self.camera = MapCamera { center, zoom };
        self.moves.push(self.camera);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fly_to_records_moves() {
        let mut map = RecordingMap::new(Position::new(0.0, 0.0), 13.0);
        assert!(map.moves().is_empty());

        map.fly_to(Position::new(1.0, 2.0), 13.0);
        map.set_zoom(15.0);
        map.fly_to(Position::new(1.5, 2.5), map.zoom());

        assert_eq!(map.moves().len(), 2);
        assert_eq!(map.camera().center, Position::new(1.5, 2.5));
        assert_eq!(map.moves()[1].zoom, 15.0);
    }
}
