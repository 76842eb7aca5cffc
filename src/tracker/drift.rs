//! Bounded random drift applied to the simulated device on refresh

use crate::core::Position;
use rand::distributions::Open01;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Draws independent uniform offsets in the open interval (-h, h)
#[derive(Debug, Clone)]
pub struct DriftGenerator {
    half_width_deg: f64,
    clamp_to_valid_range: bool,
    rng: StdRng,
}

impl DriftGenerator {
    /// A non-finite half-width disables drift.
    pub fn new(half_width_deg: f64) -> Self {
        let half_width_deg = if half_width_deg.is_finite() {
            half_width_deg.abs()
        } else {
            0.0
        };
        Self {
            half_width_deg,
            clamp_to_valid_range: false,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for reproducible runs
    pub fn seeded(half_width_deg: f64, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ..Self::new(half_width_deg)
        }
    }

    pub fn with_clamping(mut self, clamp: bool) -> Self {
        self.clamp_to_valid_range = clamp;
        self
    }

    pub fn half_width_deg(&self) -> f64 {
        self.half_width_deg
    }

    /// One offset strictly inside (-h, h)
    fn offset(&mut self) -> f64 {
        let unit: f64 = self.rng.sample(Open01);
        (2.0 * unit - 1.0) * self.half_width_deg
    }

    /// Perturb latitude and longitude independently
    pub fn apply(&mut self, position: Position) -> Position {
        let drifted = Position::new(position.lat + self.offset(), position.lon + self.offset());
        if self.clamp_to_valid_range {
            clamp_position(drifted)
        } else {
            drifted
        }
    }
}

/// Clamp latitude to [-90, 90] and wrap longitude into [-180, 180)
pub fn clamp_position(position: Position) -> Position {
    let lat = position.lat.clamp(-90.0, 90.0);
    let lon = if (-180.0..=180.0).contains(&position.lon) {
        position.lon
    } else {
        (position.lon + 180.0).rem_euclid(360.0) - 180.0
    };
    Position::new(lat, lon)
}
