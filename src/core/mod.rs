//! Core types and constants for the asset tracker

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
