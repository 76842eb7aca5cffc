//! Geolocation error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reasons reported by a host geolocation capability.
/// Numbering follows the W3C `GeolocationPositionError` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureCode {
    PermissionDenied = 1,
    PositionUnavailable = 2,
    Timeout = 3,
}

impl FailureCode {
    pub fn code(&self) -> u16 {
        *self as u16
    }

    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(FailureCode::PermissionDenied),
            2 => Some(FailureCode::PositionUnavailable),
            3 => Some(FailureCode::Timeout),
            _ => None,
        }
    }

    /// Description used when the host does not supply one
    pub fn default_message(&self) -> &'static str {
        match self {
            FailureCode::PermissionDenied => "User denied Geolocation",
            FailureCode::PositionUnavailable => "Position unavailable",
            FailureCode::Timeout => "Timeout expired",
        }
    }
}

/// Errors produced by a location lookup
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// The host exposes no geolocation capability; no request was attempted
    #[error("geolocation capability unavailable")]
    CapabilityUnavailable,
    /// The host answered the request with an error
    #[error("{message}")]
    RequestFailed { code: FailureCode, message: String },
}

impl GeoError {
    pub fn request_failed(code: FailureCode, message: impl Into<String>) -> Self {
        GeoError::RequestFailed {
            code,
            message: message.into(),
        }
    }

    pub fn permission_denied() -> Self {
        let code = FailureCode::PermissionDenied;
        Self::request_failed(code, code.default_message())
    }

    pub fn position_unavailable() -> Self {
        let code = FailureCode::PositionUnavailable;
        Self::request_failed(code, code.default_message())
    }

    pub fn timeout() -> Self {
        let code = FailureCode::Timeout;
        Self::request_failed(code, code.default_message())
    }

    /// Host failure code, if the request got as far as the host
    pub fn failure_code(&self) -> Option<FailureCode> {
        match self {
            GeoError::CapabilityUnavailable => None,
            GeoError::RequestFailed { code, .. } => Some(*code),
        }
    }
}

/// Result type for geolocation operations
pub type GeoResult<T> = Result<T, GeoError>;
