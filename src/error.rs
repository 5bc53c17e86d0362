//! Error types
//!
//! The geometry itself never fails at runtime; these cover setup and
//! configuration mistakes, misuse of the shared layer stack, and page
//! turns refused at input time.

use thiserror::Error;

use crate::curl::FlipDirection;

/// Panel geometry could not be derived
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    #[error("invalid panel size {width}x{height}: both sides must be finite and > 0")]
    InvalidPanelSize { width: f32, height: f32 },
}

/// Settings failed to parse or validate
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field} must be > 0 (got {value})")]
    NonPositive { field: &'static str, value: f32 },

    #[error("time step {step}s exceeds snap duration {duration}s")]
    StepExceedsDuration { step: f32, duration: f32 },
}

/// Layer stack access was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayerError {
    #[error("layer lease {lease} does not own the layer stack")]
    NotOwner { lease: u64 },
}

/// Why a drag or auto flip did not start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("drag input is disabled")]
    NotInteractable,
    #[error("{0:?} drag must start on its own page")]
    OutsidePage(FlipDirection),
    #[error("no next spread")]
    NoNextSpread,
    #[error("no previous spread")]
    NoPreviousSpread,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GeometryError::InvalidPanelSize {
            width: 0.0,
            height: 600.0,
        };
        assert_eq!(
            err.to_string(),
            "invalid panel size 0x600: both sides must be finite and > 0"
        );

        let err = SettingsError::NonPositive {
            field: "time_step",
            value: -1.0,
        };
        assert_eq!(err.to_string(), "time_step must be > 0 (got -1)");

        let err = RejectReason::OutsidePage(FlipDirection::LeftToRight);
        assert_eq!(err.to_string(), "LeftToRight drag must start on its own page");
    }

    #[test]
    fn test_json_error_converts() {
        let parse: Result<u32, serde_json::Error> = serde_json::from_str("nope");
        let err: SettingsError = parse.unwrap_err().into();
        assert!(matches!(err, SettingsError::Json(_)));
    }
}
