//! Flip settings
//!
//! Timing and interaction parameters, loadable from JSON. Missing fields fall
//! back to the defaults in `consts`.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// Page-flip settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlipSettings {
    // === Snap animation ===
    /// Length of the release snap (seconds)
    pub snap_duration: f32,
    /// Snap animation step (seconds)
    pub time_step: f32,

    // === Drag ===
    /// Exponential smoothing rate applied to pointer input
    pub smoothing_rate: f32,
    /// Accept pointer drags
    pub interactable: bool,

    // === Auto flip ===
    /// Length of a programmatic page turn (seconds)
    pub auto_flip_duration: f32,
    /// Follow-point samples along the auto flip arc
    pub auto_flip_frames: u32,

    // === Visuals ===
    /// Show the shadow layer while a page is lifted
    pub shadows: bool,
}

impl Default for FlipSettings {
    fn default() -> Self {
        Self {
            snap_duration: SNAP_DURATION,
            time_step: TIME_STEP,

            smoothing_rate: SMOOTHING_RATE,
            interactable: true,

            auto_flip_duration: AUTO_FLIP_DURATION,
            auto_flip_frames: AUTO_FLIP_FRAMES,

            shadows: true,
        }
    }
}

impl FlipSettings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        log::debug!("Loaded flip settings: {:?}", settings);
        Ok(settings)
    }

    /// Serialize settings to JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check that every timing parameter is usable
    pub fn validate(&self) -> Result<(), SettingsError> {
        positive("snap_duration", self.snap_duration)?;
        positive("time_step", self.time_step)?;
        positive("smoothing_rate", self.smoothing_rate)?;
        positive("auto_flip_duration", self.auto_flip_duration)?;
        positive("auto_flip_frames", self.auto_flip_frames as f32)?;

        if self.time_step > self.snap_duration {
            return Err(SettingsError::StepExceedsDuration {
                step: self.time_step,
                duration: self.snap_duration,
            });
        }
        Ok(())
    }

    /// Number of discrete snap steps (rounded, at least one)
    pub fn snap_steps(&self) -> u32 {
        // f32 division is not exact; truncating could drop a step
        ((self.snap_duration / self.time_step).round() as u32).max(1)
    }

    /// Time between auto flip samples
    pub fn auto_flip_frame_time(&self) -> f32 {
        self.auto_flip_duration / self.auto_flip_frames.max(1) as f32
    }

    /// Lerp factor for one frame of drag smoothing
    pub fn smoothing_factor(&self, dt: f32) -> f32 {
        (self.smoothing_rate * dt).clamp(0.0, 1.0)
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::NonPositive { field, value })
    }
}
