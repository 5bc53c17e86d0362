//! Page Curl - analytic page-turn geometry for a two-page book panel
//!
//! Core modules:
//! - `curl`: Closed-form geometry (apex, clip plane, layer transforms)
//! - `flip`: Drag/snap state machine driven by a fixed time step
//! - `settings`: Tunable timing and interaction parameters
//! - `error`: Error types for invalid geometry and configuration

pub mod curl;
pub mod error;
pub mod flip;
pub mod settings;

pub use error::{GeometryError, LayerError, RejectReason, SettingsError};
pub use settings::FlipSettings;

use glam::Vec2;

/// Engine configuration constants
pub mod consts {
    /// Snap animation length (seconds)
    pub const SNAP_DURATION: f32 = 0.15;
    /// Snap animation step (seconds, ~40 steps/second)
    pub const TIME_STEP: f32 = 0.025;
    /// Drag smoothing rate; per-frame lerp factor is `SMOOTHING_RATE * dt`
    pub const SMOOTHING_RATE: f32 = 10.0;

    /// Programmatic page turn length (seconds)
    pub const AUTO_FLIP_DURATION: f32 = 1.0;
    /// Follow-point samples along the auto flip arc
    pub const AUTO_FLIP_FRAMES: u32 = 40;
    /// Auto flip arc spans this fraction of the half-width and half-height
    pub const AUTO_FLIP_REACH: f32 = 0.9;

    /// Below this |cos|, the clip-plane tangent is treated as singular
    pub const CLIP_EPSILON: f32 = 1e-6;
}

/// Angle of the vector `from -> to`, in radians
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Angle of the vector `from -> to`, in degrees
#[inline]
pub fn angle_between_deg(from: Vec2, to: Vec2) -> f32 {
    angle_between(from, to).to_degrees()
}

/// Point at distance `r` from `center` along angle `theta` (radians)
#[inline]
pub fn point_on_circle(center: Vec2, r: f32, theta: f32) -> Vec2 {
    center + Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_between_deg() {
        let a = Vec2::new(0.0, 0.0);
        assert!((angle_between_deg(a, Vec2::new(1.0, 0.0))).abs() < 1e-5);
        assert!((angle_between_deg(a, Vec2::new(0.0, 1.0)) - 90.0).abs() < 1e-5);
        assert!((angle_between_deg(a, Vec2::new(-1.0, 0.0)) - 180.0).abs() < 1e-5);
    }

    #[test]
    fn test_point_on_circle() {
        let p = point_on_circle(Vec2::new(0.0, -300.0), 400.0, 0.0);
        assert_eq!(p, Vec2::new(400.0, -300.0));
        let q = point_on_circle(Vec2::ZERO, 2.0, std::f32::consts::FRAC_PI_2);
        assert!((q - Vec2::new(0.0, 2.0)).length() < 1e-5);
    }
}
