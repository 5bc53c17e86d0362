//! Clip plane solver
//!
//! The clip plane is the perpendicular bisector of apex -> corner, anchored
//! where it meets the bottom edge (t1). Its angle decides where the lifted
//! page is cut off.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::FlipDirection;
use crate::angle_between_deg;
use crate::consts::CLIP_EPSILON;

/// Clip line anchor on the bottom edge and its angle in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipPlane {
    pub anchor: Vec2,
    pub angle_deg: f32,
}

/// Solve the clip plane for `apex` against the corner being lifted
///
/// `corner` is the bottom-right edge for right-to-left flips and the
/// bottom-left edge for left-to-right flips.
pub fn solve_clip(apex: Vec2, corner: Vec2, spine_bottom: Vec2, direction: FlipDirection) -> ClipPlane {
    let t0 = (apex + corner) / 2.0;
    let corner_dy = corner.y - t0.y;
    let corner_angle = corner_dy.atan2(corner.x - t0.x);

    // Apex straight above/below the corner: tan() blows up
    let t1_x = if corner_angle.cos().abs() < CLIP_EPSILON {
        spine_bottom.x
    } else {
        let x = t0.x - corner_dy * corner_angle.tan();
        if x.is_finite() { x } else { spine_bottom.x }
    };
    let t1 = Vec2::new(normalize_t1_x(t1_x, corner.x, spine_bottom.x), spine_bottom.y);

    let raw = angle_between_deg(t0, t1);
    let angle_deg = match direction {
        FlipDirection::LeftToRight => (raw + 180.0).rem_euclid(180.0),
        FlipDirection::RightToLeft if raw > -90.0 => raw + 180.0,
        FlipDirection::RightToLeft => raw,
    };

    ClipPlane { anchor: t1, angle_deg }
}

/// Keep t1 on the corner's side of the spine
fn normalize_t1_x(t1_x: f32, corner_x: f32, spine_x: f32) -> f32 {
    if (t1_x > spine_x && spine_x > corner_x) || (t1_x < spine_x && spine_x < corner_x) {
        spine_x
    } else {
        t1_x
    }
}
