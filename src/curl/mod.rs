//! Page-curl geometry
//!
//! Pure, closed-form pipeline run once per frame:
//! follow point -> apex -> clip plane -> layer transforms.
//! No state, no side effects; the same inputs give the same bits.

pub mod apex;
pub mod clip;
pub mod constants;
pub mod layers;

pub use apex::solve_apex;
pub use clip::{ClipPlane, solve_clip};
pub use constants::GeometryConstants;
pub use layers::{
    Layer, LayerId, LayerLease, LayerParent, LayerStack, LayerTransform, LayerTransforms,
    compose_layers,
};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Which way the leaf turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipDirection {
    /// Lift the left leaf, go back a spread
    LeftToRight,
    /// Lift the right leaf, go forward a spread
    RightToLeft,
}

impl FlipDirection {
    /// Corner the lifted leaf is pinned to
    pub fn corner(self, c: &GeometryConstants) -> Vec2 {
        match self {
            FlipDirection::LeftToRight => c.edge_bottom_left,
            FlipDirection::RightToLeft => c.edge_bottom_right,
        }
    }

    /// Corner the leaf lands on when the flip completes
    pub fn far_corner(self, c: &GeometryConstants) -> Vec2 {
        match self {
            FlipDirection::LeftToRight => c.edge_bottom_right,
            FlipDirection::RightToLeft => c.edge_bottom_left,
        }
    }

    /// Page index change of a completed flip
    pub fn page_step(self) -> i32 {
        match self {
            FlipDirection::LeftToRight => -2,
            FlipDirection::RightToLeft => 2,
        }
    }
}

/// Everything solved for one follow point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurlFrame {
    pub apex: Vec2,
    pub clip: ClipPlane,
    pub layers: LayerTransforms,
}

/// Run the full pipeline for `follow`
pub fn solve_frame(follow: Vec2, c: &GeometryConstants, direction: FlipDirection) -> CurlFrame {
    let apex = solve_apex(follow, c);
    let clip = solve_clip(apex, direction.corner(c), c.spine_bottom, direction);
    CurlFrame {
        apex,
        clip,
        layers: compose_layers(apex, clip, direction),
    }
}

/// How a released drag resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapOutcome {
    /// Finish the turn
    Forward,
    /// Return the leaf to where it started
    Back,
}

impl SnapOutcome {
    /// Decide from where the apex was released
    ///
    /// A leaf still closer to its own corner falls back; ties go forward.
    pub fn decide(apex: Vec2, direction: FlipDirection, c: &GeometryConstants) -> Self {
        let to_left = apex.distance(c.edge_bottom_left);
        let to_right = apex.distance(c.edge_bottom_right);
        match direction {
            FlipDirection::RightToLeft if to_right < to_left => SnapOutcome::Back,
            FlipDirection::LeftToRight if to_left < to_right => SnapOutcome::Back,
            _ => SnapOutcome::Forward,
        }
    }

    /// Where the follow point animates to
    pub fn target(self, direction: FlipDirection, c: &GeometryConstants) -> Vec2 {
        match self {
            SnapOutcome::Forward => direction.far_corner(c),
            SnapOutcome::Back => direction.corner(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn book() -> GeometryConstants {
        GeometryConstants::new(800.0, 600.0).expect("valid size")
    }

    #[test]
    fn test_solve_frame_reference() {
        let c = book();
        let frame = solve_frame(Vec2::new(300.0, -250.0), &c, FlipDirection::RightToLeft);
        assert_eq!(frame.apex, Vec2::new(300.0, -250.0));
        assert_eq!(frame.layers.current_page.position, frame.apex);
        assert_eq!(frame.layers.clip_mask.position, frame.clip.anchor);
    }

    #[test]
    fn test_snap_decision() {
        let c = book();
        let near_right = Vec2::new(300.0, -250.0);
        let near_left = Vec2::new(-300.0, -250.0);

        assert_eq!(SnapOutcome::decide(near_right, FlipDirection::RightToLeft, &c), SnapOutcome::Back);
        assert_eq!(SnapOutcome::decide(near_left, FlipDirection::RightToLeft, &c), SnapOutcome::Forward);
        assert_eq!(SnapOutcome::decide(near_left, FlipDirection::LeftToRight, &c), SnapOutcome::Back);
        assert_eq!(SnapOutcome::decide(near_right, FlipDirection::LeftToRight, &c), SnapOutcome::Forward);
    }

    #[test]
    fn test_snap_tie_goes_forward() {
        let c = book();
        let on_spine = Vec2::new(0.0, 100.0);
        assert_eq!(SnapOutcome::decide(on_spine, FlipDirection::RightToLeft, &c), SnapOutcome::Forward);
        assert_eq!(SnapOutcome::decide(on_spine, FlipDirection::LeftToRight, &c), SnapOutcome::Forward);
    }

    #[test]
    fn test_snap_targets() {
        let c = book();
        let rtl = FlipDirection::RightToLeft;
        assert_eq!(SnapOutcome::Forward.target(rtl, &c), c.edge_bottom_left);
        assert_eq!(SnapOutcome::Back.target(rtl, &c), c.edge_bottom_right);
        let ltr = FlipDirection::LeftToRight;
        assert_eq!(SnapOutcome::Forward.target(ltr, &c), c.edge_bottom_right);
        assert_eq!(SnapOutcome::Back.target(ltr, &c), c.edge_bottom_left);
    }

    proptest! {
        #[test]
        fn prop_snap_decision_follows_nearer_corner(x in -500.0f32..500.0, y in -400.0f32..400.0, rtl in any::<bool>()) {
            let c = book();
            let dir = if rtl { FlipDirection::RightToLeft } else { FlipDirection::LeftToRight };
            let apex = Vec2::new(x, y);
            let own = apex.distance(dir.corner(&c));
            let far = apex.distance(dir.far_corner(&c));
            let expected = if own < far { SnapOutcome::Back } else { SnapOutcome::Forward };
            prop_assert_eq!(SnapOutcome::decide(apex, dir, &c), expected);
        }

        #[test]
        fn prop_mirrored_decisions_agree(x in -500.0f32..500.0, y in -400.0f32..400.0) {
            let c = book();
            let rtl = SnapOutcome::decide(Vec2::new(x, y), FlipDirection::RightToLeft, &c);
            let ltr = SnapOutcome::decide(Vec2::new(-x, y), FlipDirection::LeftToRight, &c);
            prop_assert_eq!(rtl, ltr);
        }
    }
}
