//! Curl apex solver
//!
//! The apex is the follow point pulled back onto two constraint circles:
//! - radius1 around the spine bottom (the page cannot stretch past its width)
//! - radius2 around the spine top (the top corner stays attached)

use glam::Vec2;

use super::constants::GeometryConstants;
use crate::{angle_between, point_on_circle};

/// Map a follow point to the curl apex
pub fn solve_apex(follow: Vec2, c: &GeometryConstants) -> Vec2 {
    let a1 = angle_between(c.spine_bottom, follow);
    let r1 = point_on_circle(c.spine_bottom, c.radius1, a1);
    let mut apex = if follow.distance(c.spine_bottom) < c.radius1 {
        follow
    } else {
        r1
    };

    let a2 = angle_between(c.spine_top, apex);
    let r2 = point_on_circle(c.spine_top, c.radius2, a2);
    if apex.distance(c.spine_top) > c.radius2 {
        apex = r2;
    }

    apex
}
