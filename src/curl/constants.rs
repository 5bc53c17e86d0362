//! Panel-derived geometry constants
//!
//! Panel-local coordinates: origin at the panel center, +y up. The spine is
//! the vertical line x = 0.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// Fixed points and radii derived from the panel size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryConstants {
    pub width: f32,
    pub height: f32,
    /// Bottom of the spine (0, -h/2)
    pub spine_bottom: Vec2,
    /// Top of the spine (0, h/2)
    pub spine_top: Vec2,
    /// (-w/2, -h/2)
    pub edge_bottom_left: Vec2,
    /// (w/2, -h/2)
    pub edge_bottom_right: Vec2,
    /// Distance spine bottom -> bottom right corner
    pub radius1: f32,
    /// Half-page diagonal, sqrt((w/2)² + h²)
    pub radius2: f32,
}

impl GeometryConstants {
    /// Derive constants for a `width` x `height` panel
    pub fn new(width: f32, height: f32) -> Result<Self, GeometryError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(GeometryError::InvalidPanelSize { width, height });
        }

        let half_w = width / 2.0;
        let half_h = height / 2.0;
        let spine_bottom = Vec2::new(0.0, -half_h);
        let edge_bottom_right = Vec2::new(half_w, -half_h);

        Ok(Self {
            width,
            height,
            spine_bottom,
            spine_top: Vec2::new(0.0, half_h),
            edge_bottom_left: Vec2::new(-half_w, -half_h),
            edge_bottom_right,
            radius1: spine_bottom.distance(edge_bottom_right),
            radius2: (half_w * half_w + height * height).sqrt(),
        })
    }

    /// Whether `point` lies inside the panel rectangle (edges included)
    pub fn contains(&self, point: Vec2) -> bool {
        point.x.abs() <= self.width / 2.0 && point.y.abs() <= self.height / 2.0
    }
}
