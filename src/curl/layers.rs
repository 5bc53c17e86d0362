//! Layer composition and ownership
//!
//! Four layers depict a page turn:
//! - clip mask: cuts the still-flat part of the lifted leaf
//! - current page: back side of the lifted leaf, pinned at the apex
//! - incoming clip: masks the page being revealed underneath
//! - shadow: child of the current page, follows its tilt
//!
//! A `LayerStack` is owned by at most one `LayerLease` at a time.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::FlipDirection;
use super::clip::ClipPlane;
use crate::angle_between_deg;
use crate::error::LayerError;

/// Layer identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerId {
    ClipMask,
    CurrentPage,
    IncomingClip,
    Shadow,
}

impl LayerId {
    pub const ALL: [LayerId; 4] = [
        LayerId::ClipMask,
        LayerId::CurrentPage,
        LayerId::IncomingClip,
        LayerId::Shadow,
    ];

    fn slot(self) -> usize {
        match self {
            LayerId::ClipMask => 0,
            LayerId::CurrentPage => 1,
            LayerId::IncomingClip => 2,
            LayerId::Shadow => 3,
        }
    }
}

/// What a layer's transform is relative to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayerParent {
    #[default]
    Panel,
    Layer(LayerId),
}

/// Position/rotation of one layer, local to its parent
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayerTransform {
    pub position: Vec2,
    pub rotation_deg: f32,
    pub parent: LayerParent,
    /// Higher draws on top; the static spread is 0
    pub draw_order: u8,
}

/// Transforms for every layer in one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerTransforms {
    pub clip_mask: LayerTransform,
    pub current_page: LayerTransform,
    pub incoming_clip: LayerTransform,
    pub shadow: LayerTransform,
}

impl LayerTransforms {
    pub fn get(&self, id: LayerId) -> &LayerTransform {
        match id {
            LayerId::ClipMask => &self.clip_mask,
            LayerId::CurrentPage => &self.current_page,
            LayerId::IncomingClip => &self.incoming_clip,
            LayerId::Shadow => &self.shadow,
        }
    }
}

/// Compute layer transforms from the solved apex and clip plane
pub fn compose_layers(apex: Vec2, clip: ClipPlane, direction: FlipDirection) -> LayerTransforms {
    let mask_rotation = match direction {
        FlipDirection::LeftToRight => clip.angle_deg - 90.0,
        FlipDirection::RightToLeft => clip.angle_deg + 90.0,
    };
    // Both directions reduce to the same tilt once the mask offset is folded in
    let page_rotation = angle_between_deg(apex, clip.anchor) - 90.0 - clip.angle_deg;

    let mask = LayerTransform {
        position: clip.anchor,
        rotation_deg: mask_rotation,
        parent: LayerParent::Panel,
        draw_order: 2,
    };

    LayerTransforms {
        clip_mask: mask,
        current_page: LayerTransform {
            position: apex,
            rotation_deg: page_rotation,
            parent: LayerParent::Panel,
            draw_order: 3,
        },
        incoming_clip: LayerTransform {
            draw_order: 1,
            ..mask
        },
        shadow: LayerTransform {
            position: Vec2::ZERO,
            rotation_deg: 0.0,
            parent: LayerParent::Layer(LayerId::CurrentPage),
            draw_order: 4,
        },
    }
}

/// One layer as held by the stack
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Layer {
    pub transform: LayerTransform,
    pub visible: bool,
}

/// Exclusive right to drive a `LayerStack`
#[derive(Debug, PartialEq, Eq)]
pub struct LayerLease {
    id: u64,
}

impl LayerLease {
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// The four temporary layers of one book
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerStack {
    layers: [Layer; 4],
    owner: Option<u64>,
    next_lease: u64,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of the stack, revoking any previous lease
    pub fn acquire(&mut self) -> LayerLease {
        if let Some(previous) = self.owner {
            log::warn!("Layer lease {} revoked without release", previous);
            self.reset();
        }
        self.next_lease += 1;
        self.owner = Some(self.next_lease);
        LayerLease {
            id: self.next_lease,
        }
    }

    /// Give the stack back; every layer returns to rest
    pub fn release(&mut self, lease: LayerLease) -> Result<(), LayerError> {
        self.check(&lease)?;
        self.owner = None;
        self.reset();
        Ok(())
    }

    /// Apply a frame of transforms
    ///
    /// Parents and draw order are assigned for every layer before any local
    /// transform is written.
    pub fn apply(
        &mut self,
        lease: &LayerLease,
        transforms: &LayerTransforms,
        shadow_visible: bool,
    ) -> Result<(), LayerError> {
        self.check(lease)?;

        for id in LayerId::ALL {
            let t = transforms.get(id);
            let layer = &mut self.layers[id.slot()];
            layer.transform.parent = t.parent;
            layer.transform.draw_order = t.draw_order;
        }
        for id in LayerId::ALL {
            let t = transforms.get(id);
            let layer = &mut self.layers[id.slot()];
            layer.transform.position = t.position;
            layer.transform.rotation_deg = t.rotation_deg;
            layer.visible = id != LayerId::Shadow || shadow_visible;
        }
        Ok(())
    }

    pub fn layer(&self, id: LayerId) -> &Layer {
        &self.layers[id.slot()]
    }

    pub fn owner(&self) -> Option<u64> {
        self.owner
    }

    /// No lease held and every layer hidden at rest
    pub fn is_at_rest(&self) -> bool {
        self.owner.is_none() && self.layers.iter().all(|l| *l == Layer::default())
    }

    /// Panel-space position and rotation, following the parent chain
    pub fn world_transform(&self, id: LayerId) -> (Vec2, f32) {
        let t = self.layers[id.slot()].transform;
        match t.parent {
            LayerParent::Panel => (t.position, t.rotation_deg),
            // Shadow -> current page is the only nesting; current page sits on the panel
            LayerParent::Layer(parent) if parent != id => {
                let p = self.layers[parent.slot()].transform;
                let rot = Vec2::from_angle(p.rotation_deg.to_radians());
                (p.position + rot.rotate(t.position), p.rotation_deg + t.rotation_deg)
            }
            LayerParent::Layer(_) => (t.position, t.rotation_deg),
        }
    }

    fn check(&self, lease: &LayerLease) -> Result<(), LayerError> {
        if self.owner == Some(lease.id) {
            Ok(())
        } else {
            Err(LayerError::NotOwner { lease: lease.id })
        }
    }

    fn reset(&mut self) {
        self.layers = [Layer::default(); 4];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curl::{GeometryConstants, solve_clip};

    fn reference_frame() -> LayerTransforms {
        let c = GeometryConstants::new(800.0, 600.0).expect("valid size");
        let apex = Vec2::new(300.0, -250.0);
        let clip = solve_clip(apex, c.edge_bottom_right, c.spine_bottom, FlipDirection::RightToLeft);
        compose_layers(apex, clip, FlipDirection::RightToLeft)
    }

    fn same_angle(a: f32, b: f32) -> bool {
        let d = (a - b).rem_euclid(360.0);
        d < 1e-3 || d > 360.0 - 1e-3
    }

    #[test]
    fn test_compose_rtl() {
        let t = reference_frame();
        assert!((t.clip_mask.rotation_deg - (-26.565_05)).abs() < 1e-3);
        assert!((t.clip_mask.position - Vec2::new(337.5, -300.0)).length() < 1e-3);
        assert_eq!(t.incoming_clip.position, t.clip_mask.position);
        assert_eq!(t.incoming_clip.rotation_deg, t.clip_mask.rotation_deg);

        assert_eq!(t.current_page.position, Vec2::new(300.0, -250.0));
        // atan2(-50, 37.5) - 90 + 116.57
        assert!((t.current_page.rotation_deg - (-26.565_05)).abs() < 1e-3);

        assert_eq!(t.shadow.parent, LayerParent::Layer(LayerId::CurrentPage));
        assert!(t.current_page.draw_order > t.clip_mask.draw_order);
        assert!(t.clip_mask.draw_order > t.incoming_clip.draw_order);
    }

    #[test]
    fn test_compose_ltr_mask_offset() {
        let clip = ClipPlane {
            anchor: Vec2::new(-337.5, -300.0),
            angle_deg: 116.565_05,
        };
        let t = compose_layers(Vec2::new(-300.0, -250.0), clip, FlipDirection::LeftToRight);
        assert!((t.clip_mask.rotation_deg - 26.565_05).abs() < 1e-3);
        // atan2(-50, -37.5) - 90 - 116.57 = -333.43
        assert!(same_angle(t.current_page.rotation_deg, 26.565_05));
    }

    #[test]
    fn test_lease_lifecycle() {
        let mut stack = LayerStack::new();
        assert!(stack.is_at_rest());

        let lease = stack.acquire();
        stack.apply(&lease, &reference_frame(), true).expect("owner");
        assert!(stack.layer(LayerId::ClipMask).visible);
        assert!(stack.layer(LayerId::Shadow).visible);
        assert!(!stack.is_at_rest());

        stack.release(lease).expect("owner");
        assert!(stack.is_at_rest());
    }

    #[test]
    fn test_stale_lease_rejected() {
        let mut stack = LayerStack::new();
        let first = stack.acquire();
        let second = stack.acquire();

        let err = stack.apply(&first, &reference_frame(), true).unwrap_err();
        assert_eq!(err, LayerError::NotOwner { lease: first.id() });
        assert_eq!(stack.owner(), Some(second.id()));

        assert!(stack.release(first).is_err());
        assert!(stack.release(second).is_ok());
    }

    #[test]
    fn test_hidden_shadow() {
        let mut stack = LayerStack::new();
        let lease = stack.acquire();
        stack.apply(&lease, &reference_frame(), false).expect("owner");
        assert!(!stack.layer(LayerId::Shadow).visible);
        assert!(stack.layer(LayerId::CurrentPage).visible);
    }

    #[test]
    fn test_shadow_follows_page() {
        let mut stack = LayerStack::new();
        let lease = stack.acquire();
        let frame = reference_frame();
        stack.apply(&lease, &frame, true).expect("owner");

        let (pos, rot) = stack.world_transform(LayerId::Shadow);
        assert_eq!(pos, frame.current_page.position);
        assert!((rot - frame.current_page.rotation_deg).abs() < 1e-5);
    }
}
