//! Flip session state machine
//!
//! Idle -> Dragging -> (release) -> Snapping -> Idle
//! Idle -> AutoFlipping -> Snapping -> Idle
//!
//! Every frame replays the curl pipeline for the current follow point, live
//! pointer or animation sample alike. Time only advances through `advance`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pages::{Faces, PageContent};
use crate::consts::AUTO_FLIP_REACH;
use crate::curl::{
    CurlFrame, FlipDirection, GeometryConstants, LayerLease, LayerStack, LayerTransforms,
    SnapOutcome, solve_frame,
};
use crate::error::{GeometryError, RejectReason, SettingsError};
use crate::settings::FlipSettings;

/// Current phase of a page turn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FlipPhase {
    /// Spread at rest, layers released
    Idle,
    /// Follow point chases the pointer
    Dragging,
    /// Released; follow point steps toward the snap target
    Snapping {
        outcome: SnapOutcome,
        steps_left: u32,
        elapsed: f32,
    },
    /// Programmatic turn along an arc, then snaps like a release
    AutoFlipping { frame: u32, elapsed: f32 },
}

/// Emitted once per finished turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipEvent {
    /// Leaf landed on the far side; `page_index` is the new spread
    Completed {
        page_index: i32,
        direction: FlipDirection,
    },
    /// Leaf fell back; spread unchanged
    Cancelled { direction: FlipDirection },
}

/// Output of one `advance`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// Layer transforms while a turn owns the layers, `None` at rest
    pub transforms: Option<LayerTransforms>,
    /// At most one event from `advance`; `tick` may add a superseded one
    pub events: Vec<FlipEvent>,
}

/// Page-turn state for one book (one page pair)
#[derive(Debug, Serialize)]
pub struct FlipSession {
    constants: GeometryConstants,
    settings: FlipSettings,
    pages: PageContent,
    page_index: i32,
    phase: FlipPhase,
    direction: FlipDirection,
    follow: Vec2,
    pointer: Vec2,
    apex: Vec2,
    layers: LayerStack,
    #[serde(skip)]
    lease: Option<LayerLease>,
    #[serde(skip)]
    frame: Option<CurlFrame>,
}

impl FlipSession {
    /// Create an idle session for a `width` x `height` panel
    pub fn new(width: f32, height: f32, pages: PageContent) -> Result<Self, GeometryError> {
        let constants = GeometryConstants::new(width, height).inspect_err(|e| {
            log::warn!("Refusing panel geometry: {}", e);
        })?;
        Ok(Self {
            constants,
            settings: FlipSettings::default(),
            pages,
            page_index: 0,
            phase: FlipPhase::Idle,
            direction: FlipDirection::RightToLeft,
            follow: constants.edge_bottom_right,
            pointer: constants.edge_bottom_right,
            apex: constants.edge_bottom_right,
            layers: LayerStack::new(),
            lease: None,
            frame: None,
        })
    }

    /// Replace the default settings
    pub fn with_settings(mut self, settings: FlipSettings) -> Result<Self, SettingsError> {
        self.set_settings(settings)?;
        Ok(self)
    }

    /// Start on a given spread (left page index)
    pub fn with_page_index(mut self, page_index: i32) -> Self {
        self.page_index = page_index;
        self
    }

    // === Accessors ===

    pub fn constants(&self) -> &GeometryConstants {
        &self.constants
    }

    pub fn settings(&self) -> &FlipSettings {
        &self.settings
    }

    pub fn pages(&self) -> &PageContent {
        &self.pages
    }

    pub fn page_index(&self) -> i32 {
        self.page_index
    }

    pub fn phase(&self) -> FlipPhase {
        self.phase
    }

    pub fn direction(&self) -> FlipDirection {
        self.direction
    }

    pub fn follow_point(&self) -> Vec2 {
        self.follow
    }

    /// Apex from the latest solved frame
    pub fn apex(&self) -> Vec2 {
        self.apex
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    pub fn last_frame(&self) -> Option<&CurlFrame> {
        self.frame.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == FlipPhase::Dragging
    }

    pub fn is_animating(&self) -> bool {
        matches!(
            self.phase,
            FlipPhase::Snapping { .. } | FlipPhase::AutoFlipping { .. }
        )
    }

    /// Page identifiers visible right now
    pub fn faces(&self) -> Faces<'_> {
        let i = self.page_index;
        let p = &self.pages;
        let (lifted_back, revealed) = match (self.phase, self.direction) {
            (FlipPhase::Idle, _) => (None, None),
            (_, FlipDirection::RightToLeft) => (
                Some(p.get(i.saturating_add(2))),
                Some(p.get(i.saturating_add(3))),
            ),
            (_, FlipDirection::LeftToRight) => (
                Some(p.get(i.saturating_sub(1))),
                Some(p.get(i.saturating_sub(2))),
            ),
        };
        Faces {
            left: p.get(i),
            right: p.get(i.saturating_add(1)),
            lifted_back,
            revealed,
        }
    }

    // === Configuration ===

    /// Recompute geometry for a new panel size; invalid sizes keep the old one
    pub fn set_panel_size(&mut self, width: f32, height: f32) -> Result<(), GeometryError> {
        let constants = GeometryConstants::new(width, height).inspect_err(|e| {
            log::warn!("Ignoring panel resize: {}", e);
        })?;
        log::debug!("Panel resized to {}x{}", width, height);
        self.constants = constants;
        if self.lease.is_some() {
            self.refresh();
        }
        Ok(())
    }

    pub fn set_settings(&mut self, settings: FlipSettings) -> Result<(), SettingsError> {
        settings.validate().inspect_err(|e| {
            log::warn!("Rejecting flip settings: {}", e);
        })?;
        self.settings = settings;
        Ok(())
    }

    // === Input ===

    /// Press on a page corner
    ///
    /// A turn already in flight is settled first: a snap or auto flip jumps
    /// to its target, an active drag falls back. Its event is returned.
    /// Rejected presses change nothing.
    pub fn begin_drag(
        &mut self,
        direction: FlipDirection,
        point: Vec2,
    ) -> Result<Option<FlipEvent>, RejectReason> {
        if !self.settings.interactable {
            return Err(RejectReason::NotInteractable);
        }
        let spine_x = self.constants.spine_bottom.x;
        let on_page = match direction {
            FlipDirection::RightToLeft => point.x >= spine_x,
            FlipDirection::LeftToRight => point.x <= spine_x,
        };
        if !on_page || !self.constants.contains(point) {
            return Err(RejectReason::OutsidePage(direction));
        }
        self.check_bounds(direction)?;

        let settled = self.interrupt();
        self.start(direction, point);
        self.pointer = point;
        self.phase = FlipPhase::Dragging;
        self.refresh();
        log::debug!("Drag {:?} started at {} (page {})", direction, point, self.page_index);
        Ok(settled)
    }

    /// Move the pointer of an active drag
    pub fn drag_to(&mut self, point: Vec2) {
        if self.phase == FlipPhase::Dragging {
            self.pointer = point;
        }
    }

    /// Let go of the page; returns the snap decision
    pub fn release(&mut self) -> Option<SnapOutcome> {
        if self.phase != FlipPhase::Dragging {
            return None;
        }
        Some(self.begin_snap())
    }

    /// Turn a page without pointer input
    pub fn start_auto_flip(
        &mut self,
        direction: FlipDirection,
    ) -> Result<Option<FlipEvent>, RejectReason> {
        self.check_bounds(direction)?;

        let settled = self.interrupt();
        self.start(direction, auto_flip_point(&self.constants, direction, 0.0));
        self.phase = FlipPhase::AutoFlipping {
            frame: 0,
            elapsed: 0.0,
        };
        self.refresh();
        log::debug!("Auto flip {:?} started (page {})", direction, self.page_index);
        Ok(settled)
    }

    /// Settle whatever is in flight right now
    pub fn interrupt(&mut self) -> Option<FlipEvent> {
        let outcome = match self.phase {
            FlipPhase::Idle => return None,
            FlipPhase::Dragging => SnapOutcome::Back,
            FlipPhase::Snapping { outcome, .. } => outcome,
            FlipPhase::AutoFlipping { .. } => self.auto_flip_outcome(),
        };
        self.follow = outcome.target(self.direction, &self.constants);
        self.refresh();
        let event = self.finish(outcome);
        log::info!("Superseded turn settled: {:?}", event);
        Some(event)
    }

    // === Time ===

    /// Advance by `dt` seconds and report the resulting layer state
    pub fn advance(&mut self, dt: f32) -> Frame {
        let mut events = Vec::new();

        match self.phase {
            FlipPhase::Idle => {}
            FlipPhase::Dragging => {
                let k = self.settings.smoothing_factor(dt);
                self.follow = self.follow.lerp(self.pointer, k);
                self.refresh();
            }
            FlipPhase::Snapping {
                outcome,
                mut steps_left,
                mut elapsed,
            } => {
                let step = self.settings.time_step;
                let target = outcome.target(self.direction, &self.constants);
                elapsed += dt;
                while elapsed >= step && steps_left > 0 {
                    elapsed -= step;
                    self.follow += (target - self.follow) / steps_left as f32;
                    steps_left -= 1;
                    if steps_left == 0 {
                        self.follow = target;
                    }
                    self.refresh();
                }
                if steps_left == 0 {
                    events.push(self.finish(outcome));
                } else {
                    self.phase = FlipPhase::Snapping {
                        outcome,
                        steps_left,
                        elapsed,
                    };
                }
            }
            FlipPhase::AutoFlipping {
                mut frame,
                mut elapsed,
            } => {
                let frames = self.settings.auto_flip_frames.max(1);
                let frame_time = self.settings.auto_flip_frame_time();
                elapsed += dt;
                while elapsed >= frame_time && frame < frames {
                    elapsed -= frame_time;
                    frame += 1;
                    let t = frame as f32 / frames as f32;
                    self.follow = auto_flip_point(&self.constants, self.direction, t);
                    self.refresh();
                }
                if frame >= frames {
                    self.begin_snap();
                } else {
                    self.phase = FlipPhase::AutoFlipping { frame, elapsed };
                }
            }
        }

        Frame {
            transforms: self.transforms(),
            events,
        }
    }

    /// Transforms currently applied, if a turn owns the layers
    pub fn transforms(&self) -> Option<LayerTransforms> {
        self.lease.as_ref().and(self.frame.map(|f| f.layers))
    }

    // === Internals ===

    /// Spread index once any in-flight snap lands
    fn settled_page_index(&self) -> i32 {
        let outcome = match self.phase {
            FlipPhase::Snapping { outcome, .. } => outcome,
            FlipPhase::AutoFlipping { .. } => self.auto_flip_outcome(),
            FlipPhase::Idle | FlipPhase::Dragging => return self.page_index,
        };
        match outcome {
            SnapOutcome::Forward => self.page_index.saturating_add(self.direction.page_step()),
            SnapOutcome::Back => self.page_index,
        }
    }

    fn check_bounds(&self, direction: FlipDirection) -> Result<(), RejectReason> {
        let i = i64::from(self.settled_page_index());
        match direction {
            FlipDirection::RightToLeft if i + 2 >= self.pages.len() as i64 => {
                log::debug!("Rejecting {:?} flip at page {}", direction, i);
                Err(RejectReason::NoNextSpread)
            }
            FlipDirection::LeftToRight if i < 1 => {
                log::debug!("Rejecting {:?} flip at page {}", direction, i);
                Err(RejectReason::NoPreviousSpread)
            }
            _ => Ok(()),
        }
    }

    fn start(&mut self, direction: FlipDirection, follow: Vec2) {
        self.direction = direction;
        self.follow = follow;
        self.lease = Some(self.layers.acquire());
    }

    fn begin_snap(&mut self) -> SnapOutcome {
        let outcome = SnapOutcome::decide(self.apex, self.direction, &self.constants);
        log::debug!("Released {:?} at apex {}: {:?}", self.direction, self.apex, outcome);
        self.phase = FlipPhase::Snapping {
            outcome,
            steps_left: self.settings.snap_steps(),
            elapsed: 0.0,
        };
        outcome
    }

    /// Where an auto flip would snap once its arc ends
    fn auto_flip_outcome(&self) -> SnapOutcome {
        let end = auto_flip_point(&self.constants, self.direction, 1.0);
        let apex = solve_frame(end, &self.constants, self.direction).apex;
        SnapOutcome::decide(apex, self.direction, &self.constants)
    }

    /// Re-solve the pipeline and push it to the layers
    fn refresh(&mut self) {
        let frame = solve_frame(self.follow, &self.constants, self.direction);
        self.apex = frame.apex;
        if let Some(lease) = self.lease.as_ref()
            && let Err(e) = self.layers.apply(lease, &frame.layers, self.settings.shadows)
        {
            log::warn!("Dropping layer update: {}", e);
        }
        self.frame = Some(frame);
    }

    fn finish(&mut self, outcome: SnapOutcome) -> FlipEvent {
        if let Some(lease) = self.lease.take()
            && let Err(e) = self.layers.release(lease)
        {
            log::warn!("Layer release failed: {}", e);
        }
        self.phase = FlipPhase::Idle;
        self.frame = None;

        match outcome {
            SnapOutcome::Forward => {
                self.page_index = self.page_index.saturating_add(self.direction.page_step());
                log::info!("Flip {:?} completed, page {}", self.direction, self.page_index);
                FlipEvent::Completed {
                    page_index: self.page_index,
                    direction: self.direction,
                }
            }
            SnapOutcome::Back => {
                log::info!("Flip {:?} cancelled, page {}", self.direction, self.page_index);
                FlipEvent::Cancelled {
                    direction: self.direction,
                }
            }
        }
    }
}

/// Follow point along the auto flip arc, `t` in [0, 1]
///
/// A parabola through both lifted corners' reach, peaking at the spine.
pub fn auto_flip_point(c: &GeometryConstants, direction: FlipDirection, t: f32) -> Vec2 {
    let xc = (c.edge_bottom_right.x + c.edge_bottom_left.x) / 2.0;
    let xl = (c.edge_bottom_right.x - c.edge_bottom_left.x) / 2.0 * AUTO_FLIP_REACH;
    let h = c.edge_bottom_right.y.abs() * AUTO_FLIP_REACH;
    let t = t.clamp(0.0, 1.0);

    let x = match direction {
        FlipDirection::RightToLeft => xc + xl - 2.0 * xl * t,
        FlipDirection::LeftToRight => xc - xl + 2.0 * xl * t,
    };
    let dx = x - xc;
    Vec2::new(x, -h / (xl * xl) * dx * dx)
}
