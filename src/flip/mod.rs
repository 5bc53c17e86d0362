//! Page-turn state machine
//!
//! Owns the drag lifecycle, the release decision and the snap animation.
//! Like the geometry it drives, this module is deterministic:
//! - Time advances only through explicit `dt`
//! - Snap animations run in fixed steps
//! - One session per book owns the four turn layers

pub mod pages;
pub mod state;
pub mod tick;

pub use pages::{Faces, PageContent};
pub use crate::error::RejectReason;
pub use state::{FlipEvent, FlipPhase, FlipSession, Frame, auto_flip_point};
pub use tick::{FlipInput, tick};
