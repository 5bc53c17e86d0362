//! Per-frame input tick
//!
//! Collects one frame of pointer input and feeds it to the session in a
//! fixed order: press, auto flip, pointer move, release, then `advance`.

use glam::Vec2;

use super::state::{FlipSession, Frame};
use crate::curl::FlipDirection;

/// Input gathered for a single frame
#[derive(Debug, Clone, Default)]
pub struct FlipInput {
    /// Pointer went down on a page corner
    pub press: Option<(FlipDirection, Vec2)>,
    /// Latest pointer position (panel-local)
    pub pointer: Option<Vec2>,
    /// Pointer went up
    pub release: bool,
    /// Request a programmatic page turn
    pub auto_flip: Option<FlipDirection>,
}

/// Apply one frame of input and advance the session by `dt`
pub fn tick(session: &mut FlipSession, input: &FlipInput, dt: f32) -> Frame {
    let mut settled = Vec::new();

    if let Some((direction, point)) = input.press {
        match session.begin_drag(direction, point) {
            Ok(event) => settled.extend(event),
            Err(reason) => log::debug!("Press ignored: {}", reason),
        }
    }

    if let Some(direction) = input.auto_flip {
        match session.start_auto_flip(direction) {
            Ok(event) => settled.extend(event),
            Err(reason) => log::debug!("Auto flip ignored: {}", reason),
        }
    }

    if let Some(point) = input.pointer {
        session.drag_to(point);
    }

    if input.release {
        session.release();
    }

    let mut frame = session.advance(dt);
    settled.append(&mut frame.events);
    frame.events = settled;
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flip::{FlipEvent, FlipPhase, PageContent};
    use crate::settings::FlipSettings;

    fn session() -> FlipSession {
        FlipSession::new(
            800.0,
            600.0,
            PageContent::new(["a", "b", "c", "d", "e", "f"], "blank"),
        )
        .expect("valid size")
    }

    #[test]
    fn test_tick_drag_to_completion() {
        let mut s = session();
        let dt = s.settings().time_step;

        let press = FlipInput {
            press: Some((FlipDirection::RightToLeft, Vec2::new(395.0, -295.0))),
            ..Default::default()
        };
        let frame = tick(&mut s, &press, dt);
        assert!(frame.transforms.is_some());
        assert_eq!(s.phase(), FlipPhase::Dragging);

        // Sweep the pointer across the spread
        for i in 0..60 {
            let x = 395.0 - i as f32 * 13.0;
            let input = FlipInput {
                pointer: Some(Vec2::new(x, -250.0)),
                ..Default::default()
            };
            assert!(tick(&mut s, &input, dt).events.is_empty());
        }

        let release = FlipInput {
            release: true,
            ..Default::default()
        };
        let mut events = tick(&mut s, &release, dt).events;
        for _ in 0..10 {
            events.extend(tick(&mut s, &FlipInput::default(), dt).events);
        }
        assert_eq!(
            events,
            vec![FlipEvent::Completed {
                page_index: 2,
                direction: FlipDirection::RightToLeft
            }]
        );
        assert_eq!(s.faces().left, "c");
    }

    #[test]
    fn test_tick_press_and_release_same_frame() {
        let settings = FlipSettings {
            snap_duration: 0.025,
            ..Default::default()
        };
        let mut s = session().with_settings(settings).expect("valid settings");

        let input = FlipInput {
            press: Some((FlipDirection::RightToLeft, Vec2::new(395.0, -295.0))),
            release: true,
            ..Default::default()
        };
        // Single-step snap back finishes within the same tick
        let frame = tick(&mut s, &input, 0.025);
        assert_eq!(
            frame.events,
            vec![FlipEvent::Cancelled {
                direction: FlipDirection::RightToLeft
            }]
        );
        assert!(frame.transforms.is_none());
    }

    #[test]
    fn test_tick_press_supersedes_auto_flip() {
        let mut s = session();
        let auto = FlipInput {
            auto_flip: Some(FlipDirection::RightToLeft),
            ..Default::default()
        };
        tick(&mut s, &auto, 0.025);
        assert!(s.is_animating());

        let press = FlipInput {
            press: Some((FlipDirection::RightToLeft, Vec2::new(395.0, -295.0))),
            ..Default::default()
        };
        let frame = tick(&mut s, &press, 0.025);
        assert_eq!(
            frame.events,
            vec![FlipEvent::Completed {
                page_index: 2,
                direction: FlipDirection::RightToLeft
            }]
        );
        assert!(s.is_dragging());
        assert_eq!(s.page_index(), 2);
    }

    #[test]
    fn test_tick_ignored_press() {
        let mut s = session().with_page_index(4);
        let press = FlipInput {
            press: Some((FlipDirection::RightToLeft, Vec2::new(395.0, -295.0))),
            ..Default::default()
        };
        let frame = tick(&mut s, &press, 0.025);
        assert!(frame.events.is_empty());
        assert!(frame.transforms.is_none());
        assert_eq!(s.phase(), FlipPhase::Idle);
    }
}
