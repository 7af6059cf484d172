//! Raw pointer samples to navigation intents.
//!
//! Pure classification: the recognizer never touches navigation state, it only
//! needs to know whether the cover is showing (the vertical reveal only exists
//! there) and whether input is currently blocked by a quiz.

use super::state::Trigger;

/// Upward travel needed before a move counts as a vertical drag.
const VERTICAL_START_PX: f32 = 20.0;
/// Horizontal travel needed before a move counts as a swipe in progress.
const HORIZONTAL_START_PX: f32 = 10.0;
/// Horizontal travel needed on release to navigate.
const SWIPE_COMMIT_PX: f32 = 50.0;
/// A release within this distance of the press on both axes is a tap.
const TAP_SLOP_PX: f32 = 10.0;
/// Taps in the leftmost share of the viewport go back.
const TAP_BACK_ZONE: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    None,
    Horizontal,
    Vertical,
}

/// One press-to-release interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    pub start_x: f32,
    pub start_y: f32,
    pub current_x: f32,
    pub current_y: f32,
    pub axis: Axis,
    /// Last upward distance forwarded as a reveal drag.
    pub drag_distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    Next(Trigger),
    Prev(Trigger),
    /// Cover dragged up by `distance` pixels (live).
    RevealDrag { distance: f32 },
    /// Cover released after being dragged up by `distance` pixels.
    RevealRelease { distance: f32 },
}

/// What the recognizer needs to know about the story at each sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureContext {
    pub on_cover: bool,
    pub blocked: bool,
    pub viewport_width: f32,
}

#[derive(Debug, Default)]
pub struct GestureRecognizer {
    sample: Option<GestureSample>,
}

impl GestureRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample(&self) -> Option<&GestureSample> {
        self.sample.as_ref()
    }

    /// Whether the host should suppress its default scrolling for the live gesture.
    pub fn suppresses_scrolling(&self) -> bool {
        self.sample.is_some_and(|s| s.axis != Axis::None)
    }

    pub fn pointer_down(&mut self, x: f32, y: f32, ctx: GestureContext) {
        if ctx.blocked {
            self.sample = None;
            return;
        }
        self.sample = Some(GestureSample {
            start_x: x,
            start_y: y,
            current_x: x,
            current_y: y,
            axis: Axis::None,
            drag_distance: 0.0,
        });
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, ctx: GestureContext) -> Option<Intent> {
        if ctx.blocked {
            self.sample = None;
            return None;
        }
        let sample = self.sample.as_mut()?;
        sample.current_x = x;
        sample.current_y = y;

        let dx = x - sample.start_x;
        let dy = y - sample.start_y;

        if ctx.on_cover && dy < -VERTICAL_START_PX && dy.abs() > dx.abs() {
            sample.axis = Axis::Vertical;
            sample.drag_distance = sample.start_y - y;
            return Some(Intent::RevealDrag {
                distance: sample.drag_distance,
            });
        }
        if dx.abs() > dy.abs() && dx.abs() > HORIZONTAL_START_PX && sample.axis == Axis::None {
            sample.axis = Axis::Horizontal;
        }
        None
    }

    pub fn pointer_up(&mut self, x: f32, y: f32, ctx: GestureContext) -> Option<Intent> {
        let sample = self.sample.take()?;
        if ctx.blocked {
            return None;
        }

        if sample.axis == Axis::Vertical {
            if ctx.on_cover {
                return Some(Intent::RevealRelease {
                    distance: sample.drag_distance,
                });
            }
            return None;
        }

        let dx = x - sample.start_x;
        let dy = y - sample.start_y;

        if dx.abs() > dy.abs() {
            if dx > SWIPE_COMMIT_PX {
                return Some(Intent::Prev(Trigger::Swipe));
            }
            if dx < -SWIPE_COMMIT_PX {
                return Some(Intent::Next(Trigger::Swipe));
            }
        }

        if dx.abs() <= TAP_SLOP_PX && dy.abs() <= TAP_SLOP_PX {
            if x < ctx.viewport_width * TAP_BACK_ZONE {
                return Some(Intent::Prev(Trigger::Tap));
            }
            return Some(Intent::Next(Trigger::Tap));
        }

        None
    }

    /// Drop any in-flight sample (pointer left the window, replay, ...).
    pub fn cancel(&mut self) {
        self.sample = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(on_cover: bool) -> GestureContext {
        GestureContext {
            on_cover,
            blocked: false,
            viewport_width: 400.0,
        }
    }

    fn blocked() -> GestureContext {
        GestureContext {
            on_cover: false,
            blocked: true,
            viewport_width: 400.0,
        }
    }

    #[test]
    fn test_swipe_left_goes_next() {
        let mut g = GestureRecognizer::new();
        g.pointer_down(300.0, 200.0, ctx(false));
        assert_eq!(g.pointer_move(250.0, 205.0, ctx(false)), None);
        assert!(g.suppresses_scrolling());
        assert_eq!(
            g.pointer_up(200.0, 210.0, ctx(false)),
            Some(Intent::Next(Trigger::Swipe))
        );
        assert!(g.sample().is_none());
    }

    #[test]
    fn test_swipe_right_goes_prev() {
        let mut g = GestureRecognizer::new();
        g.pointer_down(100.0, 200.0, ctx(false));
        assert_eq!(
            g.pointer_up(180.0, 190.0, ctx(false)),
            Some(Intent::Prev(Trigger::Swipe))
        );
    }

    #[test]
    fn test_small_jitter_is_ignored() {
        let mut g = GestureRecognizer::new();
        g.pointer_down(200.0, 200.0, ctx(false));
        assert_eq!(g.pointer_up(230.0, 215.0, ctx(false)), None);
    }

    #[test]
    fn test_mostly_vertical_release_is_ignored_off_cover() {
        let mut g = GestureRecognizer::new();
        g.pointer_down(200.0, 400.0, ctx(false));
        assert_eq!(g.pointer_move(190.0, 300.0, ctx(false)), None);
        assert_eq!(g.pointer_up(140.0, 200.0, ctx(false)), None);
    }

    #[test]
    fn test_tap_zones() {
        let mut g = GestureRecognizer::new();
        g.pointer_down(50.0, 300.0, ctx(false));
        assert_eq!(
            g.pointer_up(52.0, 303.0, ctx(false)),
            Some(Intent::Prev(Trigger::Tap))
        );
        g.pointer_down(300.0, 300.0, ctx(false));
        assert_eq!(
            g.pointer_up(300.0, 300.0, ctx(false)),
            Some(Intent::Next(Trigger::Tap))
        );
    }

    #[test]
    fn test_vertical_drag_on_cover_reports_distance() {
        let mut g = GestureRecognizer::new();
        g.pointer_down(200.0, 900.0, ctx(true));
        // Not far enough yet.
        assert_eq!(g.pointer_move(200.0, 885.0, ctx(true)), None);
        assert_eq!(
            g.pointer_move(205.0, 700.0, ctx(true)),
            Some(Intent::RevealDrag { distance: 200.0 })
        );
        assert!(g.suppresses_scrolling());
        assert_eq!(
            g.pointer_up(205.0, 500.0, ctx(true)),
            Some(Intent::RevealRelease { distance: 200.0 })
        );
    }

    #[test]
    fn test_vertical_drag_needs_cover() {
        let mut g = GestureRecognizer::new();
        g.pointer_down(200.0, 900.0, ctx(false));
        assert_eq!(g.pointer_move(200.0, 600.0, ctx(false)), None);
        assert_eq!(g.sample().map(|s| s.axis), Some(Axis::None));
    }

    #[test]
    fn test_blocked_input_produces_nothing() {
        let mut g = GestureRecognizer::new();
        g.pointer_down(300.0, 200.0, blocked());
        assert!(g.sample().is_none());
        assert_eq!(g.pointer_move(100.0, 200.0, blocked()), None);
        assert_eq!(g.pointer_up(100.0, 200.0, blocked()), None);
    }

    #[test]
    fn test_block_arriving_mid_gesture_discards_it() {
        let mut g = GestureRecognizer::new();
        g.pointer_down(300.0, 200.0, ctx(false));
        assert_eq!(g.pointer_up(100.0, 200.0, blocked()), None);
        assert!(g.sample().is_none());
    }
}
