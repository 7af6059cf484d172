//! Entrance choreography and the number/reel reveals.
//!
//! Everything here is a pure function of elapsed milliseconds so the renderer
//! can ask "where is this element now" every frame without keeping tweens.

use crate::deck::{Slide, SlideKind};

/// Counters count up over this long once content is revealed.
pub const COUNTER_MS: u64 = 2000;
/// The slot reel spins for this long.
pub const REEL_SPIN_MS: u64 = 3000;
/// Items per reel cycle (one week).
pub const REEL_CYCLE: u32 = 7;

fn unit(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

pub fn power2_out(t: f32) -> f32 {
    let t = unit(t);
    1.0 - (1.0 - t).powi(2)
}

pub fn power3_out(t: f32) -> f32 {
    let t = unit(t);
    1.0 - (1.0 - t).powi(3)
}

pub fn power4_out(t: f32) -> f32 {
    let t = unit(t);
    1.0 - (1.0 - t).powi(4)
}

/// Overshoots past 1 before settling; `s` controls how far.
pub fn back_out(t: f32, s: f32) -> f32 {
    let t = unit(t) - 1.0;
    1.0 + (s + 1.0) * t.powi(3) + s * t.powi(2)
}

pub fn ease_in_out(t: f32) -> f32 {
    let t = unit(t);
    -((std::f32::consts::PI * t).cos() - 1.0) / 2.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ease {
    Power2Out,
    Power3Out,
    Power4Out,
    BackOut(f32),
    InOut,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Ease::Power2Out => power2_out(t),
            Ease::Power3Out => power3_out(t),
            Ease::Power4Out => power4_out(t),
            Ease::BackOut(s) => back_out(t, s),
            Ease::InOut => ease_in_out(t),
        }
    }
}

/// Parts of a slide that animate independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Eyebrow,
    Heading,
    Hero,
    Stat(usize),
    Body,
    Reel,
    /// The reel's resting label, shown once it stops.
    Landing,
    /// Swipe-up hint on the cover, replay button on the outro.
    Action,
}

/// Offset, scale and opacity of an element relative to its resting layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub dx: f32,
    pub dy: f32,
    pub scale: f32,
    pub opacity: f32,
}

impl Pose {
    pub const REST: Pose = Pose {
        dx: 0.0,
        dy: 0.0,
        scale: 1.0,
        opacity: 1.0,
    };

    pub const HIDDEN: Pose = Pose {
        dx: 0.0,
        dy: 0.0,
        scale: 1.0,
        opacity: 0.0,
    };

    fn rise(dy: f32) -> Self {
        Self {
            dy,
            opacity: 0.0,
            ..Self::REST
        }
    }

    fn grow(scale: f32) -> Self {
        Self {
            scale,
            opacity: 0.0,
            ..Self::REST
        }
    }

    fn lerp(self, to: Pose, t: f32) -> Pose {
        Pose {
            dx: self.dx + (to.dx - self.dx) * t,
            dy: self.dy + (to.dy - self.dy) * t,
            scale: self.scale + (to.scale - self.scale) * t,
            // Overshooting eases may not push opacity past opaque.
            opacity: (self.opacity + (to.opacity - self.opacity) * t).clamp(0.0, 1.0),
        }
    }
}

/// One element's entrance tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cue {
    pub element: Element,
    pub from: Pose,
    pub delay_ms: u64,
    pub duration_ms: u64,
    pub ease: Ease,
}

impl Cue {
    fn new(element: Element, from: Pose, delay_ms: u64, duration_ms: u64, ease: Ease) -> Self {
        Self {
            element,
            from,
            delay_ms,
            duration_ms,
            ease,
        }
    }

    pub fn end_ms(&self) -> u64 {
        self.delay_ms + self.duration_ms
    }

    pub fn pose_at(&self, elapsed_ms: u64) -> Pose {
        if elapsed_ms < self.delay_ms {
            return self.from;
        }
        let t = (elapsed_ms - self.delay_ms) as f32 / self.duration_ms.max(1) as f32;
        self.from.lerp(Pose::REST, self.ease.apply(t))
    }
}

/// Staggered entrance of every element a slide shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Choreography {
    cues: Vec<Cue>,
}

impl Choreography {
    pub fn for_slide(slide: &Slide) -> Self {
        let mut cues = Vec::new();
        let header = Pose::rise(20.0);
        match slide.kind {
            SlideKind::Cover => {
                cues.push(Cue::new(Element::Eyebrow, header, 0, 800, Ease::Power3Out));
                cues.push(Cue::new(Element::Heading, Pose::rise(30.0), 0, 800, Ease::Power3Out));
                cues.push(Cue::new(Element::Body, header, 150, 800, Ease::Power3Out));
                cues.push(Cue::new(Element::Action, header, 300, 800, Ease::Power3Out));
            }
            SlideKind::Stats => {
                cues.push(Cue::new(Element::Eyebrow, header, 0, 600, Ease::Power3Out));
                cues.push(Cue::new(Element::Heading, header, 0, 600, Ease::Power3Out));
                if slide.hero.is_some() {
                    cues.push(Cue::new(
                        Element::Hero,
                        Pose::grow(0.9),
                        200,
                        600,
                        Ease::BackOut(1.2),
                    ));
                }
                for i in 0..slide.stats.len() {
                    cues.push(Cue::new(
                        Element::Stat(i),
                        Pose::rise(30.0),
                        400 + 100 * i as u64,
                        600,
                        Ease::Power3Out,
                    ));
                }
                cues.push(Cue::new(Element::Body, header, 500, 600, Ease::Power3Out));
            }
            SlideKind::Reel => {
                cues.push(Cue::new(Element::Eyebrow, header, 0, 600, Ease::Power3Out));
                cues.push(Cue::new(Element::Heading, header, 0, 600, Ease::Power3Out));
                cues.push(Cue::new(Element::Reel, Pose::grow(0.95), 0, 300, Ease::Power3Out));
                cues.push(Cue::new(
                    Element::Landing,
                    Pose::grow(0.8),
                    REEL_SPIN_MS,
                    500,
                    Ease::BackOut(1.5),
                ));
                cues.push(Cue::new(Element::Body, header, REEL_SPIN_MS + 500, 600, Ease::Power3Out));
            }
            SlideKind::Outro => {
                cues.push(Cue::new(Element::Hero, Pose::grow(0.8), 0, 800, Ease::BackOut(1.3)));
                cues.push(Cue::new(Element::Heading, Pose::rise(30.0), 300, 600, Ease::Power3Out));
                cues.push(Cue::new(Element::Body, header, 500, 600, Ease::Power3Out));
                cues.push(Cue::new(Element::Action, Pose::rise(30.0), 700, 600, Ease::Power3Out));
            }
        }
        Self { cues }
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn duration_ms(&self) -> u64 {
        self.cues.iter().map(Cue::end_ms).max().unwrap_or(0)
    }

    /// Pose of `element`, or `Pose::REST` if it has no cue.
    pub fn pose(&self, element: Element, elapsed_ms: u64) -> Pose {
        self.cues
            .iter()
            .find(|c| c.element == element)
            .map_or(Pose::REST, |c| c.pose_at(elapsed_ms))
    }
}

/// Value a counter shows `elapsed_ms` after the reveal started. Always whole,
/// and exactly `target` once [`COUNTER_MS`] has passed.
pub fn counter_value(target: u64, elapsed_ms: u64) -> u64 {
    if elapsed_ms >= COUNTER_MS {
        return target;
    }
    let t = elapsed_ms as f64 / COUNTER_MS as f64;
    let eased = 1.0 - (1.0 - t).powi(2);
    ((target as f64) * eased).ceil().min(target as f64) as u64
}

/// Total reel travel: full spins through the cycle, then down to `target_index`.
pub fn reel_distance(target_index: usize, spins: u32, item_height: f32, cycle_len: u32) -> f32 {
    -(target_index as f32 * item_height + spins as f32 * cycle_len as f32 * item_height)
}

/// Reel offset at `elapsed_ms` into the spin.
pub fn reel_offset(distance: f32, elapsed_ms: u64) -> f32 {
    distance * power4_out(elapsed_ms as f32 / REEL_SPIN_MS as f32)
}

/// The animation side of the story's commands.
pub trait Playback {
    /// Start the entrance choreography of `slide`.
    fn play(&mut self, slide: usize, now_ms: u64);
    /// Start the content reveal (counters, reel) of `slide`.
    fn reveal_content(&mut self, slide: usize, now_ms: u64);
}

/// Remembers when each slide's entrance and reveal started.
#[derive(Debug, Clone, Default)]
pub struct Choreographer {
    entrances: Vec<Option<u64>>,
    reveals: Vec<Option<u64>>,
}

impl Choreographer {
    pub fn new(slides: usize) -> Self {
        Self {
            entrances: vec![None; slides],
            reveals: vec![None; slides],
        }
    }

    pub fn entrance_elapsed(&self, slide: usize, now_ms: u64) -> Option<u64> {
        self.entrances
            .get(slide)
            .copied()
            .flatten()
            .map(|start| now_ms.saturating_sub(start))
    }

    pub fn reveal_elapsed(&self, slide: usize, now_ms: u64) -> Option<u64> {
        self.reveals
            .get(slide)
            .copied()
            .flatten()
            .map(|start| now_ms.saturating_sub(start))
    }

    /// Forget the reveal so the slide shows its pre-reveal state again.
    pub fn hold(&mut self, slide: usize) {
        if let Some(r) = self.reveals.get_mut(slide) {
            *r = None;
        }
    }
}

impl Playback for Choreographer {
    fn play(&mut self, slide: usize, now_ms: u64) {
        if let Some(start) = self.entrances.get_mut(slide) {
            *start = Some(now_ms);
        }
        self.hold(slide);
    }

    fn reveal_content(&mut self, slide: usize, now_ms: u64) {
        if let Some(start) = self.reveals.get_mut(slide) {
            *start = Some(now_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Hero, Stat};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_easings_hit_endpoints() {
        for ease in [
            Ease::Power2Out,
            Ease::Power3Out,
            Ease::Power4Out,
            Ease::BackOut(1.7),
            Ease::InOut,
        ] {
            assert!(approx(ease.apply(0.0), 0.0), "{ease:?} at 0");
            assert!(approx(ease.apply(1.0), 1.0), "{ease:?} at 1");
            assert!(approx(ease.apply(2.0), 1.0), "{ease:?} clamps");
        }
    }

    #[test]
    fn test_back_out_overshoots() {
        let peak = (1..100)
            .map(|i| back_out(i as f32 / 100.0, 1.7))
            .fold(0.0f32, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_counter_reaches_target_exactly() {
        assert_eq!(counter_value(1284, 0), 0);
        assert_eq!(counter_value(1284, COUNTER_MS), 1284);
        assert_eq!(counter_value(1284, 10_000), 1284);
        let mut last = 0;
        for ms in (0..=COUNTER_MS).step_by(50) {
            let v = counter_value(1284, ms);
            assert!(v >= last && v <= 1284);
            last = v;
        }
    }

    #[test]
    fn test_counter_is_front_loaded() {
        // Half the time shows three quarters of the value.
        assert_eq!(counter_value(100, COUNTER_MS / 2), 75);
    }

    #[test]
    fn test_reel_distance_lands_on_target() {
        // Two spins of a week, then down to the ninth item.
        assert_eq!(reel_distance(8, 2, 90.0, REEL_CYCLE), -(8.0 * 90.0 + 14.0 * 90.0));
        let d = reel_distance(8, 2, 90.0, REEL_CYCLE);
        assert_eq!(reel_offset(d, 0), 0.0);
        assert!(approx(reel_offset(d, REEL_SPIN_MS), d));
        assert!(reel_offset(d, REEL_SPIN_MS / 2) < d / 2.0);
    }

    #[test]
    fn test_reel_distance_with_huge_spin_count() {
        let d = reel_distance(1, 1_000_000_000, 90.0, REEL_CYCLE);
        assert!(d.is_finite());
        assert!(d < -1.0e11);
    }

    #[test]
    fn test_stats_choreography_staggers_stats() {
        let slide = Slide {
            hero: Some(Hero {
                value: 10,
                label: String::new(),
                prefix: None,
                suffix: None,
            }),
            stats: (0..3)
                .map(|i| Stat {
                    label: format!("s{i}"),
                    value: i,
                    suffix: None,
                })
                .collect(),
            ..Slide::default()
        };
        let choreo = Choreography::for_slide(&slide);
        let delays: Vec<u64> = choreo
            .cues()
            .iter()
            .filter(|c| matches!(c.element, Element::Stat(_)))
            .map(|c| c.delay_ms)
            .collect();
        assert_eq!(delays, vec![400, 500, 600]);
        assert_eq!(choreo.duration_ms(), 1200);

        let hero = choreo.pose(Element::Hero, 0);
        assert_eq!(hero.opacity, 0.0);
        assert!(approx(hero.scale, 0.9));
        assert_eq!(choreo.pose(Element::Hero, 800), Pose::REST);
    }

    #[test]
    fn test_pose_holds_until_delay() {
        let cue = Cue::new(Element::Body, Pose::rise(20.0), 500, 600, Ease::Power3Out);
        assert_eq!(cue.pose_at(0), cue.from);
        assert_eq!(cue.pose_at(499), cue.from);
        let mid = cue.pose_at(800);
        assert!(mid.dy > 0.0 && mid.dy < 20.0);
        assert_eq!(cue.pose_at(1100), Pose::REST);
    }

    #[test]
    fn test_missing_element_rests() {
        let choreo = Choreography::for_slide(&Slide::default());
        assert_eq!(choreo.pose(Element::Reel, 0), Pose::REST);
    }

    #[test]
    fn test_choreographer_restarts_on_replay() {
        let mut c = Choreographer::new(3);
        assert_eq!(c.entrance_elapsed(1, 100), None);
        c.play(1, 100);
        c.reveal_content(1, 150);
        assert_eq!(c.entrance_elapsed(1, 400), Some(300));
        assert_eq!(c.reveal_elapsed(1, 400), Some(250));

        // A later entrance overwrites the earlier one and hides the reveal.
        c.play(1, 1000);
        assert_eq!(c.entrance_elapsed(1, 1000), Some(0));
        assert_eq!(c.reveal_elapsed(1, 1000), None);

        c.play(9, 0);
        assert_eq!(c.entrance_elapsed(9, 0), None);
    }
}
