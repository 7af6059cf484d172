//! Host-side picture of the story, driven only by [`Command`]s.
//!
//! Everything here is time-parameterised so it can be sampled at any frame
//! and tested without a window.

use crate::animation::{ease_in_out, power3_out};
use crate::story::{BarState, Command, CoverSettle, OptionMark, ProgressView, SlideVisual};

pub const SNAP_MS: u64 = 300;
pub const SLIDE_MS: u64 = 600;
pub const QUIZ_FADE_IN_MS: u64 = 300;
pub const PARTICLE_COUNT: usize = 36;
pub const PARTICLE_LIFE_MS: u64 = 1200;

/// Horizontal resting place of a slide, in viewport widths.
fn target_x(visual: SlideVisual) -> f32 {
    match visual {
        SlideVisual::Hidden => 1.0,
        SlideVisual::Previous => -1.0,
        SlideVisual::Active | SlideVisual::Revealing => 0.0,
    }
}

/// A value moving from `from` to `to` between `start_ms` and `start_ms + duration_ms`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Tween {
    from: f32,
    to: f32,
    start_ms: u64,
    duration_ms: u64,
}

impl Tween {
    fn settled(value: f32) -> Self {
        Self {
            from: value,
            to: value,
            start_ms: 0,
            duration_ms: 0,
        }
    }

    fn at(&self, now_ms: u64, ease: fn(f32) -> f32) -> f32 {
        if self.duration_ms == 0 || now_ms >= self.start_ms + self.duration_ms {
            return self.to;
        }
        let t = now_ms.saturating_sub(self.start_ms) as f32 / self.duration_ms as f32;
        self.from + (self.to - self.from) * ease(t)
    }

    fn is_moving(&self, now_ms: u64) -> bool {
        self.duration_ms > 0 && now_ms < self.start_ms + self.duration_ms
    }

    fn retarget(&mut self, to: f32, now_ms: u64, duration_ms: u64, ease: fn(f32) -> f32) {
        if (self.to - to).abs() < f32::EPSILON {
            return;
        }
        *self = Self {
            from: self.at(now_ms, ease),
            to,
            start_ms: now_ms,
            duration_ms,
        };
    }
}

/// Fill of the active progress bar.
#[derive(Debug, Clone)]
pub struct ProgressStrip {
    view: ProgressView,
    started_ms: u64,
    paused_at: Option<u64>,
}

impl ProgressStrip {
    fn new() -> Self {
        Self {
            view: ProgressView {
                visible: false,
                bars: Vec::new(),
            },
            started_ms: 0,
            paused_at: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.view.visible
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// 0..1 fill of every bar at `now_ms`, given the auto-advance dwell.
    pub fn fills(&self, now_ms: u64, dwell_ms: u64) -> Vec<f32> {
        let clock = self.paused_at.unwrap_or(now_ms);
        let active = (clock.saturating_sub(self.started_ms) as f32 / dwell_ms.max(1) as f32)
            .clamp(0.0, 1.0);
        self.view
            .bars
            .iter()
            .map(|bar| match bar {
                BarState::Completed => 1.0,
                BarState::Active => active,
                BarState::Pending => 0.0,
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct QuizOverlay {
    pub slide: usize,
    pub question: String,
    pub options: Vec<String>,
    pub marks: Vec<Option<OptionMark>>,
    pub countdown_ms: Option<u64>,
    opened_ms: u64,
    frozen_remaining: Option<u64>,
    hiding: Option<(u64, u64)>,
}

impl QuizOverlay {
    /// Whether answers can still be given.
    pub fn is_open(&self) -> bool {
        self.frozen_remaining.is_none()
            && self.hiding.is_none()
            && self.marks.iter().all(Option::is_none)
    }

    /// Remaining share of the countdown, `None` for an untimed quiz.
    pub fn countdown_fraction(&self, now_ms: u64) -> Option<f32> {
        let total = self.countdown_ms?;
        let remaining = self
            .frozen_remaining
            .unwrap_or_else(|| total.saturating_sub(now_ms.saturating_sub(self.opened_ms)));
        Some(remaining as f32 / total.max(1) as f32)
    }

    pub fn opacity(&self, now_ms: u64) -> f32 {
        let fade_in =
            (now_ms.saturating_sub(self.opened_ms) as f32 / QUIZ_FADE_IN_MS as f32).min(1.0);
        match self.hiding {
            Some((start, duration)) => {
                let t = now_ms.saturating_sub(start) as f32 / duration.max(1) as f32;
                fade_in * (1.0 - t).clamp(0.0, 1.0)
            }
            None => fade_in,
        }
    }

    fn is_gone(&self, now_ms: u64) -> bool {
        self.hiding
            .is_some_and(|(start, duration)| now_ms >= start + duration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Offset from the burst origin in points (before scaling).
    pub dx: f32,
    pub dy: f32,
    pub alpha: f32,
    /// Index into the confetti palette.
    pub hue: usize,
}

#[derive(Debug, Clone)]
pub struct Stage {
    placements: Vec<Tween>,
    visuals: Vec<SlideVisual>,
    snap: bool,
    cover: Tween,
    /// The cover left through the top; park it without sliding back.
    cover_committed: bool,
    progress: ProgressStrip,
    quiz: Option<QuizOverlay>,
    burst_at: Option<u64>,
}

impl Stage {
    pub fn new(slides: usize) -> Self {
        Self {
            placements: vec![Tween::settled(1.0); slides],
            visuals: vec![SlideVisual::Hidden; slides],
            snap: false,
            cover: Tween::settled(0.0),
            cover_committed: false,
            progress: ProgressStrip::new(),
            quiz: None,
            burst_at: None,
        }
    }

    /// Apply one command. Returns `false` for commands the stage does not own.
    pub fn apply(&mut self, command: &Command, now_ms: u64, viewport_height: f32) -> bool {
        match command {
            Command::Stage { visuals, snap } => self.place(visuals, *snap, now_ms),
            Command::ClearSnap => self.snap = false,
            Command::DragCover { offset_px, .. } => self.cover = Tween::settled(*offset_px),
            Command::SettleCover {
                settle,
                duration_ms,
            } => {
                let to = match settle {
                    CoverSettle::Commit => -viewport_height,
                    CoverSettle::SnapBack => 0.0,
                };
                self.cover_committed = *settle == CoverSettle::Commit;
                self.cover.retarget(to, now_ms, *duration_ms, power3_out);
            }
            Command::Progress(view) => {
                self.progress = ProgressStrip {
                    view: view.clone(),
                    started_ms: now_ms,
                    paused_at: None,
                };
            }
            Command::PauseProgress { .. } => {
                self.progress.paused_at.get_or_insert(now_ms);
            }
            Command::ResumeProgress { .. } => {
                self.progress.started_ms = now_ms;
                self.progress.paused_at = None;
            }
            Command::ShowQuiz {
                slide,
                question,
                options,
                countdown_ms,
            } => {
                self.quiz = Some(QuizOverlay {
                    slide: *slide,
                    question: question.clone(),
                    options: options.clone(),
                    marks: vec![None; options.len()],
                    countdown_ms: *countdown_ms,
                    opened_ms: now_ms,
                    frozen_remaining: None,
                    hiding: None,
                });
            }
            Command::FreezeCountdown { remaining_ms } => {
                if let Some(quiz) = &mut self.quiz {
                    quiz.frozen_remaining = Some(*remaining_ms);
                }
            }
            Command::MarkOption { index, mark } => {
                if let Some(slot) = self.quiz.as_mut().and_then(|q| q.marks.get_mut(*index)) {
                    *slot = Some(*mark);
                }
            }
            Command::Celebrate => self.burst_at = Some(now_ms),
            Command::HideQuiz { dismiss_ms } => {
                if let Some(quiz) = &mut self.quiz {
                    quiz.hiding = Some((now_ms, *dismiss_ms));
                }
            }
            _ => return false,
        }
        true
    }

    fn place(&mut self, visuals: &[SlideVisual], snap: bool, now_ms: u64) {
        let first = self.visuals.iter().all(|v| *v == SlideVisual::Hidden)
            && self.placements.iter().all(|p| !p.is_moving(now_ms));
        let duration = if snap { SNAP_MS } else { SLIDE_MS };
        if visuals.len() != self.placements.len() {
            self.placements = vec![Tween::settled(1.0); visuals.len()];
        }
        let park_cover = std::mem::take(&mut self.cover_committed)
            && visuals.first() == Some(&SlideVisual::Previous);
        for (i, (placement, visual)) in self.placements.iter_mut().zip(visuals).enumerate() {
            let to = target_x(*visual);
            if first || (park_cover && i == 0) {
                *placement = Tween::settled(to);
            } else {
                placement.retarget(to, now_ms, duration, ease_in_out);
            }
        }
        self.visuals = visuals.to_vec();
        self.snap = snap;
    }

    /// Drop overlays whose exit animation has finished.
    pub fn prune(&mut self, now_ms: u64) {
        if self.quiz.as_ref().is_some_and(|q| q.is_gone(now_ms)) {
            self.quiz = None;
        }
        if self
            .burst_at
            .is_some_and(|start| now_ms >= start + PARTICLE_LIFE_MS)
        {
            self.burst_at = None;
        }
    }

    pub fn visual(&self, slide: usize) -> SlideVisual {
        self.visuals.get(slide).copied().unwrap_or(SlideVisual::Hidden)
    }

    pub fn is_snapping(&self) -> bool {
        self.snap
    }

    /// Horizontal offset of `slide` in viewport widths.
    pub fn slide_x(&self, slide: usize, now_ms: u64) -> f32 {
        self.placements
            .get(slide)
            .map_or(1.0, |p| p.at(now_ms, ease_in_out))
    }

    /// Whether any part of `slide` is inside the viewport.
    pub fn is_on_stage(&self, slide: usize, now_ms: u64) -> bool {
        self.slide_x(slide, now_ms).abs() < 1.0
            || self.visual(slide) == SlideVisual::Revealing
    }

    /// Vertical offset of the cover in points; negative is up.
    pub fn cover_offset(&self, now_ms: u64) -> f32 {
        self.cover.at(now_ms, power3_out)
    }

    pub fn progress(&self) -> &ProgressStrip {
        &self.progress
    }

    pub fn quiz(&self) -> Option<&QuizOverlay> {
        self.quiz.as_ref()
    }

    /// Confetti from the last correct answer, relative to its origin.
    pub fn particles(&self, now_ms: u64) -> Vec<Particle> {
        let Some(start) = self.burst_at else {
            return Vec::new();
        };
        let age = now_ms.saturating_sub(start);
        if age >= PARTICLE_LIFE_MS {
            return Vec::new();
        }
        let t = age as f32 / 1000.0;
        let life = age as f32 / PARTICLE_LIFE_MS as f32;
        (0..PARTICLE_COUNT)
            .map(|i| {
                // Golden-angle spread with a few speed bands.
                let angle = i as f32 * 2.399_963;
                let speed = 260.0 + 70.0 * ((i * 7) % 5) as f32;
                Particle {
                    dx: angle.cos() * speed * t,
                    dy: angle.sin() * speed * t + 0.5 * 900.0 * t * t,
                    alpha: 1.0 - power3_out(life),
                    hue: i % 4,
                }
            })
            .collect()
    }

    /// Whether anything is still moving at `now_ms`.
    pub fn is_animating(&self, now_ms: u64) -> bool {
        self.placements.iter().any(|p| p.is_moving(now_ms))
            || self.cover.is_moving(now_ms)
            || self.quiz.is_some()
            || self.burst_at.is_some()
    }
}
