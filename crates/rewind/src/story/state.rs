use std::collections::BTreeSet;

use super::command::{BarState, ProgressView, SlideVisual};

/// What caused a navigation request. Drives timings and the cover rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Tap,
    Key,
    Swipe,
    Auto,
    VerticalReveal,
}

impl Trigger {
    /// Tap zones and arrow keys share the quick "snap" choreography.
    pub fn is_tap_like(self) -> bool {
        matches!(self, Trigger::Tap | Trigger::Key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Transitioning {
        from: usize,
        to: usize,
        trigger: Trigger,
    },
    QuizBlocked {
        slide: usize,
    },
}

/// Progress of the first-slide vertical reveal gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoverReveal {
    Rest,
    /// Finger down, cover following it.
    Dragging { fraction: f32 },
    /// Released below threshold, animating back.
    SnappingBack,
    /// Released past threshold (or activated), animating away.
    Committing,
}

#[derive(Debug, Clone)]
pub struct NavigationState {
    pub(super) current: usize,
    pub(super) total: usize,
    pub(super) phase: Phase,
    pub(super) cover: CoverReveal,
    pub(super) completed_quizzes: BTreeSet<usize>,
    /// Bumped by replay; timers from an older epoch are ignored.
    pub(super) epoch: u32,
}

impl NavigationState {
    pub fn new(total: usize) -> Self {
        Self {
            current: 0,
            total: total.max(1),
            phase: Phase::Idle,
            cover: CoverReveal::Rest,
            completed_quizzes: BTreeSet::new(),
            epoch: 0,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn last(&self) -> usize {
        self.total - 1
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cover(&self) -> CoverReveal {
        self.cover
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, Phase::Transitioning { .. })
    }

    pub fn quiz_active(&self) -> bool {
        matches!(self.phase, Phase::QuizBlocked { .. })
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn completed_quizzes(&self) -> &BTreeSet<usize> {
        &self.completed_quizzes
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Auto-advance only runs between the cover and the final slide.
    pub fn dwells(&self, slide: usize) -> bool {
        slide > 0 && slide < self.last()
    }
}

/// Visual placement of every slide for the given state.
pub fn slide_visuals(state: &NavigationState) -> Vec<SlideVisual> {
    let current = state.current;
    let revealing = state.current == 0 && state.cover != CoverReveal::Rest;
    (0..state.total)
        .map(|i| {
            if i == current {
                SlideVisual::Active
            } else if i < current {
                SlideVisual::Previous
            } else if revealing && i == 1 {
                SlideVisual::Revealing
            } else {
                SlideVisual::Hidden
            }
        })
        .collect()
}

pub fn progress_bars(current: usize, total: usize) -> ProgressView {
    let visible = current != 0 && current + 1 != total;
    let bars = (0..total)
        .map(|i| match i.cmp(&current) {
            std::cmp::Ordering::Less => BarState::Completed,
            std::cmp::Ordering::Equal => BarState::Active,
            std::cmp::Ordering::Greater => BarState::Pending,
        })
        .collect();
    ProgressView { visible, bars }
}
