//! Slide and quiz orchestration.
//!
//! [`Story`] owns the navigation state, the quiz controller, the gesture
//! recognizer and the timer queue. It has no clock of its own: the host passes
//! a monotonic `now_ms` into every call and runs [`Story::tick`] each frame.
//! Effects come out as [`Command`]s through [`Story::take_commands`].

pub mod command;
pub mod gesture;
mod navigation;
pub mod quiz;
pub mod state;
pub mod timers;

#[cfg(test)]
mod tests;

pub use command::{
    BarState, Command, CoverSettle, HapticPattern, OptionMark, ProgressView, SlideVisual,
    SoundCue,
};
pub use gesture::{GestureContext, GestureRecognizer, Intent};
pub use quiz::{Outcome, QuizController, QuizResolution, QuizSession, QuizSpec, QuizTiming};
pub use state::{CoverReveal, NavigationState, Phase, Trigger};
pub use timers::{Fired, TimerEvent, TimerRole, Timers};

pub const OPENED_EVENT: &str = "opened_rewind_overall_2025";
pub const VIEWED_EVENT: &str = "viewed_rewind_overall_2025";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// Delay before the entrance animation after a tap transition.
    pub tap_content_ms: u64,
    /// Delay before the entrance animation after a swipe or auto transition.
    pub content_ms: u64,
    pub tap_unlock_ms: u64,
    pub unlock_ms: u64,
    /// Auto-advance dwell.
    pub dwell_ms: u64,
    pub cover_entrance_ms: u64,
    pub cover_commit_ms: u64,
    pub cover_snap_ms: u64,
    /// Fraction of the viewport height the cover must be dragged to commit.
    pub reveal_threshold: f32,
    pub quiz: QuizTiming,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            tap_content_ms: 50,
            content_ms: 100,
            tap_unlock_ms: 300,
            unlock_ms: 600,
            dwell_ms: 5000,
            cover_entrance_ms: 100,
            cover_commit_ms: 800,
            cover_snap_ms: 300,
            reveal_threshold: 0.3,
            quiz: QuizTiming::default(),
        }
    }
}

impl Timing {
    /// (entrance delay, unlock delay) for a transition started by `trigger`.
    pub fn transition_delays(&self, trigger: Trigger) -> (u64, u64) {
        if trigger.is_tap_like() {
            (self.tap_content_ms, self.tap_unlock_ms)
        } else {
            (self.content_ms, self.unlock_ms)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 390.0,
            height: 844.0,
        }
    }
}

pub struct Story {
    quizzes: Vec<Option<QuizSpec>>,
    timing: Timing,
    state: NavigationState,
    quiz: QuizController,
    timers: Timers,
    gestures: GestureRecognizer,
    viewport: Viewport,
    outbox: Vec<Command>,
    started: bool,
}

impl Story {
    /// One entry per slide; `Some` where the slide carries a quiz.
    /// A quiz on the cover is ignored.
    pub fn new(mut quizzes: Vec<Option<QuizSpec>>, timing: Timing) -> Self {
        if quizzes.is_empty() {
            quizzes.push(None);
        }
        if quizzes[0].take().is_some() {
            tracing::warn!("ignoring quiz on the cover slide");
        }
        let total = quizzes.len();
        Self {
            quizzes,
            timing,
            state: NavigationState::new(total),
            quiz: QuizController::new(timing.quiz),
            timers: Timers::new(),
            gestures: GestureRecognizer::new(),
            viewport: Viewport::default(),
            outbox: Vec::new(),
            started: false,
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn current_slide(&self) -> usize {
        self.state.current()
    }

    pub fn slide_count(&self) -> usize {
        self.state.total()
    }

    pub fn is_transitioning(&self) -> bool {
        self.state.is_transitioning()
    }

    pub fn quiz_active(&self) -> bool {
        self.state.quiz_active()
    }

    pub fn quiz_session(&self) -> Option<&QuizSession> {
        self.quiz.session()
    }

    pub fn last_quiz_resolution(&self) -> Option<QuizResolution> {
        self.quiz.last_resolution()
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport = Viewport { width, height };
        }
    }

    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.outbox)
    }

    fn emit(&mut self, command: Command) {
        self.outbox.push(command);
    }

    /// Run every timer due at or before `now_ms`.
    pub fn tick(&mut self, now_ms: u64) {
        while let Some(fired) = self.timers.pop_due(now_ms) {
            self.handle_timer(fired);
        }
    }

    fn handle_timer(&mut self, fired: Fired) {
        let Fired { due_ms, event, .. } = fired;
        match event {
            TimerEvent::AutoAdvance { epoch } => {
                if self.is_current_epoch(epoch, event) {
                    self.next(Trigger::Auto, due_ms);
                }
            }
            TimerEvent::EnterSlide { slide, epoch } => {
                if self.is_current_epoch(epoch, event) {
                    self.enter_slide(slide, due_ms);
                }
            }
            TimerEvent::Unlock { epoch } => {
                if self.is_current_epoch(epoch, event) {
                    self.unlock(due_ms);
                }
            }
            TimerEvent::CoverCommitted { epoch } => {
                if self.is_current_epoch(epoch, event) {
                    self.finish_cover_commit(due_ms);
                }
            }
            TimerEvent::CoverSnappedBack { epoch } => {
                if self.is_current_epoch(epoch, event) {
                    self.finish_cover_snap_back();
                }
            }
            TimerEvent::QuizTimeout { .. }
            | TimerEvent::QuizRevealCorrect { .. }
            | TimerEvent::QuizResolve { .. }
            | TimerEvent::QuizDismissed { .. } => {
                if let Some(resolution) =
                    self.quiz
                        .on_timer(event, due_ms, &mut self.timers, &mut self.outbox)
                {
                    self.quiz_resolved(resolution, due_ms);
                }
            }
        }
    }

    fn is_current_epoch(&self, epoch: u32, event: TimerEvent) -> bool {
        if epoch == self.state.epoch {
            true
        } else {
            tracing::debug!(?event, current = self.state.epoch, "dropping stale timer");
            false
        }
    }

    // Quiz

    pub fn select_option(&mut self, index: usize, now_ms: u64) -> bool {
        self.quiz
            .select_option(index, now_ms, &mut self.timers, &mut self.outbox)
    }

    pub fn skip_quiz(&mut self, now_ms: u64) -> bool {
        self.quiz.skip(now_ms, &mut self.timers, &mut self.outbox)
    }

    // Pointer input

    fn gesture_context(&self) -> GestureContext {
        GestureContext {
            on_cover: self.state.current() == 0,
            blocked: self.state.quiz_active(),
            viewport_width: self.viewport.width,
        }
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        let ctx = self.gesture_context();
        self.gestures.pointer_down(x, y, ctx);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, now_ms: u64) {
        let ctx = self.gesture_context();
        if let Some(intent) = self.gestures.pointer_move(x, y, ctx) {
            self.apply_intent(intent, now_ms);
        }
    }

    pub fn pointer_up(&mut self, x: f32, y: f32, now_ms: u64) {
        let ctx = self.gesture_context();
        if let Some(intent) = self.gestures.pointer_up(x, y, ctx) {
            self.apply_intent(intent, now_ms);
        }
    }

    pub fn pointer_cancel(&mut self, now_ms: u64) {
        let was_dragging = self
            .gestures
            .sample()
            .is_some_and(|s| s.axis == gesture::Axis::Vertical);
        self.gestures.cancel();
        if was_dragging {
            self.release_reveal(0.0, now_ms);
        }
    }

    pub fn suppresses_scrolling(&self) -> bool {
        self.gestures.suppresses_scrolling()
    }

    fn apply_intent(&mut self, intent: Intent, now_ms: u64) {
        match intent {
            Intent::Next(trigger) => {
                self.next(trigger, now_ms);
            }
            Intent::Prev(trigger) => {
                self.prev(trigger, now_ms);
            }
            Intent::RevealDrag { distance } => self.drag_reveal(distance),
            Intent::RevealRelease { distance } => self.release_reveal(distance, now_ms),
        }
    }
}
