use super::command::{Command, CoverSettle, HapticPattern, SoundCue};
use super::state::{CoverReveal, Phase, Trigger, progress_bars, slide_visuals};
use super::timers::{TimerEvent, TimerRole};
use super::{OPENED_EVENT, QuizResolution, Story, VIEWED_EVENT};

impl Story {
    /// Show the cover. Later calls are ignored; use [`Story::replay`] to restart.
    pub fn start(&mut self, now_ms: u64) {
        if self.started {
            return;
        }
        self.started = true;
        self.emit(Command::Telemetry(OPENED_EVENT));
        self.show_cover(now_ms);
    }

    pub fn next(&mut self, trigger: Trigger, now_ms: u64) -> bool {
        if !self.accepts_navigation(trigger) {
            return false;
        }
        if trigger.is_tap_like() {
            self.emit(Command::Haptic(HapticPattern::Light));
        }
        let current = self.state.current;
        if current >= self.state.last() {
            return false;
        }
        self.go_to_slide(current + 1, trigger, now_ms)
    }

    pub fn prev(&mut self, trigger: Trigger, now_ms: u64) -> bool {
        if !self.accepts_navigation(trigger) {
            return false;
        }
        if trigger.is_tap_like() {
            self.emit(Command::Haptic(HapticPattern::Light));
        }
        let current = self.state.current;
        if current == 0 {
            return false;
        }
        self.go_to_slide(current - 1, trigger, now_ms)
    }

    fn accepts_navigation(&self, trigger: Trigger) -> bool {
        if self.state.is_transitioning() || self.state.quiz_active() {
            tracing::trace!(?trigger, phase = ?self.state.phase, "navigation locked");
            return false;
        }
        // The cover only opens by swipe, vertical reveal or its button.
        !(trigger.is_tap_like() && self.state.current == 0)
    }

    /// Start the animated hand-off to `index`. No-op while locked, when
    /// `index` is the current slide or out of range, or for a tap on the cover.
    pub fn go_to_slide(&mut self, index: usize, trigger: Trigger, now_ms: u64) -> bool {
        if !self.accepts_navigation(trigger) {
            return false;
        }
        let from = self.state.current;
        if index == from || index >= self.state.total {
            return false;
        }

        self.timers.cancel(TimerRole::SlideTimer);
        if self.timers.cancel(TimerRole::CoverSettle) || self.state.cover != CoverReveal::Rest {
            self.state.cover = CoverReveal::Rest;
            self.emit(Command::DragCover {
                offset_px: 0.0,
                fraction: 0.0,
            });
        }

        self.state.phase = Phase::Transitioning {
            from,
            to: index,
            trigger,
        };
        self.state.current = index;

        self.emit(Command::Sound(SoundCue::Swipe));
        self.emit(Command::Haptic(HapticPattern::Light));
        self.emit(Command::Stage {
            visuals: slide_visuals(&self.state),
            snap: trigger.is_tap_like(),
        });
        self.emit(Command::Progress(progress_bars(index, self.state.total)));

        let epoch = self.state.epoch;
        let (content_ms, unlock_ms) = self.timing.transition_delays(trigger);
        self.timers.start(
            TimerRole::TransitionContent,
            now_ms,
            content_ms,
            TimerEvent::EnterSlide {
                slide: index,
                epoch,
            },
        );
        self.timers.start(
            TimerRole::TransitionUnlock,
            now_ms,
            unlock_ms,
            TimerEvent::Unlock { epoch },
        );
        tracing::debug!(from, to = index, ?trigger, "transition started");
        true
    }

    /// Entrance delay elapsed: animate the slide in and check for a quiz.
    pub(super) fn enter_slide(&mut self, slide: usize, now_ms: u64) {
        if slide != self.state.current {
            tracing::debug!(slide, current = self.state.current, "ignoring entrance for hidden slide");
            return;
        }
        self.emit(Command::PlayEntrance { slide });
        if slide == self.state.last() && slide > 0 {
            self.emit(Command::Telemetry(VIEWED_EVENT));
        }
        self.evaluate_slide(slide, now_ms);
    }

    fn quiz_required(&self, slide: usize) -> bool {
        slide > 0
            && !self.state.completed_quizzes.contains(&slide)
            && self.quizzes.get(slide).is_some_and(Option::is_some)
    }

    /// Open the slide's quiz if it still owes one, otherwise reveal its content.
    fn evaluate_slide(&mut self, slide: usize, now_ms: u64) {
        if !self.quiz_required(slide) {
            self.reveal_content(slide);
            if self.state.is_idle() {
                self.arm_auto_advance(now_ms);
            }
            return;
        }
        let Some(spec) = self.quizzes.get(slide).cloned().flatten() else {
            return;
        };

        // The quiz takes over from the transition guard.
        if self.timers.cancel(TimerRole::TransitionUnlock) {
            self.emit(Command::ClearSnap);
        }
        self.timers.cancel(TimerRole::SlideTimer);
        self.state.phase = Phase::QuizBlocked { slide };
        self.emit(Command::PauseProgress { slide });
        self.quiz
            .open(slide, &spec, now_ms, &mut self.timers, &mut self.outbox);
    }

    pub(super) fn unlock(&mut self, now_ms: u64) {
        if !self.state.is_transitioning() {
            return;
        }
        self.state.phase = Phase::Idle;
        self.emit(Command::ClearSnap);
        tracing::debug!(slide = self.state.current, "transition settled");
        self.arm_auto_advance(now_ms);
    }

    fn arm_auto_advance(&mut self, now_ms: u64) {
        let slide = self.state.current;
        if !self.state.is_idle() || !self.state.dwells(slide) {
            return;
        }
        self.timers.start(
            TimerRole::SlideTimer,
            now_ms,
            self.timing.dwell_ms,
            TimerEvent::AutoAdvance {
                epoch: self.state.epoch,
            },
        );
    }

    /// Continuation after the quiz overlay has gone.
    pub(super) fn quiz_resolved(&mut self, resolution: QuizResolution, now_ms: u64) {
        let slide = resolution.slide;
        self.state.completed_quizzes.insert(slide);
        if self.state.quiz_active() {
            self.state.phase = Phase::Idle;
        }
        self.reveal_content(slide);
        self.emit(Command::ResumeProgress { slide });
        if slide < self.state.last() {
            self.timers.start(
                TimerRole::SlideTimer,
                now_ms,
                self.timing.dwell_ms,
                TimerEvent::AutoAdvance {
                    epoch: self.state.epoch,
                },
            );
        }
    }

    fn reveal_content(&mut self, slide: usize) {
        self.emit(Command::RevealContent { slide });
        self.emit(Command::Sound(SoundCue::Reveal));
    }

    /// Back to the cover with every quiz marked done.
    pub fn replay(&mut self, now_ms: u64) {
        self.state.epoch = self.state.epoch.wrapping_add(1);
        self.timers.cancel_all();
        self.quiz.abandon(&mut self.timers, &mut self.outbox);
        self.gestures.cancel();

        self.state.completed_quizzes = (0..self.state.total).collect();
        self.state.phase = Phase::Idle;
        self.state.cover = CoverReveal::Rest;
        self.state.current = 0;

        self.emit(Command::DragCover {
            offset_px: 0.0,
            fraction: 0.0,
        });
        self.emit(Command::Sound(SoundCue::Swipe));
        self.emit(Command::Haptic(HapticPattern::Light));
        tracing::debug!(epoch = self.state.epoch, "replay");
        self.show_cover(now_ms);
    }

    fn show_cover(&mut self, now_ms: u64) {
        self.emit(Command::Stage {
            visuals: slide_visuals(&self.state),
            snap: false,
        });
        self.emit(Command::Progress(progress_bars(0, self.state.total)));
        self.timers.start(
            TimerRole::TransitionContent,
            now_ms,
            self.timing.cover_entrance_ms,
            TimerEvent::EnterSlide {
                slide: 0,
                epoch: self.state.epoch,
            },
        );
    }

    // Vertical reveal on the cover

    fn cover_accepts_reveal(&self) -> bool {
        self.state.current == 0
            && self.state.is_idle()
            && self.state.total > 1
            && self.state.cover != CoverReveal::Committing
    }

    /// Live drag of the cover, `distance` pixels upward.
    pub fn drag_reveal(&mut self, distance: f32) {
        if !self.cover_accepts_reveal() {
            return;
        }
        let fraction = self.reveal_fraction(distance);
        let was_resting = self.state.cover == CoverReveal::Rest;
        self.timers.cancel(TimerRole::CoverSettle);
        self.state.cover = CoverReveal::Dragging { fraction };
        if was_resting {
            self.emit(Command::Stage {
                visuals: slide_visuals(&self.state),
                snap: false,
            });
        }
        self.emit(Command::DragCover {
            offset_px: -distance.max(0.0),
            fraction,
        });
    }

    /// Cover released after a drag of `distance` pixels.
    pub fn release_reveal(&mut self, distance: f32, now_ms: u64) {
        if !self.cover_accepts_reveal() {
            return;
        }
        let fraction = self.reveal_fraction(distance);
        if fraction >= self.timing.reveal_threshold {
            self.commit_reveal(now_ms);
            return;
        }
        self.state.cover = CoverReveal::SnappingBack;
        self.emit(Command::SettleCover {
            settle: CoverSettle::SnapBack,
            duration_ms: self.timing.cover_snap_ms,
        });
        self.timers.start(
            TimerRole::CoverSettle,
            now_ms,
            self.timing.cover_snap_ms,
            TimerEvent::CoverSnappedBack {
                epoch: self.state.epoch,
            },
        );
        tracing::debug!(fraction, "cover snapping back");
    }

    /// The cover's "open" control: same as releasing a full-height drag.
    pub fn activate_reveal(&mut self, now_ms: u64) {
        if self.cover_accepts_reveal() {
            self.commit_reveal(now_ms);
        }
    }

    pub fn reveal_fraction(&self, distance: f32) -> f32 {
        (distance / self.viewport.height).clamp(0.0, 1.0)
    }

    fn commit_reveal(&mut self, now_ms: u64) {
        self.timers.cancel(TimerRole::SlideTimer);
        self.state.phase = Phase::Transitioning {
            from: 0,
            to: 1,
            trigger: Trigger::VerticalReveal,
        };
        self.state.cover = CoverReveal::Committing;
        self.emit(Command::Stage {
            visuals: slide_visuals(&self.state),
            snap: false,
        });
        self.emit(Command::SettleCover {
            settle: CoverSettle::Commit,
            duration_ms: self.timing.cover_commit_ms,
        });
        self.timers.start(
            TimerRole::CoverSettle,
            now_ms,
            self.timing.cover_commit_ms,
            TimerEvent::CoverCommitted {
                epoch: self.state.epoch,
            },
        );
        tracing::debug!("cover committing");
    }

    pub(super) fn finish_cover_commit(&mut self, now_ms: u64) {
        let committing = matches!(
            self.state.phase,
            Phase::Transitioning {
                trigger: Trigger::VerticalReveal,
                ..
            }
        );
        if !committing {
            return;
        }
        self.state.current = 1;
        self.state.cover = CoverReveal::Rest;
        self.state.phase = Phase::Idle;

        self.emit(Command::DragCover {
            offset_px: 0.0,
            fraction: 0.0,
        });
        self.emit(Command::Stage {
            visuals: slide_visuals(&self.state),
            snap: false,
        });
        self.emit(Command::Progress(progress_bars(1, self.state.total)));
        self.emit(Command::Sound(SoundCue::Techno));
        self.emit(Command::Haptic(HapticPattern::Light));
        tracing::debug!("cover opened");
        self.enter_slide(1, now_ms);
    }

    pub(super) fn finish_cover_snap_back(&mut self) {
        if self.state.cover != CoverReveal::SnappingBack {
            return;
        }
        self.state.cover = CoverReveal::Rest;
        self.emit(Command::DragCover {
            offset_px: 0.0,
            fraction: 0.0,
        });
        self.emit(Command::Stage {
            visuals: slide_visuals(&self.state),
            snap: false,
        });
    }
}
