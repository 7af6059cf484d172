//! Quiz overlay lifecycle.
//!
//! A session runs `Asking -> Feedback -> Dismissing` and is then closed. The
//! controller only schedules its own timers; when the dismissal finishes it
//! hands a [`QuizResolution`] back so navigation can resume.

use super::command::{Command, HapticPattern, OptionMark, SoundCue};
use super::timers::{TimerEvent, TimerRole, Timers};

/// A multiple-choice question attached to a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSpec {
    question: String,
    options: Vec<String>,
    correct_index: usize,
}

impl QuizSpec {
    /// Build a quiz, or `None` if the data cannot make a usable question:
    /// an empty question, fewer than two options, a blank option, or an
    /// answer index that points at no option.
    pub fn new(
        question: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
    ) -> Option<Self> {
        let question = question.into();
        if question.trim().is_empty()
            || options.len() < 2
            || options.iter().any(|o| o.trim().is_empty())
            || correct_index >= options.len()
        {
            return None;
        }
        Some(Self {
            question,
            options,
            correct_index,
        })
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pending,
    Correct,
    Incorrect,
    /// Skipped by the viewer or timed out.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStage {
    Asking,
    /// Answer given, feedback playing.
    Feedback,
    /// Overlay sliding away.
    Dismissing,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    pub id: u32,
    pub slide: usize,
    pub spec: QuizSpec,
    pub answered: Option<usize>,
    pub outcome: Outcome,
    pub stage: QuizStage,
}

impl QuizSession {
    pub fn is_resolved(&self) -> bool {
        self.outcome != Outcome::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizTiming {
    /// `None` runs the untimed variant.
    pub countdown_ms: Option<u64>,
    pub correct_hold_ms: u64,
    pub reveal_correct_ms: u64,
    pub wrong_hold_ms: u64,
    pub dismiss_ms: u64,
}

impl Default for QuizTiming {
    fn default() -> Self {
        Self {
            countdown_ms: Some(3000),
            correct_hold_ms: 1500,
            reveal_correct_ms: 800,
            wrong_hold_ms: 1500,
            dismiss_ms: 500,
        }
    }
}

/// Handed back when a session has fully closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResolution {
    pub slide: usize,
    pub outcome: Outcome,
}

#[derive(Debug)]
pub struct QuizController {
    timing: QuizTiming,
    session: Option<QuizSession>,
    next_id: u32,
    last: Option<QuizResolution>,
}

impl QuizController {
    pub fn new(timing: QuizTiming) -> Self {
        Self {
            timing,
            session: None,
            next_id: 1,
            last: None,
        }
    }

    pub fn timing(&self) -> &QuizTiming {
        &self.timing
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// The most recently closed session.
    pub fn last_resolution(&self) -> Option<QuizResolution> {
        self.last
    }

    pub fn open(
        &mut self,
        slide: usize,
        spec: &QuizSpec,
        now_ms: u64,
        timers: &mut Timers,
        out: &mut Vec<Command>,
    ) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);

        out.push(Command::ShowQuiz {
            slide,
            question: spec.question.clone(),
            options: spec.options.clone(),
            countdown_ms: self.timing.countdown_ms,
        });
        if let Some(countdown) = self.timing.countdown_ms {
            timers.start(
                TimerRole::QuizCountdown,
                now_ms,
                countdown,
                TimerEvent::QuizTimeout { session: id },
            );
        }
        tracing::debug!(slide, session = id, "quiz opened");

        self.session = Some(QuizSession {
            id,
            slide,
            spec: spec.clone(),
            answered: None,
            outcome: Outcome::Pending,
            stage: QuizStage::Asking,
        });
        id
    }

    /// Answer the open question. Returns `false` when there is nothing to
    /// answer: no session, already answered, or no option at `index`.
    pub fn select_option(
        &mut self,
        index: usize,
        now_ms: u64,
        timers: &mut Timers,
        out: &mut Vec<Command>,
    ) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.is_resolved() {
            return false;
        }
        if index >= session.spec.options.len() {
            tracing::warn!(index, "quiz option out of range");
            return false;
        }

        let remaining_ms = timers
            .deadline(TimerRole::QuizCountdown)
            .map(|due| due.saturating_sub(now_ms));
        timers.cancel(TimerRole::QuizCountdown);
        if let Some(remaining_ms) = remaining_ms {
            out.push(Command::FreezeCountdown { remaining_ms });
        }

        session.answered = Some(index);
        session.stage = QuizStage::Feedback;
        out.push(Command::Haptic(HapticPattern::Medium));

        let id = session.id;
        if index == session.spec.correct_index {
            session.outcome = Outcome::Correct;
            out.push(Command::MarkOption {
                index,
                mark: OptionMark::Correct,
            });
            out.push(Command::Sound(SoundCue::Correct));
            out.push(Command::Haptic(HapticPattern::Success));
            out.push(Command::Celebrate);
            timers.start(
                TimerRole::QuizFeedback,
                now_ms,
                self.timing.correct_hold_ms,
                TimerEvent::QuizResolve { session: id },
            );
        } else {
            session.outcome = Outcome::Incorrect;
            out.push(Command::MarkOption {
                index,
                mark: OptionMark::Wrong,
            });
            out.push(Command::Sound(SoundCue::Wrong));
            out.push(Command::Haptic(HapticPattern::Error));
            timers.start(
                TimerRole::QuizFeedback,
                now_ms,
                self.timing.reveal_correct_ms,
                TimerEvent::QuizRevealCorrect { session: id },
            );
        }
        tracing::debug!(session = id, index, outcome = ?session.outcome, "quiz answered");
        true
    }

    /// Skip the open question. Only possible while it is still being asked.
    pub fn skip(&mut self, now_ms: u64, timers: &mut Timers, out: &mut Vec<Command>) -> bool {
        match self.session.as_mut() {
            Some(session) if session.stage == QuizStage::Asking => {
                session.outcome = Outcome::Skipped;
                tracing::debug!(session = session.id, "quiz skipped");
            }
            _ => return false,
        }
        self.resolve(now_ms, timers, out);
        true
    }

    /// Handle a quiz timer. Returns the resolution once the overlay is gone.
    pub fn on_timer(
        &mut self,
        event: TimerEvent,
        due_ms: u64,
        timers: &mut Timers,
        out: &mut Vec<Command>,
    ) -> Option<QuizResolution> {
        let Some(session) = self.session.as_mut() else {
            tracing::debug!(?event, "quiz timer with no open session");
            return None;
        };
        let id = session.id;

        match event {
            TimerEvent::QuizTimeout { session: s } if s == id => {
                if session.stage == QuizStage::Asking {
                    session.outcome = Outcome::Skipped;
                    tracing::debug!(session = id, "quiz timed out");
                    self.resolve(due_ms, timers, out);
                }
                None
            }
            TimerEvent::QuizRevealCorrect { session: s } if s == id => {
                out.push(Command::MarkOption {
                    index: session.spec.correct_index,
                    mark: OptionMark::Correct,
                });
                timers.start(
                    TimerRole::QuizFeedback,
                    due_ms,
                    self.timing.wrong_hold_ms,
                    TimerEvent::QuizResolve { session: id },
                );
                None
            }
            TimerEvent::QuizResolve { session: s } if s == id => {
                self.resolve(due_ms, timers, out);
                None
            }
            TimerEvent::QuizDismissed { session: s } if s == id => {
                let closed = self.session.take()?;
                let resolution = QuizResolution {
                    slide: closed.slide,
                    outcome: closed.outcome,
                };
                self.last = Some(resolution);
                tracing::debug!(session = id, slide = closed.slide, outcome = ?closed.outcome, "quiz closed");
                Some(resolution)
            }
            other => {
                tracing::debug!(?other, session = id, "dropping stale quiz timer");
                None
            }
        }
    }

    /// Start the dismissal. The session stays open until it finishes.
    fn resolve(&mut self, now_ms: u64, timers: &mut Timers, out: &mut Vec<Command>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.stage == QuizStage::Dismissing {
            return;
        }
        session.stage = QuizStage::Dismissing;
        timers.cancel(TimerRole::QuizCountdown);
        timers.cancel(TimerRole::QuizFeedback);
        out.push(Command::HideQuiz {
            dismiss_ms: self.timing.dismiss_ms,
        });
        timers.start(
            TimerRole::QuizDismiss,
            now_ms,
            self.timing.dismiss_ms,
            TimerEvent::QuizDismissed { session: session.id },
        );
    }

    /// Drop any session without resolving it (replay).
    pub fn abandon(&mut self, timers: &mut Timers, out: &mut Vec<Command>) {
        if self.session.take().is_some() {
            timers.cancel(TimerRole::QuizCountdown);
            timers.cancel(TimerRole::QuizFeedback);
            timers.cancel(TimerRole::QuizDismiss);
            out.push(Command::HideQuiz { dismiss_ms: 0 });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> QuizSpec {
        QuizSpec::new(
            "Q",
            vec!["A".to_string(), "B".to_string(), "C".to_string()],
            1,
        )
        .unwrap()
    }

    fn drain(
        quiz: &mut QuizController,
        timers: &mut Timers,
        out: &mut Vec<Command>,
        now: u64,
    ) -> Option<QuizResolution> {
        let mut resolution = None;
        while let Some(fired) = timers.pop_due(now) {
            if let Some(r) = quiz.on_timer(fired.event, fired.due_ms, timers, out) {
                resolution = Some(r);
            }
        }
        resolution
    }

    #[test]
    fn test_spec_rejects_malformed_data() {
        assert!(QuizSpec::new("", vec!["a".into(), "b".into()], 0).is_none());
        assert!(QuizSpec::new("Q", vec!["only".into()], 0).is_none());
        assert!(QuizSpec::new("Q", vec!["a".into(), " ".into()], 0).is_none());
        assert!(QuizSpec::new("Q", vec!["a".into(), "b".into()], 2).is_none());
        assert!(QuizSpec::new("Q", vec!["a".into(), "b".into()], 1).is_some());
    }

    #[test]
    fn test_correct_answer_resolves_after_hold_and_dismiss() {
        let mut quiz = QuizController::new(QuizTiming::default());
        let mut timers = Timers::new();
        let mut out = Vec::new();
        quiz.open(3, &spec(), 0, &mut timers, &mut out);
        assert_eq!(timers.deadline(TimerRole::QuizCountdown), Some(3000));

        assert!(quiz.select_option(1, 1000, &mut timers, &mut out));
        assert!(out.contains(&Command::FreezeCountdown { remaining_ms: 2000 }));
        assert!(out.contains(&Command::Celebrate));
        assert!(!timers.is_pending(TimerRole::QuizCountdown));
        assert_eq!(quiz.session().unwrap().outcome, Outcome::Correct);

        assert!(drain(&mut quiz, &mut timers, &mut out, 2499).is_none());
        assert!(drain(&mut quiz, &mut timers, &mut out, 2500).is_none());
        assert!(out.contains(&Command::HideQuiz { dismiss_ms: 500 }));
        assert!(quiz.is_open());

        let resolution = drain(&mut quiz, &mut timers, &mut out, 3000).unwrap();
        assert_eq!(
            resolution,
            QuizResolution {
                slide: 3,
                outcome: Outcome::Correct
            }
        );
        assert!(!quiz.is_open());
    }

    #[test]
    fn test_wrong_answer_reveals_correct_option_then_resolves() {
        let mut quiz = QuizController::new(QuizTiming::default());
        let mut timers = Timers::new();
        let mut out = Vec::new();
        quiz.open(3, &spec(), 0, &mut timers, &mut out);
        quiz.select_option(0, 500, &mut timers, &mut out);
        assert!(out.contains(&Command::MarkOption {
            index: 0,
            mark: OptionMark::Wrong
        }));

        out.clear();
        drain(&mut quiz, &mut timers, &mut out, 1299);
        assert!(out.is_empty());
        drain(&mut quiz, &mut timers, &mut out, 1300);
        assert_eq!(
            out,
            vec![Command::MarkOption {
                index: 1,
                mark: OptionMark::Correct
            }]
        );
        assert_eq!(timers.deadline(TimerRole::QuizFeedback), Some(2800));
        let resolution = drain(&mut quiz, &mut timers, &mut out, 3300).unwrap();
        assert_eq!(resolution.outcome, Outcome::Incorrect);
    }

    #[test]
    fn test_second_answer_is_ignored() {
        let mut quiz = QuizController::new(QuizTiming::default());
        let mut timers = Timers::new();
        let mut out = Vec::new();
        quiz.open(3, &spec(), 0, &mut timers, &mut out);
        assert!(quiz.select_option(0, 100, &mut timers, &mut out));
        assert!(!quiz.select_option(1, 200, &mut timers, &mut out));
        assert_eq!(quiz.session().unwrap().outcome, Outcome::Incorrect);
        assert_eq!(quiz.session().unwrap().answered, Some(0));
        assert!(!quiz.skip(300, &mut timers, &mut out));
    }

    #[test]
    fn test_timeout_skips() {
        let mut quiz = QuizController::new(QuizTiming::default());
        let mut timers = Timers::new();
        let mut out = Vec::new();
        quiz.open(2, &spec(), 100, &mut timers, &mut out);
        assert!(drain(&mut quiz, &mut timers, &mut out, 3099).is_none());
        assert!(drain(&mut quiz, &mut timers, &mut out, 3100).is_none());
        assert_eq!(quiz.session().unwrap().outcome, Outcome::Skipped);
        assert_eq!(timers.deadline(TimerRole::QuizDismiss), Some(3600));
        let resolution = drain(&mut quiz, &mut timers, &mut out, 3600).unwrap();
        assert_eq!(resolution.outcome, Outcome::Skipped);
        assert!(!quiz.select_option(1, 3700, &mut timers, &mut out));
    }

    #[test]
    fn test_untimed_variant_waits_forever() {
        let timing = QuizTiming {
            countdown_ms: None,
            ..QuizTiming::default()
        };
        let mut quiz = QuizController::new(timing);
        let mut timers = Timers::new();
        let mut out = Vec::new();
        quiz.open(2, &spec(), 0, &mut timers, &mut out);
        assert!(timers.is_empty());
        assert!(drain(&mut quiz, &mut timers, &mut out, 60_000).is_none());
        assert!(quiz.select_option(1, 60_000, &mut timers, &mut out));
        assert!(!out.iter().any(|c| matches!(c, Command::FreezeCountdown { .. })));
    }

    #[test]
    fn test_out_of_range_option_is_ignored() {
        let mut quiz = QuizController::new(QuizTiming::default());
        let mut timers = Timers::new();
        let mut out = Vec::new();
        quiz.open(2, &spec(), 0, &mut timers, &mut out);
        assert!(!quiz.select_option(7, 10, &mut timers, &mut out));
        assert_eq!(quiz.session().unwrap().outcome, Outcome::Pending);
        assert!(timers.is_pending(TimerRole::QuizCountdown));
    }

    #[test]
    fn test_stale_session_timer_is_dropped() {
        let mut quiz = QuizController::new(QuizTiming::default());
        let mut timers = Timers::new();
        let mut out = Vec::new();
        let id = quiz.open(2, &spec(), 0, &mut timers, &mut out);
        let stale = TimerEvent::QuizTimeout { session: id + 10 };
        assert!(quiz.on_timer(stale, 10, &mut timers, &mut out).is_none());
        assert_eq!(quiz.session().unwrap().outcome, Outcome::Pending);
    }
}
