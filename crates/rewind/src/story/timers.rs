//! Role-keyed timer queue.
//!
//! The story never sleeps. Every delayed step ("unlock after 600 ms", "resolve
//! the quiz 1.5 s after the answer") is queued here as a [`TimerEvent`] and
//! handed back by [`Timers::pop_due`] once the host clock passes its deadline.
//! Each [`TimerRole`] holds at most one pending timer: starting a timer for a
//! role replaces whatever was pending for it.

/// Which job a pending timer is doing. One slot per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerRole {
    /// Auto-advance dwell on the current slide.
    SlideTimer,
    /// Short delay between the slide hand-off and its entrance animation.
    TransitionContent,
    /// Clears the transition guard.
    TransitionUnlock,
    /// Cover commit (800 ms) or snap-back (300 ms) after a vertical drag.
    CoverSettle,
    /// Quiz answer timeout.
    QuizCountdown,
    /// Post-answer feedback steps.
    QuizFeedback,
    /// Overlay dismissal animation.
    QuizDismiss,
}

/// What to do when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    AutoAdvance { epoch: u32 },
    EnterSlide { slide: usize, epoch: u32 },
    Unlock { epoch: u32 },
    CoverCommitted { epoch: u32 },
    CoverSnappedBack { epoch: u32 },
    QuizTimeout { session: u32 },
    QuizRevealCorrect { session: u32 },
    QuizResolve { session: u32 },
    QuizDismissed { session: u32 },
}

#[derive(Debug, Clone)]
struct Pending {
    role: TimerRole,
    due_ms: u64,
    seq: u64,
    event: TimerEvent,
}

/// A timer that has come due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub role: TimerRole,
    /// The deadline the timer was scheduled for, not the time it was noticed.
    pub due_ms: u64,
    pub event: TimerEvent,
}

#[derive(Debug, Default)]
pub struct Timers {
    pending: Vec<Pending>,
    next_seq: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` for `now_ms + delay_ms`, cancelling any timer already
    /// pending for `role`.
    pub fn start(&mut self, role: TimerRole, now_ms: u64, delay_ms: u64, event: TimerEvent) {
        self.cancel(role);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            role,
            due_ms: now_ms.saturating_add(delay_ms),
            seq,
            event,
        });
    }

    /// Cancel the timer for `role`. Returns whether one was pending.
    pub fn cancel(&mut self, role: TimerRole) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.role != role);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, role: TimerRole) -> bool {
        self.pending.iter().any(|p| p.role == role)
    }

    pub fn deadline(&self, role: TimerRole) -> Option<u64> {
        self.pending
            .iter()
            .find(|p| p.role == role)
            .map(|p| p.due_ms)
    }

    /// The event pending for `role`, if any.
    pub fn event(&self, role: TimerRole) -> Option<TimerEvent> {
        self.pending
            .iter()
            .find(|p| p.role == role)
            .map(|p| p.event)
    }

    /// Earliest deadline across all roles.
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.iter().map(|p| p.due_ms).min()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return the earliest timer due at or before `now_ms`.
    /// Timers sharing a deadline come out in the order they were started.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Fired> {
        let (pos, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= now_ms)
            .min_by_key(|(_, p)| (p.due_ms, p.seq))?;
        let p = self.pending.remove(pos);
        Some(Fired {
            role: p.role,
            due_ms: p.due_ms,
            event: p.event,
        })
    }
}
