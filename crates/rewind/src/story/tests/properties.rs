use super::*;

const TRIGGERS: [Trigger; 4] = [Trigger::Tap, Trigger::Key, Trigger::Swipe, Trigger::Auto];

/// Small deterministic generator so the soak test replays identically.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

#[test]
fn go_to_slide_never_leaves_range() {
    let mut story = plain_story(5);
    for index in 5..20 {
        for trigger in TRIGGERS {
            assert!(!story.go_to_slide(index, trigger, 1000));
        }
    }
    assert_eq!(story.current_slide(), 0);
}

#[test]
fn requests_during_transition_are_no_ops() {
    let mut story = plain_story(SLIDES);
    let now = swipe_next(&mut story, 1000);
    assert!(story.next(Trigger::Tap, now));
    story.take_commands();
    for trigger in TRIGGERS {
        assert!(!story.next(trigger, now + 10));
        assert!(!story.prev(trigger, now + 10));
        assert!(!story.go_to_slide(5, trigger, now + 10));
    }
    assert_eq!(story.current_slide(), 2);
    assert!(story.take_commands().is_empty());
}

#[test]
fn tap_like_triggers_never_leave_cover() {
    for total in 2..8 {
        let mut story = plain_story(total);
        for index in 0..total {
            for trigger in [Trigger::Tap, Trigger::Key] {
                assert!(!story.go_to_slide(index, trigger, 1000));
            }
        }
        assert_eq!(story.current_slide(), 0);
    }
}

#[test]
fn rapid_navigation_keeps_one_auto_advance() {
    let mut story = plain_story(SLIDES);
    let mut now = 1000;
    for _ in 0..4 {
        now = swipe_next(&mut story, now);
    }
    now = {
        assert!(story.prev(Trigger::Swipe, now));
        now + 600
    };
    story.tick(now);
    assert_eq!(story.current_slide(), 3);
    assert_eq!(story.timers().deadline(TimerRole::SlideTimer), Some(now + 5000));

    story.tick(now + 5000);
    assert_eq!(story.current_slide(), 4);
    story.tick(now + 5600);
    // Only the freshly armed timer is left.
    assert_eq!(
        story.timers().deadline(TimerRole::SlideTimer),
        Some(now + 10_600)
    );
}

#[test]
fn every_stage_has_one_active_slide() {
    let mut story = quiz_story();
    let mut now = 100;
    while story.current_slide() < SLIDES - 1 {
        now += 100;
        story.tick(now);
        story.next(Trigger::Swipe, now);
        story.skip_quiz(now);
    }
    for command in story.take_commands() {
        if let Command::Stage { visuals, .. } = command {
            let active = visuals
                .iter()
                .filter(|v| **v == SlideVisual::Active)
                .count();
            assert_eq!(active, 1);
            assert_eq!(visuals.len(), SLIDES);
        }
    }
}

#[test]
fn random_input_soak_keeps_invariants() {
    let mut rng = Lcg(0x5eed_2025);
    let mut story = quiz_story();
    let mut now = 100u64;

    for _ in 0..5000 {
        match rng.below(12) {
            0 | 1 => {
                story.next(TRIGGERS[rng.below(4) as usize], now);
            }
            2 => {
                story.prev(TRIGGERS[rng.below(4) as usize], now);
            }
            3 => {
                story.go_to_slide(rng.below(16) as usize, Trigger::Swipe, now);
            }
            4 => {
                story.select_option(rng.below(5) as usize, now);
            }
            5 => {
                story.skip_quiz(now);
            }
            6 => story.drag_reveal(rng.below(1200) as f32),
            7 => story.release_reveal(rng.below(1200) as f32, now),
            8 => story.activate_reveal(now),
            9 if rng.below(20) == 0 => story.replay(now),
            _ => {
                now += rng.below(900);
                story.tick(now);
            }
        }

        let state = story.state();
        assert!(state.current() < state.total());
        assert_exclusive(&story);
        if let Phase::QuizBlocked { slide } = state.phase() {
            assert_eq!(slide, state.current());
            assert_eq!(slide, QUIZ_SLIDE);
            assert!(story.quiz_session().is_some());
        }
        if state.cover() != CoverReveal::Rest {
            assert_eq!(state.current(), 0);
        }
        if story.timers().is_pending(TimerRole::SlideTimer) {
            assert!(state.dwells(state.current()));
        }
        for command in story.take_commands() {
            if let Command::Stage { visuals, .. } = command {
                assert_eq!(
                    visuals
                        .iter()
                        .filter(|v| **v == SlideVisual::Active)
                        .count(),
                    1
                );
            }
        }
    }
}
