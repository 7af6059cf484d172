mod properties;
mod replay;
mod reveal;

use super::*;

const SLIDES: usize = 12;
const QUIZ_SLIDE: usize = 3;

/// Story with no quizzes, started and settled on the cover at t=100.
fn plain_story(total: usize) -> Story {
    let mut story = Story::new(vec![None; total], Timing::default());
    story.set_viewport(390.0, 1000.0);
    story.start(0);
    story.tick(100);
    story
}

/// Twelve slides; slide 3 asks "Q" with options A, B, C and answer B.
fn quiz_story() -> Story {
    let mut quizzes = vec![None; SLIDES];
    quizzes[QUIZ_SLIDE] = QuizSpec::new(
        "Q",
        vec!["A".to_string(), "B".to_string(), "C".to_string()],
        1,
    );
    let mut story = Story::new(quizzes, Timing::default());
    story.set_viewport(390.0, 1000.0);
    story.start(0);
    story.tick(100);
    story
}

/// Swipe forward at `now` and let the transition settle. Returns the new time.
fn swipe_next(story: &mut Story, now: u64) -> u64 {
    assert!(
        story.next(Trigger::Swipe, now),
        "swipe from slide {} was rejected",
        story.current_slide()
    );
    let settled = now + story.timing().unlock_ms;
    story.tick(settled);
    settled
}

/// Jump straight to `index` and let the transition settle. Returns the new time.
fn settle_on(story: &mut Story, index: usize, now: u64) -> u64 {
    assert!(story.go_to_slide(index, Trigger::Swipe, now));
    let settled = now + story.timing().unlock_ms;
    story.tick(settled);
    settled
}

/// Swipe from the cover to the quiz slide; returns the time the quiz opened.
fn open_quiz(story: &mut Story) -> u64 {
    let mut now = 1000;
    while story.current_slide() + 1 < QUIZ_SLIDE {
        now = swipe_next(story, now);
    }
    assert!(story.next(Trigger::Swipe, now));
    let opened = now + story.timing().content_ms;
    story.tick(opened);
    assert!(story.quiz_active(), "quiz should be open on slide {QUIZ_SLIDE}");
    opened
}

fn has(commands: &[Command], wanted: &Command) -> bool {
    commands.iter().any(|c| c == wanted)
}

/// Both mutual-exclusion flags must never be raised together.
fn assert_exclusive(story: &Story) {
    assert!(
        !(story.is_transitioning() && story.quiz_active()),
        "transitioning and quiz active at once on slide {}",
        story.current_slide()
    );
}
