use super::*;

#[test]
fn replay_returns_to_cover_with_every_quiz_done() {
    let mut story = quiz_story();
    let now = settle_on(&mut story, SLIDES - 1, 1000);
    story.take_commands();

    story.replay(now + 400);
    assert_eq!(story.current_slide(), 0);
    assert!(story.state().is_idle());
    assert_eq!(story.state().epoch(), 1);
    assert_eq!(story.state().completed_quizzes().len(), SLIDES);

    let commands = story.take_commands();
    assert!(has(&commands, &Command::Sound(SoundCue::Swipe)));
    assert!(has(&commands, &Command::Haptic(HapticPattern::Light)));
    assert!(has(&commands, &Command::Progress(state::progress_bars(0, SLIDES))));
    let mut visuals = vec![SlideVisual::Hidden; SLIDES];
    visuals[0] = SlideVisual::Active;
    assert!(has(&commands, &Command::Stage { visuals, snap: false }));
    assert!(!has(&commands, &Command::Telemetry(OPENED_EVENT)));

    story.tick(now + 500);
    assert!(has(&story.take_commands(), &Command::PlayEntrance { slide: 0 }));
}

#[test]
fn replayed_story_skips_quizzes() {
    let mut story = quiz_story();
    let now = settle_on(&mut story, SLIDES - 1, 1000);
    story.replay(now);
    let mut now = now + 100;
    story.tick(now);
    while story.current_slide() < SLIDES - 1 {
        now = swipe_next(&mut story, now);
        assert!(!story.quiz_active());
    }
}

#[test]
fn replay_drops_pending_transition() {
    let mut story = plain_story(SLIDES);
    story.next(Trigger::Swipe, 1000);
    story.replay(1050);
    story.take_commands();

    story.tick(10_000);
    assert_eq!(story.current_slide(), 0);
    assert!(story.state().is_idle());
    let commands = story.take_commands();
    assert!(!has(&commands, &Command::PlayEntrance { slide: 1 }));
    assert!(has(&commands, &Command::PlayEntrance { slide: 0 }));
}

#[test]
fn replay_abandons_open_quiz() {
    let mut story = quiz_story();
    open_quiz(&mut story);
    story.take_commands();

    story.replay(2500);
    assert!(!story.quiz_active());
    assert!(story.quiz_session().is_none());
    assert!(has(&story.take_commands(), &Command::HideQuiz { dismiss_ms: 0 }));

    story.tick(20_000);
    assert_eq!(story.current_slide(), 0);
    assert!(story.last_quiz_resolution().is_none());
}

#[test]
fn replay_during_cover_commit_stays_on_cover() {
    let mut story = plain_story(SLIDES);
    story.activate_reveal(1000);
    story.replay(1200);
    assert_eq!(story.state().cover(), CoverReveal::Rest);
    story.tick(5000);
    assert_eq!(story.current_slide(), 0);
    assert!(story.state().is_idle());
}

#[test]
fn replay_discards_live_gesture() {
    let mut story = plain_story(SLIDES);
    story.pointer_down(300.0, 400.0);
    story.replay(1000);
    story.pointer_up(100.0, 400.0, 1100);
    assert_eq!(story.current_slide(), 0);
}
