use super::*;

#[test]
fn drag_past_threshold_commits_to_first_story_slide() {
    let mut story = plain_story(SLIDES);
    story.take_commands();

    story.pointer_down(200.0, 900.0);
    story.pointer_move(200.0, 500.0, 1000);
    assert!(story.suppresses_scrolling());
    assert_eq!(
        story.state().cover(),
        CoverReveal::Dragging { fraction: 0.4 }
    );
    let commands = story.take_commands();
    assert!(has(
        &commands,
        &Command::DragCover {
            offset_px: -400.0,
            fraction: 0.4
        }
    ));
    assert!(commands.iter().any(|c| matches!(
        c,
        Command::Stage { visuals, .. } if visuals[1] == SlideVisual::Revealing
    )));

    story.pointer_up(200.0, 500.0, 1000);
    assert_eq!(story.current_slide(), 0);
    assert_eq!(
        story.state().phase(),
        Phase::Transitioning {
            from: 0,
            to: 1,
            trigger: Trigger::VerticalReveal
        }
    );
    assert!(has(
        &story.take_commands(),
        &Command::SettleCover {
            settle: CoverSettle::Commit,
            duration_ms: 800
        }
    ));
    assert!(!story.next(Trigger::Swipe, 1200));

    story.tick(1799);
    assert_eq!(story.current_slide(), 0);
    story.tick(1800);
    assert_eq!(story.current_slide(), 1);
    assert!(story.state().is_idle());
    assert_eq!(story.state().cover(), CoverReveal::Rest);
    let commands = story.take_commands();
    assert!(has(&commands, &Command::Sound(SoundCue::Techno)));
    assert!(has(&commands, &Command::PlayEntrance { slide: 1 }));
    assert!(has(&commands, &Command::Progress(state::progress_bars(1, SLIDES))));
    assert_eq!(story.timers().deadline(TimerRole::SlideTimer), Some(6800));
}

#[test]
fn short_drag_snaps_back() {
    let mut story = plain_story(SLIDES);
    story.drag_reveal(200.0);
    story.release_reveal(200.0, 1000);
    assert_eq!(story.state().cover(), CoverReveal::SnappingBack);
    assert!(story.state().is_idle());
    assert!(has(
        &story.take_commands(),
        &Command::SettleCover {
            settle: CoverSettle::SnapBack,
            duration_ms: 300
        }
    ));

    story.tick(1300);
    assert_eq!(story.state().cover(), CoverReveal::Rest);
    assert_eq!(story.current_slide(), 0);
    let commands = story.take_commands();
    assert!(has(
        &commands,
        &Command::Stage {
            visuals: state::slide_visuals(story.state()),
            snap: false
        }
    ));
    assert!(!story.timers().is_pending(TimerRole::SlideTimer));
}

#[test]
fn threshold_is_inclusive() {
    let mut story = plain_story(SLIDES);
    story.drag_reveal(300.0);
    story.release_reveal(300.0, 1000);
    assert_eq!(story.state().cover(), CoverReveal::Committing);

    let mut story = plain_story(SLIDES);
    story.drag_reveal(299.0);
    story.release_reveal(299.0, 1000);
    assert_eq!(story.state().cover(), CoverReveal::SnappingBack);
}

#[test]
fn fraction_is_clamped() {
    let story = plain_story(SLIDES);
    assert_eq!(story.reveal_fraction(2500.0), 1.0);
    assert_eq!(story.reveal_fraction(-40.0), 0.0);
    assert_eq!(story.reveal_fraction(500.0), 0.5);
}

#[test]
fn reveal_control_commits_without_drag() {
    let mut story = plain_story(SLIDES);
    story.activate_reveal(1000);
    assert_eq!(story.state().cover(), CoverReveal::Committing);
    story.tick(1800);
    assert_eq!(story.current_slide(), 1);
}

#[test]
fn reveal_only_exists_on_cover() {
    let mut story = plain_story(SLIDES);
    swipe_next(&mut story, 1000);
    story.take_commands();

    story.drag_reveal(400.0);
    story.release_reveal(400.0, 2000);
    story.activate_reveal(2000);
    assert_eq!(story.state().cover(), CoverReveal::Rest);
    assert_eq!(story.current_slide(), 1);
    assert!(story.take_commands().is_empty());
}

#[test]
fn reveal_ignored_during_cover_transition() {
    let mut story = plain_story(SLIDES);
    swipe_next(&mut story, 1000);
    assert!(story.prev(Trigger::Swipe, 2000));
    // Back on the cover but still locked.
    story.drag_reveal(400.0);
    assert_eq!(story.state().cover(), CoverReveal::Rest);
}

#[test]
fn second_release_during_commit_is_ignored() {
    let mut story = plain_story(SLIDES);
    story.activate_reveal(1000);
    story.release_reveal(100.0, 1100);
    story.activate_reveal(1200);
    assert_eq!(story.timers().deadline(TimerRole::CoverSettle), Some(1800));
}

#[test]
fn swipe_during_snap_back_resets_cover() {
    let mut story = plain_story(SLIDES);
    story.drag_reveal(100.0);
    story.release_reveal(100.0, 1000);
    story.take_commands();

    assert!(story.next(Trigger::Swipe, 1100));
    assert_eq!(story.state().cover(), CoverReveal::Rest);
    assert!(!story.timers().is_pending(TimerRole::CoverSettle));
    assert!(has(
        &story.take_commands(),
        &Command::DragCover {
            offset_px: 0.0,
            fraction: 0.0
        }
    ));
}

#[test]
fn cancelled_pointer_snaps_cover_back() {
    let mut story = plain_story(SLIDES);
    story.pointer_down(200.0, 900.0);
    story.pointer_move(200.0, 300.0, 1000);
    story.pointer_cancel(1000);
    assert_eq!(story.state().cover(), CoverReveal::SnappingBack);
    story.tick(1300);
    assert_eq!(story.state().cover(), CoverReveal::Rest);
    assert_eq!(story.current_slide(), 0);
}

#[test]
fn single_slide_story_has_nothing_to_reveal() {
    let mut story = plain_story(1);
    story.activate_reveal(1000);
    assert_eq!(story.state().cover(), CoverReveal::Rest);
    assert!(story.state().is_idle());
}
