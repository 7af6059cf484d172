pub mod chrome;
pub mod quiz;
pub mod slide;
pub mod stage;
pub mod text;

use eframe::egui::{self, Painter, Rect};

use crate::animation::{Choreographer, Choreography};
use crate::deck::Deck;
use crate::theme::Theme;

use quiz::QuizHits;
use slide::SlideFrame;
use stage::Stage;

/// Reference story size the layout is designed for.
const DESIGN_WIDTH: f32 = 390.0;
const DESIGN_HEIGHT: f32 = 844.0;

/// Screen rects of everything clickable in the last frame.
#[derive(Debug, Clone, Default)]
pub struct Hits {
    pub sound: Option<Rect>,
    /// Swipe-up on the cover, replay on the outro.
    pub action: Option<Rect>,
    pub quiz: QuizHits,
}

/// The story column: full height, phone proportions, centred in `screen`.
pub fn story_rect(screen: Rect) -> Rect {
    let width = (screen.height() * DESIGN_WIDTH / DESIGN_HEIGHT).min(screen.width());
    Rect::from_center_size(screen.center(), egui::vec2(width, screen.height()))
}

pub fn compute_scale(rect: Rect) -> f32 {
    (rect.width() / DESIGN_WIDTH).min(rect.height() / DESIGN_HEIGHT)
}

/// Everything the renderer reads for one frame.
pub struct StoryView<'a> {
    pub deck: &'a Deck,
    pub choreographies: &'a [Choreography],
    pub choreographer: &'a Choreographer,
    pub stage: &'a Stage,
    pub theme: &'a Theme,
    pub current: usize,
    pub muted: bool,
    pub dwell_ms: u64,
    pub now_ms: u64,
}

pub fn draw_story(painter: &Painter, view: &StoryView, rect: Rect) -> Hits {
    let painter = painter.with_clip_rect(rect);
    let scale = compute_scale(rect);
    let now = view.now_ms;
    let mut hits = Hits::default();

    chrome::draw_background(&painter, view.theme, rect, now as f32 / 1000.0);

    // The cover is drawn last so it stays on top while it is dragged away.
    let order = (1..view.deck.slides.len()).chain(std::iter::once(0));
    for index in order {
        if !view.stage.is_on_stage(index, now) {
            continue;
        }
        let (Some(slide), Some(choreography)) =
            (view.deck.slides.get(index), view.choreographies.get(index))
        else {
            continue;
        };
        let dy = if index == 0 {
            view.stage.cover_offset(now)
        } else {
            0.0
        };
        let dx = view.stage.slide_x(index, now) * rect.width();
        let slide_rect = rect.translate(egui::vec2(dx, dy));
        let frame = SlideFrame {
            slide,
            choreography,
            entrance_ms: view.choreographer.entrance_elapsed(index, now),
            reveal_ms: view.choreographer.reveal_elapsed(index, now),
        };
        let action = slide::draw_slide(&painter, &frame, view.theme, slide_rect, scale);
        if index == view.current {
            hits.action = action;
        }
    }

    chrome::draw_progress(
        &painter,
        view.stage.progress(),
        view.theme,
        rect,
        now,
        view.dwell_ms,
        scale,
    );
    hits.sound = Some(chrome::draw_sound_toggle(
        &painter,
        view.theme,
        rect,
        view.muted,
        scale,
    ));

    if let Some(overlay) = view.stage.quiz() {
        hits.quiz = quiz::draw_quiz(&painter, overlay, view.theme, rect, now, scale);
        hits.action = None;
    }
    quiz::draw_particles(&painter, &view.stage.particles(now), rect.center(), scale);

    hits
}
