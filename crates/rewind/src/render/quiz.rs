use eframe::egui::{self, Color32, FontId, Painter, Pos2, Rect};

use crate::render::stage::{Particle, QuizOverlay};
use crate::render::text::{self, draw_centered};
use crate::story::OptionMark;
use crate::theme::Theme;

const OPTION_HEIGHT: f32 = 54.0;
const OPTION_GAP: f32 = 10.0;

/// Where the quiz's controls ended up on screen.
#[derive(Debug, Clone, Default)]
pub struct QuizHits {
    pub options: Vec<Rect>,
    pub skip: Option<Rect>,
}

fn option_fill(theme: &Theme, mark: Option<OptionMark>) -> Color32 {
    match mark {
        Some(OptionMark::Correct) => theme.correct,
        Some(OptionMark::Wrong) => theme.wrong,
        None => theme.surface,
    }
}

pub fn draw_quiz(
    painter: &Painter,
    quiz: &QuizOverlay,
    theme: &Theme,
    rect: Rect,
    now_ms: u64,
    scale: f32,
) -> QuizHits {
    let opacity = quiz.opacity(now_ms);
    painter.rect_filled(rect, 0.0, Theme::with_opacity(Color32::BLACK, 0.6 * opacity));

    let padding = 24.0 * scale;
    let width = rect.width() - 40.0 * scale;
    let inner = width - padding * 2.0;
    let question_size = theme.heading_size * 0.8 * scale;
    let question_height = text::measure(painter, &quiz.question, question_size, inner);
    let options_height =
        quiz.options.len() as f32 * (OPTION_HEIGHT + OPTION_GAP) * scale - OPTION_GAP * scale;
    // Countdown, label, question, options and the skip link.
    let height = padding * 2.0 + 58.0 * scale + question_height + options_height + 56.0 * scale;

    // Slides up into place as it fades in.
    let rise = (1.0 - opacity) * 40.0 * scale;
    let card = Rect::from_center_size(
        rect.center() + egui::vec2(0.0, rise),
        egui::vec2(width, height),
    );
    painter.rect_filled(card, 20.0 * scale, Theme::with_opacity(theme.background, opacity));

    let mut y = card.top() + padding;

    // Countdown bar; untimed quizzes show none.
    if let Some(fraction) = quiz.countdown_fraction(now_ms) {
        let track = Rect::from_min_size(
            Pos2::new(card.left() + padding, y),
            egui::vec2(inner, 6.0 * scale),
        );
        painter.rect_filled(track, 3.0 * scale, Theme::with_opacity(theme.surface, opacity));
        let fill = Rect::from_min_size(track.min, egui::vec2(inner * fraction, track.height()));
        let urgent = if fraction < 0.34 { theme.wrong } else { theme.accent };
        painter.rect_filled(fill, 3.0 * scale, Theme::with_opacity(urgent, opacity));
    }
    y += 14.0 * scale;

    let label = painter.layout_no_wrap(
        "QUICK QUIZ".to_string(),
        FontId::proportional(theme.eyebrow_size * scale),
        Theme::with_opacity(theme.accent, opacity),
    );
    painter.galley(Pos2::new(card.left() + padding, y), label, theme.accent);
    y += 20.0 * scale;

    y += draw_centered(
        painter,
        &quiz.question,
        FontId::proportional(question_size),
        Theme::with_opacity(theme.heading_color, opacity),
        card.center().x,
        y,
        inner,
    );
    y += 24.0 * scale;

    let open = quiz.is_open();
    let mut options = Vec::with_capacity(quiz.options.len());
    for (i, option) in quiz.options.iter().enumerate() {
        let button = Rect::from_min_size(
            Pos2::new(card.left() + padding, y),
            egui::vec2(inner, OPTION_HEIGHT * scale),
        );
        let mark = quiz.marks.get(i).copied().flatten();
        // Unmarked options dim once the answer is in.
        let dim = if open || mark.is_some() { 1.0 } else { 0.5 };
        painter.rect_filled(
            button,
            14.0 * scale,
            Theme::with_opacity(option_fill(theme, mark), opacity * dim),
        );
        let text_color = if mark.is_some() {
            Color32::WHITE
        } else {
            theme.heading_color
        };
        let number = painter.layout_no_wrap(
            format!("{}", i + 1),
            FontId::monospace(theme.body_size * 0.85 * scale),
            Theme::with_opacity(theme.muted, opacity * dim),
        );
        let number_pos = Pos2::new(
            button.left() + 16.0 * scale,
            button.center().y - number.rect.height() / 2.0,
        );
        painter.galley(number_pos, number, theme.muted);
        text::draw_label(
            painter,
            option,
            FontId::proportional(theme.body_size * scale),
            Theme::with_opacity(text_color, opacity * dim),
            button,
        );
        options.push(button);
        y += (OPTION_HEIGHT + OPTION_GAP) * scale;
    }

    let skip = open.then(|| {
        let skip = Rect::from_center_size(
            Pos2::new(card.center().x, card.bottom() - padding - 12.0 * scale),
            egui::vec2(120.0 * scale, 32.0 * scale),
        );
        text::draw_label(
            painter,
            "Skip",
            FontId::proportional(theme.body_size * 0.9 * scale),
            Theme::with_opacity(theme.muted, opacity),
            skip,
        );
        skip
    });

    QuizHits { options, skip }
}

const CONFETTI: [Color32; 4] = [
    Color32::from_rgb(0x2B, 0x6C, 0xEE),
    Color32::from_rgb(0x22, 0xC5, 0x5E),
    Color32::from_rgb(0xF5, 0x9E, 0x0B),
    Color32::from_rgb(0xEC, 0x48, 0x99),
];

pub fn draw_particles(painter: &Painter, particles: &[Particle], origin: Pos2, scale: f32) {
    for p in particles {
        let pos = origin + egui::vec2(p.dx, p.dy) * scale;
        painter.circle_filled(
            pos,
            4.0 * scale,
            Theme::with_opacity(CONFETTI[p.hue % CONFETTI.len()], p.alpha),
        );
    }
}
