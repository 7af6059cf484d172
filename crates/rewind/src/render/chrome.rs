use eframe::egui::{self, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke};

use crate::background;
use crate::render::stage::ProgressStrip;
use crate::theme::Theme;

pub fn draw_background(painter: &Painter, theme: &Theme, rect: Rect, elapsed_s: f32) {
    painter.rect_filled(rect, 0.0, theme.background);
    for panel in background::panels(elapsed_s, rect.width(), rect.height()) {
        if panel.width <= 0.0 || panel.height <= 0.0 {
            continue;
        }
        let points = panel
            .corners()
            .iter()
            .map(|(x, y)| Pos2::new(rect.left() + x, rect.top() + y))
            .collect();
        painter.add(Shape::convex_polygon(
            points,
            Theme::with_opacity(theme.panel_tint, panel.alpha),
            Stroke::NONE,
        ));
    }
}

pub fn draw_progress(
    painter: &Painter,
    progress: &ProgressStrip,
    theme: &Theme,
    rect: Rect,
    now_ms: u64,
    dwell_ms: u64,
    scale: f32,
) {
    if !progress.is_visible() {
        return;
    }
    let fills = progress.fills(now_ms, dwell_ms);
    if fills.is_empty() {
        return;
    }
    let margin = 12.0 * scale;
    let gap = 4.0 * scale;
    let height = 3.0 * scale;
    let bar_width =
        (rect.width() - margin * 2.0 - gap * (fills.len() - 1) as f32) / fills.len() as f32;
    let track = Theme::with_opacity(theme.foreground, 0.25);
    for (i, fill) in fills.iter().enumerate() {
        let bar = Rect::from_min_size(
            Pos2::new(rect.left() + margin + i as f32 * (bar_width + gap), rect.top() + margin),
            egui::vec2(bar_width, height),
        );
        painter.rect_filled(bar, height / 2.0, track);
        if *fill > 0.0 {
            let filled = Rect::from_min_size(bar.min, egui::vec2(bar_width * fill, height));
            painter.rect_filled(filled, height / 2.0, theme.heading_color);
        }
    }
}

/// Speaker button in the top-right corner. Returns its hit rect.
pub fn draw_sound_toggle(
    painter: &Painter,
    theme: &Theme,
    rect: Rect,
    muted: bool,
    scale: f32,
) -> Rect {
    let size = 40.0 * scale;
    let button = Rect::from_min_size(
        Pos2::new(rect.right() - size - 12.0 * scale, rect.top() + 26.0 * scale),
        egui::vec2(size, size),
    );
    painter.circle_filled(button.center(), size / 2.0, Theme::with_opacity(theme.surface, 0.8));

    let c = button.center() + egui::vec2(-5.0, 0.0) * scale;
    let color = theme.heading_color;
    let speaker = vec![
        c + egui::vec2(-7.0, -4.0) * scale,
        c + egui::vec2(-2.0, -4.0) * scale,
        c + egui::vec2(4.0, -9.0) * scale,
        c + egui::vec2(4.0, 9.0) * scale,
        c + egui::vec2(-2.0, 4.0) * scale,
        c + egui::vec2(-7.0, 4.0) * scale,
    ];
    painter.add(Shape::convex_polygon(speaker, color, Stroke::NONE));

    let stroke = Stroke::new(2.0 * scale, color);
    let right = c + egui::vec2(10.0, 0.0) * scale;
    if muted {
        let d = 4.0 * scale;
        painter.line_segment([right + egui::vec2(-d, -d), right + egui::vec2(d, d)], stroke);
        painter.line_segment([right + egui::vec2(-d, d), right + egui::vec2(d, -d)], stroke);
    } else {
        for radius in [5.0, 9.0] {
            let arc: Vec<Pos2> = (-3..=3)
                .map(|k| {
                    let a = k as f32 * 0.22;
                    c + egui::vec2(4.0 + radius * a.cos(), radius * a.sin()) * scale
                })
                .collect();
            painter.add(Shape::line(arc, stroke));
        }
    }
    button
}

/// Bottom toast, as used for mute and theme changes.
pub fn draw_toast(
    painter: &Painter,
    message: &str,
    theme: &Theme,
    rect: Rect,
    opacity: f32,
    scale: f32,
) {
    let color = Theme::with_opacity(theme.foreground, opacity * 0.9);
    let bg = Theme::with_opacity(theme.surface, opacity * 0.9);
    let galley = painter.layout_no_wrap(
        message.to_string(),
        FontId::proportional(16.0 * scale),
        color,
    );
    let padding = 12.0 * scale;
    let toast_rect = Rect::from_min_size(
        Pos2::new(
            rect.center().x - galley.rect.width() / 2.0 - padding,
            rect.bottom() - 180.0 * scale,
        ),
        egui::vec2(
            galley.rect.width() + padding * 2.0,
            galley.rect.height() + padding * 2.0,
        ),
    );
    painter.rect_filled(toast_rect, 8.0 * scale, bg);
    painter.galley(
        Pos2::new(toast_rect.left() + padding, toast_rect.top() + padding),
        galley,
        color,
    );
}

/// Darken everything outside the story column.
pub fn draw_letterbox(painter: &Painter, screen: Rect, story: Rect) {
    let shade = Color32::from_black_alpha(200);
    if story.left() > screen.left() {
        painter.rect_filled(
            Rect::from_min_max(screen.min, Pos2::new(story.left(), screen.bottom())),
            0.0,
            shade,
        );
    }
    if story.right() < screen.right() {
        painter.rect_filled(
            Rect::from_min_max(Pos2::new(story.right(), screen.top()), screen.max),
            0.0,
            shade,
        );
    }
}
