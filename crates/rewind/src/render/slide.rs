use eframe::egui::{self, Color32, FontId, Painter, Pos2, Rect, Stroke};

use crate::animation::{
    Choreography, Element, Pose, REEL_CYCLE, counter_value, reel_distance, reel_offset,
};
use crate::deck::{Reel, Slide, SlideKind, Stat};
use crate::render::text::{self, draw_posed, figure};
use crate::theme::Theme;

const REEL_ITEM_HEIGHT: f32 = 56.0;
const REEL_WINDOW_ITEMS: f32 = 3.0;
const STAT_ROW_HEIGHT: f32 = 60.0;

/// What a slide needs to draw itself at one instant.
pub struct SlideFrame<'a> {
    pub slide: &'a Slide,
    pub choreography: &'a Choreography,
    /// Time since the entrance started, `None` if it has not played yet.
    pub entrance_ms: Option<u64>,
    /// Time since counters and reels were released.
    pub reveal_ms: Option<u64>,
}

impl SlideFrame<'_> {
    fn pose(&self, element: Element) -> Pose {
        self.choreography
            .pose(element, self.entrance_ms.unwrap_or(0))
    }

    fn count(&self, target: u64) -> u64 {
        self.reveal_ms
            .map_or(0, |elapsed| counter_value(target, elapsed))
    }
}

/// Draw one slide into `rect`. Returns the rect of its action control
/// (swipe-up on the cover, replay on the outro) if it has one.
pub fn draw_slide(
    painter: &Painter,
    frame: &SlideFrame,
    theme: &Theme,
    rect: Rect,
    scale: f32,
) -> Option<Rect> {
    match frame.slide.kind {
        SlideKind::Cover => Some(draw_cover(painter, frame, theme, rect, scale)),
        SlideKind::Stats => {
            draw_stats(painter, frame, theme, rect, scale);
            None
        }
        SlideKind::Reel => {
            draw_reel_slide(painter, frame, theme, rect, scale);
            None
        }
        SlideKind::Outro => Some(draw_outro(painter, frame, theme, rect, scale)),
    }
}

fn content_width(rect: Rect, scale: f32) -> f32 {
    rect.width() - 56.0 * scale
}

/// Eyebrow and heading at the top of a content slide. Returns the y below them.
fn draw_header(
    painter: &Painter,
    frame: &SlideFrame,
    theme: &Theme,
    rect: Rect,
    top: f32,
    scale: f32,
) -> f32 {
    let cx = rect.center().x;
    let width = content_width(rect, scale);
    let mut y = top;
    if let Some(eyebrow) = &frame.slide.eyebrow {
        y += draw_posed(
            painter,
            &eyebrow.to_uppercase(),
            theme.eyebrow_size * scale,
            theme.accent,
            frame.pose(Element::Eyebrow),
            cx,
            y,
            width,
            scale,
        );
        y += 8.0 * scale;
    }
    if let Some(heading) = &frame.slide.heading {
        y += draw_posed(
            painter,
            heading,
            theme.heading_size * scale,
            theme.heading_color,
            frame.pose(Element::Heading),
            cx,
            y,
            width,
            scale,
        );
    }
    y
}

fn draw_body(painter: &Painter, frame: &SlideFrame, theme: &Theme, rect: Rect, top: f32, scale: f32) {
    if let Some(body) = &frame.slide.body {
        draw_posed(
            painter,
            body,
            theme.body_size * scale,
            theme.foreground,
            frame.pose(Element::Body),
            rect.center().x,
            top,
            content_width(rect, scale),
            scale,
        );
    }
}

/// Pill button anchored near the bottom of `rect`.
fn draw_action(
    painter: &Painter,
    label: &str,
    theme: &Theme,
    pose: Pose,
    rect: Rect,
    scale: f32,
) -> Rect {
    let size = egui::vec2(220.0 * scale, 52.0 * scale);
    let center = Pos2::new(rect.center().x, rect.bottom() - 96.0 * scale);
    let button = Rect::from_center_size(center, size);
    if pose.opacity > 0.0 {
        let shown = button.translate(egui::vec2(pose.dx, pose.dy) * scale);
        painter.rect_filled(shown, 26.0 * scale, Theme::with_opacity(theme.accent, pose.opacity));
        text::draw_label(
            painter,
            label,
            FontId::proportional(theme.body_size * scale),
            Theme::with_opacity(Color32::WHITE, pose.opacity),
            shown,
        );
    }
    button
}

fn draw_cover(painter: &Painter, frame: &SlideFrame, theme: &Theme, rect: Rect, scale: f32) -> Rect {
    painter.rect_filled(rect, 0.0, theme.background);
    painter.circle_filled(
        Pos2::new(rect.center().x, rect.top() + rect.height() * 0.35),
        rect.width() * 0.45,
        Theme::with_opacity(theme.accent, 0.12),
    );

    let cx = rect.center().x;
    let width = content_width(rect, scale);
    let slide = frame.slide;
    let heading_size = theme.hero_size * 0.75 * scale;
    let mut y = rect.top() + rect.height() * 0.3;
    if let Some(eyebrow) = &slide.eyebrow {
        y += draw_posed(
            painter,
            &eyebrow.to_uppercase(),
            theme.eyebrow_size * scale,
            theme.accent,
            frame.pose(Element::Eyebrow),
            cx,
            y,
            width,
            scale,
        );
        y += 12.0 * scale;
    }
    if let Some(heading) = &slide.heading {
        y += draw_posed(
            painter,
            heading,
            heading_size,
            theme.heading_color,
            frame.pose(Element::Heading),
            cx,
            y,
            width,
            scale,
        );
        y += 16.0 * scale;
    }
    draw_body(painter, frame, theme, rect, y, scale);

    let action = frame.pose(Element::Action);
    let button = draw_action(painter, "Swipe up", theme, action, rect, scale);
    if action.opacity > 0.0 {
        // Chevron above the button.
        let tip = Pos2::new(button.center().x, button.top() - 28.0 * scale);
        let stroke = Stroke::new(3.0 * scale, Theme::with_opacity(theme.foreground, action.opacity));
        painter.line_segment([tip + egui::vec2(-12.0, 10.0) * scale, tip], stroke);
        painter.line_segment([tip, tip + egui::vec2(12.0, 10.0) * scale], stroke);
    }
    button
}

fn draw_stat_row(
    painter: &Painter,
    frame: &SlideFrame,
    stat: &Stat,
    pose: Pose,
    theme: &Theme,
    row: Rect,
    scale: f32,
) {
    if pose.opacity <= 0.0 {
        return;
    }
    let row = row.translate(egui::vec2(pose.dx, pose.dy) * scale);
    painter.rect_filled(row, 14.0 * scale, Theme::with_opacity(theme.surface, pose.opacity));
    let padding = 18.0 * scale;
    let label = painter.layout_no_wrap(
        stat.label.clone(),
        FontId::proportional(theme.body_size * scale),
        Theme::with_opacity(theme.foreground, pose.opacity),
    );
    let label_pos = Pos2::new(row.left() + padding, row.center().y - label.rect.height() / 2.0);
    painter.galley(label_pos, label, theme.foreground);

    let value = figure(None, frame.count(stat.value), stat.suffix.as_deref());
    let value = painter.layout_no_wrap(
        value,
        FontId::proportional(theme.stat_size * scale),
        Theme::with_opacity(theme.heading_color, pose.opacity),
    );
    let value_pos = Pos2::new(
        row.right() - padding - value.rect.width(),
        row.center().y - value.rect.height() / 2.0,
    );
    painter.galley(value_pos, value, theme.heading_color);
}

fn draw_stats(painter: &Painter, frame: &SlideFrame, theme: &Theme, rect: Rect, scale: f32) {
    let cx = rect.center().x;
    let width = content_width(rect, scale);
    let slide = frame.slide;
    let mut y = draw_header(painter, frame, theme, rect, rect.top() + 72.0 * scale, scale);
    y += 36.0 * scale;

    if let Some(hero) = &slide.hero {
        let pose = frame.pose(Element::Hero);
        let value = figure(
            hero.prefix.as_deref(),
            frame.count(hero.value),
            hero.suffix.as_deref(),
        );
        y += draw_posed(
            painter,
            &value,
            theme.hero_size * scale,
            theme.heading_color,
            pose,
            cx,
            y,
            width,
            scale,
        );
        if !hero.label.is_empty() {
            y += draw_posed(
                painter,
                &hero.label,
                theme.body_size * scale,
                theme.muted,
                pose,
                cx,
                y,
                width,
                scale,
            );
        }
        y += 28.0 * scale;
    }

    let row_height = STAT_ROW_HEIGHT * scale;
    for (i, stat) in slide.stats.iter().enumerate() {
        let row = Rect::from_min_size(
            Pos2::new(cx - width / 2.0, y),
            egui::vec2(width, row_height),
        );
        draw_stat_row(painter, frame, stat, frame.pose(Element::Stat(i)), theme, row, scale);
        y += row_height + 10.0 * scale;
    }

    draw_body(painter, frame, theme, rect, y + 18.0 * scale, scale);
}

/// Items per spin; short reels cycle through all of theirs.
fn strip_cycle(reel: &Reel) -> usize {
    (REEL_CYCLE as usize).min(reel.items.len()).max(1)
}

/// Label of the `k`-th item on the reel strip: full spins through the
/// first `REEL_CYCLE` items, then the deck's items in order.
fn strip_item(reel: &Reel, k: usize) -> Option<&str> {
    let cycle = strip_cycle(reel);
    let spun = (reel.spin_count() as usize).saturating_mul(cycle);
    let index = if k < spun { k % cycle } else { k - spun };
    reel.items.get(index).map(String::as_str)
}

fn draw_reel(
    painter: &Painter,
    frame: &SlideFrame,
    reel: &Reel,
    theme: &Theme,
    window: Rect,
    scale: f32,
) {
    let pose = frame.pose(Element::Reel);
    if pose.opacity <= 0.0 {
        return;
    }
    painter.rect_filled(window, 16.0 * scale, Theme::with_opacity(theme.surface, pose.opacity));
    let item_height = REEL_ITEM_HEIGHT * scale;
    let band = Rect::from_center_size(window.center(), egui::vec2(window.width(), item_height));
    painter.rect_filled(band, 0.0, Theme::with_opacity(theme.accent, 0.18 * pose.opacity));

    let cycle = strip_cycle(reel) as u32;
    let distance = reel_distance(reel.target, reel.spin_count(), item_height, cycle);
    let offset = frame
        .reveal_ms
        .map_or(0.0, |elapsed| reel_offset(distance, elapsed));
    let clip = painter.with_clip_rect(window);
    let centre_k = (-offset / item_height).round() as i64;
    for k in (centre_k - 2).max(0)..=centre_k + 2 {
        let Some(label) = strip_item(reel, k as usize) else {
            continue;
        };
        let y = window.center().y + k as f32 * item_height + offset;
        let slot = Rect::from_center_size(Pos2::new(window.center().x, y), band.size());
        text::draw_label(
            &clip,
            label,
            FontId::proportional(theme.stat_size * scale),
            Theme::with_opacity(theme.heading_color, pose.opacity),
            slot,
        );
    }
}

fn draw_reel_slide(painter: &Painter, frame: &SlideFrame, theme: &Theme, rect: Rect, scale: f32) {
    let cx = rect.center().x;
    let width = content_width(rect, scale);
    let mut y = draw_header(painter, frame, theme, rect, rect.top() + 72.0 * scale, scale);
    y += 40.0 * scale;

    let Some(reel) = &frame.slide.reel else {
        draw_body(painter, frame, theme, rect, y, scale);
        return;
    };
    let window = Rect::from_min_size(
        Pos2::new(cx - width / 2.0, y),
        egui::vec2(width, REEL_ITEM_HEIGHT * REEL_WINDOW_ITEMS * scale),
    );
    draw_reel(painter, frame, reel, theme, window, scale);
    y = window.bottom() + 24.0 * scale;

    if let Some(landing) = reel.landing_item() {
        y += draw_posed(
            painter,
            landing,
            theme.heading_size * scale,
            theme.accent,
            frame.pose(Element::Landing),
            cx,
            y,
            width,
            scale,
        );
    }
    draw_body(painter, frame, theme, rect, y + 16.0 * scale, scale);
}

fn draw_outro(painter: &Painter, frame: &SlideFrame, theme: &Theme, rect: Rect, scale: f32) -> Rect {
    let cx = rect.center().x;
    let width = content_width(rect, scale);
    let slide = frame.slide;
    let mut y = rect.top() + rect.height() * 0.22;

    let emblem = frame.pose(Element::Hero);
    if let Some(hero) = &slide.hero {
        let value = figure(
            hero.prefix.as_deref(),
            frame.count(hero.value),
            hero.suffix.as_deref(),
        );
        y += draw_posed(
            painter,
            &value,
            theme.hero_size * scale,
            theme.heading_color,
            emblem,
            cx,
            y,
            width,
            scale,
        );
    } else if emblem.opacity > 0.0 {
        let radius = 56.0 * scale * emblem.scale;
        let center = Pos2::new(cx, y + 56.0 * scale + emblem.dy * scale);
        painter.circle_stroke(
            center,
            radius,
            Stroke::new(6.0 * scale, Theme::with_opacity(theme.accent, emblem.opacity)),
        );
        let check = Stroke::new(6.0 * scale, Theme::with_opacity(theme.correct, emblem.opacity));
        painter.line_segment(
            [center + egui::vec2(-24.0, 2.0) * scale, center + egui::vec2(-6.0, 20.0) * scale],
            check,
        );
        painter.line_segment(
            [center + egui::vec2(-6.0, 20.0) * scale, center + egui::vec2(26.0, -18.0) * scale],
            check,
        );
        y += 112.0 * scale;
    }
    y += 28.0 * scale;

    if let Some(heading) = &slide.heading {
        y += draw_posed(
            painter,
            heading,
            theme.heading_size * scale,
            theme.heading_color,
            frame.pose(Element::Heading),
            cx,
            y,
            width,
            scale,
        );
        y += 12.0 * scale;
    }
    draw_body(painter, frame, theme, rect, y, scale);
    draw_action(painter, "Replay", theme, frame.pose(Element::Action), rect, scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reel(items: &[&str], target: usize, spins: u32) -> Reel {
        Reel {
            items: items.iter().map(|s| s.to_string()).collect(),
            target,
            spins,
        }
    }

    #[test]
    fn test_strip_lands_on_target() {
        let days = [
            "Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun", "Mon", "Tue",
        ];
        let reel = reel(&days, 8, 2);
        assert_eq!(strip_item(&reel, 0), Some("Mon"));
        assert_eq!(strip_item(&reel, 7), Some("Mon"));
        assert_eq!(strip_item(&reel, 13), Some("Sun"));
        // Full travel is spins * cycle + target items.
        assert_eq!(strip_item(&reel, 2 * 7 + 8), Some("Tue"));
        assert_eq!(strip_item(&reel, 2 * 7 + 9), None);
    }

    #[test]
    fn test_short_reel_cycles_its_own_items() {
        let reel = reel(&["a", "b"], 1, 1);
        assert_eq!(strip_item(&reel, 0), Some("a"));
        assert_eq!(strip_item(&reel, 1), Some("b"));
        assert_eq!(strip_item(&reel, 2), Some("a"));
        assert_eq!(strip_item(&reel, 3), Some("b"));
    }

    #[test]
    fn test_reel_travel_matches_strip() {
        let h = REEL_ITEM_HEIGHT;
        let distance = reel_distance(8, 2, h, REEL_CYCLE);
        let landed = (-distance / h).round() as usize;
        assert_eq!(landed, 22);

        let short = reel(&["a", "b", "c"], 2, 1);
        let distance = reel_distance(2, 1, h, strip_cycle(&short) as u32);
        let landed = (-distance / h).round() as usize;
        assert_eq!(strip_item(&short, landed), short.landing_item());
    }

    #[test]
    fn test_huge_spin_count_still_lands() {
        let h = REEL_ITEM_HEIGHT;
        let reel = reel(&["a", "b", "c"], 1, 1_000_000_000);
        let distance = reel_distance(1, reel.spin_count(), h, strip_cycle(&reel) as u32);
        let landed = (-distance / h).round() as usize;
        assert_eq!(strip_item(&reel, landed), Some("b"));
    }
}
