use eframe::egui::{self, Color32, FontId, Painter, Pos2};

use crate::animation::Pose;
use crate::theme::Theme;

/// Lay out `text` wrapped to `max_width` and draw it centred on `center_x`
/// with its top at `top`. Returns the height used.
pub fn draw_centered(
    painter: &Painter,
    text: &str,
    font: FontId,
    color: Color32,
    center_x: f32,
    top: f32,
    max_width: f32,
) -> f32 {
    let galley = painter.layout(text.to_string(), font, color, max_width);
    let height = galley.rect.height();
    let pos = Pos2::new(center_x - galley.rect.width() / 2.0, top);
    painter.galley(pos, galley, color);
    height
}

/// Draw `text` at `pose`: the pose scales the font, shifts the block and
/// fades its color. Returns the unposed height so layouts stay stable.
#[allow(clippy::too_many_arguments)]
pub fn draw_posed(
    painter: &Painter,
    text: &str,
    size: f32,
    color: Color32,
    pose: Pose,
    center_x: f32,
    top: f32,
    max_width: f32,
    scale: f32,
) -> f32 {
    let rest_height = painter
        .layout(text.to_string(), FontId::proportional(size), color, max_width)
        .rect
        .height();
    if pose.opacity <= 0.0 {
        return rest_height;
    }
    let color = Theme::with_opacity(color, pose.opacity * (color.a() as f32 / 255.0));
    let grown = (rest_height * pose.scale - rest_height) / 2.0;
    draw_centered(
        painter,
        text,
        FontId::proportional(size * pose.scale),
        color,
        center_x + pose.dx * scale,
        top + pose.dy * scale - grown,
        max_width,
    );
    rest_height
}

/// Height of `text` without drawing it.
pub fn measure(painter: &Painter, text: &str, size: f32, max_width: f32) -> f32 {
    painter
        .layout(
            text.to_string(),
            FontId::proportional(size),
            Color32::WHITE,
            max_width,
        )
        .rect
        .height()
}

/// Single-line label centred in `rect`.
pub fn draw_label(painter: &Painter, text: &str, font: FontId, color: Color32, rect: egui::Rect) {
    let galley = painter.layout_no_wrap(text.to_string(), font, color);
    let pos = rect.center() - galley.rect.size() / 2.0;
    painter.galley(pos, galley, color);
}

/// `1284567` as `1,284,567`.
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// A counter value with its optional prefix and suffix.
pub fn figure(prefix: Option<&str>, value: u64, suffix: Option<&str>) -> String {
    format!(
        "{}{}{}",
        prefix.unwrap_or_default(),
        thousands(value),
        suffix.unwrap_or_default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1284), "1,284");
        assert_eq!(thousands(1_284_567), "1,284,567");
    }

    #[test]
    fn test_figure() {
        assert_eq!(figure(None, 3, Some("x")), "3x");
        assert_eq!(figure(Some("$"), 5219, None), "$5,219");
    }
}
