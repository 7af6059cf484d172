//! Rotating translucent panels behind the story. Purely decorative: a function
//! of elapsed time and viewport size, nothing else.

use crate::animation::ease_in_out;

pub const PANEL_COUNT: usize = 12;
/// Degrees of fan-out between neighbouring panels while they idle.
const ROTATION_STEP_DEG: f32 = 5.0;

const GROW_BASE_S: f32 = 1.0;
const SPIN_S: f32 = 3.0;
const REORDER_S: f32 = 1.0;
const DRIFT_S: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Panel {
    /// Top-left corner before rotation.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Radians, about the panel centre.
    pub rotation: f32,
    /// 0..1 alpha of the panel fill.
    pub alpha: f32,
}

impl Panel {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Corners after rotation, clockwise from top-left.
    pub fn corners(&self) -> [(f32, f32); 4] {
        let (cx, cy) = self.center();
        let (sin, cos) = self.rotation.sin_cos();
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)]
            .map(|(dx, dy)| (cx + dx * cos - dy * sin, cy + dx * sin + dy * cos))
    }
}

fn grow_s(i: usize) -> f32 {
    GROW_BASE_S + 0.1 * (PANEL_COUNT - i) as f32
}

fn panel_cycle_s(i: usize) -> f32 {
    grow_s(i) + SPIN_S + REORDER_S + DRIFT_S
}

/// Length of one loop of the whole background.
pub fn cycle_s() -> f32 {
    (0..PANEL_COUNT).map(panel_cycle_s).fold(0.0, f32::max)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Every panel's pose `elapsed_s` seconds into the animation.
pub fn panels(elapsed_s: f32, width: f32, height: f32) -> Vec<Panel> {
    let cycle = cycle_s();
    let t = elapsed_s.max(0.0) % cycle;
    let cell_w = width / PANEL_COUNT as f32;
    let cell_h = height / PANEL_COUNT as f32;

    (0..PANEL_COUNT)
        .map(|i| {
            let rest = (PANEL_COUNT - i) as f32;
            let full_w = width - cell_w * rest + cell_w;
            let full_h = height - cell_h * rest + cell_h;
            let fan = (ROTATION_STEP_DEG * PANEL_COUNT as f32
                - ROTATION_STEP_DEG * (i + 1) as f32)
                .to_radians();
            let turn = std::f32::consts::TAU;

            let grown_x = 0.0;
            let grown_y = -cell_h / 1.33 + rest * cell_h / 1.33;
            let packed_x = -cell_w / 1.2 + rest * cell_w / 1.2;
            let packed_y = -cell_h / 6.0 + rest * cell_h / 6.0;

            let grow = grow_s(i);
            let (x, y, w, h, rotation) = if t < grow {
                let p = ease_in_out(t / grow);
                (
                    lerp(cell_w * 5.5, grown_x, p),
                    lerp(cell_h * 5.5, grown_y, p),
                    full_w * p,
                    full_h * p,
                    lerp(-turn, 0.0, p),
                )
            } else if t < grow + SPIN_S {
                let p = (t - grow) / SPIN_S;
                (grown_x, grown_y, full_w, full_h, lerp(0.0, fan, p))
            } else if t < grow + SPIN_S + REORDER_S {
                let p = ease_in_out((t - grow - SPIN_S) / REORDER_S);
                (
                    lerp(grown_x, packed_x, p),
                    lerp(grown_y, packed_y, p),
                    full_w,
                    full_h,
                    lerp(fan, turn, p),
                )
            } else {
                let p = ((t - grow - SPIN_S - REORDER_S) / DRIFT_S).min(1.0);
                (packed_x, packed_y, full_w, full_h, lerp(turn, fan + turn, p))
            };

            Panel {
                x,
                y,
                width: w,
                height: h,
                rotation,
                alpha: 0.03 + 0.07 * (i as f32 / (PANEL_COUNT - 1) as f32),
            }
        })
        .collect()
}
