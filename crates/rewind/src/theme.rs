use eframe::egui::Color32;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub foreground: Color32,
    pub heading_color: Color32,
    pub accent: Color32,
    /// Cards, quiz panel, controls.
    pub surface: Color32,
    pub muted: Color32,
    pub correct: Color32,
    pub wrong: Color32,
    /// Background panel tint; alpha comes from the panel.
    pub panel_tint: Color32,
    pub eyebrow_size: f32,
    pub heading_size: f32,
    pub hero_size: f32,
    pub stat_size: f32,
    pub body_size: f32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::from_rgb(0x0B, 0x10, 0x1E),
            foreground: Color32::from_rgb(0xC9, 0xD1, 0xE4),
            heading_color: Color32::WHITE,
            accent: Color32::from_rgb(0x2B, 0x6C, 0xEE),
            surface: Color32::from_rgb(0x17, 0x1F, 0x35),
            muted: Color32::from_rgb(0x6B, 0x76, 0x93),
            correct: Color32::from_rgb(0x22, 0xC5, 0x5E),
            wrong: Color32::from_rgb(0xEF, 0x44, 0x44),
            panel_tint: Color32::from_rgb(0x2B, 0x6C, 0xEE),
            eyebrow_size: 14.0,
            heading_size: 30.0,
            hero_size: 72.0,
            stat_size: 30.0,
            body_size: 17.0,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::from_rgb(0xF5, 0xF7, 0xFC),
            foreground: Color32::from_rgb(0x33, 0x3B, 0x52),
            heading_color: Color32::from_rgb(0x0B, 0x10, 0x1E),
            accent: Color32::from_rgb(0x2B, 0x6C, 0xEE),
            surface: Color32::WHITE,
            muted: Color32::from_rgb(0x8A, 0x93, 0xA8),
            correct: Color32::from_rgb(0x16, 0xA3, 0x4A),
            wrong: Color32::from_rgb(0xDC, 0x26, 0x26),
            panel_tint: Color32::from_rgb(0x2B, 0x6C, 0xEE),
            eyebrow_size: 14.0,
            heading_size: 30.0,
            hero_size: 72.0,
            stat_size: 30.0,
            body_size: 17.0,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn toggled(&self) -> Self {
        if self.name == "dark" {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        Color32::from_rgba_unmultiplied(
            color.r(),
            color.g(),
            color.b(),
            (opacity.clamp(0.0, 1.0) * 255.0) as u8,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_defaults_to_dark() {
        assert_eq!(Theme::from_name("light").name, "light");
        assert_eq!(Theme::from_name("neon").name, "dark");
        assert_eq!(Theme::dark().toggled().name, "light");
    }

    #[test]
    fn test_with_opacity_clamps() {
        let c = Theme::with_opacity(Color32::WHITE, 2.0);
        assert_eq!(c.a(), 255);
        let c = Theme::with_opacity(Color32::WHITE, -1.0);
        assert_eq!(c.a(), 0);
    }
}
