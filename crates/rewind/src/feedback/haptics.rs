use crate::story::HapticPattern;

/// Desktop stand-in for a vibration motor: the pattern is logged and the host
/// can jitter the stage while a pulse is "on".
#[derive(Debug, Default)]
pub struct Haptics {
    enabled: bool,
    pulse: Option<(HapticPattern, u64)>,
}

impl Haptics {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            pulse: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn vibrate(&mut self, pattern: HapticPattern, now_ms: u64) {
        if !self.enabled {
            return;
        }
        tracing::debug!(target: "haptics", ?pattern, ms = ?pattern.pattern_ms(), "vibrate");
        self.pulse = Some((pattern, now_ms));
    }

    /// Whether the current pattern is in one of its "on" segments.
    pub fn is_buzzing(&self, now_ms: u64) -> bool {
        let Some((pattern, start)) = self.pulse else {
            return false;
        };
        let mut t = now_ms.saturating_sub(start);
        for (i, segment) in pattern.pattern_ms().iter().enumerate() {
            let segment = u64::from(*segment);
            if t < segment {
                return i % 2 == 0;
            }
            t -= segment;
        }
        false
    }

    /// Horizontal jitter in points for the stage at `now_ms`.
    pub fn shake(&self, now_ms: u64) -> f32 {
        let Some((pattern, _)) = self.pulse else {
            return 0.0;
        };
        if !self.is_buzzing(now_ms) {
            return 0.0;
        }
        let amplitude = match pattern {
            HapticPattern::Light => 1.0,
            HapticPattern::Medium | HapticPattern::Success => 2.0,
            HapticPattern::Heavy | HapticPattern::Error => 3.0,
        };
        if (now_ms / 4) % 2 == 0 {
            amplitude
        } else {
            -amplitude
        }
    }
}
