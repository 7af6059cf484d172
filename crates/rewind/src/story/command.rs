//! Effects the story asks its collaborators to carry out.

/// Visual placement of one slide, recomputed from navigation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideVisual {
    /// Parked off-stage to the right (not yet reached).
    Hidden,
    Active,
    /// Parked off-stage to the left (already passed).
    Previous,
    /// Uncovered behind the cover while it is dragged up.
    Revealing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarState {
    Pending,
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    /// The strip is hidden on the cover and the final slide.
    pub visible: bool,
    pub bars: Vec<BarState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Swipe,
    Correct,
    Wrong,
    Reveal,
    Techno,
}

impl SoundCue {
    pub fn name(self) -> &'static str {
        match self {
            Self::Swipe => "swipe",
            Self::Correct => "correct",
            Self::Wrong => "wrong",
            Self::Reveal => "reveal",
            Self::Techno => "techno",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticPattern {
    Light,
    Medium,
    Heavy,
    Success,
    Error,
}

impl HapticPattern {
    /// Vibration pattern in milliseconds, alternating on/off.
    pub fn pattern_ms(self) -> &'static [u32] {
        match self {
            Self::Light => &[10],
            Self::Medium => &[20],
            Self::Heavy => &[30],
            Self::Success => &[10, 50, 10],
            Self::Error => &[20, 100, 20],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    Correct,
    Wrong,
}

/// Where the cover slide should settle once a vertical drag is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverSettle {
    /// Slide fully off the top of the viewport.
    Commit,
    /// Return to rest.
    SnapBack,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Full visual state of every slide. `snap` selects the short tap animation.
    Stage { visuals: Vec<SlideVisual>, snap: bool },
    /// Transition finished; drop any snap styling.
    ClearSnap,
    /// Live vertical offset of the cover while it is dragged (pixels, negative is up).
    DragCover { offset_px: f32, fraction: f32 },
    SettleCover { settle: CoverSettle, duration_ms: u64 },
    Progress(ProgressView),
    PauseProgress { slide: usize },
    ResumeProgress { slide: usize },
    PlayEntrance { slide: usize },
    RevealContent { slide: usize },
    Sound(SoundCue),
    Haptic(HapticPattern),
    Telemetry(&'static str),
    ShowQuiz {
        slide: usize,
        question: String,
        options: Vec<String>,
        countdown_ms: Option<u64>,
    },
    FreezeCountdown { remaining_ms: u64 },
    MarkOption { index: usize, mark: OptionMark },
    Celebrate,
    HideQuiz { dismiss_ms: u64 },
}
