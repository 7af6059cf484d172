//! Synthesised feedback tones.
//!
//! Every cue is a couple of oscillators with a frequency ramp and a decaying
//! gain, rendered to a mono buffer. Playback needs the `audio` feature; without
//! it the board only logs what it would have played.

use crate::story::SoundCue;

pub const SAMPLE_RATE: u32 = 44_100;

/// Gain the envelope decays to by the end of a voice.
const TAIL_GAIN: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Sawtooth,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ramp {
    Linear,
    Exponential,
}

/// Frequency glide from `from_hz` to `to_hz`, ending at `until_s`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glide {
    pub until_s: f32,
    pub from_hz: f32,
    pub to_hz: f32,
    pub ramp: Ramp,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub waveform: Waveform,
    pub gain: f32,
    pub duration_s: f32,
    pub glides: &'static [Glide],
}

const fn hold(hz: f32, until_s: f32) -> Glide {
    Glide {
        until_s,
        from_hz: hz,
        to_hz: hz,
        ramp: Ramp::Linear,
    }
}

const SWIPE: &[Voice] = &[Voice {
    waveform: Waveform::Sine,
    gain: 0.1,
    duration_s: 0.1,
    glides: &[hold(800.0, 0.1)],
}];

const CORRECT: &[Voice] = &[Voice {
    waveform: Waveform::Sine,
    gain: 0.2,
    duration_s: 0.3,
    glides: &[hold(1000.0, 0.3)],
}];

const WRONG: &[Voice] = &[Voice {
    waveform: Waveform::Sawtooth,
    gain: 0.15,
    duration_s: 0.2,
    glides: &[hold(200.0, 0.2)],
}];

const REVEAL: &[Voice] = &[Voice {
    waveform: Waveform::Sine,
    gain: 0.15,
    duration_s: 0.3,
    glides: &[Glide {
        until_s: 0.3,
        from_hz: 600.0,
        to_hz: 200.0,
        ramp: Ramp::Exponential,
    }],
}];

const TECHNO: &[Voice] = &[
    Voice {
        waveform: Waveform::Sawtooth,
        gain: 0.3,
        duration_s: 0.5,
        glides: &[Glide {
            until_s: 0.5,
            from_hz: 100.0,
            to_hz: 50.0,
            ramp: Ramp::Exponential,
        }],
    },
    Voice {
        waveform: Waveform::Square,
        gain: 0.1,
        duration_s: 0.4,
        glides: &[
            Glide {
                until_s: 0.1,
                from_hz: 400.0,
                to_hz: 800.0,
                ramp: Ramp::Linear,
            },
            Glide {
                until_s: 0.4,
                from_hz: 800.0,
                to_hz: 200.0,
                ramp: Ramp::Linear,
            },
        ],
    },
];

pub fn voices(cue: SoundCue) -> &'static [Voice] {
    match cue {
        SoundCue::Swipe => SWIPE,
        SoundCue::Correct => CORRECT,
        SoundCue::Wrong => WRONG,
        SoundCue::Reveal => REVEAL,
        SoundCue::Techno => TECHNO,
    }
}

impl Voice {
    pub fn frequency_at(&self, t: f32) -> f32 {
        let mut start = 0.0;
        for glide in self.glides {
            if t <= glide.until_s {
                let span = (glide.until_s - start).max(f32::EPSILON);
                let p = ((t - start) / span).clamp(0.0, 1.0);
                return match glide.ramp {
                    Ramp::Linear => glide.from_hz + (glide.to_hz - glide.from_hz) * p,
                    Ramp::Exponential => glide.from_hz * (glide.to_hz / glide.from_hz).powf(p),
                };
            }
            start = glide.until_s;
        }
        self.glides.last().map_or(0.0, |g| g.to_hz)
    }

    fn gain_at(&self, t: f32) -> f32 {
        let p = (t / self.duration_s).clamp(0.0, 1.0);
        self.gain * (TAIL_GAIN / self.gain).powf(p)
    }
}

fn oscillate(waveform: Waveform, phase: f32) -> f32 {
    match waveform {
        Waveform::Sine => (phase * std::f32::consts::TAU).sin(),
        Waveform::Sawtooth => 2.0 * phase - 1.0,
        Waveform::Square => {
            if phase < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
    }
}

/// Render `cue` as mono samples at `sample_rate`.
pub fn synthesize(cue: SoundCue, sample_rate: u32) -> Vec<f32> {
    let voices = voices(cue);
    let duration = voices.iter().map(|v| v.duration_s).fold(0.0, f32::max);
    let len = (duration * sample_rate as f32).round() as usize;
    let mut samples = vec![0.0f32; len];
    let dt = 1.0 / sample_rate as f32;

    for voice in voices {
        let voice_len = ((voice.duration_s * sample_rate as f32).round() as usize).min(len);
        let mut phase = 0.0f32;
        for (i, sample) in samples.iter_mut().take(voice_len).enumerate() {
            let t = i as f32 * dt;
            *sample += oscillate(voice.waveform, phase) * voice.gain_at(t);
            phase = (phase + voice.frequency_at(t) * dt).fract();
        }
    }
    for sample in &mut samples {
        *sample = sample.clamp(-1.0, 1.0);
    }
    samples
}

#[cfg(feature = "audio")]
struct Output {
    _stream: rodio::OutputStream,
    handle: rodio::OutputStreamHandle,
}

/// Plays cues unless muted. Starts muted, like a page waiting for a gesture.
pub struct SoundBoard {
    muted: bool,
    #[cfg(feature = "audio")]
    output: Option<Output>,
    #[cfg(feature = "audio")]
    output_failed: bool,
}

impl SoundBoard {
    pub fn new(muted: bool) -> Self {
        Self {
            muted,
            #[cfg(feature = "audio")]
            output: None,
            #[cfg(feature = "audio")]
            output_failed: false,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Flip mute and return the new state.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        tracing::debug!(muted = self.muted, "sound toggled");
        self.muted
    }

    pub fn play(&mut self, cue: SoundCue) {
        if self.muted {
            return;
        }
        tracing::debug!(cue = cue.name(), "sound");
        #[cfg(feature = "audio")]
        self.play_through_device(cue);
    }

    #[cfg(feature = "audio")]
    fn play_through_device(&mut self, cue: SoundCue) {
        use rodio::buffer::SamplesBuffer;

        if self.output.is_none() && !self.output_failed {
            match rodio::OutputStream::try_default() {
                Ok((stream, handle)) => {
                    self.output = Some(Output {
                        _stream: stream,
                        handle,
                    });
                }
                Err(e) => {
                    tracing::warn!("no audio output, sounds disabled: {e}");
                    self.output_failed = true;
                }
            }
        }
        let Some(output) = &self.output else {
            return;
        };
        let buffer = SamplesBuffer::new(1, SAMPLE_RATE, synthesize(cue, SAMPLE_RATE));
        if let Err(e) = output.handle.play_raw(buffer) {
            tracing::warn!(cue = cue.name(), "failed to play sound: {e}");
        }
    }
}

impl Default for SoundBoard {
    fn default() -> Self {
        Self::new(true)
    }
}
