//! Sound, haptics and telemetry. None of these can fail in a way the story
//! notices.

pub mod haptics;
pub mod sound;
pub mod telemetry;

pub use haptics::Haptics;
pub use sound::SoundBoard;
pub use telemetry::{LogTelemetry, Telemetry};
