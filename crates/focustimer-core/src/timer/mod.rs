mod effects;
mod engine;

pub use effects::{Cue, EffectCall, LoggingEffects, NoopEffects, RecordingEffects, TimerEffects};
pub use engine::{FocusTimer, TimerBounds, TimerState, DEFAULT_MINUTES, MIN_TOTAL_SECS};
