//! Side-effect hooks requested by the timer.
//!
//! The timer never talks to a notification center or a haptic engine
//! directly. It asks a [`TimerEffects`] implementation to schedule or cancel
//! a "finish" signal and to play short cues; whatever sits behind the trait
//! decides how (or whether) that reaches the user.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Short feedback cue played on lifecycle transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    Start,
    Pause,
    Success,
}

/// Capabilities the timer needs from its host.
///
/// All calls are fire-and-forget. The external finish signal may be delivered
/// while the process is suspended, so it is only ever used for alerting; state
/// transitions come from [`FocusTimer::tick`](super::FocusTimer::tick).
pub trait TimerEffects {
    /// Deliver a finish signal `after_secs` seconds from now.
    fn schedule_finish(&mut self, after_secs: u64, message: &str);

    /// Drop any pending finish signal.
    fn cancel_finish(&mut self);

    fn play_cue(&mut self, cue: Cue);
}

/// Effects sink that ignores every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEffects;

impl TimerEffects for NoopEffects {
    fn schedule_finish(&mut self, _after_secs: u64, _message: &str) {}

    fn cancel_finish(&mut self) {}

    fn play_cue(&mut self, _cue: Cue) {}
}

/// Effects sink that reports every request through `tracing`.
#[derive(Debug, Default, Clone)]
pub struct LoggingEffects {
    title: String,
}

impl LoggingEffects {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl TimerEffects for LoggingEffects {
    fn schedule_finish(&mut self, after_secs: u64, message: &str) {
        tracing::debug!(after_secs, title = %self.title, message, "finish signal scheduled");
    }

    fn cancel_finish(&mut self) {
        tracing::debug!("finish signal cancelled");
    }

    fn play_cue(&mut self, cue: Cue) {
        tracing::debug!(?cue, "cue");
    }
}

/// A single request captured by [`RecordingEffects`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectCall {
    ScheduleFinish { after_secs: u64, message: String },
    CancelFinish,
    PlayCue(Cue),
}

/// Effects sink that remembers every request.
///
/// Clones share the same buffer, so a test can hand one clone to the timer
/// and inspect the other.
#[derive(Debug, Default, Clone)]
pub struct RecordingEffects {
    calls: Rc<RefCell<Vec<EffectCall>>>,
}

impl RecordingEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<EffectCall> {
        self.calls.borrow().clone()
    }

    pub fn cues(&self) -> Vec<Cue> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                EffectCall::PlayCue(cue) => Some(*cue),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl TimerEffects for RecordingEffects {
    fn schedule_finish(&mut self, after_secs: u64, message: &str) {
        self.calls.borrow_mut().push(EffectCall::ScheduleFinish {
            after_secs,
            message: message.to_string(),
        });
    }

    fn cancel_finish(&mut self) {
        self.calls.borrow_mut().push(EffectCall::CancelFinish);
    }

    fn play_cue(&mut self, cue: Cue) {
        self.calls.borrow_mut().push(EffectCall::PlayCue(cue));
    }
}
