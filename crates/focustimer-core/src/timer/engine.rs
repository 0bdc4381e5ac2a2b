//! Focus timer state machine.
//!
//! The timer counts down in whole seconds. It does not own a clock or a
//! thread - the caller drives it by calling `tick()` once per second while
//! it is running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused -> Running)* -> Finished
//!   ^________________ reset / configure _______|
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = FocusTimer::new(Box::new(NoopEffects));
//! timer.configure(25);
//! timer.start();
//! // Once per second:
//! if let Some(Event::TimerFinished { .. }) = timer.tick() { /* record */ }
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::effects::{Cue, NoopEffects, TimerEffects};
use crate::error::ValidationError;
use crate::events::Event;

/// Duration a fresh timer is configured with.
pub const DEFAULT_MINUTES: u32 = 5;

/// Shortest countdown the timer will run, whatever it is configured with.
pub const MIN_TOTAL_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    /// Countdown reached zero. Only `reset()` or `configure()` leave this state.
    Finished,
}

/// Accepted range for configured minutes.
///
/// Out-of-range requests are clamped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerBounds {
    pub min_minutes: u32,
    pub max_minutes: u32,
}

impl TimerBounds {
    pub fn new(min_minutes: u32, max_minutes: u32) -> Result<Self, ValidationError> {
        if min_minutes == 0 {
            return Err(ValidationError::InvalidValue {
                field: "min_minutes".into(),
                message: "must be at least 1".into(),
            });
        }
        if max_minutes < min_minutes {
            return Err(ValidationError::InvalidValue {
                field: "max_minutes".into(),
                message: format!("must be >= min_minutes ({min_minutes})"),
            });
        }
        Ok(Self {
            min_minutes,
            max_minutes,
        })
    }

    pub fn clamp(&self, minutes: u32) -> u32 {
        let min = self.min_minutes.max(1);
        minutes.clamp(min, self.max_minutes.max(min))
    }
}

impl Default for TimerBounds {
    fn default() -> Self {
        Self {
            min_minutes: 1,
            max_minutes: 60,
        }
    }
}

/// Countdown state machine for a single focus interval.
pub struct FocusTimer {
    state: TimerState,
    bounds: TimerBounds,
    total_secs: u64,
    remaining_secs: u64,
    started_at: Option<DateTime<Utc>>,
    /// A finish signal has been requested and not yet cancelled or reached.
    finish_pending: bool,
    cues_enabled: bool,
    notifications_enabled: bool,
    effects: Box<dyn TimerEffects>,
}

impl FocusTimer {
    /// Create an idle timer configured for [`DEFAULT_MINUTES`].
    pub fn new(effects: Box<dyn TimerEffects>) -> Self {
        Self::with_bounds(TimerBounds::default(), effects)
    }

    pub fn with_bounds(bounds: TimerBounds, effects: Box<dyn TimerEffects>) -> Self {
        let total_secs = (u64::from(bounds.clamp(DEFAULT_MINUTES)) * 60).max(MIN_TOTAL_SECS);
        Self {
            state: TimerState::Idle,
            bounds,
            total_secs,
            remaining_secs: total_secs,
            started_at: None,
            finish_pending: false,
            cues_enabled: true,
            notifications_enabled: true,
            effects,
        }
    }

    /// Timer with no side effects attached.
    pub fn detached() -> Self {
        Self::new(Box::new(NoopEffects))
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn bounds(&self) -> TimerBounds {
        self.bounds
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.total_secs - self.remaining_secs
    }

    pub fn configured_minutes(&self) -> u32 {
        u32::try_from(self.total_secs / 60).unwrap_or(u32::MAX)
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn cues_enabled(&self) -> bool {
        self.cues_enabled
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifications_enabled
    }

    pub fn finish_pending(&self) -> bool {
        self.finish_pending
    }

    /// 0.0 .. 1.0 progress through the countdown.
    pub fn progress(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        self.elapsed_secs() as f64 / self.total_secs as f64
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            total_secs: self.total_secs,
            remaining_secs: self.remaining_secs,
            progress: self.progress(),
            at: Utc::now(),
        }
    }

    // ── Settings ─────────────────────────────────────────────────────

    /// Enable or disable cue playback. Finish signals are unaffected.
    pub fn set_cues_enabled(&mut self, enabled: bool) {
        self.cues_enabled = enabled;
    }

    /// Enable or disable the finish signal. Cues are unaffected.
    ///
    /// Disabling drops a signal that is already pending.
    pub fn set_notifications_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.cancel_finish_signal();
        }
        self.notifications_enabled = enabled;
    }

    /// Replace the accepted range. Takes effect on the next `configure()`.
    pub fn set_bounds(&mut self, bounds: TimerBounds) {
        self.bounds = bounds;
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Set the countdown length and return to `Idle`.
    ///
    /// Valid in every state; an active countdown and its finish signal are
    /// cancelled first.
    pub fn configure(&mut self, minutes: u32) -> Event {
        let minutes = self.bounds.clamp(minutes);
        self.cancel_finish_signal();
        self.total_secs = (u64::from(minutes) * 60).max(MIN_TOTAL_SECS);
        self.remaining_secs = self.total_secs;
        self.state = TimerState::Idle;
        self.started_at = None;
        tracing::debug!(minutes, total_secs = self.total_secs, "timer configured");
        Event::TimerConfigured {
            total_secs: self.total_secs,
            at: Utc::now(),
        }
    }

    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Idle => {
                let now = Utc::now();
                self.started_at = Some(now);
                self.state = TimerState::Running;
                self.cue(Cue::Start);
                self.schedule_finish_signal();
                tracing::debug!(remaining_secs = self.remaining_secs, "timer started");
                Some(Event::TimerStarted {
                    total_secs: self.total_secs,
                    remaining_secs: self.remaining_secs,
                    at: now,
                })
            }
            TimerState::Running | TimerState::Paused | TimerState::Finished => None,
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                self.state = TimerState::Paused;
                self.cue(Cue::Pause);
                self.cancel_finish_signal();
                tracing::debug!(remaining_secs = self.remaining_secs, "timer paused");
                Some(Event::TimerPaused {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    pub fn resume(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Paused => {
                self.state = TimerState::Running;
                self.cue(Cue::Start);
                self.schedule_finish_signal();
                tracing::debug!(remaining_secs = self.remaining_secs, "timer resumed");
                Some(Event::TimerResumed {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Return to `Idle` with the full configured duration. Valid in every state.
    pub fn reset(&mut self) -> Event {
        self.cancel_finish_signal();
        self.state = TimerState::Idle;
        self.remaining_secs = self.total_secs;
        self.started_at = None;
        tracing::debug!("timer reset");
        Event::TimerReset { at: Utc::now() }
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `Some(Event::TimerFinished)` on the tick that reaches zero.
    /// Ticks outside `Running` are ignored.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }

        self.state = TimerState::Finished;
        // The external signal fires on its own at this point; nothing left to cancel.
        self.finish_pending = false;
        self.cue(Cue::Success);
        tracing::debug!(total_secs = self.total_secs, "timer finished");
        Some(Event::TimerFinished {
            total_secs: self.total_secs,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn cue(&mut self, cue: Cue) {
        if self.cues_enabled {
            self.effects.play_cue(cue);
        }
    }

    fn schedule_finish_signal(&mut self) {
        self.cancel_finish_signal();
        if !self.notifications_enabled {
            return;
        }
        let message = format!("Your {}-minute session is done.", self.configured_minutes());
        self.effects.schedule_finish(self.remaining_secs, &message);
        self.finish_pending = true;
    }

    fn cancel_finish_signal(&mut self) {
        if self.finish_pending {
            self.effects.cancel_finish();
            self.finish_pending = false;
        }
    }
}

impl Default for FocusTimer {
    fn default() -> Self {
        Self::detached()
    }
}

impl fmt::Debug for FocusTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusTimer")
            .field("state", &self.state)
            .field("bounds", &self.bounds)
            .field("total_secs", &self.total_secs)
            .field("remaining_secs", &self.remaining_secs)
            .field("started_at", &self.started_at)
            .field("finish_pending", &self.finish_pending)
            .field("cues_enabled", &self.cues_enabled)
            .field("notifications_enabled", &self.notifications_enabled)
            .finish_non_exhaustive()
    }
}
