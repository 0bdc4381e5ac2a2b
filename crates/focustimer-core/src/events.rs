use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::achievements::Achievement;
use crate::session::FocusCategory;
use crate::timer::TimerState;

/// Every state change in the system produces an Event.
/// The CLI prints them; a UI layer would render from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerConfigured {
        total_secs: u64,
        at: DateTime<Utc>,
    },
    TimerStarted {
        total_secs: u64,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// The countdown reached zero on an in-process tick.
    TimerFinished {
        total_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        total_secs: u64,
        remaining_secs: u64,
        progress: f64,
        at: DateTime<Utc>,
    },
    SessionRecorded {
        session_id: Uuid,
        category: FocusCategory,
        minutes: u32,
        completed: bool,
        at: DateTime<Utc>,
    },
    AchievementUnlocked {
        achievement: Achievement,
        at: DateTime<Utc>,
    },
    HistoryCleared {
        removed: usize,
        at: DateTime<Utc>,
    },
}
