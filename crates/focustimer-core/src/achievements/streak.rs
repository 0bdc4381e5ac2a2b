//! Day-streak tracking and threshold evaluation.
//!
//! The evaluator consumes one completed session at a time. Thresholds are
//! checked as before/after crossings, so each fires on the session that
//! crosses it and never again on later sessions past the line.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::Achievement;
use crate::error::StorageError;
use crate::storage::{DefaultReason, KeyValueStore, LoadOutcome};

pub const STREAK_KEY: &str = "focus.streak";
pub const TOTAL_MINUTES_KEY: &str = "focus.totalMinutes";
pub const LAST_DAY_KEY: &str = "focus.lastDay";
pub const ACHIEVEMENTS_KEY: &str = "focus.achievements";

const STREAK_MILESTONES: [(u32, Achievement); 2] = [
    (3, Achievement::ThreeDayStreak),
    (7, Achievement::OneWeekStreak),
];

const MINUTE_MILESTONES: [(u64, Achievement); 2] = [
    (100, Achievement::HundredMinutes),
    (500, Achievement::FiveHundredMinutes),
];

/// Running streak and total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub current_streak_days: u32,
    pub total_minutes: u64,
    pub last_active_date: Option<NaiveDate>,
}

impl StreakState {
    /// Streak as it stands on `today`: a streak whose last day is before
    /// yesterday has lapsed even though no session has reset it yet.
    pub fn active_streak_on(&self, today: NaiveDate) -> u32 {
        match self.last_active_date {
            Some(last) if last == today || last.succ_opt() == Some(today) => {
                self.current_streak_days
            }
            _ => 0,
        }
    }

    /// Restore `streak == 0 iff never registered` after loading from storage.
    fn normalized(mut self) -> Self {
        match self.last_active_date {
            None => self.current_streak_days = 0,
            Some(_) if self.current_streak_days == 0 => self.current_streak_days = 1,
            Some(_) => {}
        }
        self
    }
}

/// Streak value after a session on `today`.
fn next_streak(state: &StreakState, today: NaiveDate) -> u32 {
    match state.last_active_date {
        None => 1,
        Some(last) if last == today => state.current_streak_days.max(1),
        Some(last) if last.succ_opt() == Some(today) => {
            state.current_streak_days.saturating_add(1)
        }
        // Earlier than yesterday, or a date in the future after a clock change.
        Some(_) => 1,
    }
}

/// Maintains streak state and the list of unlocked achievements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreakEvaluator {
    state: StreakState,
    unlocked: Vec<Achievement>,
}

impl StreakEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(state: StreakState, unlocked: Vec<Achievement>) -> Self {
        let mut evaluator = Self {
            state: state.normalized(),
            unlocked: Vec::with_capacity(unlocked.len()),
        };
        for achievement in unlocked {
            evaluator.unlock(achievement);
        }
        evaluator
    }

    pub fn state(&self) -> &StreakState {
        &self.state
    }

    pub fn current_streak_days(&self) -> u32 {
        self.state.current_streak_days
    }

    pub fn total_minutes(&self) -> u64 {
        self.state.total_minutes
    }

    /// Every achievement unlocked so far, in unlock order.
    pub fn unlocked(&self) -> &[Achievement] {
        &self.unlocked
    }

    /// Register a completed session that ended today (local calendar).
    pub fn register_session(&mut self, minutes: u32) -> Vec<Achievement> {
        self.register_session_on(minutes, Local::now().date_naive())
    }

    /// Register a completed session on `today`, returning what it unlocked.
    ///
    /// Only the calendar-day distance between successive calls matters; the
    /// evaluator never looks back at earlier sessions.
    pub fn register_session_on(&mut self, minutes: u32, today: NaiveDate) -> Vec<Achievement> {
        let before = self.state;
        let streak = next_streak(&before, today);
        let total = before.total_minutes.saturating_add(u64::from(minutes));

        self.state = StreakState {
            current_streak_days: streak,
            total_minutes: total,
            last_active_date: Some(today),
        };

        let mut crossed = Vec::new();
        for (days, achievement) in STREAK_MILESTONES {
            if streak == days && before.current_streak_days != days {
                crossed.push(achievement);
            }
        }
        for (threshold, achievement) in MINUTE_MILESTONES {
            if before.total_minutes < threshold && total >= threshold {
                crossed.push(achievement);
            }
        }

        let newly: Vec<Achievement> = crossed
            .into_iter()
            .filter(|a| self.unlock(*a))
            .collect();

        tracing::debug!(
            streak,
            total_minutes = total,
            unlocked = newly.len(),
            "session registered"
        );
        newly
    }

    /// Add to the unlocked list. Returns false if it was already there.
    fn unlock(&mut self, achievement: Achievement) -> bool {
        if self.unlocked.contains(&achievement) {
            return false;
        }
        self.unlocked.push(achievement);
        true
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Read streak scalars and the achievement list, each key independently.
    ///
    /// A key that is missing keeps its default. A key that fails to decode
    /// also keeps its default and marks the outcome as corrupt.
    pub fn load(store: &dyn KeyValueStore) -> LoadOutcome<Self> {
        let mut reader = KeyReader::new(store);

        let current_streak_days = reader
            .read(STREAK_KEY, |raw| raw.parse::<u32>().map_err(|e| e.to_string()))
            .unwrap_or(0);
        let total_minutes = reader
            .read(TOTAL_MINUTES_KEY, |raw| raw.parse::<u64>().map_err(|e| e.to_string()))
            .unwrap_or(0);
        let last_active_date = reader.read(LAST_DAY_KEY, |raw| {
            raw.parse::<NaiveDate>().map_err(|e| e.to_string())
        });
        let unlocked = reader
            .read(ACHIEVEMENTS_KEY, |raw| {
                serde_json::from_str::<Vec<Achievement>>(raw).map_err(|e| e.to_string())
            })
            .unwrap_or_default();

        let evaluator = Self::from_parts(
            StreakState {
                current_streak_days,
                total_minutes,
                last_active_date,
            },
            unlocked,
        );

        if !reader.problems.is_empty() {
            let reason = reader.problems.join("; ");
            tracing::warn!(%reason, "streak state partially restored");
            return LoadOutcome::Defaulted {
                value: evaluator,
                reason: DefaultReason::Corrupt(reason),
            };
        }
        if !reader.seen_any {
            return LoadOutcome::missing(evaluator);
        }
        LoadOutcome::Loaded(evaluator)
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        store.set(STREAK_KEY, &self.state.current_streak_days.to_string())?;
        store.set(TOTAL_MINUTES_KEY, &self.state.total_minutes.to_string())?;
        match self.state.last_active_date {
            Some(day) => store.set(LAST_DAY_KEY, &day.format("%Y-%m-%d").to_string())?,
            None => store.remove(LAST_DAY_KEY)?,
        }
        let unlocked = serde_json::to_string(&self.unlocked).map_err(|e| {
            StorageError::WriteRejected {
                key: ACHIEVEMENTS_KEY.to_string(),
                message: e.to_string(),
            }
        })?;
        store.set(ACHIEVEMENTS_KEY, &unlocked)?;
        Ok(())
    }
}

/// Reads scalar keys one at a time, collecting decode problems.
struct KeyReader<'a> {
    store: &'a dyn KeyValueStore,
    problems: Vec<String>,
    seen_any: bool,
}

impl<'a> KeyReader<'a> {
    fn new(store: &'a dyn KeyValueStore) -> Self {
        Self {
            store,
            problems: Vec::new(),
            seen_any: false,
        }
    }

    fn read<T>(&mut self, key: &str, decode: impl FnOnce(&str) -> Result<T, String>) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                self.problems.push(format!("{key}: {e}"));
                return None;
            }
        };
        self.seen_any = true;
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match decode(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                self.problems.push(format!("{key}: {e}"));
                None
            }
        }
    }
}
