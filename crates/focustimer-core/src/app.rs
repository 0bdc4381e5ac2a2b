//! Application context.
//!
//! Owns the settings, timer, session log and streak evaluator, and the store
//! they persist to. Every mutation of the log or the evaluator is written
//! through immediately; a failed write is logged and the in-memory state stays
//! authoritative for the rest of the process.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::achievements::{Achievement, StreakEvaluator};
use crate::complication::{ComplicationProjector, ComplicationSnapshot};
use crate::events::Event;
use crate::session::{FocusCategory, FocusSession, SessionFilter, SessionLog};
use crate::storage::{Config, KeyValueStore, LoadOutcome, Settings, Theme};
use crate::timer::{FocusTimer, TimerBounds, TimerEffects, TimerState};

/// What a finished countdown produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub session: FocusSession,
    /// Achievements unlocked by this session, possibly none.
    pub achievements: Vec<Achievement>,
    /// `TimerFinished`, `SessionRecorded`, then one `AchievementUnlocked` each.
    pub events: Vec<Event>,
}

/// Aggregates for a stats screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub sessions: usize,
    pub completed_sessions: usize,
    pub total_minutes: u64,
    pub minutes_today: u64,
    pub minutes_this_week: u64,
    pub average_minutes: u64,
    pub window_days: u32,
    pub by_category: BTreeMap<FocusCategory, u64>,
    pub current_streak_days: u32,
    pub achievements: Vec<Achievement>,
}

pub struct FocusApp<S: KeyValueStore> {
    store: S,
    settings: Settings,
    timer: FocusTimer,
    log: SessionLog,
    evaluator: StreakEvaluator,
    category: FocusCategory,
    projector: ComplicationProjector,
}

impl<S: KeyValueStore> FocusApp<S> {
    /// Open with the default configuration.
    pub fn open(store: S, effects: Box<dyn TimerEffects>) -> Self {
        Self::with_config(store, effects, &Config::default())
    }

    /// Load persisted state from `store`, falling back to defaults for anything
    /// missing or unreadable, and arm the timer with the default duration.
    pub fn with_config(store: S, effects: Box<dyn TimerEffects>, config: &Config) -> Self {
        let bounds = config.timer_bounds().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "invalid timer bounds in config, using defaults");
            TimerBounds::default()
        });

        let settings = Settings::load(&store, bounds);
        let log = log_outcome("session log", SessionLog::load(&store));
        let evaluator = log_outcome("streak state", StreakEvaluator::load(&store));

        let mut timer = FocusTimer::with_bounds(bounds, effects);
        timer.set_cues_enabled(settings.haptics_enabled);
        timer.set_notifications_enabled(config.notifications.enabled);
        timer.configure(settings.default_minutes);

        Self {
            store,
            settings,
            timer,
            log,
            evaluator,
            category: FocusCategory::default(),
            projector: ComplicationProjector::from_config(&config.complication),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn timer(&self) -> &FocusTimer {
        &self.timer
    }

    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    pub fn evaluator(&self) -> &StreakEvaluator {
        &self.evaluator
    }

    pub fn category(&self) -> FocusCategory {
        self.category
    }

    pub fn projector(&self) -> &ComplicationProjector {
        &self.projector
    }

    // ── Timer ────────────────────────────────────────────────────────

    pub fn select_category(&mut self, category: FocusCategory) {
        self.category = category;
    }

    pub fn configure(&mut self, minutes: u32) -> Event {
        self.timer.configure(minutes)
    }

    pub fn start(&mut self) -> Option<Event> {
        self.timer.start()
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.timer.pause()
    }

    pub fn resume(&mut self) -> Option<Event> {
        self.timer.resume()
    }

    pub fn reset(&mut self) -> Event {
        self.timer.reset()
    }

    /// Drive the countdown by one second.
    ///
    /// On the finishing tick the session is recorded under the selected
    /// category and registered with the streak evaluator.
    pub fn tick(&mut self) -> Option<Completion> {
        let finished = self.timer.tick()?;
        self.complete(finished)
    }

    /// Stop a running or paused countdown early.
    ///
    /// If at least one whole minute has elapsed it is recorded as an
    /// incomplete session; it does not count toward streaks or achievements.
    /// The timer is reset either way.
    pub fn abandon(&mut self) -> Option<FocusSession> {
        if !matches!(self.timer.state(), TimerState::Running | TimerState::Paused) {
            return None;
        }
        let minutes = u32::try_from(self.timer.elapsed_secs() / 60).unwrap_or(u32::MAX);
        self.timer.reset();

        let session = FocusSession::new(minutes, self.category, false).ok()?;
        self.log.append(session.clone());
        self.persist_log();
        tracing::debug!(minutes, category = %self.category, "session abandoned");
        Some(session)
    }

    fn complete(&mut self, finished: Event) -> Option<Completion> {
        let minutes = self.timer.configured_minutes();
        let session = match FocusSession::new(minutes, self.category, true) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "could not record finished session");
                return None;
            }
        };

        self.log.append(session.clone());
        self.persist_log();

        let achievements = self.evaluator.register_session(minutes);
        self.persist_evaluator();

        let at = Utc::now();
        let mut events = vec![
            finished,
            Event::SessionRecorded {
                session_id: session.id(),
                category: session.category(),
                minutes: session.minutes(),
                completed: true,
                at,
            },
        ];
        events.extend(
            achievements
                .iter()
                .map(|&achievement| Event::AchievementUnlocked { achievement, at }),
        );

        tracing::info!(
            minutes,
            category = %self.category,
            achievements = achievements.len(),
            "focus session completed"
        );
        Some(Completion {
            session,
            achievements,
            events,
        })
    }

    // ── History ──────────────────────────────────────────────────────

    /// Drop every recorded session. Streaks and achievements are kept.
    pub fn clear_history(&mut self) -> Event {
        let removed = self.log.clear();
        self.persist_log();
        tracing::info!(removed, "session history cleared");
        Event::HistoryCleared {
            removed,
            at: Utc::now(),
        }
    }

    pub fn complication_snapshot(&self, today: NaiveDate) -> ComplicationSnapshot {
        self.projector.project(&self.log, today)
    }

    pub fn complication_snapshot_now(&self) -> ComplicationSnapshot {
        self.complication_snapshot(Local::now().date_naive())
    }

    /// Aggregates over the whole log plus a per-category window of `days`.
    pub fn summary(&self, days: u32, today: NaiveDate) -> Summary {
        Summary {
            sessions: self.log.len(),
            completed_sessions: self.log.iter().filter(|s| s.completed()).count(),
            total_minutes: self.log.total_minutes(&SessionFilter::all()),
            minutes_today: self.log.minutes_on(today),
            minutes_this_week: self.log.minutes_in_week_of(today),
            average_minutes: self.log.average_minutes(),
            window_days: days,
            by_category: self.log.group_by_category(days, today),
            current_streak_days: self.evaluator.state().active_streak_on(today),
            achievements: self.evaluator.unlocked().to_vec(),
        }
    }

    // ── Settings ─────────────────────────────────────────────────────

    /// Change the default duration. An idle timer picks it up immediately.
    pub fn set_default_minutes(&mut self, minutes: u32) {
        self.settings.default_minutes = self.timer.bounds().clamp(minutes);
        self.persist_setting(
            crate::storage::DEFAULT_MINUTES_KEY,
            &self.settings.default_minutes.to_string(),
        );
        if self.timer.state() == TimerState::Idle {
            self.timer.configure(self.settings.default_minutes);
        }
    }

    pub fn set_haptics_enabled(&mut self, enabled: bool) {
        self.settings.haptics_enabled = enabled;
        self.timer.set_cues_enabled(enabled);
        self.persist_setting(
            crate::storage::HAPTICS_ENABLED_KEY,
            &enabled.to_string(),
        );
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.settings.theme = theme;
        self.persist_setting(crate::storage::THEME_KEY, theme.label());
    }

    /// Restore every setting to its default and write them all back.
    pub fn reset_settings(&mut self) {
        self.settings = Settings::default();
        self.settings.default_minutes = self.timer.bounds().clamp(self.settings.default_minutes);
        if let Err(e) = self.settings.save(&self.store) {
            tracing::warn!(error = %e, "failed to persist settings");
        }
        self.timer.set_cues_enabled(self.settings.haptics_enabled);
        if self.timer.state() == TimerState::Idle {
            self.timer.configure(self.settings.default_minutes);
        }
    }

    // ── Persistence ──────────────────────────────────────────────────

    fn persist_log(&self) {
        if let Err(e) = self.log.save(&self.store) {
            tracing::warn!(error = %e, "failed to persist session log");
        }
    }

    fn persist_evaluator(&self) {
        if let Err(e) = self.evaluator.save(&self.store) {
            tracing::warn!(error = %e, "failed to persist streak state");
        }
    }

    fn persist_setting(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::warn!(key, error = %e, "failed to persist setting");
        }
    }
}

fn log_outcome<T>(what: &str, outcome: LoadOutcome<T>) -> T {
    if let LoadOutcome::Defaulted { reason, .. } = &outcome {
        tracing::debug!(what, ?reason, "starting from defaults");
    }
    outcome.into_inner()
}
