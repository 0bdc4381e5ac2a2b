//! Append-only log of focus sessions and the aggregates read from it.
//!
//! Aggregates are plain linear scans over the current snapshot. Calendar days
//! are taken in the local time zone, the same way the user reads them.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::FocusCategory;
use crate::error::{CoreError, ValidationError};
use crate::storage::{DefaultReason, KeyValueStore, LoadOutcome};

/// Key the serialized log is stored under.
pub const SESSIONS_KEY: &str = "sessions";

/// One focus interval. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusSession {
    id: Uuid,
    timestamp: DateTime<Utc>,
    minutes: u32,
    completed: bool,
    category: FocusCategory,
}

impl FocusSession {
    /// New session stamped with the current time.
    pub fn new(
        minutes: u32,
        category: FocusCategory,
        completed: bool,
    ) -> Result<Self, ValidationError> {
        Self::at(Utc::now(), minutes, category, completed)
    }

    pub fn at(
        timestamp: DateTime<Utc>,
        minutes: u32,
        category: FocusCategory,
        completed: bool,
    ) -> Result<Self, ValidationError> {
        if minutes == 0 {
            return Err(ValidationError::InvalidValue {
                field: "minutes".into(),
                message: "a session lasts at least one minute".into(),
            });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            timestamp,
            minutes,
            completed,
            category,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn category(&self) -> FocusCategory {
        self.category
    }

    /// Calendar day of the session in local time.
    pub fn local_day(&self) -> NaiveDate {
        self.timestamp.with_timezone(&Local).date_naive()
    }
}

/// Restricts which sessions an aggregate counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionFilter {
    pub category: Option<FocusCategory>,
    /// Inclusive lower bound on the session timestamp.
    pub since: Option<DateTime<Utc>>,
    pub completed_only: bool,
}

impl SessionFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: FocusCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn completed(mut self) -> Self {
        self.completed_only = true;
        self
    }

    pub fn matches(&self, session: &FocusSession) -> bool {
        self.category.map_or(true, |c| session.category == c)
            && self.since.map_or(true, |since| session.timestamp >= since)
            && (!self.completed_only || session.completed)
    }
}

/// Sessions in append order.
///
/// Append order is normally chronological but is not guaranteed to be (the
/// clock can move backwards); use [`SessionLog::chronological`] when order
/// matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionLog {
    sessions: Vec<FocusSession>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sessions(sessions: Vec<FocusSession>) -> Self {
        Self { sessions }
    }

    // ── Mutation ─────────────────────────────────────────────────────

    pub fn append(&mut self, session: FocusSession) {
        self.sessions.push(session);
    }

    /// Remove every session. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let removed = self.sessions.len();
        self.sessions.clear();
        removed
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn sessions(&self) -> &[FocusSession] {
        &self.sessions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FocusSession> {
        self.sessions.iter()
    }

    pub fn total_minutes(&self, filter: &SessionFilter) -> u64 {
        self.sessions
            .iter()
            .filter(|s| filter.matches(s))
            .map(|s| u64::from(s.minutes))
            .sum()
    }

    pub fn sessions_on(&self, day: NaiveDate) -> Vec<&FocusSession> {
        self.sessions
            .iter()
            .filter(|s| s.local_day() == day)
            .collect()
    }

    pub fn minutes_on(&self, day: NaiveDate) -> u64 {
        self.sessions_on(day)
            .into_iter()
            .map(|s| u64::from(s.minutes))
            .sum()
    }

    /// Minutes per category over the `days` calendar days ending at `today`.
    ///
    /// Every category is present; `days == 0` yields all zeros. A window
    /// reaching past the earliest representable date covers everything up to
    /// `today`.
    pub fn group_by_category(&self, days: u32, today: NaiveDate) -> BTreeMap<FocusCategory, u64> {
        let mut totals: BTreeMap<FocusCategory, u64> =
            FocusCategory::ALL.into_iter().map(|c| (c, 0)).collect();
        if days == 0 {
            return totals;
        }
        let first = today
            .checked_sub_days(Days::new(u64::from(days) - 1))
            .unwrap_or(NaiveDate::MIN);
        for session in &self.sessions {
            let day = session.local_day();
            if day >= first && day <= today {
                *totals.entry(session.category).or_insert(0) += u64::from(session.minutes);
            }
        }
        totals
    }

    /// Minutes recorded in the ISO week containing `day`.
    pub fn minutes_in_week_of(&self, day: NaiveDate) -> u64 {
        let week = day.iso_week();
        self.sessions
            .iter()
            .filter(|s| s.local_day().iso_week() == week)
            .map(|s| u64::from(s.minutes))
            .sum()
    }

    /// Integer mean session length, 0 for an empty log.
    pub fn average_minutes(&self) -> u64 {
        if self.sessions.is_empty() {
            return 0;
        }
        self.total_minutes(&SessionFilter::all()) / self.sessions.len() as u64
    }

    /// Sessions sorted oldest first.
    pub fn chronological(&self) -> Vec<&FocusSession> {
        let mut sorted: Vec<&FocusSession> = self.sessions.iter().collect();
        sorted.sort_by_key(|s| s.timestamp);
        sorted
    }

    /// Sessions sorted newest first.
    pub fn newest_first(&self) -> Vec<&FocusSession> {
        let mut sorted = self.chronological();
        sorted.reverse();
        sorted
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Decode the log from `store`, falling back to an empty log.
    ///
    /// Records with zero minutes are dropped rather than failing the load.
    pub fn load(store: &dyn KeyValueStore) -> LoadOutcome<Self> {
        let raw = match store.get(SESSIONS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return LoadOutcome::missing(Self::default()),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read session log, starting empty");
                return LoadOutcome::Defaulted {
                    value: Self::default(),
                    reason: DefaultReason::Unreadable(e.to_string()),
                };
            }
        };

        match serde_json::from_str::<Vec<FocusSession>>(&raw) {
            Ok(sessions) => {
                let before = sessions.len();
                let sessions: Vec<FocusSession> =
                    sessions.into_iter().filter(|s| s.minutes > 0).collect();
                if sessions.len() != before {
                    tracing::warn!(
                        dropped = before - sessions.len(),
                        "dropped session records with zero minutes"
                    );
                }
                LoadOutcome::Loaded(Self::from_sessions(sessions))
            }
            Err(e) => {
                tracing::warn!(error = %e, "session log did not decode, starting empty");
                LoadOutcome::Defaulted {
                    value: Self::default(),
                    reason: DefaultReason::Corrupt(e.to_string()),
                }
            }
        }
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), CoreError> {
        let json = serde_json::to_string(&self.sessions)?;
        store.set(SESSIONS_KEY, &json)?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a SessionLog {
    type Item = &'a FocusSession;
    type IntoIter = std::slice::Iter<'a, FocusSession>;

    fn into_iter(self) -> Self::IntoIter {
        self.sessions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;

    fn local_noon(day: NaiveDate) -> DateTime<Utc> {
        Local
            .from_local_datetime(&day.and_hms_opt(12, 0, 0).unwrap())
            .earliest()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn session(on: NaiveDate, minutes: u32, category: FocusCategory) -> FocusSession {
        FocusSession::at(local_noon(on), minutes, category, true).unwrap()
    }

    fn sample_log() -> SessionLog {
        let mut log = SessionLog::new();
        log.append(session(day(2026, 3, 9), 25, FocusCategory::Work));
        log.append(session(day(2026, 3, 10), 15, FocusCategory::Study));
        log.append(session(day(2026, 3, 10), 10, FocusCategory::Meditation));
        log.append(
            FocusSession::at(local_noon(day(2026, 3, 10)), 5, FocusCategory::Work, false).unwrap(),
        );
        log
    }

    #[test]
    fn zero_minute_session_is_rejected() {
        assert!(FocusSession::new(0, FocusCategory::Work, true).is_err());
        assert!(FocusSession::new(1, FocusCategory::Work, true).is_ok());
    }

    #[test]
    fn total_minutes_respects_filter() {
        let log = sample_log();
        assert_eq!(log.total_minutes(&SessionFilter::all()), 55);
        assert_eq!(log.total_minutes(&SessionFilter::all().completed()), 50);
        assert_eq!(
            log.total_minutes(&SessionFilter::all().with_category(FocusCategory::Work)),
            30
        );
        assert_eq!(
            log.total_minutes(&SessionFilter::all().with_since(local_noon(day(2026, 3, 10)))),
            30
        );
    }

    #[test]
    fn sessions_on_day() {
        let log = sample_log();
        assert_eq!(log.sessions_on(day(2026, 3, 10)).len(), 3);
        assert_eq!(log.minutes_on(day(2026, 3, 9)), 25);
        assert!(log.sessions_on(day(2026, 3, 11)).is_empty());
    }

    #[test]
    fn group_by_category_window() {
        let log = sample_log();
        let grouped = log.group_by_category(1, day(2026, 3, 10));
        assert_eq!(grouped[&FocusCategory::Work], 5);
        assert_eq!(grouped[&FocusCategory::Study], 15);
        assert_eq!(grouped[&FocusCategory::Meditation], 10);

        let grouped = log.group_by_category(2, day(2026, 3, 10));
        assert_eq!(grouped[&FocusCategory::Work], 30);

        let grouped = log.group_by_category(0, day(2026, 3, 10));
        assert!(grouped.values().all(|m| *m == 0));
        assert_eq!(grouped.len(), 3);
    }

    #[test]
    fn oversized_window_covers_everything_up_to_today() {
        let mut log = sample_log();
        log.append(session(day(2026, 3, 12), 40, FocusCategory::Work));

        for days in [100_000_000, u32::MAX] {
            let grouped = log.group_by_category(days, day(2026, 3, 10));
            assert_eq!(grouped[&FocusCategory::Work], 30);
            assert_eq!(grouped[&FocusCategory::Study], 15);
            assert_eq!(grouped[&FocusCategory::Meditation], 10);
        }
    }

    #[test]
    fn clear_empties_all_aggregates() {
        let mut log = sample_log();
        assert_eq!(log.clear(), 4);
        assert!(log.is_empty());
        assert_eq!(log.total_minutes(&SessionFilter::all()), 0);
        let grouped = log.group_by_category(7, day(2026, 3, 10));
        assert_eq!(grouped.len(), 3);
        assert!(grouped.values().all(|m| *m == 0));
        assert_eq!(log.average_minutes(), 0);
    }

    #[test]
    fn chronological_sorts_out_of_order_appends() {
        let mut log = SessionLog::new();
        log.append(session(day(2026, 3, 12), 10, FocusCategory::Work));
        log.append(session(day(2026, 3, 11), 20, FocusCategory::Work));
        let sorted: Vec<u32> = log.chronological().iter().map(|s| s.minutes()).collect();
        assert_eq!(sorted, vec![20, 10]);
        let newest: Vec<u32> = log.newest_first().iter().map(|s| s.minutes()).collect();
        assert_eq!(newest, vec![10, 20]);
    }

    #[test]
    fn week_and_average() {
        let log = sample_log();
        // 2026-03-09 is a Monday; both days share an ISO week.
        assert_eq!(log.minutes_in_week_of(day(2026, 3, 15)), 55);
        assert_eq!(log.minutes_in_week_of(day(2026, 3, 16)), 0);
        assert_eq!(log.average_minutes(), 13);
    }

    #[test]
    fn persistence_format() {
        let store = MemoryStore::new();
        let mut log = SessionLog::new();
        log.append(session(day(2026, 3, 9), 25, FocusCategory::Study));
        log.save(&store).unwrap();

        let raw = store.get(SESSIONS_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let record = &json[0];
        assert_eq!(record["minutes"], 25);
        assert_eq!(record["completed"], true);
        assert_eq!(record["category"], "Study");
        assert!(record["id"].is_string());
        assert!(record["timestamp"].is_string());

        let loaded = SessionLog::load(&store);
        assert!(loaded.is_loaded());
        assert_eq!(loaded.into_inner(), log);
    }

    #[test]
    fn missing_and_corrupt_blobs_default_to_empty() {
        let store = MemoryStore::new();
        let outcome = SessionLog::load(&store);
        assert!(matches!(
            outcome,
            LoadOutcome::Defaulted { reason: DefaultReason::Missing, .. }
        ));

        store.set(SESSIONS_KEY, "{not json").unwrap();
        let outcome = SessionLog::load(&store);
        assert!(matches!(
            outcome,
            LoadOutcome::Defaulted { reason: DefaultReason::Corrupt(_), .. }
        ));
        assert!(outcome.into_inner().is_empty());
    }

    #[test]
    fn zero_minute_records_are_dropped_on_load() {
        let store = MemoryStore::new();
        store
            .set(
                SESSIONS_KEY,
                r#"[
                    {"id":"6f1c7d1e-8a55-4d38-9c55-0a8f3f1b2c3d","timestamp":"2026-03-09T12:00:00Z","minutes":0,"completed":true,"category":"Work"},
                    {"id":"0b5e2f4a-1c2d-4e3f-8a9b-7c6d5e4f3a2b","timestamp":"2026-03-09T13:00:00Z","minutes":10,"completed":true,"category":"Meditation"}
                ]"#,
            )
            .unwrap();
        let log = SessionLog::load(&store).into_inner();
        assert_eq!(log.len(), 1);
        assert_eq!(log.sessions()[0].category(), FocusCategory::Meditation);
    }
}
