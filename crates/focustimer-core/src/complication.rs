//! Rolling-week summary for an at-a-glance display.
//!
//! The projector is recomputed from the session log whenever the display asks
//! for it; nothing is maintained incrementally.

use chrono::{DateTime, Duration, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::session::SessionLog;
use crate::storage::ComplicationConfig;

/// Days covered by the history window, today included.
pub const WINDOW_DAYS: usize = 7;

/// Minutes focused on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyFocus {
    pub day: NaiveDate,
    pub minutes: u64,
}

/// What the complication renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplicationSnapshot {
    pub minutes_today: u64,
    /// Exactly [`WINDOW_DAYS`] entries, oldest first, ending today.
    pub history: Vec<DailyFocus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplicationProjector {
    refresh_interval: Duration,
    gauge_max_minutes: u64,
}

impl Default for ComplicationProjector {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::minutes(30),
            gauge_max_minutes: 120,
        }
    }
}

impl ComplicationProjector {
    pub fn new(refresh_interval: Duration, gauge_max_minutes: u64) -> Self {
        Self {
            refresh_interval,
            gauge_max_minutes,
        }
    }

    pub fn from_config(config: &ComplicationConfig) -> Self {
        Self::new(
            Duration::minutes(i64::from(config.refresh_minutes.max(1))),
            u64::from(config.gauge_max_minutes),
        )
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Project the trailing week ending at `today`.
    pub fn project(&self, log: &SessionLog, today: NaiveDate) -> ComplicationSnapshot {
        let mut buckets = [0u64; WINDOW_DAYS];
        let first = today - Duration::days(WINDOW_DAYS as i64 - 1);

        for session in log {
            let day = session.local_day();
            if day < first || day > today {
                continue;
            }
            let offset = (day - first).num_days() as usize;
            buckets[offset] += u64::from(session.minutes());
        }

        let history: Vec<DailyFocus> = buckets
            .iter()
            .enumerate()
            .map(|(offset, minutes)| DailyFocus {
                day: first + Duration::days(offset as i64),
                minutes: *minutes,
            })
            .collect();

        ComplicationSnapshot {
            minutes_today: buckets[WINDOW_DAYS - 1],
            history,
        }
    }

    /// When the display should ask for the next snapshot.
    pub fn next_refresh<Tz: TimeZone>(&self, now: DateTime<Tz>) -> DateTime<Tz> {
        now + self.refresh_interval
    }

    /// Fill level for a circular gauge, 0.0 ..= 1.0.
    pub fn gauge_fraction(&self, snapshot: &ComplicationSnapshot) -> f64 {
        if self.gauge_max_minutes == 0 {
            return 0.0;
        }
        (snapshot.minutes_today as f64 / self.gauge_max_minutes as f64).clamp(0.0, 1.0)
    }
}
