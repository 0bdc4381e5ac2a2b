//! Achievement badges and the streak evaluator that unlocks them.

mod streak;

pub use streak::{
    StreakEvaluator, StreakState, ACHIEVEMENTS_KEY, LAST_DAY_KEY, STREAK_KEY, TOTAL_MINUTES_KEY,
};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One-time badge for crossing a streak or cumulative-minutes threshold.
///
/// Serialized by its stable identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Achievement {
    #[serde(rename = "streak_3")]
    ThreeDayStreak,
    #[serde(rename = "streak_7")]
    OneWeekStreak,
    #[serde(rename = "minutes_100")]
    HundredMinutes,
    #[serde(rename = "minutes_500")]
    FiveHundredMinutes,
}

impl Achievement {
    pub const ALL: [Achievement; 4] = [
        Achievement::ThreeDayStreak,
        Achievement::OneWeekStreak,
        Achievement::HundredMinutes,
        Achievement::FiveHundredMinutes,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Achievement::ThreeDayStreak => "streak_3",
            Achievement::OneWeekStreak => "streak_7",
            Achievement::HundredMinutes => "minutes_100",
            Achievement::FiveHundredMinutes => "minutes_500",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Achievement::ThreeDayStreak => "🔥 3-Day Streak!",
            Achievement::OneWeekStreak => "🏆 1-Week Streak!",
            Achievement::HundredMinutes => "💯 100 Minutes Focused!",
            Achievement::FiveHundredMinutes => "🌟 500 Minutes Master!",
        }
    }
}

impl fmt::Display for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Achievement {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Achievement::ALL
            .into_iter()
            .find(|a| a.id() == s)
            .ok_or_else(|| ValidationError::UnknownVariant {
                kind: "achievement",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_uses_identifier() {
        for achievement in Achievement::ALL {
            let json = serde_json::to_string(&achievement).unwrap();
            assert_eq!(json, format!("\"{}\"", achievement.id()));
            assert_eq!(achievement.id().parse::<Achievement>().unwrap(), achievement);
        }
    }
}
