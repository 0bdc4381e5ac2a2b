use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// What a focus session was spent on.
///
/// Serialized by its display label (`"Work"`, `"Study"`, `"Meditation"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum FocusCategory {
    #[default]
    Work,
    Study,
    Meditation,
}

impl FocusCategory {
    pub const ALL: [FocusCategory; 3] = [
        FocusCategory::Work,
        FocusCategory::Study,
        FocusCategory::Meditation,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FocusCategory::Work => "Work",
            FocusCategory::Study => "Study",
            FocusCategory::Meditation => "Meditation",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            FocusCategory::Work => "💻",
            FocusCategory::Study => "📚",
            FocusCategory::Meditation => "🧘",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FocusCategory::Work => "Concentrate on tasks and coding",
            FocusCategory::Study => "Learn, read, or take notes",
            FocusCategory::Meditation => "Relax and clear your mind",
        }
    }

    /// Gradient accent identifiers, start to end.
    pub fn accents(&self) -> [&'static str; 2] {
        match self {
            FocusCategory::Work => ["cyan", "blue"],
            FocusCategory::Study => ["purple", "pink"],
            FocusCategory::Meditation => ["green", "mint"],
        }
    }
}

impl fmt::Display for FocusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FocusCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FocusCategory::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownVariant {
                kind: "category",
                value: s.to_string(),
            })
    }
}
