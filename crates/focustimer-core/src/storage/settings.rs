//! User settings persisted as individual scalars in the key-value store.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::KeyValueStore;
use crate::error::{StorageError, ValidationError};
use crate::timer::{TimerBounds, DEFAULT_MINUTES};

pub const DEFAULT_MINUTES_KEY: &str = "defaultMinutes";
pub const HAPTICS_ENABLED_KEY: &str = "hapticsEnabled";
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Automatic,
    Light,
    Dark,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Automatic, Theme::Light, Theme::Dark];

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Automatic => "Automatic",
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Theme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownVariant {
                kind: "theme",
                value: s.to_string(),
            })
    }
}

/// User-facing preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub default_minutes: u32,
    pub haptics_enabled: bool,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_minutes: DEFAULT_MINUTES,
            haptics_enabled: true,
            theme: Theme::Automatic,
        }
    }
}

impl Settings {
    /// Read every key independently; a missing or unparsable key keeps its default.
    pub fn load(store: &dyn KeyValueStore, bounds: TimerBounds) -> Self {
        let defaults = Self::default();
        Self {
            default_minutes: bounds.clamp(
                read_scalar(store, DEFAULT_MINUTES_KEY).unwrap_or(defaults.default_minutes),
            ),
            haptics_enabled: read_scalar(store, HAPTICS_ENABLED_KEY)
                .unwrap_or(defaults.haptics_enabled),
            theme: read_scalar(store, THEME_KEY).unwrap_or(defaults.theme),
        }
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        store.set(DEFAULT_MINUTES_KEY, &self.default_minutes.to_string())?;
        store.set(HAPTICS_ENABLED_KEY, &self.haptics_enabled.to_string())?;
        store.set(THEME_KEY, self.theme.label())?;
        Ok(())
    }
}

fn read_scalar<T: FromStr>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    match store.get(key) {
        Ok(Some(raw)) => {
            let parsed = raw.trim().parse::<T>().ok();
            if parsed.is_none() {
                tracing::warn!(key, value = %raw, "ignoring unparsable setting");
            }
            parsed
        }
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read setting");
            None
        }
    }
}
