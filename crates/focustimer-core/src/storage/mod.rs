mod config;
pub mod database;
mod settings;

pub use config::{ComplicationConfig, Config, NotificationsConfig, TimerConfig};
pub use database::Database;
pub use settings::{Settings, Theme, DEFAULT_MINUTES_KEY, HAPTICS_ENABLED_KEY, THEME_KEY};

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::StorageError;

/// Flat string key-value persistence.
///
/// The core serializes its own values; a store only moves strings around.
/// Implementations are expected to be synchronous and ordered.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Why a load fell back to the default value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultReason {
    /// Nothing stored under the key yet.
    Missing,
    /// The store could not be read.
    Unreadable(String),
    /// Something was stored but it did not decode.
    Corrupt(String),
}

/// Result of a try-decode-or-default load. Never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    Loaded(T),
    Defaulted { value: T, reason: DefaultReason },
}

impl<T> LoadOutcome<T> {
    pub fn missing(value: T) -> Self {
        Self::Defaulted {
            value,
            reason: DefaultReason::Missing,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Loaded(value) | Self::Defaulted { value, .. } => value,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// In-process store, used by tests and as a fallback when no database can be opened.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|e| StorageError::QueryFailed(e.to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Returns `~/.config/focustimer[-dev]/` based on FOCUSTIMER_ENV.
///
/// Set FOCUSTIMER_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUSTIMER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focustimer-dev")
    } else {
        base_dir.join("focustimer")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get("k").unwrap().is_none());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn load_outcome_unwraps_either_variant() {
        assert_eq!(LoadOutcome::Loaded(3).into_inner(), 3);
        let defaulted = LoadOutcome::missing(0);
        assert!(!defaulted.is_loaded());
        assert_eq!(defaulted.into_inner(), 0);
    }
}
