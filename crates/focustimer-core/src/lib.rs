//! # FocusTimer Core Library
//!
//! Core logic for a focus timer: a countdown with category tagging, session
//! history, achievement badges, and a rolling-week summary for at-a-glance
//! displays. The CLI (and any UI) is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer**: a one-second-resolution state machine driven by the caller's
//!   `tick()`; side effects go through the [`TimerEffects`] trait
//! - **Session log**: append-only history with aggregate queries
//! - **Achievements**: day-streak tracking and threshold badges
//! - **Complication**: 7-day rolling projection of the log
//! - **Storage**: injected key-value persistence (SQLite or in-memory) and
//!   TOML configuration
//!
//! ## Key Components
//!
//! - [`FocusApp`]: context object wiring everything together
//! - [`FocusTimer`]: timer state machine
//! - [`SessionLog`]: session history
//! - [`StreakEvaluator`]: streak and achievement evaluation
//! - [`ComplicationProjector`]: rolling-week snapshot

pub mod achievements;
pub mod app;
pub mod complication;
pub mod error;
pub mod events;
pub mod session;
pub mod storage;
pub mod timer;

pub use achievements::{Achievement, StreakEvaluator, StreakState};
pub use app::{Completion, FocusApp, Summary};
pub use complication::{ComplicationProjector, ComplicationSnapshot, DailyFocus};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use session::{FocusCategory, FocusSession, SessionFilter, SessionLog};
pub use storage::{Config, Database, KeyValueStore, LoadOutcome, MemoryStore, Settings, Theme};
pub use timer::{Cue, FocusTimer, TimerBounds, TimerEffects, TimerState};
