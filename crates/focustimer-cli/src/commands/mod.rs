pub mod achievements;
pub mod complication;
pub mod config;
pub mod history;
pub mod stats;
pub mod timer;

use focustimer_core::storage::Database;
use focustimer_core::timer::NoopEffects;
use focustimer_core::{Config, FocusApp, TimerEffects};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Open the app against the on-disk database with the given effects sink.
pub fn open_app_with(
    config: &Config,
    effects: Box<dyn TimerEffects>,
) -> Result<FocusApp<Database>, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    Ok(FocusApp::with_config(db, effects, config))
}

/// Open the app for commands that never run the countdown.
pub fn open_app() -> Result<FocusApp<Database>, Box<dyn std::error::Error>> {
    open_app_with(&Config::load(), Box::new(NoopEffects))
}
