use clap::Subcommand;
use focustimer_core::storage::{DEFAULT_MINUTES_KEY, HAPTICS_ENABLED_KEY, THEME_KEY};
use focustimer_core::{Config, ConfigError, Settings, Theme};

use super::{open_app, CommandResult};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show settings and configuration
    Show,
    /// Get a value (a setting such as "defaultMinutes", or a config key such as "timer.max_minutes")
    Get {
        /// Setting or config key
        key: String,
    },
    /// Set a value
    Set {
        /// Setting or config key
        key: String,
        /// New value
        value: String,
    },
    /// Reset settings and configuration to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> CommandResult {
    match action {
        ConfigAction::Show => {
            let app = open_app()?;
            let value = serde_json::json!({
                "settings": app.settings(),
                "config": Config::load(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        ConfigAction::Get { key } => {
            let value = match setting_value(open_app()?.settings(), &key) {
                Some(value) => value,
                None => Config::load()
                    .get(&key)
                    .ok_or_else(|| ConfigError::UnknownKey(key.clone()))?,
            };
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            if is_setting(&key) {
                let mut app = open_app()?;
                let invalid = |message: String| ConfigError::InvalidValue {
                    key: key.clone(),
                    message,
                };
                match key.as_str() {
                    DEFAULT_MINUTES_KEY => {
                        let minutes: u32 = value.parse().map_err(|e| invalid(format!("{e}")))?;
                        app.set_default_minutes(minutes);
                    }
                    HAPTICS_ENABLED_KEY => {
                        let enabled: bool = value.parse().map_err(|e| invalid(format!("{e}")))?;
                        app.set_haptics_enabled(enabled);
                    }
                    _ => {
                        let theme: Theme = value.parse().map_err(|e| invalid(format!("{e}")))?;
                        app.set_theme(theme);
                    }
                }
            } else {
                let mut config = Config::load();
                config.set(&key, &value)?;
                config.save()?;
            }
            println!("ok");
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            open_app()?.reset_settings();
            println!("settings and config reset to defaults");
        }
    }
    Ok(())
}

fn is_setting(key: &str) -> bool {
    matches!(key, DEFAULT_MINUTES_KEY | HAPTICS_ENABLED_KEY | THEME_KEY)
}

fn setting_value(settings: &Settings, key: &str) -> Option<String> {
    match key {
        DEFAULT_MINUTES_KEY => Some(settings.default_minutes.to_string()),
        HAPTICS_ENABLED_KEY => Some(settings.haptics_enabled.to_string()),
        THEME_KEY => Some(settings.theme.label().to_string()),
        _ => None,
    }
}
