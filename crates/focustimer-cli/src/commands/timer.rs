use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use focustimer_core::timer::LoggingEffects;
use focustimer_core::{Completion, Config, FocusCategory};

use super::{open_app_with, CommandResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a countdown in the foreground. Ctrl-C abandons it.
    Run {
        /// Duration in minutes (defaults to the saved default)
        #[arg(long)]
        minutes: Option<u32>,
        /// Category: work, study or meditation
        #[arg(long)]
        category: Option<FocusCategory>,
        /// Output events as JSON lines
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(action: TimerAction) -> CommandResult {
    match action {
        TimerAction::Run {
            minutes,
            category,
            json,
        } => run_countdown(minutes, category, json).await,
    }
}

async fn run_countdown(
    minutes: Option<u32>,
    category: Option<FocusCategory>,
    json: bool,
) -> CommandResult {
    let config = Config::load();
    let effects = LoggingEffects::new(config.notifications.title.clone());
    let mut app = open_app_with(&config, Box::new(effects))?;

    if let Some(category) = category {
        app.select_category(category);
    }
    if let Some(minutes) = minutes {
        app.configure(minutes);
    }

    let Some(started) = app.start() else {
        return Err("timer could not be started".into());
    };
    if json {
        println!("{}", serde_json::to_string(&started)?);
    } else {
        let category = app.category();
        println!(
            "{} {} session: {} min (Ctrl-C to stop)",
            category.icon(),
            category.label(),
            app.timer().configured_minutes()
        );
    }

    let mut interval = tokio::time::interval(Duration::from_secs(1));
    // The first tick of a tokio interval completes immediately.
    interval.tick().await;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Some(completion) = app.tick() {
                    report_completion(&completion, json)?;
                    return Ok(());
                }
                if !json {
                    let remaining = app.timer().remaining_secs();
                    print!("\r{:02}:{:02} remaining ", remaining / 60, remaining % 60);
                    std::io::stdout().flush()?;
                }
            }
            _ = &mut ctrl_c => {
                let abandoned = app.abandon();
                if json {
                    let value = serde_json::json!({
                        "type": "SessionAbandoned",
                        "recorded": abandoned.as_ref().map(|s| s.minutes()),
                    });
                    println!("{value}");
                } else {
                    println!();
                    match abandoned {
                        Some(session) => println!("Stopped early; recorded {} min.", session.minutes()),
                        None => println!("Stopped early; nothing recorded."),
                    }
                }
                return Ok(());
            }
        }
    }
}

fn report_completion(completion: &Completion, json: bool) -> CommandResult {
    if json {
        for event in &completion.events {
            println!("{}", serde_json::to_string(event)?);
        }
        return Ok(());
    }

    let session = &completion.session;
    println!();
    println!(
        "Done: {} min of {}.",
        session.minutes(),
        session.category().label()
    );
    for achievement in &completion.achievements {
        println!("Unlocked {achievement}");
    }
    Ok(())
}
