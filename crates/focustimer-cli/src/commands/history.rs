use chrono::Local;
use clap::Subcommand;
use focustimer_core::{FocusCategory, SessionFilter};

use super::{open_app, CommandResult};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List recorded sessions, newest first
    List {
        /// Only sessions in this category
        #[arg(long)]
        category: Option<FocusCategory>,
        /// Show at most this many sessions
        #[arg(long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete every recorded session (streaks and achievements are kept)
    Clear,
}

pub fn run(action: HistoryAction) -> CommandResult {
    let mut app = open_app()?;

    match action {
        HistoryAction::List {
            category,
            limit,
            json,
        } => {
            let filter = match category {
                Some(category) => SessionFilter::all().with_category(category),
                None => SessionFilter::all(),
            };
            let sessions: Vec<_> = app
                .log()
                .newest_first()
                .into_iter()
                .filter(|s| filter.matches(s))
                .take(limit.unwrap_or(usize::MAX))
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&sessions)?);
                return Ok(());
            }
            if sessions.is_empty() {
                println!("No sessions recorded.");
                return Ok(());
            }
            for session in sessions {
                let when = session.timestamp().with_timezone(&Local);
                println!(
                    "{}  {} {:<10} {:>4} min{}",
                    when.format("%Y-%m-%d %H:%M"),
                    session.category().icon(),
                    session.category().label(),
                    session.minutes(),
                    if session.completed() { "" } else { "  (stopped early)" }
                );
            }
        }
        HistoryAction::Clear => {
            let event = app.clear_history();
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
    }
    Ok(())
}
