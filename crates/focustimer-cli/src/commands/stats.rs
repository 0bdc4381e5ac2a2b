use chrono::Local;
use clap::Args;

use super::{open_app, CommandResult};

#[derive(Args)]
pub struct StatsArgs {
    /// Window for the per-category breakdown, in days
    #[arg(long, default_value_t = 7)]
    days: u32,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: StatsArgs) -> CommandResult {
    let app = open_app()?;
    let summary = app.summary(args.days, Local::now().date_naive());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "Sessions:      {} ({} completed)",
        summary.sessions, summary.completed_sessions
    );
    println!("Total minutes: {}", summary.total_minutes);
    println!("Today:         {} min", summary.minutes_today);
    println!("This week:     {} min", summary.minutes_this_week);
    println!("Average:       {} min", summary.average_minutes);
    println!("Streak:        {} day(s)", summary.current_streak_days);
    println!();
    println!("Last {} day(s) by category:", summary.window_days);
    for (category, minutes) in &summary.by_category {
        println!("  {} {:<10} {:>5} min", category.icon(), category.label(), minutes);
    }
    Ok(())
}
