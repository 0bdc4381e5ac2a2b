use focustimer_core::Achievement;

use super::{open_app, CommandResult};

pub fn run(json: bool) -> CommandResult {
    let app = open_app()?;
    let unlocked = app.evaluator().unlocked();

    if json {
        let badges: Vec<_> = Achievement::ALL
            .iter()
            .map(|a| {
                serde_json::json!({
                    "id": a.id(),
                    "title": a.title(),
                    "unlocked": unlocked.contains(a),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&badges)?);
        return Ok(());
    }

    for achievement in Achievement::ALL {
        let mark = if unlocked.contains(&achievement) { "x" } else { " " };
        println!("[{mark}] {}", achievement.title());
    }
    Ok(())
}
