use super::{open_app, CommandResult};

pub fn run() -> CommandResult {
    let app = open_app()?;
    let snapshot = app.complication_snapshot_now();
    tracing::debug!(
        gauge = app.projector().gauge_fraction(&snapshot),
        refresh_secs = app.projector().refresh_interval().num_seconds(),
        "complication projected"
    );
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
