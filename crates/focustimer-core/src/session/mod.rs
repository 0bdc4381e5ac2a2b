mod category;
mod log;

pub use category::FocusCategory;
pub use log::{FocusSession, SessionFilter, SessionLog, SESSIONS_KEY};
