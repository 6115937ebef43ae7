use chrono::{DateTime, Utc};

/// Instant of record for comment creation and edits.
///
/// Stored as a machine timestamp. Human-facing strings are derived with
/// [`relative_time`] at display time and never persisted.
pub type Timestamp = DateTime<Utc>;

/// Render `then` relative to `now` the way feed screens show it:
/// `just now`, `5m ago`, `2h ago`, `3d ago`, `2w ago`.
///
/// Instants in the future (clock skew between devices) render as `just now`.
pub fn relative_time(then: Timestamp, now: Timestamp) -> String {
    let secs = (now - then).num_seconds();
    if secs < 60 {
        return "just now".to_string();
    }
    let minutes = secs / 60;
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    let days = hours / 24;
    if days < 7 {
        return format!("{days}d ago");
    }
    format!("{}w ago", days / 7)
}
