use chrono::{DateTime, Utc};

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Render an elapsed duration as `12m 05s`. Negative input renders as zero.
#[must_use]
pub fn format_elapsed(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{}m {:02}s", secs / 60, secs % 60)
}
