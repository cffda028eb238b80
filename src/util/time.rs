use chrono::{DateTime, Utc};

/// Format a millisecond creation timestamp relative to `now`, in the
/// "3 days ago" style. Future timestamps (clock skew between client and
/// backend) collapse to "just now".
pub fn relative_time(created_at_ms: i64, now: DateTime<Utc>) -> String {
    let created = match DateTime::from_timestamp_millis(created_at_ms) {
        Some(dt) => dt,
        None => return "unknown".to_string(),
    };

    let seconds = (now - created).num_seconds();
    if seconds < 45 {
        return "just now".to_string();
    }

    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let months = days / 30;
    let years = days / 365;

    let (value, unit) = if years >= 1 {
        (years, "year")
    } else if months >= 1 {
        (months, "month")
    } else if days >= 1 {
        (days, "day")
    } else if hours >= 1 {
        (hours, "hour")
    } else {
        (minutes.max(1), "minute")
    };

    if value == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", value, unit)
    }
}
