//! Human-readable formatting for timestamps, durations, and unlock
//! countdowns.

use chrono::{TimeZone, Utc};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// "Aug 5, 2026"
pub fn format_date(ms: i64) -> String {
    match Utc.timestamp_millis_opt(ms).single() {
        Some(dt) => dt.format("%b %-d, %Y").to_string(),
        None => ms.to_string(),
    }
}

/// "Aug 5, 2026 • 3:04 PM"
pub fn format_date_time(ms: i64) -> String {
    match Utc.timestamp_millis_opt(ms).single() {
        Some(dt) => dt.format("%b %-d, %Y • %-I:%M %p").to_string(),
        None => ms.to_string(),
    }
}

/// "3:07" minutes:seconds.
pub fn format_duration(total_secs: u32) -> String {
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Countdown label for a future capsule's unlock time.
pub fn describe_unlock(unlock_at_ms: i64, now_ms: i64) -> String {
    // Ceiling of the remaining time in days.
    let days = (unlock_at_ms - now_ms + DAY_MS - 1).div_euclid(DAY_MS);

    if days <= 0 {
        return "Unlocked".to_string();
    }
    if days == 1 {
        return "Unlocks tomorrow".to_string();
    }
    if days < 30 {
        return format!("Unlocks in {days} days");
    }
    if days < 365 {
        let months = days / 30;
        return format!("Unlocks in {} month{}", months, plural(months));
    }
    let years = days / 365;
    format!("Unlocks in {} year{}", years, plural(years))
}

fn plural(n: i64) -> &'static str {
    if n > 1 {
        "s"
    } else {
        ""
    }
}
