use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

/// Source of "now" for age formatting, swappable in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn system_clock() -> Arc<dyn Clock> {
    Arc::new(SystemClock)
}

#[cfg_attr(not(test), allow(dead_code))]
pub fn fixed_clock(timestamp: i64) -> Arc<dyn Clock> {
    let now = Utc
        .timestamp_opt(timestamp, 0)
        .single()
        .unwrap_or_else(Utc::now);
    Arc::new(FixedClock(now))
}

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

fn plural(n: i64, unit: &str) -> String {
    if n > 1 {
        format!("{n} {unit}s ago")
    } else {
        format!("{n} {unit} ago")
    }
}

/// Format a Unix timestamp as a human age relative to `now`.
///
/// Timestamps in the future are "just now".
pub fn format_relative_age(timestamp: i64, now: DateTime<Utc>) -> String {
    let elapsed = now.timestamp().saturating_sub(timestamp);

    if elapsed < MINUTE {
        return "just now".to_string();
    }
    if elapsed < HOUR {
        return plural(elapsed / MINUTE, "minute");
    }
    if elapsed < DAY {
        return plural(elapsed / HOUR, "hour");
    }

    let days = elapsed / DAY;
    if days == 1 {
        return "yesterday".to_string();
    }
    if days < 30 {
        return format!("{days} days ago");
    }

    let months = days / 30;
    if months < 12 {
        return plural(months, "month");
    }

    plural(months / 12, "year")
}
