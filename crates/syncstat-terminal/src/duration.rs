//! Rendering of the scanned time range
//!
//! Ranges are shown as `D days, H:MM:SS`, with the day part omitted when it
//! is zero. Negative ranges, which occur when log files are given out of
//! chronological order, borrow a whole day: minus one hour renders as
//! `-1 day, 23:00:00`.

use syncstat_core::metrics::SECONDS_PER_DAY;

/// Format a signed number of seconds as `D days, H:MM:SS`
pub fn format_time_range(seconds: i64) -> String {
    let days = seconds.div_euclid(SECONDS_PER_DAY);
    let rest = seconds.rem_euclid(SECONDS_PER_DAY);
    let clock = format!("{}:{:02}:{:02}", rest / 3600, (rest % 3600) / 60, rest % 60);

    if days == 0 {
        clock
    } else {
        let plural = if days.abs() == 1 { "" } else { "s" };
        format!("{days} day{plural}, {clock}")
    }
}

/// Format an optional range, `n/a` when fewer than two timestamps were seen
pub fn format_optional_range(seconds: Option<i64>) -> String {
    seconds.map_or_else(|| "n/a".to_string(), format_time_range)
}
