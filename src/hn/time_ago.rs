const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;

/// Seconds since the Unix epoch, UTC.
pub fn now_epoch() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

/// Renders `timestamp` relative to `now`, both in epoch seconds.
///
/// Counts are rounded to the nearest unit, so 90 seconds reads as
/// "2 minutes ago". Timestamps in the future read as "just now".
pub fn format_time_ago(now: i64, timestamp: i64) -> String {
    let diff = now.saturating_sub(timestamp);
    if diff < MINUTE {
        return "just now".to_string();
    }
    let (count, unit) = if diff < HOUR {
        (rounded(diff, MINUTE), "minute")
    } else if diff < DAY {
        (rounded(diff, HOUR), "hour")
    } else if diff < MONTH {
        (rounded(diff, DAY), "day")
    } else {
        (rounded(diff, MONTH), "month")
    };
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} {unit}{plural} ago")
}

fn rounded(diff: i64, unit: i64) -> i64 {
    (diff + unit / 2) / unit
}
