//! Human-readable durations for audit messages and admin replies.

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Formats a number of seconds as `1d 2h 3m 4s`, omitting zero components.
///
/// Negative values are clamped to zero. Zero renders as `0s`.
///
/// # Arguments
/// - `seconds` - Duration in seconds
///
/// # Returns
/// - `String` - Compact duration such as `90d` or `1h 30m`
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    if seconds == 0 {
        return "0s".to_string();
    }

    let parts = [
        (seconds / DAY, "d"),
        ((seconds % DAY) / HOUR, "h"),
        ((seconds % HOUR) / MINUTE, "m"),
        (seconds % MINUTE, "s"),
    ];

    parts
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{}{}", value, unit))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_components() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(90 * 60), "1h 30m");
        assert_eq!(format_duration(90 * DAY), "90d");
        assert_eq!(format_duration(DAY + 2 * HOUR + 3 * MINUTE + 4), "1d 2h 3m 4s");
    }

    #[test]
    fn clamps_negative_durations() {
        assert_eq!(format_duration(-5), "0s");
    }
}
