//! Conversions between `chrono` timestamps and the unix-seconds floats stored on disk.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

/// Format of the timestamp embedded in backup file names.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Format used when showing timestamps to admins.
pub const DISPLAY_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Converts a timestamp to unix seconds with millisecond precision.
pub fn to_unix(at: DateTime<Utc>) -> f64 {
    at.timestamp_millis() as f64 / 1000.0
}

/// Converts stored unix seconds back to a timestamp.
///
/// # Returns
/// - `Some(DateTime<Utc>)` - Valid timestamp
/// - `None` - Value is not finite or out of chrono's range
pub fn from_unix(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis((seconds * 1000.0).round() as i64)
}

/// Renders a timestamp in the display offset.
pub fn display(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format(DISPLAY_FORMAT).to_string()
}

/// Renders the timestamp part of a backup file name.
pub fn backup_stamp(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset)
        .format(BACKUP_TIMESTAMP_FORMAT)
        .to_string()
}

/// Checks that `value` is a `YYYYMMDD_HHMMSS` timestamp.
pub fn is_backup_stamp(value: &str) -> bool {
    value.len() == 15 && NaiveDateTime::parse_from_str(value, BACKUP_TIMESTAMP_FORMAT).is_ok()
}
