//! Small rendering helpers for seconds and datetimes.

use chrono::{NaiveDateTime, NaiveTime};

/// Pattern used when none is given: `01m:50s.240ms`.
pub const DEFAULT_PATTERN: &str = "%mm:%ss.%msms";

/// Render a number of seconds through a pattern.
///
/// Placeholders are replaced in this order, so `%ms` never collides with `%m`
/// or `%s`:
///
/// | placeholder | value                        |
/// |-------------|------------------------------|
/// | `%ms`       | milliseconds, 3 digits       |
/// | `%s`        | seconds within the minute    |
/// | `%m`        | minutes within the hour      |
/// | `%h`        | hours within the day         |
/// | `%d`        | whole days                   |
///
/// Every component is truncated, so a value just under a boundary never
/// carries into the next unit. Negative inputs are rendered by magnitude.
///
/// ```
/// use period_engine::format::{format_seconds, DEFAULT_PATTERN};
///
/// assert_eq!(format_seconds(110.24, DEFAULT_PATTERN), "01m:50s.240ms");
/// assert_eq!(format_seconds(3601.52, "%h:%m:%s.%ms"), "01:00:01.520");
/// ```
pub fn format_seconds(seconds: f64, pattern: &str) -> String {
    let total_ms = (seconds.abs() * 1_000.0).floor() as u64;

    let days = total_ms / 86_400_000;
    let hours = total_ms / 3_600_000 % 24;
    let minutes = total_ms / 60_000 % 60;
    let secs = total_ms / 1_000 % 60;
    let millis = total_ms % 1_000;

    pattern
        .replace("%ms", &format!("{millis:03}"))
        .replace("%s", &format!("{secs:02}"))
        .replace("%m", &format!("{minutes:02}"))
        .replace("%h", &format!("{hours:02}"))
        .replace("%d", &format!("{days:02}"))
}

/// The same calendar date at 00:00:00.
pub fn to_midnight(datetime: NaiveDateTime) -> NaiveDateTime {
    datetime.date().and_time(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_default_pattern() {
        assert_eq!(format_seconds(10.0, DEFAULT_PATTERN), "00m:10s.000ms");
        assert_eq!(format_seconds(110.24, DEFAULT_PATTERN), "01m:50s.240ms");
    }

    #[test]
    fn test_hours_and_days() {
        assert_eq!(format_seconds(3_601.52, "%h:%m:%s.%ms"), "01:00:01.520");
        assert_eq!(format_seconds(90_061.0, "%dd %h:%m:%s"), "01d 01:01:01");
    }

    #[test]
    fn test_hours_wrap_at_a_day() {
        assert_eq!(format_seconds(86_400.0 + 7_200.0, "%h"), "02");
    }

    #[test]
    fn test_minutes_wrap_at_the_hour() {
        assert_eq!(format_seconds(3_660.0, "%m:%s"), "01:00");
    }

    #[test]
    fn test_components_are_truncated() {
        assert_eq!(format_seconds(0.9996, DEFAULT_PATTERN), "00m:00s.999ms");
        assert_eq!(format_seconds(59.9999, DEFAULT_PATTERN), "00m:59s.999ms");
        assert_eq!(format_seconds(3_599.9999, "%h:%m:%s.%ms"), "00:59:59.999");
    }

    #[test]
    fn test_negative_is_rendered_by_magnitude() {
        assert_eq!(format_seconds(-10.5, DEFAULT_PATTERN), "00m:10s.500ms");
    }

    #[test]
    fn test_to_midnight() {
        let dt = NaiveDate::from_ymd_opt(1993, 8, 14)
            .unwrap()
            .and_hms_opt(10, 21, 0)
            .unwrap();
        let midnight = to_midnight(dt);
        assert_eq!(midnight.format("%d %b %Y %H:%M").to_string(), "14 Aug 1993 00:00");
    }
}
