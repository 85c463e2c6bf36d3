//! Collaborators the engine calls but does not own: the current time, and
//! conversion of calendar values to epoch seconds.
//!
//! Nothing in the engine reads the system clock on its own. Callers pass a
//! `now` value directly, or hand over a [`Clock`].

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Source of "now" as seconds since the Unix epoch.
pub trait Clock {
    fn now(&self) -> f64;
}

/// The operating system clock, read through [`chrono::Utc::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        Utc::now().timestamp_micros() as f64 / 1_000_000.0
    }
}

/// A clock pinned to one instant. Useful for reproducible runs and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock(pub f64);

impl Clock for FixedClock {
    fn now(&self) -> f64 {
        self.0
    }
}

impl<F> Clock for F
where
    F: Fn() -> f64,
{
    fn now(&self) -> f64 {
        self()
    }
}

/// A value that can be placed on the epoch-seconds timeline.
///
/// Raw numbers are taken as seconds. Naive datetimes are read as UTC, since
/// the engine has no notion of a local timezone.
pub trait EpochSeconds {
    fn epoch_seconds(&self) -> f64;
}

impl EpochSeconds for f64 {
    fn epoch_seconds(&self) -> f64 {
        *self
    }
}

impl EpochSeconds for i64 {
    fn epoch_seconds(&self) -> f64 {
        *self as f64
    }
}

impl<Tz: TimeZone> EpochSeconds for DateTime<Tz> {
    fn epoch_seconds(&self) -> f64 {
        self.timestamp_micros() as f64 / 1_000_000.0
    }
}

impl EpochSeconds for NaiveDateTime {
    fn epoch_seconds(&self) -> f64 {
        self.and_utc().epoch_seconds()
    }
}

impl<T: EpochSeconds + ?Sized> EpochSeconds for &T {
    fn epoch_seconds(&self) -> f64 {
        (**self).epoch_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};

    #[test]
    fn test_fixed_clock() {
        assert_eq!(FixedClock(1_700_000_000.5).now(), 1_700_000_000.5);
    }

    #[test]
    fn test_closure_clock() {
        let clock = || 42.0;
        assert_eq!(clock.now(), 42.0);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now() > 1_577_836_800.0);
    }

    #[test]
    fn test_numbers_are_seconds() {
        assert_eq!(12.25_f64.epoch_seconds(), 12.25);
        assert_eq!((-5_i64).epoch_seconds(), -5.0);
    }

    #[test]
    fn test_datetime_respects_offset() {
        let utc = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(utc.epoch_seconds(), 1_704_067_200.0);

        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = plus_two.with_ymd_and_hms(2024, 1, 1, 2, 0, 0).unwrap();
        assert_eq!(local.epoch_seconds(), 1_704_067_200.0);
    }

    #[test]
    fn test_naive_datetime_is_utc() {
        let naive = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_milli_opt(0, 0, 1, 500)
            .unwrap();
        assert_eq!(naive.epoch_seconds(), 1_704_067_201.5);
    }
}
