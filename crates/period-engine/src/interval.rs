//! Half-open timestamp ranges and fixed-size buckets over them.
//!
//! An [`Interval`] is `[after, before)` in epoch seconds. With a step it
//! iterates as consecutive buckets of that length starting at `after`;
//! without one it iterates as itself, once.

use std::iter::FusedIterator;

use serde::Serialize;
use tracing::debug;

use crate::clock::Clock;
use crate::error::{PeriodError, Result};
use crate::period::Period;

/// How [`Interval::from_period`] places the interval relative to "now".
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalOptions {
    /// Shift the end of the interval this far back from "now".
    pub before: Option<Period>,
    /// Bucket size. With `natural`, the end is also aligned to this unit.
    pub step: Option<Period>,
    /// Snap the end to a natural boundary (full hour, midnight, Monday, ...).
    pub natural: bool,
}

impl Default for IntervalOptions {
    fn default() -> Self {
        Self {
            before: None,
            step: None,
            natural: true,
        }
    }
}

/// A half-open range `[after, before)` of epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interval {
    after: f64,
    before: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    step: Option<f64>,
}

impl Interval {
    /// Build an interval from explicit bounds.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodError::InvalidInterval`] if a bound is not finite,
    /// `after > before`, or `step` is not a positive finite number.
    pub fn new(after: f64, before: f64, step: Option<f64>) -> Result<Self> {
        if !after.is_finite() || !before.is_finite() {
            return Err(PeriodError::InvalidInterval(format!(
                "bounds must be finite, got [{after}, {before})"
            )));
        }
        if after > before {
            return Err(PeriodError::InvalidInterval(format!(
                "start {after} is after end {before}"
            )));
        }
        if let Some(step) = step {
            if !(step.is_finite() && step > 0.0) {
                return Err(PeriodError::InvalidInterval(format!(
                    "step must be a positive number of seconds, got {step}"
                )));
            }
        }
        Ok(Self {
            after,
            before,
            step,
        })
    }

    /// The interval covering `period`, ending at (or just around) `now`.
    ///
    /// The end is `now`, moved back by `options.before` when given. With
    /// `options.natural` the end is then aligned: advanced to the next step
    /// boundary when a step is set, otherwise rounded down to the period's
    /// own dominant unit. The start is the end minus the period.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodError::InvalidInterval`] if the step is zero-length
    /// (`"now"`) or the computed bounds are not finite.
    ///
    /// # Examples
    ///
    /// ```
    /// use period_engine::{Interval, IntervalOptions, Period};
    ///
    /// // Monday 2024-01-01 00:16:40 UTC
    /// let now = 1_704_068_200.0;
    /// let day = Period::parse("1d").unwrap();
    /// let options = IntervalOptions {
    ///     step: Some(Period::parse("1H").unwrap()),
    ///     ..Default::default()
    /// };
    ///
    /// let interval = Interval::from_period(&day, now, &options).unwrap();
    /// assert_eq!(interval.before(), 1_704_070_800.0);
    /// assert_eq!(interval.buckets().count(), 24);
    /// ```
    pub fn from_period(period: &Period, now: f64, options: &IntervalOptions) -> Result<Self> {
        let mut end = match &options.before {
            Some(before) => now - before.total_seconds(),
            None => now,
        };
        if options.natural {
            end = match &options.step {
                Some(step) => step.fill(end),
                None => period.reset(end),
            };
        }
        let start = end - period.total_seconds();
        let step = options.step.as_ref().map(Period::total_seconds);

        debug!(
            period = %period,
            now,
            natural = options.natural,
            after = start,
            before = end,
            step = ?step,
            "derived interval"
        );

        Self::new(start, end, step)
    }

    /// [`Interval::from_period`] with "now" read from `clock`.
    ///
    /// # Errors
    ///
    /// Same as [`Interval::from_period`].
    pub fn from_period_with_clock(
        period: &Period,
        clock: &impl Clock,
        options: &IntervalOptions,
    ) -> Result<Self> {
        Self::from_period(period, clock.now(), options)
    }

    /// Parse `expression` and build the interval as [`Interval::from_period`]
    /// does.
    ///
    /// # Errors
    ///
    /// Any error from [`Period::parse`] or [`Interval::from_period`].
    pub fn from_expression(expression: &str, now: f64, options: &IntervalOptions) -> Result<Self> {
        let period = Period::parse(expression)?;
        Self::from_period(&period, now, options)
    }

    pub fn after(&self) -> f64 {
        self.after
    }

    pub fn before(&self) -> f64 {
        self.before
    }

    pub fn step(&self) -> Option<f64> {
        self.step
    }

    /// `(after, before)`.
    pub fn bounds(&self) -> (f64, f64) {
        (self.after, self.before)
    }

    /// Length of the interval in seconds.
    pub fn span(&self) -> f64 {
        self.before - self.after
    }

    /// Whether `timestamp` lies strictly inside the interval.
    ///
    /// Both bounds are excluded.
    pub fn contains(&self, timestamp: f64) -> bool {
        self.after < timestamp && timestamp < self.before
    }

    /// Whether `other` fits inside this interval.
    ///
    /// The start may coincide with ours, the end may not. Note this differs
    /// from [`Interval::contains`], which excludes both bounds.
    pub fn contains_interval(&self, other: &Interval) -> bool {
        other.after >= self.after && other.before < self.before
    }

    /// Iterate the interval's buckets. See [`Buckets`].
    pub fn buckets(&self) -> Buckets {
        Buckets {
            interval: *self,
            index: 0,
        }
    }
}

impl IntoIterator for &Interval {
    type Item = Interval;
    type IntoIter = Buckets;

    fn into_iter(self) -> Buckets {
        self.buckets()
    }
}

/// Buckets of an [`Interval`].
///
/// Without a step this yields the interval itself once. With a step it yields
/// `[after + k·step, after + (k+1)·step)` for every `k` whose bucket starts
/// inside the interval; the last bucket may reach past `before`.
#[derive(Debug, Clone)]
pub struct Buckets {
    interval: Interval,
    index: u64,
}

impl Iterator for Buckets {
    type Item = Interval;

    fn next(&mut self) -> Option<Interval> {
        let Some(step) = self.interval.step else {
            if self.index > 0 {
                return None;
            }
            self.index = 1;
            return Some(self.interval);
        };

        // Bucket k starts at after + k·step, never at a running sum.
        let start = self.interval.after + self.index as f64 * step;
        if start >= self.interval.before {
            return None;
        }
        self.index += 1;
        Some(Interval {
            after: start,
            before: start + step,
            step: None,
        })
    }
}

impl FusedIterator for Buckets {}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    /// Monday, 2024-01-01 00:00:00 UTC.
    const MONDAY: f64 = 1_704_067_200.0;
    const HOUR: f64 = 3_600.0;
    const DAY: f64 = 86_400.0;

    fn period(s: &str) -> Period {
        Period::parse(s).unwrap()
    }

    fn with_step(step: &str) -> IntervalOptions {
        IntervalOptions {
            step: Some(period(step)),
            ..Default::default()
        }
    }

    // ── construction ────────────────────────────────────────────────────

    #[test]
    fn test_new_accepts_empty_interval() {
        let interval = Interval::new(10.0, 10.0, None).unwrap();
        assert_eq!(interval.span(), 0.0);
    }

    #[test]
    fn test_new_rejects_inverted_bounds() {
        let err = Interval::new(10.0, 5.0, None).unwrap_err();
        assert!(matches!(err, PeriodError::InvalidInterval(_)));
    }

    #[test]
    fn test_new_rejects_bad_steps() {
        for step in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = Interval::new(0.0, 10.0, Some(step)).unwrap_err();
            assert!(matches!(err, PeriodError::InvalidInterval(_)), "step {step}");
        }
    }

    #[test]
    fn test_new_rejects_non_finite_bounds() {
        assert!(Interval::new(f64::NEG_INFINITY, 0.0, None).is_err());
        assert!(Interval::new(0.0, f64::NAN, None).is_err());
    }

    // ── from_period ─────────────────────────────────────────────────────

    #[test]
    fn test_natural_without_step_resets_to_period_unit() {
        let interval =
            Interval::from_period(&period("1d"), MONDAY + 1_000.0, &Default::default()).unwrap();
        assert_eq!(interval.bounds(), (MONDAY - DAY, MONDAY));
        assert_eq!(interval.step(), None);
    }

    #[test]
    fn test_natural_with_step_fills_to_step_unit() {
        let interval =
            Interval::from_period(&period("1d"), MONDAY + 1_000.0, &with_step("1H")).unwrap();
        assert_eq!(interval.before(), MONDAY + HOUR);
        assert_eq!(interval.after(), MONDAY + HOUR - DAY);
        assert_eq!(interval.step(), Some(HOUR));
    }

    #[test]
    fn test_natural_with_step_on_boundary_still_advances() {
        let interval = Interval::from_period(&period("1d"), MONDAY, &with_step("1H")).unwrap();
        assert_eq!(interval.before(), MONDAY + HOUR);
    }

    #[test]
    fn test_unnatural_uses_now_as_is() {
        let options = IntervalOptions {
            natural: false,
            ..with_step("15M")
        };
        let now = MONDAY + 1_234.5;
        let interval = Interval::from_period(&period("1H"), now, &options).unwrap();
        assert_eq!(interval.bounds(), (now - HOUR, now));
        assert_eq!(interval.step(), Some(900.0));
    }

    #[test]
    fn test_before_shifts_the_end_back() {
        let options = IntervalOptions {
            before: Some(period("1w")),
            ..Default::default()
        };
        let now = MONDAY + 7.0 * DAY + 5_000.0;
        let interval = Interval::from_period(&period("1d"), now, &options).unwrap();
        assert_eq!(interval.bounds(), (MONDAY - DAY, MONDAY));
    }

    #[test]
    fn test_week_period_aligns_to_monday() {
        let wednesday = MONDAY + 2.0 * DAY + 3_600.0;
        let interval =
            Interval::from_period(&period("2w"), wednesday, &Default::default()).unwrap();
        assert_eq!(interval.before(), MONDAY);
        assert_eq!(interval.after(), MONDAY - 14.0 * DAY);
    }

    #[test]
    fn test_now_period_is_empty() {
        let interval =
            Interval::from_period(&period("now"), 500.5, &Default::default()).unwrap();
        assert_eq!(interval.bounds(), (500.5, 500.5));
    }

    #[test]
    fn test_now_step_is_rejected() {
        let err = Interval::from_period(&period("1H"), MONDAY, &with_step("now")).unwrap_err();
        assert!(matches!(err, PeriodError::InvalidInterval(_)));
    }

    #[test]
    fn test_from_clock_and_expression() {
        let clock = FixedClock(MONDAY + 1_000.0);
        let from_clock =
            Interval::from_period_with_clock(&period("1d"), &clock, &Default::default()).unwrap();
        let from_expr =
            Interval::from_expression("1d", MONDAY + 1_000.0, &Default::default()).unwrap();
        assert_eq!(from_clock, from_expr);
    }

    #[test]
    fn test_from_expression_propagates_parse_errors() {
        let err = Interval::from_expression("2q", MONDAY, &Default::default()).unwrap_err();
        assert_eq!(err, PeriodError::UnknownUnit("q".to_string()));
    }

    // ── membership ──────────────────────────────────────────────────────

    #[test]
    fn test_contains_excludes_both_bounds() {
        let interval = Interval::new(0.0, 10.0, None).unwrap();
        assert!(!interval.contains(0.0));
        assert!(interval.contains(0.5));
        assert!(interval.contains(9.999));
        assert!(!interval.contains(10.0));
        assert!(!interval.contains(-1.0));
    }

    #[test]
    fn test_contains_interval_includes_start_only() {
        let outer = Interval::new(0.0, 10.0, None).unwrap();
        assert!(outer.contains_interval(&Interval::new(0.0, 9.0, None).unwrap()));
        assert!(outer.contains_interval(&Interval::new(2.0, 3.0, None).unwrap()));
        assert!(!outer.contains_interval(&Interval::new(0.0, 10.0, None).unwrap()));
        assert!(!outer.contains_interval(&Interval::new(-1.0, 5.0, None).unwrap()));
        assert!(!outer.contains_interval(&outer));
    }

    // ── buckets ─────────────────────────────────────────────────────────

    #[test]
    fn test_without_step_yields_itself_once() {
        let interval =
            Interval::from_period(&period("1d"), MONDAY + 1_000.0, &Default::default()).unwrap();
        let buckets: Vec<Interval> = interval.buckets().collect();
        assert_eq!(buckets, vec![interval]);
    }

    #[test]
    fn test_even_step_partitions_the_interval() {
        let interval =
            Interval::from_period(&period("1d"), MONDAY + 1_000.0, &with_step("1H")).unwrap();
        let buckets: Vec<Interval> = interval.buckets().collect();

        assert_eq!(buckets.len(), 24);
        assert_eq!(buckets[0].after(), interval.after());
        assert_eq!(buckets[23].before(), interval.before());
        for bucket in &buckets {
            assert_eq!(bucket.span(), HOUR);
            assert_eq!(bucket.step(), None);
        }
        for pair in buckets.windows(2) {
            assert_eq!(pair[0].before(), pair[1].after());
        }
    }

    #[test]
    fn test_uneven_step_overhangs_the_end() {
        let interval = Interval::new(0.0, 100.0, Some(30.0)).unwrap();
        let bounds: Vec<(f64, f64)> = interval.buckets().map(|b| b.bounds()).collect();
        assert_eq!(
            bounds,
            vec![(0.0, 30.0), (30.0, 60.0), (60.0, 90.0), (90.0, 120.0)]
        );
    }

    #[test]
    fn test_empty_interval_with_step_has_no_buckets() {
        let interval = Interval::new(5.0, 5.0, Some(1.0)).unwrap();
        assert_eq!(interval.buckets().count(), 0);
    }

    #[test]
    fn test_bucket_iterator_is_fused() {
        let interval = Interval::new(0.0, 10.0, None).unwrap();
        let mut buckets = interval.buckets();
        assert!(buckets.next().is_some());
        assert!(buckets.next().is_none());
        assert!(buckets.next().is_none());
    }

    #[test]
    fn test_into_iterator_for_reference() {
        let interval = Interval::new(0.0, 4.0, Some(1.0)).unwrap();
        let mut count = 0;
        for bucket in &interval {
            assert!(interval.contains_interval(&bucket) || bucket.before() == interval.before());
            count += 1;
        }
        assert_eq!(count, 4);
    }

    #[test]
    fn test_serialization_skips_missing_step() {
        let plain = serde_json::to_value(Interval::new(1.0, 2.0, None).unwrap()).unwrap();
        assert_eq!(plain, serde_json::json!({ "after": 1.0, "before": 2.0 }));

        let stepped = serde_json::to_value(Interval::new(1.0, 2.0, Some(0.5)).unwrap()).unwrap();
        assert_eq!(stepped["step"], 0.5);
    }
}
