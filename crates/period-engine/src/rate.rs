//! Throughput tracking for long-running batch work.
//!
//! [`RateInfo`] is the bookkeeping: how many items have been processed, how
//! fast, and how long the rest should take. [`Stopper`] drives it from a
//! [`Clock`] and reports progress through `tracing`, optionally throttled.

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::clock::{Clock, SystemClock};

/// Counters and timestamps behind a throughput estimate.
///
/// Rates are `None` until some time has passed, and predictions are `None`
/// when there is no known remaining work or no progress to extrapolate from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateInfo {
    start: f64,
    last: f64,
    end: f64,
    total: Option<u64>,
    processed: u64,
    recently_processed: u64,
}

impl RateInfo {
    pub fn new(now: f64, total: Option<u64>) -> Self {
        Self {
            start: now,
            last: now,
            end: now,
            total,
            processed: 0,
            recently_processed: 0,
        }
    }

    /// Record `amount` items finished at `now`.
    pub fn log(&mut self, now: f64, amount: u64) {
        self.last = self.end;
        self.end = now;
        self.processed += amount;
        self.recently_processed = amount;
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    pub fn recently_processed(&self) -> u64 {
        self.recently_processed
    }

    /// Seconds from the start to the latest log.
    pub fn elapsed(&self) -> f64 {
        self.end - self.start
    }

    /// Seconds between the two latest logs.
    pub fn recently_elapsed(&self) -> f64 {
        self.end - self.last
    }

    /// Items still to process, if the total is known. Saturates at zero.
    pub fn remaining(&self) -> Option<u64> {
        self.total.map(|total| total.saturating_sub(self.processed))
    }

    /// Average items per second since the start.
    pub fn rate(&self) -> Option<f64> {
        per_second(self.processed, self.elapsed())
    }

    /// Items per second over the latest log.
    pub fn recent_rate(&self) -> Option<f64> {
        per_second(self.recently_processed, self.recently_elapsed())
    }

    /// Predicted seconds left at the average rate.
    pub fn remaining_time(&self) -> Option<f64> {
        predict(self.remaining(), self.rate())
    }

    /// Predicted seconds left at the recent rate.
    pub fn recent_remaining_time(&self) -> Option<f64> {
        predict(self.remaining(), self.recent_rate())
    }
}

fn per_second(items: u64, seconds: f64) -> Option<f64> {
    (seconds > 0.0).then(|| items as f64 / seconds)
}

fn predict(remaining: Option<u64>, rate: Option<f64>) -> Option<f64> {
    match (remaining, rate) {
        (Some(remaining), Some(rate)) if remaining > 0 && rate > 0.0 => {
            Some(remaining as f64 / rate)
        }
        _ => None,
    }
}

/// Settings for a [`Stopper`].
#[derive(Debug, Clone, PartialEq)]
pub struct StopperOptions {
    /// Expected number of items. Enables remaining-time predictions.
    pub total: Option<u64>,
    /// Minimum seconds between two reports; `None` reports on every log.
    pub report_every: Option<f64>,
    /// Singular item name used in reports.
    pub item_name: String,
}

impl Default for StopperOptions {
    fn default() -> Self {
        Self {
            total: None,
            report_every: None,
            item_name: "item".to_string(),
        }
    }
}

/// Measures item throughput and reports it as it goes.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use period_engine::rate::{Stopper, StopperOptions};
///
/// let now = Cell::new(0.0);
/// let options = StopperOptions { total: Some(100), ..Default::default() };
/// let mut stopper = Stopper::new(|| now.get(), options);
///
/// now.set(10.0);
/// stopper.log(25);
/// assert_eq!(stopper.info().rate(), Some(2.5));
/// assert_eq!(stopper.info().remaining_time(), Some(30.0));
/// ```
#[derive(Debug, Clone)]
pub struct Stopper<C: Clock = SystemClock> {
    clock: C,
    info: RateInfo,
    options: StopperOptions,
    last_reported: Option<f64>,
}

impl<C: Clock> Stopper<C> {
    pub fn new(clock: C, options: StopperOptions) -> Self {
        let info = RateInfo::new(clock.now(), options.total);
        info!(item = %options.item_name, total = ?options.total, "started processing");
        Self {
            clock,
            info,
            options,
            last_reported: None,
        }
    }

    pub fn info(&self) -> &RateInfo {
        &self.info
    }

    /// Record `amount` finished items and report if one is due.
    ///
    /// Returns whether a report was emitted.
    pub fn log(&mut self, amount: u64) -> bool {
        self.info.log(self.clock.now(), amount);
        self.report(false)
    }

    /// Emit a progress report, unless throttled and `force` is not set.
    pub fn report(&mut self, force: bool) -> bool {
        let now = self.clock.now();
        if !force && !self.report_due(now) {
            return false;
        }
        let info = &self.info;
        info!(
            processed = info.processed,
            remaining = ?info.remaining(),
            elapsed = info.elapsed(),
            rate = ?info.rate(),
            recent_rate = ?info.recent_rate(),
            remaining_time = ?info.remaining_time(),
            "{}",
            self.message()
        );
        self.last_reported = Some(now);
        true
    }

    /// The current progress report as text.
    pub fn message(&self) -> String {
        Report {
            info: &self.info,
            item: &self.options.item_name,
        }
        .to_string()
    }

    fn report_due(&self, now: f64) -> bool {
        match (self.options.report_every, self.last_reported) {
            (Some(every), Some(last)) => last + every <= now,
            _ => true,
        }
    }
}

struct Report<'a> {
    info: &'a RateInfo,
    item: &'a str,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Report { info, item } = self;
        write!(f, "Processed {} {item}s in {:.2}s", info.processed, info.elapsed())?;
        if let Some(remaining) = info.remaining() {
            write!(f, " [{remaining} {item}s remaining]")?;
        }
        write!(
            f,
            "\n    {} {item}s per second [AVG: {} {item}s per second]",
            Estimate(info.recent_rate()),
            Estimate(info.rate()),
        )?;
        if info.total.is_some() {
            write!(
                f,
                "\n    {} seconds left [AVG: {} seconds left]",
                Estimate(info.recent_remaining_time()),
                Estimate(info.remaining_time()),
            )?;
        }
        Ok(())
    }
}

struct Estimate(Option<f64>);

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{value:.2}"),
            None => f.write_str("n/a"),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
