//! Parsed durations and natural boundary alignment.
//!
//! A [`Period`] is the sum of the chunks in one duration string. Its dominant
//! unit (the unit of the largest chunk) decides which calendar boundary
//! [`Period::reset`] and [`Period::fill`] snap to:
//!
//! - `"90M"` normalizes to `1.5H`, so it aligns to hours.
//! - `"2w1.5d"` aligns to weeks, which start on Monday.
//! - `"now"` is zero-length and leaves timestamps untouched.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use crate::chunk::PeriodChunk;
use crate::clock::{Clock, EpochSeconds};
use crate::error::{PeriodError, Result};
use crate::grammar::tokenize;
use crate::unit::Unit;

/// The zero-length sentinel accepted wherever a duration string is.
pub const NOW: &str = "now";

/// Distance from the Unix epoch (a Thursday) to the first Monday, 1970-01-05.
///
/// Week boundaries are computed relative to that Monday rather than to the
/// epoch itself.
pub const WEEK_EPOCH_OFFSET: i64 = 4 * Unit::Day.seconds() as i64;

/// How [`Period::to_timestamp`] should render its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    /// Whole seconds, truncated.
    #[default]
    Seconds,
    /// Whole milliseconds, truncated.
    Millis,
    /// Fractional seconds.
    Fractional,
}

/// A timestamp rendered at a chosen [`Precision`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Timestamp {
    Seconds(i64),
    Millis(i64),
    Fractional(f64),
}

impl Timestamp {
    /// The timestamp in seconds, whatever its precision.
    pub fn as_seconds(&self) -> f64 {
        match *self {
            Timestamp::Seconds(s) => s as f64,
            Timestamp::Millis(ms) => ms as f64 / 1_000.0,
            Timestamp::Fractional(s) => s,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Seconds(s) => write!(f, "{s}"),
            Timestamp::Millis(ms) => write!(f, "{ms}"),
            Timestamp::Fractional(s) => write!(f, "{s}"),
        }
    }
}

/// A duration parsed from a string such as `"2w1.5d"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Period {
    representation: String,
    chunks: Vec<PeriodChunk>,
    total_seconds: f64,
    dominant_unit: Option<Unit>,
}

impl Period {
    /// Parse a duration string, or the literal `"now"`.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodError::MalformedDuration`] for empty or ungrammatical
    /// input and [`PeriodError::UnknownUnit`] for unit codes outside the
    /// table. No partial period is ever returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use period_engine::{Period, Unit};
    ///
    /// let period = Period::parse("2w1.5d").unwrap();
    /// assert_eq!(period.total_seconds(), 1_339_200.0);
    /// assert_eq!(period.dominant_unit(), Some(Unit::Week));
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        if input == NOW {
            return Ok(Self::now());
        }
        if input.is_empty() {
            return Err(PeriodError::MalformedDuration("empty duration".to_string()));
        }

        let chunks = tokenize(input)
            .map(|token| token.map(|t| PeriodChunk::from_raw(t.magnitude, t.unit)))
            .collect::<Result<Vec<_>>>()?;

        let total_seconds: f64 = chunks.iter().map(PeriodChunk::to_seconds).sum();
        // First chunk wins a tie.
        let dominant_unit = chunks
            .iter()
            .copied()
            .reduce(|best, chunk| {
                if chunk.to_seconds() > best.to_seconds() {
                    chunk
                } else {
                    best
                }
            })
            .map(|chunk| chunk.unit());

        debug!(
            input,
            chunks = chunks.len(),
            total_seconds,
            dominant_unit = ?dominant_unit,
            "parsed period"
        );

        Ok(Self {
            representation: input.to_string(),
            chunks,
            total_seconds,
            dominant_unit,
        })
    }

    /// The zero-length period.
    pub fn now() -> Self {
        Self {
            representation: NOW.to_string(),
            chunks: Vec::new(),
            total_seconds: 0.0,
            dominant_unit: None,
        }
    }

    pub fn is_now(&self) -> bool {
        self.dominant_unit.is_none()
    }

    /// The string this period was parsed from.
    pub fn as_str(&self) -> &str {
        &self.representation
    }

    /// Normalized chunks, in input order.
    pub fn chunks(&self) -> &[PeriodChunk] {
        &self.chunks
    }

    pub fn total_seconds(&self) -> f64 {
        self.total_seconds
    }

    /// Unit of the chunk contributing the most seconds; `None` for `"now"`.
    pub fn dominant_unit(&self) -> Option<Unit> {
        self.dominant_unit
    }

    /// The period as a [`chrono::Duration`], rounded to the millisecond.
    pub fn to_duration(&self) -> Duration {
        self.chunks
            .iter()
            .map(PeriodChunk::to_duration)
            .fold(Duration::zero(), |acc, d| acc + d)
    }

    /// The instant this period before `now`.
    pub fn to_timestamp(&self, now: f64, precision: Precision) -> Timestamp {
        let value = now - self.total_seconds;
        match precision {
            Precision::Seconds => Timestamp::Seconds(value.trunc() as i64),
            Precision::Millis => Timestamp::Millis((value * 1_000.0).trunc() as i64),
            Precision::Fractional => Timestamp::Fractional(value),
        }
    }

    /// [`Period::to_timestamp`] with "now" read from `clock`.
    pub fn ago(&self, clock: &impl Clock, precision: Precision) -> Timestamp {
        self.to_timestamp(clock.now(), precision)
    }

    /// Round `anchor` down to the latest boundary of the dominant unit.
    ///
    /// Weeks start on Monday ([`WEEK_EPOCH_OFFSET`]). For `"now"` the anchor
    /// is returned unchanged.
    pub fn reset(&self, anchor: impl EpochSeconds) -> f64 {
        self.align(anchor.epoch_seconds(), 0.0)
    }

    /// Advance `anchor` to the next boundary of the dominant unit.
    ///
    /// The advance is unconditional: a timestamp already on a boundary moves
    /// one whole unit forward. For `"now"` the anchor is returned unchanged.
    ///
    /// ```
    /// use period_engine::Period;
    ///
    /// let hour = Period::parse("1H").unwrap();
    /// assert_eq!(hour.fill(3_600.0), 7_200.0);
    /// assert_eq!(hour.fill(3_601.0), 7_200.0);
    /// ```
    pub fn fill(&self, anchor: impl EpochSeconds) -> f64 {
        self.align(anchor.epoch_seconds(), 1.0)
    }

    /// [`Period::reset`] rendered as a UTC datetime.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodError::TimestampOutOfRange`] if the boundary is outside
    /// the range chrono can represent.
    pub fn reset_datetime(&self, anchor: impl EpochSeconds) -> Result<DateTime<Utc>> {
        to_datetime(self.reset(anchor))
    }

    /// [`Period::fill`] rendered as a UTC datetime.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodError::TimestampOutOfRange`] if the boundary is outside
    /// the range chrono can represent.
    pub fn fill_datetime(&self, anchor: impl EpochSeconds) -> Result<DateTime<Utc>> {
        to_datetime(self.fill(anchor))
    }

    fn align(&self, timestamp: f64, advance: f64) -> f64 {
        let Some(unit) = self.dominant_unit else {
            return timestamp;
        };
        let size = unit.seconds() as f64;
        let offset = match unit {
            Unit::Week => WEEK_EPOCH_OFFSET as f64,
            _ => 0.0,
        };
        offset + (((timestamp - offset) / size).floor() + advance) * size
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.representation)
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self> {
        Period::parse(s)
    }
}

/// Total seconds in a duration string.
///
/// # Errors
///
/// Same as [`Period::parse`].
pub fn period_to_seconds(input: &str) -> Result<f64> {
    Period::parse(input).map(|period| period.total_seconds())
}

fn to_datetime(timestamp: f64) -> Result<DateTime<Utc>> {
    let millis = (timestamp * 1_000.0).round();
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
        return Err(PeriodError::TimestampOutOfRange(timestamp.to_string()));
    }
    DateTime::from_timestamp_millis(millis as i64)
        .ok_or_else(|| PeriodError::TimestampOutOfRange(timestamp.to_string()))
}

// ── Tests ───────────────────────────────────────────────────────────────────
