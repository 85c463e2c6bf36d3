//! A single normalized `(magnitude, unit)` component of a duration.

use std::fmt;

use chrono::Duration;
use serde::Serialize;
use tracing::trace;

use crate::error::{PeriodError, Result};
use crate::unit::Unit;

/// One component of a duration, e.g. `1.5H`.
///
/// Chunks built with [`PeriodChunk::from_raw`] are in canonical form: the
/// magnitude lies in `[1, carry_limit)` for its unit, except that months are
/// never promoted and minutes never demoted. Normalization preserves
/// [`PeriodChunk::to_seconds`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodChunk {
    magnitude: f64,
    unit: Unit,
}

impl PeriodChunk {
    /// Build a chunk and carry it into canonical form.
    ///
    /// # Examples
    ///
    /// ```
    /// use period_engine::{PeriodChunk, Unit};
    ///
    /// let chunk = PeriodChunk::from_raw(90.0, Unit::Minute);
    /// assert_eq!(chunk.unit(), Unit::Hour);
    /// assert_eq!(chunk.magnitude(), 1.5);
    /// ```
    pub fn from_raw(magnitude: f64, unit: Unit) -> Self {
        let (mut magnitude, mut unit) = (magnitude, unit);

        while let (Some(limit), Some(larger)) = (unit.carry_limit(), unit.larger()) {
            let limit = f64::from(limit);
            if magnitude < limit {
                break;
            }
            magnitude /= limit;
            unit = larger;
            trace!(magnitude, unit = %unit, "carried up");
        }

        while magnitude < 1.0 {
            let Some(smaller) = unit.smaller() else {
                break;
            };
            // A smaller unit always has a carry limit.
            let limit = smaller.carry_limit().map_or(1.0, f64::from);
            magnitude *= limit;
            unit = smaller;
            trace!(magnitude, unit = %unit, "carried down");
        }

        Self { magnitude, unit }
    }

    /// Build a chunk exactly as given, without normalization.
    pub fn forced(magnitude: f64, unit: Unit) -> Self {
        Self { magnitude, unit }
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Absolute length of the chunk in seconds.
    pub fn to_seconds(&self) -> f64 {
        self.magnitude * self.unit.seconds() as f64
    }

    /// The same amount of time expressed in `target`, not normalized.
    pub fn to_unit(&self, target: Unit) -> Self {
        if target == self.unit {
            return *self;
        }
        let ratio = self.unit.seconds() as f64 / target.seconds() as f64;
        Self::forced(self.magnitude * ratio, target)
    }

    /// Like [`PeriodChunk::to_unit`], resolving the target from a grammar code.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodError::InvalidConversion`] if `code` is not a unit code.
    pub fn to_unit_code(&self, code: &str) -> Result<Self> {
        let target = Unit::from_code(code).map_err(|_| {
            PeriodError::InvalidConversion(format!("can't convert {self} to unit '{code}'"))
        })?;
        Ok(self.to_unit(target))
    }

    /// Sum two chunks in the receiver's unit, then renormalize.
    ///
    /// The seconds value is commutative; the unit the sum starts from is
    /// always `self`'s.
    pub fn add(&self, other: &PeriodChunk) -> Self {
        let other = other.to_unit(self.unit);
        Self::from_raw(self.magnitude + other.magnitude, self.unit)
    }

    /// The chunk as a [`chrono::Duration`], rounded to the millisecond.
    pub fn to_duration(&self) -> Duration {
        Duration::milliseconds((self.to_seconds() * 1_000.0).round() as i64)
    }
}

impl std::ops::Add for PeriodChunk {
    type Output = PeriodChunk;

    fn add(self, rhs: PeriodChunk) -> PeriodChunk {
        PeriodChunk::add(&self, &rhs)
    }
}

impl fmt::Display for PeriodChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
