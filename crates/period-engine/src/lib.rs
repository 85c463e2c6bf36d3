//! # period-engine
//!
//! Compact duration strings, natural calendar alignment, and time buckets.
//!
//! Durations are written as runs of `<number><unit>` tokens such as `"15M"`,
//! `"1.5H"` or `"2w1.5d"`, with the units `M` (minute), `H` (hour), `d` (day),
//! `w` (week) and `m` (month, four weeks). The literal `"now"` is the
//! zero-length duration.
//!
//! All computation is pure. Nothing reads the system clock unless handed a
//! [`Clock`]; every alignment takes "now" or an anchor explicitly.
//!
//! ## Modules
//!
//! - [`unit`]: the minute → month hierarchy and its carry limits
//! - [`grammar`]: duration string → raw `(magnitude, unit)` tokens
//! - [`chunk`]: one normalized duration component, conversion and addition
//! - [`period`]: a whole duration: total seconds, dominant unit, `reset` / `fill`
//! - [`interval`]: `[after, before)` ranges derived from periods, and their buckets
//! - [`clock`]: the "now" and calendar-conversion collaborators
//! - [`format`]: rendering seconds and datetimes
//! - [`stopwatch`]: tick/tock timing, logged through `tracing`
//! - [`rate`]: item throughput and remaining-time estimates
//! - [`error`]: Error types
//!
//! ## Example
//!
//! ```
//! use period_engine::{Interval, IntervalOptions, Period};
//!
//! // Monday 2024-01-01 00:16:40 UTC
//! let now = 1_704_068_200.0;
//!
//! let week = Period::parse("1w").unwrap();
//! assert_eq!(week.reset(now), 1_704_067_200.0);
//!
//! let options = IntervalOptions {
//!     step: Some("1d".parse().unwrap()),
//!     ..Default::default()
//! };
//! let interval = Interval::from_period(&week, now, &options).unwrap();
//! assert_eq!(interval.buckets().count(), 7);
//! ```

pub mod chunk;
pub mod clock;
pub mod error;
pub mod format;
pub mod grammar;
pub mod interval;
pub mod period;
pub mod rate;
pub mod stopwatch;
pub mod unit;

pub use chunk::PeriodChunk;
pub use clock::{Clock, EpochSeconds, FixedClock, SystemClock};
pub use error::{PeriodError, Result};
pub use format::{format_seconds, to_midnight};
pub use interval::{Buckets, Interval, IntervalOptions};
pub use period::{period_to_seconds, Period, Precision, Timestamp, WEEK_EPOCH_OFFSET};
pub use rate::{RateInfo, Stopper, StopperOptions};
pub use stopwatch::{Lap, Stopwatch};
pub use unit::Unit;
