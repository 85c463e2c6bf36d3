//! Tick/tock timing of a running sequence of steps.
//!
//! A [`Stopwatch`] records a *tick*, which starts a sequence, and any number
//! of *tocks*. Each tock reports the time since the previous tock and since
//! the tick, and logs it through `tracing`.
//!
//! [`tick`] and [`tock`] keep one stopwatch per thread for quick ad-hoc
//! timing without passing a value around.

use std::cell::RefCell;
use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::clock::{Clock, SystemClock};
use crate::format::{format_seconds, DEFAULT_PATTERN};

/// Elapsed times reported by one [`Stopwatch::tock`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Lap {
    /// Seconds since the previous tock, or since the tick for the first one.
    pub since_tock: f64,
    /// Seconds since the tick.
    pub since_tick: f64,
}

impl fmt::Display for Lap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Elapsed {} / {} [last tock/last tick]",
            format_seconds(self.since_tock, DEFAULT_PATTERN),
            format_seconds(self.since_tick, DEFAULT_PATTERN),
        )
    }
}

/// Measures time between a tick and the tocks that follow it.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use period_engine::stopwatch::Stopwatch;
///
/// let now = Cell::new(100.0);
/// let mut watch = Stopwatch::new(|| now.get());
///
/// now.set(101.5);
/// let lap = watch.tock();
/// assert_eq!(lap.since_tock, 1.5);
/// assert_eq!(lap.to_string(), "Elapsed 00m:01s.500ms / 00m:01s.500ms [last tock/last tick]");
/// ```
#[derive(Debug, Clone)]
pub struct Stopwatch<C: Clock = SystemClock> {
    clock: C,
    start: f64,
    last: f64,
    formatted: bool,
}

impl<C: Clock> Stopwatch<C> {
    /// A stopwatch that has already ticked.
    pub fn new(clock: C) -> Self {
        let now = clock.now();
        Self {
            clock,
            start: now,
            last: now,
            formatted: true,
        }
    }

    /// Log raw seconds instead of `format_seconds` output.
    pub fn raw(mut self) -> Self {
        self.formatted = false;
        self
    }

    /// Start a new sequence.
    pub fn tick(&mut self) {
        self.start = self.clock.now();
        self.last = self.start;
    }

    /// Record a tock, log it, and return the elapsed times.
    pub fn tock(&mut self) -> Lap {
        let now = self.clock.now();
        let lap = Lap {
            since_tock: now - self.last,
            since_tick: now - self.start,
        };
        self.last = now;

        if self.formatted {
            info!(since_tock = lap.since_tock, since_tick = lap.since_tick, "{lap}");
        } else {
            info!(
                since_tock = lap.since_tock,
                since_tick = lap.since_tick,
                "{}/{}",
                lap.since_tock,
                lap.since_tick
            );
        }
        lap
    }

    /// Seconds since the tick, without recording a tock.
    pub fn elapsed(&self) -> f64 {
        self.clock.now() - self.start
    }
}

thread_local! {
    static THREAD_STOPWATCH: RefCell<Option<Stopwatch>> = const { RefCell::new(None) };
}

/// Tick this thread's stopwatch, creating it on first use.
pub fn tick() {
    THREAD_STOPWATCH.with_borrow_mut(|slot| match slot {
        Some(watch) => watch.tick(),
        None => *slot = Some(Stopwatch::new(SystemClock)),
    });
}

/// Tock this thread's stopwatch. Without a prior [`tick`] this ticks first.
pub fn tock() -> Lap {
    THREAD_STOPWATCH.with_borrow_mut(|slot| {
        slot.get_or_insert_with(|| Stopwatch::new(SystemClock)).tock()
    })
}

// ── Tests ───────────────────────────────────────────────────────────────────
