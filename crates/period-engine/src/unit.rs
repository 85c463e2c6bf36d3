//! The unit hierarchy: minute → hour → day → week → month.
//!
//! Each unit knows its length in seconds and how many of it make up the next
//! larger unit (its carry limit). Months are fixed at four weeks and sit at the
//! top of the chain with no carry limit.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::PeriodError;

/// A unit of the duration grammar, ordered from smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// 60 seconds, code `M`.
    Minute,
    /// 60 minutes, code `H`.
    Hour,
    /// 24 hours, code `d`.
    Day,
    /// 7 days, code `w`.
    Week,
    /// 4 weeks, code `m`.
    Month,
}

impl Unit {
    /// Every unit, smallest first.
    pub const ALL: [Unit; 5] = [Unit::Minute, Unit::Hour, Unit::Day, Unit::Week, Unit::Month];

    /// Length of one unit in seconds.
    pub const fn seconds(self) -> u64 {
        match self {
            Unit::Minute => 60,
            Unit::Hour => 3_600,
            Unit::Day => 86_400,
            Unit::Week => 604_800,
            Unit::Month => 2_419_200,
        }
    }

    /// How many of this unit make one of the next larger unit.
    ///
    /// `None` for [`Unit::Month`], the top of the hierarchy.
    pub const fn carry_limit(self) -> Option<u32> {
        match self {
            Unit::Minute => Some(60),
            Unit::Hour => Some(24),
            Unit::Day => Some(7),
            Unit::Week => Some(4),
            Unit::Month => None,
        }
    }

    /// Position in the hierarchy, minute = 0.
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// The single-letter code used by the duration grammar.
    pub const fn code(self) -> char {
        match self {
            Unit::Minute => 'M',
            Unit::Hour => 'H',
            Unit::Day => 'd',
            Unit::Week => 'w',
            Unit::Month => 'm',
        }
    }

    /// Lowercase English name of the unit.
    pub const fn name(self) -> &'static str {
        match self {
            Unit::Minute => "minute",
            Unit::Hour => "hour",
            Unit::Day => "day",
            Unit::Week => "week",
            Unit::Month => "month",
        }
    }

    /// The next larger unit, if any.
    pub const fn larger(self) -> Option<Unit> {
        match self {
            Unit::Minute => Some(Unit::Hour),
            Unit::Hour => Some(Unit::Day),
            Unit::Day => Some(Unit::Week),
            Unit::Week => Some(Unit::Month),
            Unit::Month => None,
        }
    }

    /// The next smaller unit, if any.
    pub const fn smaller(self) -> Option<Unit> {
        match self {
            Unit::Minute => None,
            Unit::Hour => Some(Unit::Minute),
            Unit::Day => Some(Unit::Hour),
            Unit::Week => Some(Unit::Day),
            Unit::Month => Some(Unit::Week),
        }
    }

    /// Resolve a grammar code to a unit. Codes are case-sensitive and must be
    /// exactly one letter.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodError::UnknownUnit`] carrying the offending code.
    pub fn from_code(code: &str) -> Result<Unit, PeriodError> {
        match code {
            "M" => Ok(Unit::Minute),
            "H" => Ok(Unit::Hour),
            "d" => Ok(Unit::Day),
            "w" => Ok(Unit::Week),
            "m" => Ok(Unit::Month),
            _ => Err(PeriodError::UnknownUnit(code.to_string())),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Unit {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::from_code(s)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
