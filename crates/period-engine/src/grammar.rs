//! Tokenizer for compact duration strings.
//!
//! A duration string is a run of `<number><unit-code>` tokens with no
//! separators, e.g. `"2w1.5d"` → `2w`, `1.5d`. Numbers match
//! `[0-9]+(\.[0-9]+)?` and unit codes are a run of letters that must name
//! exactly one [`Unit`].
//!
//! [`tokenize`] is lazy: each call to `next` scans one token. The first error
//! ends the sequence.

use tracing::trace;

use crate::error::{PeriodError, Result};
use crate::unit::Unit;

/// One `<number><unit-code>` token before normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawToken {
    pub magnitude: f64,
    pub unit: Unit,
}

/// Lazy token stream over a duration string. See [`tokenize`].
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    input: &'a str,
    rest: &'a str,
    failed: bool,
}

/// Split `input` into raw `(magnitude, unit)` tokens.
///
/// An empty input yields no tokens; rejecting it is up to the caller.
///
/// # Errors
///
/// Each item is a [`Result`]. The stream yields
/// [`PeriodError::MalformedDuration`] for bare unit letters, dangling numbers,
/// malformed numbers, and characters outside the grammar, or
/// [`PeriodError::UnknownUnit`] for a letter run that is not a unit code.
///
/// # Examples
///
/// ```
/// use period_engine::grammar::tokenize;
/// use period_engine::Unit;
///
/// let tokens: Vec<_> = tokenize("2w1.5d").collect::<Result<_, _>>().unwrap();
/// assert_eq!(tokens.len(), 2);
/// assert_eq!(tokens[0].unit, Unit::Week);
/// assert_eq!(tokens[1].magnitude, 1.5);
/// ```
pub fn tokenize(input: &str) -> Tokens<'_> {
    Tokens {
        input,
        rest: input,
        failed: false,
    }
}

impl<'a> Tokens<'a> {
    fn malformed(&self, reason: impl std::fmt::Display) -> PeriodError {
        PeriodError::MalformedDuration(format!("{reason} in '{}'", self.input))
    }

    fn next_token(&mut self) -> Result<RawToken> {
        let number_len = self
            .rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(self.rest.len());
        let (number, after_number) = self.rest.split_at(number_len);

        let code_len = after_number
            .find(|c: char| !c.is_alphabetic())
            .unwrap_or(after_number.len());
        let (code, remainder) = after_number.split_at(code_len);

        if number.is_empty() {
            return Err(match after_number.chars().next() {
                Some(c) if code.is_empty() => self.malformed(format_args!("invalid character '{c}'")),
                _ => self.malformed(format_args!("unit '{code}' has no quantity")),
            });
        }

        if code.is_empty() {
            return Err(match remainder.chars().next() {
                Some(c) => self.malformed(format_args!("invalid character '{c}'")),
                None => self.malformed(format_args!("number '{number}' has no unit")),
            });
        }

        let magnitude = parse_magnitude(number).ok_or_else(|| {
            self.malformed(format_args!("invalid number '{number}'"))
        })?;
        let unit = Unit::from_code(code)?;

        self.rest = remainder;
        trace!(magnitude, unit = %unit, "duration token");
        Ok(RawToken { magnitude, unit })
    }
}

impl Iterator for Tokens<'_> {
    type Item = Result<RawToken>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.rest.is_empty() {
            return None;
        }
        let token = self.next_token();
        self.failed = token.is_err();
        Some(token)
    }
}

impl std::iter::FusedIterator for Tokens<'_> {}

/// Parse `[0-9]+(\.[0-9]+)?` into a finite float.
fn parse_magnitude(number: &str) -> Option<f64> {
    let (whole, fraction) = match number.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (number, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(whole) || !fraction.map_or(true, digits) {
        return None;
    }
    number.parse::<f64>().ok().filter(|value| value.is_finite())
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Result<Vec<RawToken>> {
        tokenize(input).collect()
    }

    fn token(magnitude: f64, unit: Unit) -> RawToken {
        RawToken { magnitude, unit }
    }

    // ── accepted input ──────────────────────────────────────────────────

    #[test]
    fn test_single_token() {
        assert_eq!(tokens("15M").unwrap(), vec![token(15.0, Unit::Minute)]);
    }

    #[test]
    fn test_multiple_tokens_without_separators() {
        assert_eq!(
            tokens("2w1.5d").unwrap(),
            vec![token(2.0, Unit::Week), token(1.5, Unit::Day)]
        );
    }

    #[test]
    fn test_every_unit_code() {
        let parsed = tokens("1M2H3d4w5m").unwrap();
        let units: Vec<Unit> = parsed.iter().map(|t| t.unit).collect();
        assert_eq!(units, Unit::ALL.to_vec());
    }

    #[test]
    fn test_tokens_are_not_normalized() {
        assert_eq!(tokens("90M").unwrap(), vec![token(90.0, Unit::Minute)]);
    }

    #[test]
    fn test_repeated_units_are_kept_separate() {
        assert_eq!(
            tokens("1H1H").unwrap(),
            vec![token(1.0, Unit::Hour), token(1.0, Unit::Hour)]
        );
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert_eq!(tokenize("").count(), 0);
    }

    // ── rejected input ──────────────────────────────────────────────────

    #[test]
    fn test_bare_letters_are_malformed() {
        let err = tokens("h2").unwrap_err();
        assert!(matches!(err, PeriodError::MalformedDuration(_)), "got: {err}");
        assert!(err.to_string().contains("no quantity"), "got: {err}");
    }

    #[test]
    fn test_dangling_number_is_malformed() {
        let err = tokens("2w3").unwrap_err();
        assert!(matches!(err, PeriodError::MalformedDuration(_)));
        assert!(err.to_string().contains("'3' has no unit"), "got: {err}");
    }

    #[test]
    fn test_unknown_code_reports_the_code() {
        assert_eq!(tokens("2q"), Err(PeriodError::UnknownUnit("q".to_string())));
    }

    #[test]
    fn test_multi_letter_code_is_unknown() {
        assert_eq!(tokens("2Hd"), Err(PeriodError::UnknownUnit("Hd".to_string())));
    }

    #[test]
    fn test_whitespace_is_rejected() {
        for input in ["1H 2M", " 1H", "1 H", "1H\n"] {
            let err = tokens(input).unwrap_err();
            assert!(
                err.to_string().contains("invalid character"),
                "{input:?} gave: {err}"
            );
        }
    }

    #[test]
    fn test_signs_are_rejected() {
        assert!(matches!(
            tokens("-1H"),
            Err(PeriodError::MalformedDuration(_))
        ));
        assert!(matches!(
            tokens("+1H"),
            Err(PeriodError::MalformedDuration(_))
        ));
    }

    #[test]
    fn test_malformed_numbers() {
        for input in ["1.H", ".5H", "1.2.3H", "..H"] {
            let err = tokens(input).unwrap_err();
            assert!(
                err.to_string().contains("invalid number"),
                "{input:?} gave: {err}"
            );
        }
    }

    #[test]
    fn test_overflowing_number_is_rejected() {
        let huge = format!("{}M", "9".repeat(400));
        assert!(matches!(
            tokens(&huge),
            Err(PeriodError::MalformedDuration(_))
        ));
    }

    #[test]
    fn test_stream_stops_after_first_error() {
        let mut stream = tokenize("1Hx2q3d");
        assert_eq!(stream.next(), Some(Err(PeriodError::UnknownUnit("Hx".into()))));
        assert_eq!(stream.next(), None);
        assert_eq!(stream.next(), None);
    }

    #[test]
    fn test_tokens_before_an_error_are_yielded() {
        let mut stream = tokenize("1H2q");
        assert_eq!(stream.next(), Some(Ok(token(1.0, Unit::Hour))));
        assert!(matches!(stream.next(), Some(Err(PeriodError::UnknownUnit(_)))));
    }
}
