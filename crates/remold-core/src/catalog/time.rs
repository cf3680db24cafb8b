//! Duration and timestamp hooks.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use thiserror::Error;

use super::text_hook;
use crate::error::HookError;
use crate::hook::Hook;
use crate::value::{Kind, Value};

/// Why duration text was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DurationError {
    /// Not a sequence of number-unit pairs.
    #[error("invalid duration")]
    Invalid,
    /// A number had no unit after it.
    #[error("missing unit in duration")]
    MissingUnit,
    /// Unit not one of `ns us µs μs ms s m h`.
    #[error("unknown unit in duration")]
    UnknownUnit,
    /// Total does not fit in signed 64-bit nanoseconds.
    #[error("duration out of range")]
    OutOfRange,
}

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SECOND: u128 = 1_000_000_000;
const NANOS_PER_MINUTE: u128 = 60_000_000_000;
const NANOS_PER_HOUR: u128 = 3_600_000_000_000;

/// Largest magnitude a negative duration may have.
const MAX_MAGNITUDE: u128 = 9_223_372_036_854_775_808;

/// Fraction digits beyond this cannot change a nanosecond total.
const MAX_FRACTION_DIGITS: usize = 18;

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "\u{b5}s" | "\u{3bc}s" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SECOND),
        "m" => Some(NANOS_PER_MINUTE),
        "h" => Some(NANOS_PER_HOUR),
        _ => None,
    }
}

fn digits_value(digits: &str) -> Option<u128> {
    digits.bytes().try_fold(0_u128, |acc, b| {
        acc.checked_mul(10)?
            .checked_add(u128::from(b.checked_sub(b'0')?))
    })
}

fn fraction_nanos(digits: &str, unit: u128) -> Option<u128> {
    let digits = digits.get(..MAX_FRACTION_DIGITS).unwrap_or(digits);
    let scale = 10_u128.checked_pow(u32::try_from(digits.len()).ok()?)?;
    digits_value(digits)?.checked_mul(unit)?.checked_div(scale)
}

fn leading_digits(text: &str) -> (&str, &str) {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    text.split_at(end)
}

/// Parse a signed duration such as `"1h30m"`, `"-1.5s"` or `"300ms"`.
///
/// # Errors
///
/// Returns a [`DurationError`]; the message never contains the input.
pub(crate) fn parse_duration(text: &str) -> Result<TimeDelta, DurationError> {
    let (negative, mut rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    if rest == "0" {
        return Ok(TimeDelta::zero());
    }
    if rest.is_empty() {
        return Err(DurationError::Invalid);
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, tail) = leading_digits(rest);
        rest = tail;
        let mut fraction = "";
        if let Some(tail) = rest.strip_prefix('.') {
            (fraction, rest) = leading_digits(tail);
        }
        if whole.is_empty() && fraction.is_empty() {
            return Err(DurationError::Invalid);
        }

        let unit_end = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (unit, tail) = rest.split_at(unit_end);
        rest = tail;
        if unit.is_empty() {
            return Err(DurationError::MissingUnit);
        }
        let scale = unit_nanos(unit).ok_or(DurationError::UnknownUnit)?;

        let component = digits_value(whole)
            .and_then(|n| n.checked_mul(scale))
            .and_then(|n| n.checked_add(fraction_nanos(fraction, scale)?))
            .ok_or(DurationError::OutOfRange)?;
        total = total
            .checked_add(component)
            .filter(|&t| t <= MAX_MAGNITUDE)
            .ok_or(DurationError::OutOfRange)?;
    }

    let magnitude = u64::try_from(total).map_err(|_| DurationError::OutOfRange)?;
    let nanos = if negative {
        0_i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    }
    .ok_or(DurationError::OutOfRange)?;
    Ok(TimeDelta::nanoseconds(nanos))
}

/// Text to a [`TimeDelta`].
///
/// The grammar is a sequence of decimal numbers, each with an optional
/// fraction and a required unit (`ns us µs μs ms s m h`), with an optional
/// leading sign. A bare `"0"` is also accepted.
#[must_use]
pub fn string_to_duration_hook() -> Hook {
    text_hook("string_to_duration_hook", Kind::Duration, |text, to| {
        parse_duration(text)
            .map(Value::Duration)
            .map_err(|e| HookError::parse(to.shape(), e))
    })
}

/// Accepted timestamp layout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TimeLayout {
    /// `2006-01-02T15:04:05Z07:00` style.
    #[default]
    Rfc3339,
    /// `Mon, 02 Jan 2006 15:04:05 -0700` style.
    Rfc2822,
    /// A `strftime` pattern. Patterns without an offset are read as UTC,
    /// and date-only patterns as midnight UTC.
    Format(String),
}

impl TimeLayout {
    /// Parse `text` according to this layout.
    ///
    /// # Errors
    ///
    /// Returns the [`chrono::ParseError`] for the most specific attempt.
    pub fn parse(&self, text: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
        match self {
            Self::Rfc3339 => DateTime::parse_from_rfc3339(text),
            Self::Rfc2822 => DateTime::parse_from_rfc2822(text),
            Self::Format(format) => DateTime::parse_from_str(text, format).or_else(|err| {
                NaiveDateTime::parse_from_str(text, format)
                    .map(|naive| naive.and_utc().fixed_offset())
                    .or_else(|_| {
                        NaiveDate::parse_from_str(text, format)
                            .map(|date| date.and_time(NaiveTime::MIN).and_utc().fixed_offset())
                    })
                    .map_err(|_| err)
            }),
        }
    }
}

/// Text to a timestamp in `layout`.
#[must_use]
pub fn string_to_time_hook(layout: TimeLayout) -> Hook {
    text_hook("string_to_time_hook", Kind::Time, move |text, to| {
        layout
            .parse(text)
            .map(Value::Time)
            .map_err(|e| HookError::parse(to.shape(), e))
    })
}
