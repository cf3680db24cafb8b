//! Numeric literal hooks.
//!
//! Integers accept decimal, `0b`/`0B`, `0o`/`0O`, legacy leading-zero octal
//! and `0x`/`0X` forms with `_` between digits. The width of the destination
//! is enforced after parsing.

use thiserror::Error;

use super::text_hook;
use crate::error::HookError;
use crate::hook::Hook;
use crate::value::{Complex, Kind, Value};

/// Why a literal was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub(crate) enum LiteralError {
    #[error("invalid syntax")]
    Syntax,
    #[error("value out of range")]
    Range,
    #[error("not a Unicode scalar value")]
    NotScalar,
}

/// Split off a base prefix. The flag reports whether a prefix was present,
/// which lets an underscore follow it directly.
fn split_radix(body: &str) -> (u32, &str, bool) {
    let prefixed = [
        ("0b", 2),
        ("0B", 2),
        ("0o", 8),
        ("0O", 8),
        ("0x", 16),
        ("0X", 16),
    ]
    .into_iter()
    .find_map(|(prefix, radix)| body.strip_prefix(prefix).map(|rest| (radix, rest)));
    if let Some((radix, rest)) = prefixed {
        return (radix, rest, true);
    }
    match body.strip_prefix('0') {
        Some(rest) if !rest.is_empty() => (8, rest, true),
        _ => (10, body, false),
    }
}

/// Underscores may only sit between digits, or right after a base prefix.
fn underscores_ok(digits: &str, prefixed: bool) -> bool {
    let mut after_digit = prefixed;
    let mut last_underscore = false;
    for c in digits.chars() {
        if c == '_' {
            if !after_digit {
                return false;
            }
            after_digit = false;
            last_underscore = true;
        } else {
            after_digit = true;
            last_underscore = false;
        }
    }
    !last_underscore
}

fn parse_magnitude(text: &str) -> Result<u64, LiteralError> {
    let (radix, digits, prefixed) = split_radix(text);
    if digits.contains('_') && !underscores_ok(digits, prefixed) {
        return Err(LiteralError::Syntax);
    }
    let cleaned: String = digits.chars().filter(|&c| c != '_').collect();
    if cleaned.is_empty() || cleaned.starts_with(['+', '-']) {
        return Err(LiteralError::Syntax);
    }
    u64::from_str_radix(&cleaned, radix).map_err(|e| match e.kind() {
        std::num::IntErrorKind::PosOverflow => LiteralError::Range,
        _ => LiteralError::Syntax,
    })
}

/// Parse an unsigned literal that must fit in `bits` bits.
pub(crate) fn parse_unsigned(text: &str, bits: u32) -> Result<u64, LiteralError> {
    if text.starts_with(['+', '-']) {
        return Err(LiteralError::Syntax);
    }
    let magnitude = parse_magnitude(text)?;
    let max = u64::MAX
        .checked_shr(64_u32.saturating_sub(bits))
        .unwrap_or(u64::MAX);
    if magnitude > max {
        return Err(LiteralError::Range);
    }
    Ok(magnitude)
}

/// Parse a signed literal that must fit in `bits` bits.
pub(crate) fn parse_signed(text: &str, bits: u32) -> Result<i64, LiteralError> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let magnitude = parse_magnitude(rest)?;
    // 2^(bits-1): largest negative magnitude, one past the largest positive.
    let bound = 1_u64
        .checked_shl(bits.saturating_sub(1))
        .ok_or(LiteralError::Range)?;
    if negative {
        if magnitude > bound {
            return Err(LiteralError::Range);
        }
        0_i64
            .checked_sub_unsigned(magnitude)
            .ok_or(LiteralError::Range)
    } else {
        if magnitude >= bound {
            return Err(LiteralError::Range);
        }
        i64::try_from(magnitude).map_err(|_| LiteralError::Range)
    }
}

macro_rules! signed_hooks {
    ($($(#[$doc:meta])* $fn_name:ident => $ty:ty, $kind:ident;)*) => {
        $(
            $(#[$doc])*
            #[must_use]
            #[allow(clippy::useless_conversion)]
            pub fn $fn_name() -> Hook {
                text_hook(stringify!($fn_name), Kind::$kind, |text, to| {
                    parse_signed(text, <$ty>::BITS)
                        .and_then(|n| <$ty>::try_from(n).map_err(|_| LiteralError::Range))
                        .map(Value::$kind)
                        .map_err(|e| HookError::parse(to.shape(), e))
                })
            }
        )*
    };
}

macro_rules! unsigned_hooks {
    ($($(#[$doc:meta])* $fn_name:ident => $ty:ty, $kind:ident;)*) => {
        $(
            $(#[$doc])*
            #[must_use]
            #[allow(clippy::useless_conversion)]
            pub fn $fn_name() -> Hook {
                text_hook(stringify!($fn_name), Kind::$kind, |text, to| {
                    parse_unsigned(text, <$ty>::BITS)
                        .and_then(|n| <$ty>::try_from(n).map_err(|_| LiteralError::Range))
                        .map(Value::$kind)
                        .map_err(|e| HookError::parse(to.shape(), e))
                })
            }
        )*
    };
}

signed_hooks! {
    /// Text to `i8`.
    string_to_i8_hook => i8, I8;
    /// Text to `i16`.
    string_to_i16_hook => i16, I16;
    /// Text to `i32`.
    string_to_i32_hook => i32, I32;
    /// Text to `i64`.
    string_to_i64_hook => i64, I64;
    /// Text to `isize`.
    string_to_isize_hook => isize, Isize;
}

unsigned_hooks! {
    /// Text to `u8`. A leading sign is rejected.
    string_to_u8_hook => u8, U8;
    /// Text to `u16`. A leading sign is rejected.
    string_to_u16_hook => u16, U16;
    /// Text to `u32`. A leading sign is rejected.
    string_to_u32_hook => u32, U32;
    /// Text to `u64`. A leading sign is rejected.
    string_to_u64_hook => u64, U64;
    /// Text to `usize`. A leading sign is rejected.
    string_to_usize_hook => usize, Usize;
}

/// Text to `f32`. Values too large for the type become infinite.
#[must_use]
pub fn string_to_f32_hook() -> Hook {
    text_hook("string_to_f32_hook", Kind::F32, |text, to| {
        text.parse::<f32>()
            .map(Value::F32)
            .map_err(|_| HookError::parse(to.shape(), LiteralError::Syntax))
    })
}

/// Text to `f64`. Values too large for the type become infinite.
#[must_use]
pub fn string_to_f64_hook() -> Hook {
    text_hook("string_to_f64_hook", Kind::F64, |text, to| {
        text.parse::<f64>()
            .map(Value::F64)
            .map_err(|_| HookError::parse(to.shape(), LiteralError::Syntax))
    })
}

/// Parse `a`, `bi`, `a+bi` or `a-bi`, optionally wrapped in parentheses.
fn parse_complex<T>(text: &str) -> Result<Complex<T>, LiteralError>
where
    T: std::str::FromStr + Default,
{
    let text = text
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(text);
    let part = |s: &str| s.parse::<T>().map_err(|_| LiteralError::Syntax);

    let Some(body) = text.strip_suffix('i') else {
        return Ok(Complex::new(part(text)?, T::default()));
    };
    // The real part ends at the first sign that is neither leading nor an
    // exponent sign.
    let split = body.char_indices().skip(1).find(|&(idx, c)| {
        (c == '+' || c == '-')
            && !body
                .get(..idx)
                .is_some_and(|head| head.ends_with(['e', 'E']))
    });
    match split {
        Some((idx, _)) => {
            let (re, im) = body.split_at(idx);
            // A `+` separator may be followed by the imaginary part's own sign.
            let im = match im.strip_prefix('+') {
                Some(rest) if rest.starts_with(['+', '-']) => rest,
                _ => im,
            };
            Ok(Complex::new(part(re)?, part(im)?))
        },
        None => Ok(Complex::new(T::default(), part(body)?)),
    }
}

/// Text to a complex number with 32-bit parts.
#[must_use]
pub fn string_to_complex64_hook() -> Hook {
    text_hook("string_to_complex64_hook", Kind::Complex64, |text, to| {
        parse_complex::<f32>(text)
            .map(Value::Complex64)
            .map_err(|e| HookError::parse(to.shape(), e))
    })
}

/// Text to a complex number with 64-bit parts.
#[must_use]
pub fn string_to_complex128_hook() -> Hook {
    text_hook("string_to_complex128_hook", Kind::Complex128, |text, to| {
        parse_complex::<f64>(text)
            .map(Value::Complex128)
            .map_err(|e| HookError::parse(to.shape(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_bases() {
        for text in ["42", "0b101010", "0B101010", "052", "0o52", "0O52", "0x2a", "0X2A"] {
            assert_eq!(parse_signed(text, 64), Ok(42), "{text}");
            assert_eq!(parse_unsigned(text, 8), Ok(42), "{text}");
        }
    }

    #[test]
    fn test_underscores() {
        assert_eq!(parse_signed("1_000", 32), Ok(1000));
        assert_eq!(parse_signed("0x_2a", 32), Ok(42));
        assert_eq!(parse_signed("0_52", 32), Ok(42));
        assert_eq!(parse_signed("_1", 32), Err(LiteralError::Syntax));
        assert_eq!(parse_signed("1_", 32), Err(LiteralError::Syntax));
        assert_eq!(parse_signed("1__0", 32), Err(LiteralError::Syntax));
    }

    #[test]
    fn test_signed_bounds() {
        assert_eq!(parse_signed("127", 8), Ok(127));
        assert_eq!(parse_signed("-128", 8), Ok(-128));
        assert_eq!(parse_signed("128", 8), Err(LiteralError::Range));
        assert_eq!(parse_signed("-129", 8), Err(LiteralError::Range));
        assert_eq!(parse_signed("-9223372036854775808", 64), Ok(i64::MIN));
        assert_eq!(parse_signed("+7", 8), Ok(7));
    }

    #[test]
    fn test_unsigned_rejects_sign() {
        assert_eq!(parse_unsigned("-42", 64), Err(LiteralError::Syntax));
        assert_eq!(parse_unsigned("+42", 64), Err(LiteralError::Syntax));
        assert_eq!(parse_unsigned("256", 8), Err(LiteralError::Range));
        assert_eq!(parse_unsigned("18446744073709551615", 64), Ok(u64::MAX));
    }

    #[test]
    fn test_malformed_integers() {
        for text in ["", "0x", "42.42", "0.0", "--1", "0b2", "1e3", " 1"] {
            assert_eq!(parse_signed(text, 64), Err(LiteralError::Syntax), "{text:?}");
        }
        assert_eq!(parse_signed("-+1", 64), Err(LiteralError::Syntax));
    }

    #[test]
    fn test_complex_forms() {
        assert_eq!(parse_complex::<f64>("42"), Ok(Complex::new(42.0, 0.0)));
        assert_eq!(parse_complex::<f64>("42i"), Ok(Complex::new(0.0, 42.0)));
        assert_eq!(
            parse_complex::<f64>("42.42+42.42i"),
            Ok(Complex::new(42.42, 42.42))
        );
        assert_eq!(parse_complex::<f64>("(1-2i)"), Ok(Complex::new(1.0, -2.0)));
        assert_eq!(parse_complex::<f64>("1e3i"), Ok(Complex::new(0.0, 1000.0)));
        assert_eq!(parse_complex::<f64>("1e-3i"), Ok(Complex::new(0.0, 0.001)));
        assert_eq!(
            parse_complex::<f64>("1e+3+2e-1i"),
            Ok(Complex::new(1000.0, 0.2))
        );
        assert_eq!(parse_complex::<f64>("1+-2i"), Ok(Complex::new(1.0, -2.0)));
        assert_eq!(parse_complex::<f64>("-1+-2.5i"), Ok(Complex::new(-1.0, -2.5)));
        assert_eq!(parse_complex::<f64>("1++2i"), Ok(Complex::new(1.0, 2.0)));
        assert!(parse_complex::<f64>("1-+2i").is_err());
        assert!(parse_complex::<f64>("1+2+3i").is_err());
        assert!(parse_complex::<f64>("1+i").is_err());
        assert!(parse_complex::<f64>("i").is_err());
        assert!(parse_complex::<f64>("abc").is_err());
    }
}
