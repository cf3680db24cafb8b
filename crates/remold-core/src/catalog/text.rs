//! Text splitting, booleans, single characters and `FromStr` types.

use super::numeric::{LiteralError, parse_signed, parse_unsigned};
use super::text_hook;
use crate::error::HookError;
use crate::hook::{Hook, Target};
use crate::shape::Shape;
use crate::value::{Kind, Value};

/// Split text on `separator` when the destination is a sequence of text.
///
/// Empty text becomes an empty sequence. An empty separator splits into
/// individual characters. Sequences of any other element shape are left to
/// the decoder.
#[must_use]
pub fn string_to_slice_hook(separator: impl Into<String>) -> Hook {
    let separator = separator.into();
    Hook::from_values(move |from: &Value, to: &Target<'_>| match (from, to.shape()) {
        (Value::Text(text), Shape::Seq(elem)) if **elem == Shape::Text => {
            if text.is_empty() {
                Value::Seq(Vec::new())
            } else if separator.is_empty() {
                Value::seq(text.chars().map(String::from))
            } else {
                Value::seq(text.split(separator.as_str()))
            }
        },
        _ => from.clone(),
    })
    .named("string_to_slice_hook")
}

/// Boolean grammar shared with the weak-typing hook.
pub(crate) fn parse_bool(text: &str) -> Result<bool, LiteralError> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(LiteralError::Syntax),
    }
}

/// Text to `bool`.
#[must_use]
pub fn string_to_bool_hook() -> Hook {
    text_hook("string_to_bool_hook", Kind::Bool, |text, to| {
        parse_bool(text)
            .map(Value::Bool)
            .map_err(|e| HookError::parse(to.shape(), e))
    })
}

/// Text to a single byte, using the unsigned integer grammar.
#[must_use]
pub fn string_to_byte_hook() -> Hook {
    text_hook("string_to_byte_hook", Kind::U8, |text, to| {
        parse_unsigned(text, u8::BITS)
            .and_then(|n| u8::try_from(n).map_err(|_| LiteralError::Range))
            .map(Value::U8)
            .map_err(|e| HookError::parse(to.shape(), e))
    })
}

/// Text to a single code point, written as a 32-bit integer literal.
#[must_use]
pub fn string_to_char_hook() -> Hook {
    text_hook("string_to_char_hook", Kind::Char, |text, to| {
        parse_signed(text, i32::BITS)
            .and_then(|n| u32::try_from(n).map_err(|_| LiteralError::NotScalar))
            .and_then(|n| char::from_u32(n).ok_or(LiteralError::NotScalar))
            .map(Value::Char)
            .map_err(|e| HookError::parse(to.shape(), e))
    })
}

/// Text to any [`Shape::Opaque`] destination through its `FromStr` impl.
///
/// The type's own parse error becomes the failure reason.
#[must_use]
pub fn text_unmarshaller_hook() -> Hook {
    Hook::from_values(|from: &Value, to: &Target<'_>| match (from, to.shape()) {
        (Value::Text(text), Shape::Opaque(ty)) => ty
            .parse(text)
            .map(Value::Opaque)
            .map_err(|reason| HookError::parse(to.shape(), reason)),
        _ => Ok(from.clone()),
    })
    .named("text_unmarshaller_hook")
}
