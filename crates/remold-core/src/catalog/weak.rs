//! Permissive cross-category coercion.
//!
//! Only enabled by explicit configuration. Unlike the catalog's text hooks
//! its errors may include the offending value.

use super::string_to_basic_type_hook;
use super::text::parse_bool;
use crate::error::{HookError, HookResult};
use crate::hook::{Hook, Target};
use crate::value::{Kind, Value};

/// Coerce between categories whenever source and destination differ.
///
/// - `bool` to text as `"1"`/`"0"`, and to numbers as 1/0
/// - numbers and chars to their decimal or literal text
/// - bytes to text, replacing invalid UTF-8
/// - text to `bool` (empty is `false`), bytes, or any number; empty text
///   becomes zero
/// - numbers to `bool` (non-zero is `true`)
#[must_use]
pub fn weakly_typed_hook() -> Hook {
    let scalars = string_to_basic_type_hook();
    Hook::from_values(move |from: &Value, to: &Target<'_>| weak_convert(&scalars, from, to))
        .named("weakly_typed_hook")
}

fn weak_convert(scalars: &Hook, from: &Value, to: &Target<'_>) -> HookResult<Value> {
    let target = to.kind();
    if from.kind() == target || target == Kind::Any {
        return Ok(from.clone());
    }
    let converted = match (from, target) {
        (Value::Bool(b), Kind::Text) => Value::Text(if *b { "1" } else { "0" }.to_owned()),
        (Value::Bool(b), kind) if kind.is_numeric() => bool_number(*b, kind),
        (Value::Char(c), Kind::Text) => Value::Text(c.to_string()),
        (Value::Bytes(bytes), Kind::Text) => {
            Value::Text(String::from_utf8_lossy(bytes).into_owned())
        },
        (number, Kind::Text) if number.kind().is_numeric() => {
            Value::Text(number_text(number).unwrap_or_default())
        },
        (number, Kind::Bool) if number.kind().is_numeric() => {
            Value::Bool(number_text(number).is_some_and(|t| t != "0" && t != "-0"))
        },
        (Value::Text(text), Kind::Bool) if text.is_empty() => Value::Bool(false),
        (Value::Text(text), Kind::Bool) => Value::Bool(parse_bool(text).map_err(|_| {
            HookError::parse(to.shape(), format!("cannot parse '{text}' as bool"))
        })?),
        (Value::Text(text), Kind::Bytes) => Value::Bytes(text.as_bytes().to_vec()),
        (Value::Text(text), kind) if kind.is_numeric() && text.is_empty() => to.zero(),
        (Value::Text(_), kind) if kind.is_numeric() => scalars.call(from, to)?,
        _ => from.clone(),
    };
    Ok(converted)
}

fn number_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::I8(n) => n.to_string(),
        Value::I16(n) => n.to_string(),
        Value::I32(n) => n.to_string(),
        Value::I64(n) => n.to_string(),
        Value::Isize(n) => n.to_string(),
        Value::U8(n) => n.to_string(),
        Value::U16(n) => n.to_string(),
        Value::U32(n) => n.to_string(),
        Value::U64(n) => n.to_string(),
        Value::Usize(n) => n.to_string(),
        Value::F32(n) => n.to_string(),
        Value::F64(n) => n.to_string(),
        _ => return None,
    };
    Some(text)
}

fn bool_number(b: bool, kind: Kind) -> Value {
    match kind {
        Kind::I8 => Value::I8(i8::from(b)),
        Kind::I16 => Value::I16(i16::from(b)),
        Kind::I32 => Value::I32(i32::from(b)),
        Kind::I64 => Value::I64(i64::from(b)),
        Kind::Isize => Value::Isize(isize::from(b)),
        Kind::U8 => Value::U8(u8::from(b)),
        Kind::U16 => Value::U16(u16::from(b)),
        Kind::U32 => Value::U32(u32::from(b)),
        Kind::U64 => Value::U64(u64::from(b)),
        Kind::Usize => Value::Usize(usize::from(b)),
        Kind::F32 => Value::F32(f32::from(u8::from(b))),
        _ => Value::F64(f64::from(u8::from(b))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::decode_hook_exec;
    use crate::shape::Shape;

    fn weak(value: Value, shape: &Shape) -> HookResult<Value> {
        decode_hook_exec(&weakly_typed_hook(), &value, shape)
    }

    #[test]
    fn test_to_text() {
        let cases = [
            (Value::Bool(true), "1"),
            (Value::Bool(false), "0"),
            (Value::F32(7.0), "7"),
            (Value::I64(7), "7"),
            (Value::U32(7), "7"),
            (Value::Bytes(b"7".to_vec()), "7"),
            (Value::Char('7'), "7"),
        ];
        for (value, expected) in cases {
            assert_eq!(weak(value, &Shape::Text).unwrap(), Value::from(expected));
        }
    }

    #[test]
    fn test_text_to_bool() {
        assert_eq!(weak(Value::from(""), &Shape::Bool).unwrap(), Value::Bool(false));
        assert_eq!(weak(Value::from("T"), &Shape::Bool).unwrap(), Value::Bool(true));
        let err = weak(Value::from("maybe"), &Shape::Bool).unwrap_err();
        assert!(err.to_string().contains("maybe"));
    }

    #[test]
    fn test_numbers_and_bools() {
        assert_eq!(weak(Value::Bool(true), &Shape::U16).unwrap(), Value::U16(1));
        assert_eq!(weak(Value::Bool(true), &Shape::F64).unwrap(), Value::F64(1.0));
        assert_eq!(weak(Value::I32(0), &Shape::Bool).unwrap(), Value::Bool(false));
        assert_eq!(weak(Value::F64(0.5), &Shape::Bool).unwrap(), Value::Bool(true));
        assert_eq!(weak(Value::from("0x10"), &Shape::I32).unwrap(), Value::I32(16));
        assert_eq!(weak(Value::from(""), &Shape::U8).unwrap(), Value::U8(0));
    }

    #[test]
    fn test_same_kind_untouched() {
        assert_eq!(weak(Value::from("x"), &Shape::Text).unwrap(), Value::from("x"));
        let seq = Value::seq([1_i32, 2]);
        assert_eq!(weak(seq.clone(), &Shape::seq(Shape::I32)).unwrap(), seq);
    }
}
