//! Behavior of the built-in hooks through the public API.

use std::net::{IpAddr, Ipv4Addr};

use chrono::{DateTime, TimeDelta};
use remold_core::catalog::*;
use remold_core::{Complex, Hook, Shape, Value, decode_hook_exec};

fn integer_hooks() -> Vec<(Hook, Shape, Value)> {
    vec![
        (string_to_i8_hook(), Shape::I8, Value::I8(42)),
        (string_to_i16_hook(), Shape::I16, Value::I16(42)),
        (string_to_i32_hook(), Shape::I32, Value::I32(42)),
        (string_to_i64_hook(), Shape::I64, Value::I64(42)),
        (string_to_isize_hook(), Shape::Isize, Value::Isize(42)),
        (string_to_u8_hook(), Shape::U8, Value::U8(42)),
        (string_to_u16_hook(), Shape::U16, Value::U16(42)),
        (string_to_u32_hook(), Shape::U32, Value::U32(42)),
        (string_to_u64_hook(), Shape::U64, Value::U64(42)),
        (string_to_usize_hook(), Shape::Usize, Value::Usize(42)),
    ]
}

#[test]
fn test_integer_literal_forms() {
    for (hook, shape, expected) in integer_hooks() {
        for text in ["42", "0b101010", "052", "0o52", "0x2a", "0X2A"] {
            let out = decode_hook_exec(&hook, &Value::from(text), &shape).unwrap();
            assert_eq!(out, expected, "{} <- {text}", hook.name());
        }
        for text in ["42.42", "0.0", "", "0x", "forty-two"] {
            assert!(
                decode_hook_exec(&hook, &Value::from(text), &shape).is_err(),
                "{} accepted {text:?}",
                hook.name()
            );
        }
    }
}

#[test]
fn test_unsigned_rejects_negative() {
    for (hook, shape, expected) in integer_hooks() {
        let result = decode_hook_exec(&hook, &Value::from("-42"), &shape);
        if expected.kind().is_unsigned() {
            assert!(result.is_err(), "{} accepted -42", hook.name());
        } else {
            assert!(result.is_ok(), "{} rejected -42", hook.name());
        }
    }
}

#[test]
fn test_width_overflow() {
    let cases = [
        (string_to_i8_hook(), Shape::I8, "128"),
        (string_to_u8_hook(), Shape::U8, "256"),
        (string_to_i16_hook(), Shape::I16, "-32769"),
        (string_to_u32_hook(), Shape::U32, "0x1_0000_0000"),
        (string_to_u64_hook(), Shape::U64, "18446744073709551616"),
    ];
    for (hook, shape, text) in cases {
        let err = decode_hook_exec(&hook, &Value::from(text), &shape).unwrap_err();
        assert!(err.to_string().contains("out of range"), "{err}");
    }
}

#[test]
fn test_floats() {
    let f32_hook = string_to_f32_hook();
    let f64_hook = string_to_f64_hook();
    assert_eq!(
        decode_hook_exec(&f32_hook, &Value::from("42.42"), &Shape::F32).unwrap(),
        Value::F32(42.42)
    );
    assert_eq!(
        decode_hook_exec(&f64_hook, &Value::from("-1e3"), &Shape::F64).unwrap(),
        Value::F64(-1000.0)
    );
    assert_eq!(
        decode_hook_exec(&f32_hook, &Value::from("1e40"), &Shape::F32).unwrap(),
        Value::F32(f32::INFINITY)
    );
    let Value::F64(nan) = decode_hook_exec(&f64_hook, &Value::from("NaN"), &Shape::F64).unwrap()
    else {
        panic!("expected float");
    };
    assert!(nan.is_nan());
    assert!(decode_hook_exec(&f64_hook, &Value::from("4.2.1"), &Shape::F64).is_err());
}

#[test]
fn test_complex() {
    let hook = string_to_complex128_hook();
    let cases = [
        ("42.42+42.42i", Complex::new(42.42, 42.42)),
        ("1e3i", Complex::new(0.0, 1000.0)),
        ("1e-3i", Complex::new(0.0, 0.001)),
        ("-5", Complex::new(-5.0, 0.0)),
        ("(3-4i)", Complex::new(3.0, -4.0)),
        ("1+-2i", Complex::new(1.0, -2.0)),
    ];
    for (text, expected) in cases {
        assert_eq!(
            decode_hook_exec(&hook, &Value::from(text), &Shape::Complex128).unwrap(),
            Value::Complex128(expected),
            "{text}"
        );
    }
    let small = string_to_complex64_hook();
    assert_eq!(
        decode_hook_exec(&small, &Value::from("1+2i"), &Shape::Complex64).unwrap(),
        Value::Complex64(Complex::new(1.0, 2.0))
    );
}

#[test]
fn test_duration_and_time() {
    let duration = decode_hook_exec(
        &string_to_duration_hook(),
        &Value::from("1h30m"),
        &Shape::Duration,
    )
    .unwrap();
    assert_eq!(duration, Value::Duration(TimeDelta::minutes(90)));

    let time = decode_hook_exec(
        &string_to_time_hook(TimeLayout::Rfc3339),
        &Value::from("2006-01-02T15:04:05Z"),
        &Shape::Time,
    )
    .unwrap();
    let expected = DateTime::parse_from_rfc3339("2006-01-02T15:04:05Z").unwrap();
    assert_eq!(time, Value::Time(expected));

    let rfc2822 = decode_hook_exec(
        &string_to_time_hook(TimeLayout::Rfc2822),
        &Value::from("Mon, 02 Jan 2006 15:04:05 -0700"),
        &Shape::Time,
    );
    assert!(rfc2822.is_ok());
}

#[test]
fn test_network_hooks() {
    let ip = decode_hook_exec(&string_to_ip_hook(), &Value::from("::1"), &Shape::Ip).unwrap();
    assert_eq!(ip, Value::Ip("::1".parse().unwrap()));

    let Value::Prefix(prefix) = decode_hook_exec(
        &string_to_prefix_hook(),
        &Value::from("192.0.2.1/24"),
        &Shape::Prefix,
    )
    .unwrap() else {
        panic!("expected prefix");
    };
    assert_eq!(prefix.addr(), IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)));

    let v6 = decode_hook_exec(
        &string_to_prefix_hook(),
        &Value::from("fd7a:115c::626b:430b/118"),
        &Shape::Prefix,
    );
    assert!(v6.is_ok());
}

/// Every catalog hook paired with its destination shape.
fn catalog() -> Vec<(Hook, Shape)> {
    let mut hooks: Vec<(Hook, Shape)> = integer_hooks()
        .into_iter()
        .map(|(hook, shape, _)| (hook, shape))
        .collect();
    hooks.extend([
        (string_to_f32_hook(), Shape::F32),
        (string_to_f64_hook(), Shape::F64),
        (string_to_complex64_hook(), Shape::Complex64),
        (string_to_complex128_hook(), Shape::Complex128),
        (string_to_bool_hook(), Shape::Bool),
        (string_to_byte_hook(), Shape::U8),
        (string_to_char_hook(), Shape::Char),
        (string_to_duration_hook(), Shape::Duration),
        (string_to_time_hook(TimeLayout::Rfc3339), Shape::Time),
        (string_to_url_hook(), Shape::Url),
        (string_to_ip_hook(), Shape::Ip),
        (string_to_ip_net_hook(), Shape::IpNet),
        (string_to_net_addr_hook(), Shape::Addr),
        (string_to_addr_port_hook(), Shape::AddrPort),
        (string_to_prefix_hook(), Shape::Prefix),
        (text_unmarshaller_hook(), Shape::text_type::<u128>()),
        (string_to_basic_type_hook(), Shape::I64),
    ]);
    hooks
}

#[test]
fn test_identity_law() {
    let mut hooks = catalog();
    hooks.extend([
        (string_to_slice_hook(","), Shape::seq(Shape::Text)),
        (weakly_typed_hook(), Shape::Text),
        (weakly_typed_hook(), Shape::U32),
        (recursive_struct_to_map_hook(), Shape::Any),
        (recursive_struct_to_map_hook(), Shape::map(Shape::Any)),
    ]);
    for (hook, shape) in hooks {
        let zero = shape.zero();
        assert_eq!(
            decode_hook_exec(&hook, &zero, &shape).unwrap(),
            zero,
            "{} on {shape}",
            hook.name()
        );
    }
}

#[test]
fn test_errors_do_not_echo_input() {
    let input = "zq#bogus/value@9";
    for (hook, shape) in catalog() {
        let err = decode_hook_exec(&hook, &Value::from(input), &shape)
            .expect_err(&format!("{} accepted garbage", hook.name()));
        let message = err.to_string();
        assert!(
            !message.contains(input),
            "{} leaked input: {message}",
            hook.name()
        );
        assert!(message.contains(&shape.to_string()), "{message}");
    }
}

#[test]
fn test_non_text_sources_pass_through() {
    let value = Value::U8(9);
    for (hook, shape) in catalog() {
        assert_eq!(
            decode_hook_exec(&hook, &value, &shape).unwrap(),
            value,
            "{}",
            hook.name()
        );
    }
}
