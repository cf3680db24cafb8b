//! Structural decoder.
//!
//! Walks a [`Value`] into a [`Shape`]. At every level the configured hook
//! runs first; whatever it returns is then assigned generically. A hook
//! error is final for that field, and field errors from sequences, maps and
//! records are collected rather than stopping the pass.

use std::borrow::Cow;

use tracing::{debug, warn};

use crate::error::{AggregateError, DecodeError, DecodeResult, HookError};
use crate::hook::{DEFAULT_MAX_DEPTH, Hook, Reenter, Target, join_path};
use crate::shape::{RecordShape, Shape};
use crate::value::{Kind, Record, Value};

/// Decoder settings, fixed at construction.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Hook run before generic assignment of every value.
    pub hook: Option<Hook>,
    /// Fail when a map carries keys the destination record lacks.
    pub error_unused: bool,
    /// Deepest nesting level that may be decoded.
    pub max_depth: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            hook: None,
            error_unused: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Decodes dynamic values into shapes.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    /// Create a decoder.
    #[must_use]
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Active settings.
    #[must_use]
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode `input` into `shape`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Field`] for a single failure at the root, or
    /// [`DecodeError::Aggregate`] with every field failure of a compound
    /// value.
    pub fn decode(&self, input: &Value, shape: &Shape) -> DecodeResult<Value> {
        self.decode_at("", input, shape, 0)
    }

    fn decode_at(
        &self,
        name: &str,
        input: &Value,
        shape: &Shape,
        depth: usize,
    ) -> DecodeResult<Value> {
        if depth > self.config.max_depth {
            warn!(
                field = name,
                max_depth = self.config.max_depth,
                "decode depth limit reached"
            );
            return Err(DecodeError::field(
                name,
                HookError::DepthExceeded {
                    max: self.config.max_depth,
                },
            ));
        }

        let input = match &self.config.hook {
            Some(hook) => {
                let target = Target::new(shape)
                    .with_name(name)
                    .with_depth(depth)
                    .with_max_depth(self.config.max_depth)
                    .with_reentry(self);
                match hook.call(input, &target) {
                    Ok(value) => Cow::Owned(value),
                    Err(HookError::Decode(inner)) => return Err(*inner),
                    Err(source) => {
                        return Err(DecodeError::Field {
                            name: name.to_owned(),
                            source,
                        });
                    },
                }
            },
            None => Cow::Borrowed(input),
        };

        if !shape.is_compound() && shape.kind() != Kind::Any && input.kind() != shape.kind() {
            debug!(
                field = name,
                from = %input.kind(),
                to = %shape,
                "falling back to generic assignment"
            );
        }
        self.assign(name, &input, shape, depth)
    }

    fn assign(
        &self,
        name: &str,
        input: &Value,
        shape: &Shape,
        depth: usize,
    ) -> DecodeResult<Value> {
        let child = depth.saturating_add(1);
        match (shape, input) {
            (_, Value::Null) => Ok(shape.zero()),
            (Shape::Any, value) => Ok(value.clone()),
            (Shape::Seq(elem), Value::Seq(items)) => self.assign_seq(name, items, elem, child),
            (Shape::Map(elem), Value::Map(entries)) => self.assign_map(
                name,
                entries.iter().map(|(key, value)| (key.as_str(), value)),
                elem,
                child,
            ),
            (Shape::Map(elem), Value::Record(record)) => {
                self.assign_map(name, record.fields(), elem, child)
            },
            (Shape::Record(fields), Value::Map(entries)) => self.assign_record(
                name,
                entries.iter().map(|(key, value)| (key.as_str(), value)).collect(),
                fields,
                child,
            ),
            (Shape::Record(fields), Value::Record(record)) => {
                self.assign_record(name, record.fields().collect(), fields, child)
            },
            (Shape::Opaque(ty), Value::Opaque(value)) if value.value_type_id() == ty.type_id() => {
                Ok(input.clone())
            },
            (shape, value) if !shape.is_compound() && shape.kind() == value.kind() => {
                Ok(value.clone())
            },
            (shape, value) if shape.kind().is_numeric() && value.kind().is_numeric() => {
                convert_number(value, shape.kind()).ok_or_else(|| {
                    DecodeError::field(name, HookError::parse(shape, "value out of range"))
                })
            },
            (shape, value) => Err(DecodeError::field(
                name,
                HookError::unconvertible(shape, &value.shape()),
            )),
        }
    }

    fn assign_seq(
        &self,
        name: &str,
        items: &[Value],
        elem: &Shape,
        depth: usize,
    ) -> DecodeResult<Value> {
        let mut errors = AggregateError::new();
        let mut out = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            match self.decode_at(&format!("{name}[{idx}]"), item, elem, depth) {
                Ok(value) => out.push(value),
                Err(err) => errors.append(err),
            }
        }
        errors.into_result(Value::Seq(out))
    }

    fn assign_map<'v>(
        &self,
        name: &str,
        entries: impl Iterator<Item = (&'v str, &'v Value)>,
        elem: &Shape,
        depth: usize,
    ) -> DecodeResult<Value> {
        let mut errors = AggregateError::new();
        let mut out = std::collections::BTreeMap::new();
        for (key, value) in entries {
            match self.decode_at(&format!("{name}[{key}]"), value, elem, depth) {
                Ok(value) => {
                    out.insert(key.to_owned(), value);
                },
                Err(err) => errors.append(err),
            }
        }
        errors.into_result(Value::Map(out))
    }

    fn assign_record(
        &self,
        name: &str,
        entries: Vec<(&str, &Value)>,
        shape: &RecordShape,
        depth: usize,
    ) -> DecodeResult<Value> {
        let mut errors = AggregateError::new();
        let mut used = vec![false; entries.len()];
        let mut record = Record::new(shape.name());

        for (field, field_shape) in shape.fields() {
            let matched = entries
                .iter()
                .position(|(key, _)| *key == field)
                .or_else(|| {
                    entries
                        .iter()
                        .position(|(key, _)| key.eq_ignore_ascii_case(field))
                });
            let value = match matched.and_then(|idx| Some((idx, entries.get(idx)?.1))) {
                Some((idx, value)) => {
                    if let Some(flag) = used.get_mut(idx) {
                        *flag = true;
                    }
                    self.decode_at(&join_path(name, field), value, field_shape, depth)
                        .unwrap_or_else(|err| {
                            errors.append(err);
                            field_shape.zero()
                        })
                },
                None => field_shape.zero(),
            };
            record.push(field, value);
        }

        if self.config.error_unused {
            let mut keys: Vec<String> = entries
                .iter()
                .zip(&used)
                .filter(|(_, used)| !**used)
                .map(|((key, _), _)| (*key).to_owned())
                .collect();
            if !keys.is_empty() {
                keys.sort();
                errors.append(DecodeError::UnusedKeys {
                    name: name.to_owned(),
                    keys,
                });
            }
        }
        errors.into_result(Value::Record(record))
    }
}

impl Reenter for Decoder {
    fn reenter(
        &self,
        name: &str,
        input: &Value,
        shape: &Shape,
        depth: usize,
    ) -> DecodeResult<Value> {
        self.decode_at(name, input, shape, depth)
    }
}

#[derive(Clone, Copy)]
enum Num {
    Int(i128),
    Float(f64),
}

fn number_of(value: &Value) -> Option<Num> {
    let num = match value {
        Value::I8(n) => Num::Int(i128::from(*n)),
        Value::I16(n) => Num::Int(i128::from(*n)),
        Value::I32(n) => Num::Int(i128::from(*n)),
        Value::I64(n) => Num::Int(i128::from(*n)),
        Value::Isize(n) => Num::Int(i128::try_from(*n).ok()?),
        Value::U8(n) => Num::Int(i128::from(*n)),
        Value::U16(n) => Num::Int(i128::from(*n)),
        Value::U32(n) => Num::Int(i128::from(*n)),
        Value::U64(n) => Num::Int(i128::from(*n)),
        Value::Usize(n) => Num::Int(i128::try_from(*n).ok()?),
        Value::F32(n) => Num::Float(f64::from(*n)),
        Value::F64(n) => Num::Float(*n),
        _ => return None,
    };
    Some(num)
}

/// Integral floats convert to integers; anything else with a fraction does
/// not.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn float_to_int(f: f64) -> Option<i128> {
    // i128 bounds as f64 are exactly -2^127 and 2^127.
    let bound = 2_f64.powi(127);
    (f.is_finite() && f.trunc() == f && f >= -bound && f < bound).then(|| f as i128)
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn convert_number(value: &Value, kind: Kind) -> Option<Value> {
    let num = number_of(value)?;
    let int = || match num {
        Num::Int(n) => Some(n),
        Num::Float(f) => float_to_int(f),
    };
    let float = match num {
        Num::Int(n) => n as f64,
        Num::Float(f) => f,
    };
    let converted = match kind {
        Kind::I8 => Value::I8(i8::try_from(int()?).ok()?),
        Kind::I16 => Value::I16(i16::try_from(int()?).ok()?),
        Kind::I32 => Value::I32(i32::try_from(int()?).ok()?),
        Kind::I64 => Value::I64(i64::try_from(int()?).ok()?),
        Kind::Isize => Value::Isize(isize::try_from(int()?).ok()?),
        Kind::U8 => Value::U8(u8::try_from(int()?).ok()?),
        Kind::U16 => Value::U16(u16::try_from(int()?).ok()?),
        Kind::U32 => Value::U32(u32::try_from(int()?).ok()?),
        Kind::U64 => Value::U64(u64::try_from(int()?).ok()?),
        Kind::Usize => Value::Usize(usize::try_from(int()?).ok()?),
        Kind::F32 => Value::F32(float as f32),
        Kind::F64 => Value::F64(float),
        _ => return None,
    };
    Some(converted)
}
