//! Dynamic source values.
//!
//! [`Value`] is a closed set of categories. Hooks match on it exhaustively
//! instead of asking a runtime for type information, and the decoder walks
//! it when assigning into a [`Shape`](crate::Shape).

use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, TimeDelta};
use url::Url;

use crate::net::{IpNet, IpPrefix};
use crate::shape::{RecordShape, Shape};

/// Category tag of a [`Value`] or [`Shape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Absent value.
    Null,
    /// Boolean.
    Bool,
    /// 8-bit signed integer.
    I8,
    /// 16-bit signed integer.
    I16,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// Platform-width signed integer.
    Isize,
    /// 8-bit unsigned integer (also used for single bytes).
    U8,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit unsigned integer.
    U32,
    /// 64-bit unsigned integer.
    U64,
    /// Platform-width unsigned integer.
    Usize,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
    /// Complex number with 32-bit parts.
    Complex64,
    /// Complex number with 64-bit parts.
    Complex128,
    /// Single Unicode scalar value.
    Char,
    /// UTF-8 text.
    Text,
    /// Raw byte sequence.
    Bytes,
    /// Signed span of time.
    Duration,
    /// Point in time with a fixed UTC offset.
    Time,
    /// Absolute URL.
    Url,
    /// IP address.
    Ip,
    /// IP network in CIDR form, host bits cleared.
    IpNet,
    /// Network address.
    Addr,
    /// Address with port.
    AddrPort,
    /// Address with prefix length, host bits kept.
    Prefix,
    /// Ordered sequence.
    Seq,
    /// String-keyed mapping.
    Map,
    /// Named structured record.
    Record,
    /// Value produced by a text-capable type.
    Opaque,
    /// Untyped placeholder; accepts anything.
    Any,
}

impl Kind {
    /// Whether this kind is a signed or unsigned integer.
    #[must_use]
    pub fn is_integer(self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    /// Whether this kind is a signed integer.
    #[must_use]
    pub fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::Isize)
    }

    /// Whether this kind is an unsigned integer.
    #[must_use]
    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            Self::U8 | Self::U16 | Self::U32 | Self::U64 | Self::Usize
        )
    }

    /// Whether this kind is a float.
    #[must_use]
    pub fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Whether this kind is any integer or float.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
            Self::Char => "char",
            Self::Text => "text",
            Self::Bytes => "bytes",
            Self::Duration => "duration",
            Self::Time => "time",
            Self::Url => "url",
            Self::Ip => "ip",
            Self::IpNet => "ip_net",
            Self::Addr => "addr",
            Self::AddrPort => "addr_port",
            Self::Prefix => "prefix",
            Self::Seq => "seq",
            Self::Map => "map",
            Self::Record => "record",
            Self::Opaque => "opaque",
            Self::Any => "any",
        };
        f.write_str(name)
    }
}

/// Complex number with real and imaginary parts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex<T> {
    /// Real part.
    pub re: T,
    /// Imaginary part.
    pub im: T,
}

impl<T> Complex<T> {
    /// Build a complex number from its parts.
    pub const fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
}

/// Named record with ordered fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    name: String,
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    /// Append a field in place.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Record type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a field by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Iterate fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Type-erased value produced by a text-capable type.
///
/// Equality compares the wrapped values when both sides hold the same type.
#[derive(Clone)]
pub struct Opaque {
    type_name: &'static str,
    type_id: TypeId,
    inner: Arc<dyn Any + Send + Sync>,
    eq: fn(&dyn Any, &dyn Any) -> bool,
    debug: fn(&dyn Any, &mut fmt::Formatter<'_>) -> fmt::Result,
}

impl Opaque {
    /// Wrap a concrete value.
    pub fn new<T>(value: T) -> Self
    where
        T: PartialEq + fmt::Debug + Send + Sync + 'static,
    {
        Self {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
            inner: Arc::new(value),
            eq: opaque_eq::<T>,
            debug: opaque_debug::<T>,
        }
    }

    /// Rust type name of the wrapped value.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// [`TypeId`] of the wrapped value.
    #[must_use]
    pub fn value_type_id(&self) -> TypeId {
        self.type_id
    }

    /// Borrow the wrapped value if it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

fn opaque_eq<T: PartialEq + 'static>(a: &dyn Any, b: &dyn Any) -> bool {
    match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn opaque_debug<T: fmt::Debug + 'static>(
    value: &dyn Any,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    match value.downcast_ref::<T>() {
        Some(value) => fmt::Debug::fmt(value, f),
        None => f.write_str("<opaque>"),
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && (self.eq)(&*self.inner, &*other.inner)
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque<{}>(", self.type_name)?;
        (self.debug)(&*self.inner, f)?;
        f.write_str(")")
    }
}

/// Dynamically-typed source value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value; decodes to the destination's zero value.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// 8-bit signed integer.
    I8(i8),
    /// 16-bit signed integer.
    I16(i16),
    /// 32-bit signed integer.
    I32(i32),
    /// 64-bit signed integer.
    I64(i64),
    /// Platform-width signed integer.
    Isize(isize),
    /// 8-bit unsigned integer.
    U8(u8),
    /// 16-bit unsigned integer.
    U16(u16),
    /// 32-bit unsigned integer.
    U32(u32),
    /// 64-bit unsigned integer.
    U64(u64),
    /// Platform-width unsigned integer.
    Usize(usize),
    /// 32-bit float.
    F32(f32),
    /// 64-bit float.
    F64(f64),
    /// Complex number with 32-bit parts.
    Complex64(Complex<f32>),
    /// Complex number with 64-bit parts.
    Complex128(Complex<f64>),
    /// Single Unicode scalar value.
    Char(char),
    /// UTF-8 text.
    Text(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Signed span of time.
    Duration(TimeDelta),
    /// Point in time.
    Time(DateTime<FixedOffset>),
    /// Absolute URL.
    Url(Url),
    /// IP address.
    Ip(IpAddr),
    /// IP network (CIDR) with host bits cleared.
    IpNet(IpNet),
    /// Network address.
    Addr(IpAddr),
    /// Address with port.
    AddrPort(SocketAddr),
    /// Address with prefix length.
    Prefix(IpPrefix),
    /// Ordered sequence.
    Seq(Vec<Value>),
    /// String-keyed mapping.
    Map(BTreeMap<String, Value>),
    /// Structured record.
    Record(Record),
    /// Value produced by a text-capable type.
    Opaque(Opaque),
}

impl Value {
    /// Category tag used for hook dispatch.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Null => Kind::Null,
            Self::Bool(_) => Kind::Bool,
            Self::I8(_) => Kind::I8,
            Self::I16(_) => Kind::I16,
            Self::I32(_) => Kind::I32,
            Self::I64(_) => Kind::I64,
            Self::Isize(_) => Kind::Isize,
            Self::U8(_) => Kind::U8,
            Self::U16(_) => Kind::U16,
            Self::U32(_) => Kind::U32,
            Self::U64(_) => Kind::U64,
            Self::Usize(_) => Kind::Usize,
            Self::F32(_) => Kind::F32,
            Self::F64(_) => Kind::F64,
            Self::Complex64(_) => Kind::Complex64,
            Self::Complex128(_) => Kind::Complex128,
            Self::Char(_) => Kind::Char,
            Self::Text(_) => Kind::Text,
            Self::Bytes(_) => Kind::Bytes,
            Self::Duration(_) => Kind::Duration,
            Self::Time(_) => Kind::Time,
            Self::Url(_) => Kind::Url,
            Self::Ip(_) => Kind::Ip,
            Self::IpNet(_) => Kind::IpNet,
            Self::Addr(_) => Kind::Addr,
            Self::AddrPort(_) => Kind::AddrPort,
            Self::Prefix(_) => Kind::Prefix,
            Self::Seq(_) => Kind::Seq,
            Self::Map(_) => Kind::Map,
            Self::Record(_) => Kind::Record,
            Self::Opaque(_) => Kind::Opaque,
        }
    }

    /// Full type inferred from the value.
    ///
    /// Sequences take their element shape from the first element, maps are
    /// `map<any>`, and opaque values report [`Shape::Any`] since the parse
    /// capability that produced them is not retained.
    #[must_use]
    pub fn shape(&self) -> Shape {
        match self {
            Self::Null | Self::Opaque(_) => Shape::Any,
            Self::Seq(items) => Shape::seq(items.first().map_or(Shape::Any, Self::shape)),
            Self::Map(_) => Shape::map(Shape::Any),
            Self::Record(record) => {
                let shape = record
                    .fields()
                    .fold(RecordShape::new(record.name()), |shape, (name, value)| {
                        shape.field(name, value.shape())
                    });
                Shape::Record(shape)
            },
            scalar => Shape::scalar(scalar.kind()).unwrap_or(Shape::Any),
        }
    }

    /// Borrow the text payload, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Build a sequence.
    pub fn seq<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Seq(items.into_iter().map(Into::into).collect())
    }

    /// Build a mapping.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    char => Char,
    String => Text,
    Vec<u8> => Bytes,
    TimeDelta => Duration,
    DateTime<FixedOffset> => Time,
    Url => Url,
    SocketAddr => AddrPort,
    IpNet => IpNet,
    IpPrefix => Prefix,
    Vec<Value> => Seq,
    BTreeMap<String, Value> => Map,
    Record => Record,
    Opaque => Opaque,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(Value::from("x").kind(), Kind::Text);
        assert_eq!(Value::from(7_u16).kind(), Kind::U16);
        assert_eq!(Value::Null.kind(), Kind::Null);
        assert_eq!(Value::seq(["a"]).kind(), Kind::Seq);
    }

    #[test]
    fn test_record_shape_inferred() {
        let record = Record::new("Server")
            .with_field("host", "localhost")
            .with_field("port", 8080_u16);
        let shape = Value::Record(record).shape();
        let Shape::Record(record_shape) = shape else {
            panic!("expected record shape");
        };
        assert_eq!(record_shape.name(), "Server");
        assert_eq!(record_shape.get("port"), Some(&Shape::U16));
    }

    #[test]
    fn test_seq_shape_uses_first_element() {
        assert_eq!(Value::seq(["a", "b"]).shape(), Shape::seq(Shape::Text));
        assert_eq!(Value::Seq(Vec::new()).shape(), Shape::seq(Shape::Any));
    }

    #[test]
    fn test_opaque_equality_by_type_and_value() {
        let a = Opaque::new(42_u128);
        let b = Opaque::new(42_u128);
        let c = Opaque::new(42_i128);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.downcast_ref::<u128>(), Some(&42));
        assert!(format!("{a:?}").contains("42"));
    }

    #[test]
    fn test_integer_kind_predicates() {
        assert!(Kind::I8.is_signed());
        assert!(Kind::Usize.is_unsigned());
        assert!(Kind::F32.is_numeric());
        assert!(!Kind::Text.is_numeric());
    }
}
