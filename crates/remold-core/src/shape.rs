//! Destination shapes.
//!
//! A [`Shape`] describes what the decoder is trying to produce. Hooks
//! dispatch on [`Shape::kind`] and use [`Shape::zero`] as the placeholder
//! for "nothing decoded yet".

use std::any::TypeId;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};

use crate::net::{IpNet, IpPrefix};
use crate::value::{Complex, Kind, Opaque, Record, Value};

/// Destination type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Untyped placeholder.
    Any,
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
    /// 8-bit unsigned integer.
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
    /// Raw bytes.
    Bytes,
    /// Signed span of time.
    Duration,
    /// Point in time.
    Time,
    /// Absolute URL.
    Url,
    /// IP address.
    Ip,
    /// IP network (CIDR).
    IpNet,
    /// Network address.
    Addr,
    /// Address with port.
    AddrPort,
    /// Address with prefix length.
    Prefix,
    /// Sequence of the element shape.
    Seq(Box<Shape>),
    /// String-keyed mapping to the element shape.
    Map(Box<Shape>),
    /// Named record with typed fields.
    Record(RecordShape),
    /// Type that can parse itself from text.
    Opaque(TextType),
}

impl Shape {
    /// Sequence of `elem`.
    #[must_use]
    pub fn seq(elem: Shape) -> Self {
        Self::Seq(Box::new(elem))
    }

    /// Mapping to `elem`.
    #[must_use]
    pub fn map(elem: Shape) -> Self {
        Self::Map(Box::new(elem))
    }

    /// Shape of a text-capable type.
    #[must_use]
    pub fn text_type<T>() -> Self
    where
        T: FromStr + PartialEq + fmt::Debug + Send + Sync + 'static,
        T::Err: fmt::Display,
    {
        Self::Opaque(TextType::of::<T>())
    }

    /// Scalar shape for a scalar kind; `None` for compound kinds.
    #[must_use]
    pub fn scalar(kind: Kind) -> Option<Self> {
        let shape = match kind {
            Kind::Bool => Self::Bool,
            Kind::I8 => Self::I8,
            Kind::I16 => Self::I16,
            Kind::I32 => Self::I32,
            Kind::I64 => Self::I64,
            Kind::Isize => Self::Isize,
            Kind::U8 => Self::U8,
            Kind::U16 => Self::U16,
            Kind::U32 => Self::U32,
            Kind::U64 => Self::U64,
            Kind::Usize => Self::Usize,
            Kind::F32 => Self::F32,
            Kind::F64 => Self::F64,
            Kind::Complex64 => Self::Complex64,
            Kind::Complex128 => Self::Complex128,
            Kind::Char => Self::Char,
            Kind::Text => Self::Text,
            Kind::Bytes => Self::Bytes,
            Kind::Duration => Self::Duration,
            Kind::Time => Self::Time,
            Kind::Url => Self::Url,
            Kind::Ip => Self::Ip,
            Kind::IpNet => Self::IpNet,
            Kind::Addr => Self::Addr,
            Kind::AddrPort => Self::AddrPort,
            Kind::Prefix => Self::Prefix,
            Kind::Any => Self::Any,
            Kind::Null | Kind::Seq | Kind::Map | Kind::Record | Kind::Opaque => return None,
        };
        Some(shape)
    }

    /// Category tag used for hook dispatch.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Any => Kind::Any,
            Self::Bool => Kind::Bool,
            Self::I8 => Kind::I8,
            Self::I16 => Kind::I16,
            Self::I32 => Kind::I32,
            Self::I64 => Kind::I64,
            Self::Isize => Kind::Isize,
            Self::U8 => Kind::U8,
            Self::U16 => Kind::U16,
            Self::U32 => Kind::U32,
            Self::U64 => Kind::U64,
            Self::Usize => Kind::Usize,
            Self::F32 => Kind::F32,
            Self::F64 => Kind::F64,
            Self::Complex64 => Kind::Complex64,
            Self::Complex128 => Kind::Complex128,
            Self::Char => Kind::Char,
            Self::Text => Kind::Text,
            Self::Bytes => Kind::Bytes,
            Self::Duration => Kind::Duration,
            Self::Time => Kind::Time,
            Self::Url => Kind::Url,
            Self::Ip => Kind::Ip,
            Self::IpNet => Kind::IpNet,
            Self::Addr => Kind::Addr,
            Self::AddrPort => Kind::AddrPort,
            Self::Prefix => Kind::Prefix,
            Self::Seq(_) => Kind::Seq,
            Self::Map(_) => Kind::Map,
            Self::Record(_) => Kind::Record,
            Self::Opaque(_) => Kind::Opaque,
        }
    }

    /// Zero-valued placeholder for this shape.
    ///
    /// Shapes without a natural empty value (URLs, text-capable types and
    /// [`Shape::Any`]) use [`Value::Null`].
    #[must_use]
    pub fn zero(&self) -> Value {
        let unspecified = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
        match self {
            Self::Any | Self::Url | Self::Opaque(_) => Value::Null,
            Self::Bool => Value::Bool(false),
            Self::I8 => Value::I8(0),
            Self::I16 => Value::I16(0),
            Self::I32 => Value::I32(0),
            Self::I64 => Value::I64(0),
            Self::Isize => Value::Isize(0),
            Self::U8 => Value::U8(0),
            Self::U16 => Value::U16(0),
            Self::U32 => Value::U32(0),
            Self::U64 => Value::U64(0),
            Self::Usize => Value::Usize(0),
            Self::F32 => Value::F32(0.0),
            Self::F64 => Value::F64(0.0),
            Self::Complex64 => Value::Complex64(Complex::default()),
            Self::Complex128 => Value::Complex128(Complex::default()),
            Self::Char => Value::Char('\0'),
            Self::Text => Value::Text(String::new()),
            Self::Bytes => Value::Bytes(Vec::new()),
            Self::Duration => Value::Duration(TimeDelta::zero()),
            Self::Time => Value::Time(DateTime::<Utc>::UNIX_EPOCH.fixed_offset()),
            Self::Ip => Value::Ip(unspecified),
            Self::IpNet => Value::IpNet(IpNet::default()),
            Self::Addr => Value::Addr(unspecified),
            Self::AddrPort => Value::AddrPort(SocketAddr::new(unspecified, 0)),
            Self::Prefix => Value::Prefix(IpPrefix::default()),
            Self::Seq(_) => Value::Seq(Vec::new()),
            Self::Map(_) => Value::Map(std::collections::BTreeMap::new()),
            Self::Record(shape) => Value::Record(shape.fields().fold(
                Record::new(shape.name()),
                |record, (name, field)| record.with_field(name, field.zero()),
            )),
        }
    }

    /// Whether this shape carries nested structure or type identity beyond
    /// its kind.
    #[must_use]
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            Self::Seq(_) | Self::Map(_) | Self::Record(_) | Self::Opaque(_)
        )
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seq(elem) => write!(f, "seq<{elem}>"),
            Self::Map(elem) => write!(f, "map<{elem}>"),
            Self::Record(record) => write!(f, "record {}", record.name()),
            Self::Opaque(ty) => f.write_str(ty.type_name()),
            scalar => fmt::Display::fmt(&scalar.kind(), f),
        }
    }
}

/// Field layout of a record destination.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordShape {
    name: String,
    fields: Vec<(String, Shape)>,
}

impl RecordShape {
    /// Create a record shape with no fields.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, shape: Shape) -> Self {
        self.fields.push((name.into(), shape));
        self
    }

    /// Record type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a field shape by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Shape> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, shape)| shape)
    }

    /// Iterate fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Shape)> {
        self.fields.iter().map(|(name, shape)| (name.as_str(), shape))
    }
}

/// Parse capability of a type that implements [`FromStr`].
#[derive(Clone, Copy)]
pub struct TextType {
    type_name: &'static str,
    type_id: TypeId,
    parse: fn(&str) -> Result<Opaque, String>,
}

impl TextType {
    /// Capture the parse capability of `T`.
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: FromStr + PartialEq + fmt::Debug + Send + Sync + 'static,
        T::Err: fmt::Display,
    {
        Self {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
            parse: parse_text::<T>,
        }
    }

    /// Rust type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// [`TypeId`] of the described type.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Parse `text` into the described type.
    ///
    /// # Errors
    ///
    /// Returns the type's own parse error message.
    pub fn parse(&self, text: &str) -> Result<Opaque, String> {
        (self.parse)(text)
    }
}

fn parse_text<T>(text: &str) -> Result<Opaque, String>
where
    T: FromStr + PartialEq + fmt::Debug + Send + Sync + 'static,
    T::Err: fmt::Display,
{
    text.parse::<T>()
        .map(Opaque::new)
        .map_err(|e| e.to_string())
}

impl PartialEq for TextType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl fmt::Debug for TextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TextType").field(&self.type_name).finish()
    }
}
