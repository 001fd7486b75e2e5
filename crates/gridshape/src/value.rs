//! Runtime value types for cell access.
//!
//! The [`Value`] enum is what a column accessor extracts from a record. It is
//! used for filtering, sorting and display alike.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::kind::FieldKind;

/// Runtime value of a record field, borrowed from the record when possible.
///
/// # Example
///
/// ```
/// use gridshape::Value;
///
/// struct User {
///     name: String,
///     age: Option<u8>,
/// }
///
/// let user = User { name: "Ada".into(), age: None };
///
/// assert_eq!(Value::from(&user.name), Value::String("Ada".into()));
/// assert_eq!(Value::from(user.age), Value::None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// Text, borrowed from the record or computed.
    String(Cow<'a, str>),
    /// Numeric value.
    Number(Number),
    /// Date and time without a timezone.
    Date(NaiveDateTime),
    /// Enum variant, compared by discriminant and displayed by label.
    Enum { discriminant: u32, label: &'static str },
    /// Boolean value.
    Bool(bool),
    /// Absent value (a `None` field).
    None,
}

impl<'a> Value<'a> {
    /// Builds an enum value from a [`GridEnum`] implementor.
    pub fn enumeration<E: GridEnum + ?Sized>(value: &E) -> Self {
        Value::Enum {
            discriminant: value.discriminant(),
            label: value.label(),
        }
    }

    /// Returns `true` if this is the absent value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the date value, if present.
    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Detaches the value from the record it was borrowed from.
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::String(s) => Value::String(Cow::Owned(s.into_owned())),
            Value::Number(n) => Value::Number(n),
            Value::Date(d) => Value::Date(d),
            Value::Enum {
                discriminant,
                label,
            } => Value::Enum {
                discriminant,
                label,
            },
            Value::Bool(b) => Value::Bool(b),
            Value::None => Value::None,
        }
    }
}

/// Plain string form used for display and text comparison.
///
/// Dates at midnight print as `YYYY-MM-DD`, other dates as
/// `YYYY-MM-DD HH:MM:SS`. The absent value prints as an empty string.
impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{}", n),
            Value::Date(d) if d.time() == NaiveTime::MIN => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S")),
            Value::Enum { label, .. } => f.write_str(label),
            Value::Bool(b) => write!(f, "{}", b),
            Value::None => Ok(()),
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::String(Cow::Borrowed(s))
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(s: &'a String) -> Self {
        Value::String(Cow::Borrowed(s.as_str()))
    }
}

impl From<String> for Value<'_> {
    fn from(s: String) -> Self {
        Value::String(Cow::Owned(s))
    }
}

impl<'a> From<Cow<'a, str>> for Value<'a> {
    fn from(s: Cow<'a, str>) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Number> for Value<'_> {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<NaiveDateTime> for Value<'_> {
    fn from(d: NaiveDateTime) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDate> for Value<'_> {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d.and_time(NaiveTime::MIN))
    }
}

impl From<DateTime<Utc>> for Value<'_> {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d.naive_utc())
    }
}

impl<'a, V: Into<Value<'a>>> From<Option<V>> for Value<'a> {
    fn from(value: Option<V>) -> Self {
        value.map_or(Value::None, Into::into)
    }
}

macro_rules! number_into_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value<'_> {
                fn from(n: $t) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

number_into_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// Numeric value supporting all common numeric types.
///
/// Numbers keep one of three representations to preserve precision;
/// comparisons across representations go through `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Whether this is a floating point NaN.
    pub fn is_nan(self) -> bool {
        matches!(self, Number::F64(n) if n.is_nan())
    }

    /// Compares two numbers, handling mixed types.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),
            (Number::I64(a), Number::U64(b)) => Some(if a < 0 {
                Ordering::Less
            } else {
                (a as u64).cmp(&b)
            }),
            (Number::U64(_), Number::I64(_)) => other.compare(self).map(Ordering::reverse),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }

    /// Parses text as a number of the given field kind.
    ///
    /// Integer kinds enforce their own range (`"300"` is not a valid `u8`),
    /// float kinds accept float syntax, and decimals reject NaN and infinity.
    /// Non-numeric kinds fall back to `f64` parsing. Surrounding whitespace is
    /// ignored. Returns `None` when the text does not parse.
    pub fn parse_as(kind: FieldKind, text: &str) -> Option<Number> {
        let text = text.trim();
        match kind {
            FieldKind::I8 => text.parse::<i8>().ok().map(Number::from),
            FieldKind::I16 => text.parse::<i16>().ok().map(Number::from),
            FieldKind::I32 => text.parse::<i32>().ok().map(Number::from),
            FieldKind::I64 => text.parse::<i64>().ok().map(Number::from),
            FieldKind::Isize => text.parse::<isize>().ok().map(Number::from),
            FieldKind::U8 => text.parse::<u8>().ok().map(Number::from),
            FieldKind::U16 => text.parse::<u16>().ok().map(Number::from),
            FieldKind::U32 => text.parse::<u32>().ok().map(Number::from),
            FieldKind::U64 => text.parse::<u64>().ok().map(Number::from),
            FieldKind::Usize => text.parse::<usize>().ok().map(Number::from),
            FieldKind::F32 => text.parse::<f32>().ok().map(Number::from),
            FieldKind::Decimal => text
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Number::F64),
            _ => text.parse::<f64>().ok().map(Number::F64),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{}", n),
            Number::U64(n) => write!(f, "{}", n),
            Number::F64(n) => write!(f, "{}", n),
        }
    }
}

macro_rules! number_from {
    ($variant:ident as $target:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Number {
                fn from(n: $t) -> Self {
                    Number::$variant(n as $target)
                }
            }
        )*
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);

/// Maps an enum to the discriminant and label used by [`Value::Enum`].
///
/// # Example
///
/// ```
/// use gridshape::{GridEnum, Value};
///
/// #[derive(Clone, Copy)]
/// enum Status {
///     Pending,
///     Active,
/// }
///
/// impl GridEnum for Status {
///     fn discriminant(&self) -> u32 {
///         *self as u32
///     }
///
///     fn label(&self) -> &'static str {
///         match self {
///             Status::Pending => "Pending",
///             Status::Active => "Active",
///         }
///     }
/// }
///
/// assert_eq!(Value::enumeration(&Status::Active).to_string(), "Active");
/// ```
pub trait GridEnum {
    /// Stable discriminant used for ordering.
    fn discriminant(&self) -> u32;

    /// Display label.
    fn label(&self) -> &'static str;
}
