//! Declared data kinds of record fields.
//!
//! A column's [`FieldKind`] decides which filter family it gets by default
//! and how raw filter text is parsed. Nullable fields (`Option<T>`) share the
//! kind of their inner type.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Filter name used for numeric columns.
pub const NUMBER: &str = "Number";
/// Filter name used for boolean columns.
pub const BOOLEAN: &str = "Boolean";
/// Filter name used for date and date-time columns.
pub const DATE: &str = "Date";
/// Filter name used for text and every other column kind.
pub const TEXT: &str = "Text";

/// Declared data kind of a record field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    /// Fixed-point decimal carried as `f64` at runtime.
    Decimal,
    Bool,
    Date,
    DateTime,
    /// Enumeration; filtering is off unless a filter name is set explicitly.
    Enum,
    Text,
    /// Anything else. Filters as text.
    Other,
}

impl FieldKind {
    /// Returns the kind of a Rust type, unwrapping `Option`.
    ///
    /// ```
    /// use gridshape::FieldKind;
    ///
    /// assert_eq!(FieldKind::of::<Option<u16>>(), FieldKind::U16);
    /// assert_eq!(FieldKind::of::<String>(), FieldKind::Text);
    /// ```
    pub fn of<V: FieldType + ?Sized>() -> FieldKind {
        V::field_kind()
    }

    /// Returns `true` for every integer, float and decimal kind.
    pub fn is_numeric(self) -> bool {
        self.is_integer() || matches!(self, FieldKind::F32 | FieldKind::F64 | FieldKind::Decimal)
    }

    /// Returns `true` for signed and unsigned integer kinds.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            FieldKind::I8
                | FieldKind::I16
                | FieldKind::I32
                | FieldKind::I64
                | FieldKind::Isize
                | FieldKind::U8
                | FieldKind::U16
                | FieldKind::U32
                | FieldKind::U64
                | FieldKind::Usize
        )
    }

    /// Returns the registry filter name a column of this kind uses when the
    /// column does not set one.
    pub fn default_filter_name(self) -> Option<&'static str> {
        match self {
            FieldKind::Enum => None,
            kind if kind.is_numeric() => Some(NUMBER),
            FieldKind::Bool => Some(BOOLEAN),
            FieldKind::Date | FieldKind::DateTime => Some(DATE),
            _ => Some(TEXT),
        }
    }
}

/// Types with a known [`FieldKind`].
///
/// Implemented for the primitive and chrono types; implement it for your own
/// enums (returning [`FieldKind::Enum`]) or wrapper types.
pub trait FieldType {
    /// The declared kind of this type.
    fn field_kind() -> FieldKind;
}

macro_rules! field_type {
    ($($t:ty => $kind:ident),* $(,)?) => {
        $(
            impl FieldType for $t {
                fn field_kind() -> FieldKind {
                    FieldKind::$kind
                }
            }
        )*
    };
}

field_type!(
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
    bool => Bool,
    String => Text,
    str => Text,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
);

impl<Tz: TimeZone> FieldType for DateTime<Tz> {
    fn field_kind() -> FieldKind {
        FieldKind::DateTime
    }
}

impl<T: FieldType> FieldType for Option<T> {
    fn field_kind() -> FieldKind {
        T::field_kind()
    }
}

impl<T: FieldType + ?Sized> FieldType for &T {
    fn field_kind() -> FieldKind {
        T::field_kind()
    }
}
