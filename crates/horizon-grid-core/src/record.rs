//! Record introspection for Horizon Grid.
//!
//! Table views never inspect types at runtime. Instead, each record type
//! implements the [`Record`] capability, usually through
//! `#[derive(Record)]`, which provides:
//!
//! - static [`FieldDescriptor`]s in declaration order,
//! - borrowed reads of a field by ordinal ([`Record::field_ref`]),
//! - typed writes of a field by ordinal ([`Record::set_field`]),
//! - a zero-valued record through `Default`.
//!
//! # Example
//!
//! ```
//! use horizon_grid_core::record::{FieldKind, FieldRef, FieldValue, Record, introspect};
//!
//! #[derive(Default)]
//! struct Point {
//!     x: i32,
//! }
//!
//! impl Record for Point {
//!     fn fields() -> &'static [horizon_grid_core::record::FieldDescriptor] {
//!         use horizon_grid_core::record::FieldDescriptor;
//!         static FIELDS: [FieldDescriptor; 1] =
//!             [FieldDescriptor::new("x", 0, FieldKind::Int, "i32")];
//!         &FIELDS
//!     }
//!
//!     fn field_ref(&self, ordinal: usize) -> Option<FieldRef<'_>> {
//!         match ordinal {
//!             0 => Some(FieldRef::Int(self.x.into())),
//!             _ => None,
//!         }
//!     }
//!
//!     fn set_field(
//!         &mut self,
//!         ordinal: usize,
//!         value: FieldValue,
//!     ) -> Result<(), horizon_grid_core::FieldError> {
//!         let fields = Self::fields();
//!         match ordinal {
//!             0 => {
//!                 self.x = horizon_grid_core::record::convert(&fields[0], value)?;
//!                 Ok(())
//!             }
//!             _ => Err(horizon_grid_core::FieldError::NoSuchField {
//!                 ordinal,
//!                 count: fields.len(),
//!             }),
//!         }
//!     }
//! }
//!
//! let fields = introspect::<Point>().unwrap();
//! assert_eq!(fields[0].name, "x");
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use chrono::{DateTime, NaiveDateTime, Utc};
use parking_lot::RwLock;

use crate::error::{BindingError, FieldError, FieldResult};
use crate::logging::targets;

/// Timestamps are normalized to UTC for display and ordering.
pub type Timestamp = DateTime<Utc>;

/// An externally owned, shared record sequence.
///
/// Table views hold a clone of this handle and mutate the sequence in place
/// (sort, insert, delete, cell edits). Identity is the `Arc` allocation.
pub type SharedRecords<T> = Arc<RwLock<Vec<T>>>;

/// Wraps a vector of records into a [`SharedRecords`] handle.
pub fn share_records<T>(records: Vec<T>) -> SharedRecords<T> {
    Arc::new(RwLock::new(records))
}

/// Primitive kind of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Signed integer (`i8`..`i64`, `isize`).
    Int,
    /// Unsigned integer (`u8`..`u64`, `usize`).
    Uint,
    /// Floating point (`f32`, `f64`).
    Float,
    /// UTF-8 string.
    String,
    /// Point in time.
    Timestamp,
    /// Any other type (nested records, collections, enums...).
    Unsupported,
}

impl FieldKind {
    /// All kinds that have a primitive representation.
    pub const PRIMITIVES: [FieldKind; 5] = [
        FieldKind::Int,
        FieldKind::Uint,
        FieldKind::Float,
        FieldKind::String,
        FieldKind::Timestamp,
    ];

    /// Returns `true` if records can be ordered by a field of this kind.
    pub fn is_sortable(self) -> bool {
        !matches!(self, FieldKind::Unsupported)
    }

    /// Lowercase name of the kind.
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Int => "signed integer",
            FieldKind::Uint => "unsigned integer",
            FieldKind::Float => "float",
            FieldKind::String => "string",
            FieldKind::Timestamp => "timestamp",
            FieldKind::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static metadata about one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field identifier as declared.
    pub name: &'static str,
    /// Header text. Defaults to `name`.
    pub label: &'static str,
    /// Zero-based position among the record's described fields.
    pub ordinal: usize,
    /// Primitive kind.
    pub kind: FieldKind,
    /// Declared type, for diagnostics.
    pub type_name: &'static str,
}

impl FieldDescriptor {
    /// Creates a descriptor whose label is the field name.
    pub const fn new(
        name: &'static str,
        ordinal: usize,
        kind: FieldKind,
        type_name: &'static str,
    ) -> Self {
        Self {
            name,
            label: name,
            ordinal,
            kind,
            type_name,
        }
    }

    /// Sets the header label.
    pub const fn with_label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }
}

/// A borrowed view of one field's current value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRef<'a> {
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(&'a str),
    Timestamp(Timestamp),
    /// The field has no primitive kind; carries the declared type name.
    Unsupported(&'static str),
}

impl FieldRef<'_> {
    /// Primitive kind of this value.
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldRef::Int(_) => FieldKind::Int,
            FieldRef::Uint(_) => FieldKind::Uint,
            FieldRef::Float(_) => FieldKind::Float,
            FieldRef::Str(_) => FieldKind::String,
            FieldRef::Timestamp(_) => FieldKind::Timestamp,
            FieldRef::Unsupported(_) => FieldKind::Unsupported,
        }
    }

    /// Copies the value out of the record.
    pub fn to_value(self) -> FieldValue {
        match self {
            FieldRef::Int(v) => FieldValue::Int(v),
            FieldRef::Uint(v) => FieldValue::Uint(v),
            FieldRef::Float(v) => FieldValue::Float(v),
            FieldRef::Str(s) => FieldValue::String(s.to_owned()),
            FieldRef::Timestamp(t) => FieldValue::Timestamp(t),
            FieldRef::Unsupported(ty) => FieldValue::Unsupported(ty),
        }
    }
}

/// An owned field value, as read from or written to a record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Uint(u64),
    Float(f64),
    String(String),
    Timestamp(Timestamp),
    /// The field has no primitive kind; carries the declared type name.
    Unsupported(&'static str),
}

impl FieldValue {
    /// Primitive kind of this value.
    pub fn kind(&self) -> FieldKind {
        self.as_ref().kind()
    }

    /// Borrows this value as a [`FieldRef`].
    pub fn as_ref(&self) -> FieldRef<'_> {
        match self {
            FieldValue::Int(v) => FieldRef::Int(*v),
            FieldValue::Uint(v) => FieldRef::Uint(*v),
            FieldValue::Float(v) => FieldRef::Float(*v),
            FieldValue::String(s) => FieldRef::Str(s),
            FieldValue::Timestamp(t) => FieldRef::Timestamp(*t),
            FieldValue::Unsupported(ty) => FieldRef::Unsupported(*ty),
        }
    }
}

/// The static capability a record type provides to table views.
///
/// Implementations must list fields in declaration order with
/// `fields()[i].ordinal == i`, and `field_ref`/`set_field` must agree with
/// the descriptor kinds.
pub trait Record: Default + Send + Sync + 'static {
    /// Field descriptors in declaration order.
    fn fields() -> &'static [FieldDescriptor];

    /// Borrows the field at `ordinal`, or `None` if there is no such field.
    fn field_ref(&self, ordinal: usize) -> Option<FieldRef<'_>>;

    /// Writes `value` into the field at `ordinal`.
    ///
    /// On error the record is unchanged.
    fn set_field(&mut self, ordinal: usize, value: FieldValue) -> FieldResult<()>;

    /// Reads an owned copy of the field at `ordinal`.
    fn field(&self, ordinal: usize) -> Option<FieldValue> {
        self.field_ref(ordinal).map(FieldRef::to_value)
    }

    /// Number of described fields.
    fn field_count() -> usize {
        Self::fields().len()
    }
}

/// Returns the validated field descriptors of a record type.
///
/// Fails when the type exposes no fields or a descriptor's ordinal does not
/// match its position. Deterministic and free of side effects.
pub fn introspect<T: Record>() -> Result<&'static [FieldDescriptor], BindingError> {
    let type_name = std::any::type_name::<T>();
    let fields = T::fields();
    if fields.is_empty() {
        return Err(BindingError::NoFields { type_name });
    }
    if let Some(position) = fields.iter().enumerate().position(|(i, d)| d.ordinal != i) {
        return Err(BindingError::MalformedDescriptor {
            type_name,
            position,
        });
    }
    tracing::trace!(target: targets::RECORD, type_name, field_count = fields.len(), "introspected record type");
    Ok(fields)
}

/// A Rust type that maps onto one primitive [`FieldKind`].
///
/// Implemented for the integer, float, string and timestamp types that
/// `#[derive(Record)]` recognizes.
pub trait FieldType: Sized {
    /// The kind this type is shown and sorted as.
    const KIND: FieldKind;

    /// Borrows the value as a [`FieldRef`].
    fn to_field_ref(&self) -> FieldRef<'_>;

    /// Converts a [`FieldValue`] into this type.
    fn from_field_value(value: FieldValue) -> Result<Self, ConversionError>;
}

/// Why a [`FieldValue`] could not be converted into a concrete field type.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// The value has a different kind.
    KindMismatch { expected: FieldKind, got: FieldKind },
    /// The value does not fit the target type.
    OutOfRange(String),
}

/// Converts `value` for the field described by `descriptor`.
///
/// Used by `#[derive(Record)]` to implement [`Record::set_field`].
pub fn convert<T: FieldType>(
    descriptor: &FieldDescriptor,
    value: FieldValue,
) -> FieldResult<T> {
    T::from_field_value(value).map_err(|err| match err {
        ConversionError::KindMismatch { expected, got } => FieldError::KindMismatch {
            field: descriptor.name,
            expected,
            got,
        },
        ConversionError::OutOfRange(value) => FieldError::OutOfRange {
            field: descriptor.name,
            type_name: descriptor.type_name,
            value,
        },
    })
}

fn mismatch(expected: FieldKind, value: &FieldValue) -> ConversionError {
    ConversionError::KindMismatch {
        expected,
        got: value.kind(),
    }
}

macro_rules! signed_field_type {
    ($($ty:ty),*) => {$(
        impl FieldType for $ty {
            const KIND: FieldKind = FieldKind::Int;

            fn to_field_ref(&self) -> FieldRef<'_> {
                FieldRef::Int(*self as i64)
            }

            fn from_field_value(value: FieldValue) -> Result<Self, ConversionError> {
                match value {
                    FieldValue::Int(v) => <$ty>::try_from(v)
                        .map_err(|_| ConversionError::OutOfRange(v.to_string())),
                    other => Err(mismatch(FieldKind::Int, &other)),
                }
            }
        }
    )*};
}

macro_rules! unsigned_field_type {
    ($($ty:ty),*) => {$(
        impl FieldType for $ty {
            const KIND: FieldKind = FieldKind::Uint;

            fn to_field_ref(&self) -> FieldRef<'_> {
                FieldRef::Uint(*self as u64)
            }

            fn from_field_value(value: FieldValue) -> Result<Self, ConversionError> {
                match value {
                    FieldValue::Uint(v) => <$ty>::try_from(v)
                        .map_err(|_| ConversionError::OutOfRange(v.to_string())),
                    other => Err(mismatch(FieldKind::Uint, &other)),
                }
            }
        }
    )*};
}

signed_field_type!(i8, i16, i32, i64, isize);
unsigned_field_type!(u8, u16, u32, u64, usize);

impl FieldType for f64 {
    const KIND: FieldKind = FieldKind::Float;

    fn to_field_ref(&self) -> FieldRef<'_> {
        FieldRef::Float(*self)
    }

    fn from_field_value(value: FieldValue) -> Result<Self, ConversionError> {
        match value {
            FieldValue::Float(v) => Ok(v),
            other => Err(mismatch(FieldKind::Float, &other)),
        }
    }
}

impl FieldType for f32 {
    const KIND: FieldKind = FieldKind::Float;

    fn to_field_ref(&self) -> FieldRef<'_> {
        FieldRef::Float(f64::from(*self))
    }

    fn from_field_value(value: FieldValue) -> Result<Self, ConversionError> {
        match value {
            FieldValue::Float(v) => {
                let narrowed = v as f32;
                if v.is_finite() && !narrowed.is_finite() {
                    Err(ConversionError::OutOfRange(v.to_string()))
                } else {
                    Ok(narrowed)
                }
            }
            other => Err(mismatch(FieldKind::Float, &other)),
        }
    }
}

impl FieldType for String {
    const KIND: FieldKind = FieldKind::String;

    fn to_field_ref(&self) -> FieldRef<'_> {
        FieldRef::Str(self)
    }

    fn from_field_value(value: FieldValue) -> Result<Self, ConversionError> {
        match value {
            FieldValue::String(s) => Ok(s),
            other => Err(mismatch(FieldKind::String, &other)),
        }
    }
}

impl FieldType for DateTime<Utc> {
    const KIND: FieldKind = FieldKind::Timestamp;

    fn to_field_ref(&self) -> FieldRef<'_> {
        FieldRef::Timestamp(*self)
    }

    fn from_field_value(value: FieldValue) -> Result<Self, ConversionError> {
        match value {
            FieldValue::Timestamp(t) => Ok(t),
            other => Err(mismatch(FieldKind::Timestamp, &other)),
        }
    }
}

impl FieldType for NaiveDateTime {
    const KIND: FieldKind = FieldKind::Timestamp;

    fn to_field_ref(&self) -> FieldRef<'_> {
        FieldRef::Timestamp(self.and_utc())
    }

    fn from_field_value(value: FieldValue) -> Result<Self, ConversionError> {
        match value {
            FieldValue::Timestamp(t) => Ok(t.naive_utc()),
            other => Err(mismatch(FieldKind::Timestamp, &other)),
        }
    }
}

impl FieldType for SystemTime {
    const KIND: FieldKind = FieldKind::Timestamp;

    fn to_field_ref(&self) -> FieldRef<'_> {
        FieldRef::Timestamp(DateTime::<Utc>::from(*self))
    }

    fn from_field_value(value: FieldValue) -> Result<Self, ConversionError> {
        match value {
            FieldValue::Timestamp(t) => Ok(SystemTime::from(t)),
            other => Err(mismatch(FieldKind::Timestamp, &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SMALL: FieldDescriptor = FieldDescriptor::new("small", 0, FieldKind::Int, "i8");

    #[test]
    fn test_signed_conversion_range() {
        assert_eq!(convert::<i8>(&SMALL, FieldValue::Int(-12)), Ok(-12));
        assert_eq!(
            convert::<i8>(&SMALL, FieldValue::Int(300)),
            Err(FieldError::OutOfRange {
                field: "small",
                type_name: "i8",
                value: "300".into(),
            })
        );
    }

    #[test]
    fn test_kind_mismatch() {
        let err = convert::<i8>(&SMALL, FieldValue::String("1".into())).unwrap_err();
        assert_eq!(
            err,
            FieldError::KindMismatch {
                field: "small",
                expected: FieldKind::Int,
                got: FieldKind::String,
            }
        );
    }

    #[test]
    fn test_unsigned_rejects_signed_value() {
        assert!(u32::from_field_value(FieldValue::Int(5)).is_err());
        assert_eq!(u32::from_field_value(FieldValue::Uint(5)), Ok(5));
    }

    #[test]
    fn test_f32_overflow() {
        assert!(f32::from_field_value(FieldValue::Float(1e300)).is_err());
        assert!(f32::from_field_value(FieldValue::Float(f64::INFINITY)).is_ok());
        assert_eq!(f32::from_field_value(FieldValue::Float(0.5)), Ok(0.5));
    }

    #[test]
    fn test_timestamp_types_agree() {
        let utc = Utc.with_ymd_and_hms(2018, 5, 1, 12, 30, 0).unwrap();
        let naive = utc.naive_utc();
        let system = SystemTime::from(utc);

        assert_eq!(naive.to_field_ref(), FieldRef::Timestamp(utc));
        assert_eq!(system.to_field_ref(), FieldRef::Timestamp(utc));
        assert_eq!(
            NaiveDateTime::from_field_value(FieldValue::Timestamp(utc)),
            Ok(naive)
        );
    }

    #[test]
    fn test_field_ref_round_trip_kind() {
        let value = FieldValue::String("abc".into());
        assert_eq!(value.kind(), FieldKind::String);
        assert_eq!(value.as_ref(), FieldRef::Str("abc"));
        assert_eq!(value.as_ref().to_value(), value);
    }

    #[test]
    fn test_kind_sortability() {
        for kind in FieldKind::PRIMITIVES {
            assert!(kind.is_sortable());
        }
        assert!(!FieldKind::Unsupported.is_sortable());
    }
}
