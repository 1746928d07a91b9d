//! Error types for Horizon Grid core.

use crate::record::FieldKind;

/// Errors raised when reading or writing a single record field.
///
/// A failed write never modifies the record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    /// The ordinal does not name a field of the record type.
    #[error("no field at ordinal {ordinal} (record has {count} fields)")]
    NoSuchField { ordinal: usize, count: usize },

    /// The supplied value is of a different primitive kind than the field.
    #[error("field '{field}' expects a {expected} value, got {got}")]
    KindMismatch {
        field: &'static str,
        expected: FieldKind,
        got: FieldKind,
    },

    /// The supplied value does not fit the field's concrete type.
    #[error("value {value} is out of range for field '{field}' of type {type_name}")]
    OutOfRange {
        field: &'static str,
        type_name: &'static str,
        value: String,
    },

    /// The field's type has no primitive kind and cannot be written generically.
    #[error("field '{field}' of type {type_name} is not editable")]
    Unsupported {
        field: &'static str,
        type_name: &'static str,
    },
}

/// Errors raised when a table view cannot bind to a record type or sequence.
///
/// Binding errors are logged by the table view and abort the operation that
/// hit them; the previously built state stays untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    /// No record sequence has been bound yet.
    #[error("no record sequence is bound")]
    NotBound,

    /// The record type exposes no fields to show.
    #[error("record type {type_name} exposes no fields")]
    NoFields { type_name: &'static str },

    /// A field descriptor's ordinal does not match its declaration position.
    #[error("record type {type_name} has a malformed descriptor at position {position}")]
    MalformedDescriptor {
        type_name: &'static str,
        position: usize,
    },
}

/// A specialized Result type for field access.
pub type FieldResult<T> = std::result::Result<T, FieldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_messages() {
        let err = FieldError::KindMismatch {
            field: "score",
            expected: FieldKind::Float,
            got: FieldKind::String,
        };
        assert_eq!(err.to_string(), "field 'score' expects a float value, got string");

        let err = FieldError::NoSuchField { ordinal: 7, count: 3 };
        assert_eq!(err.to_string(), "no field at ordinal 7 (record has 3 fields)");
    }

    #[test]
    fn test_binding_error_messages() {
        let err = BindingError::NoFields { type_name: "Empty" };
        assert_eq!(err.to_string(), "record type Empty exposes no fields");
    }
}
