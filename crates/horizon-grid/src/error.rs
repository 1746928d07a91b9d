//! Error type for table view operations.

use horizon_grid_core::BindingError;

use crate::sort::SortError;
use crate::value_view::ValueError;
use crate::widget::WidgetId;

/// Result type alias for table view operations.
pub type Result<T> = std::result::Result<T, TableError>;

/// Errors returned by [`StructTableView`](crate::StructTableView) operations.
///
/// No operation modifies the record sequence or the grid when it fails.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    /// The table cannot bind to its records.
    #[error(transparent)]
    Binding(#[from] BindingError),

    /// A row index is outside the sequence.
    #[error("row {row} is out of range (table has {len} rows)")]
    RowOutOfRange { row: usize, len: usize },

    /// A field ordinal is outside the record type.
    #[error("field {field} is out of range (record has {count} fields)")]
    FieldOutOfRange { field: usize, count: usize },

    /// The operation edits records, but the table is read-only.
    #[error("table is read-only")]
    ReadOnly,

    /// Selection is only available in read-only mode.
    #[error("selection requires a read-only table")]
    NotReadOnly,

    /// The cell has no value view (its field kind is not supported).
    #[error("field '{field}' has no editor")]
    NotEditable { field: &'static str },

    /// The widget does not belong to this table, or is stale.
    #[error("widget {0:?} is not part of this table")]
    UnknownWidget(WidgetId),

    /// Sorting failed.
    #[error(transparent)]
    Sort(#[from] SortError),

    /// Committing an edit failed.
    #[error(transparent)]
    Value(#[from] ValueError),
}

impl TableError {
    pub(crate) fn row(row: usize, len: usize) -> Self {
        Self::RowOutOfRange { row, len }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            TableError::row(4, 2).to_string(),
            "row 4 is out of range (table has 2 rows)"
        );
        assert_eq!(
            TableError::from(BindingError::NotBound).to_string(),
            "no record sequence is bound"
        );
    }
}
