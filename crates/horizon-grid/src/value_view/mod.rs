//! Per-field value views.
//!
//! A value view renders one field of one record into a [`CellWidget`] and
//! parses edits back into the record. Each view is bound to a
//! [`BoundField`]: a slot that reads and writes the field, the field's
//! descriptor, and the optional save callback of the table.
//!
//! Views are created by the [`ValueViewFactory`], which maps a field's
//! [`FieldKind`] to a constructor. The five primitive kinds have default
//! views; custom views can be registered per kind.
//!
//! # Example
//!
//! ```
//! use horizon_grid::value_view::ValueViewFactory;
//! use horizon_grid::widget::WidgetKind;
//! use horizon_grid_core::FieldValue;
//!
//! let factory = ValueViewFactory::default();
//! let view = factory.view_for(&FieldValue::Float(2.5)).unwrap();
//! assert_eq!(view.widget_kind(), WidgetKind::DoubleSpinBox);
//! assert_eq!(view.format(&FieldValue::Float(2.5)), "2.5");
//!
//! assert!(factory.view_for(&FieldValue::Unsupported("Vec<u8>")).is_none());
//! ```

mod factory;
mod views;

use std::fmt;
use std::sync::Arc;

use horizon_grid_core::record::{FieldDescriptor, FieldKind, FieldValue, Record, SharedRecords};
use horizon_grid_core::FieldError;

use crate::widget::{CellWidget, WidgetKind};

pub use factory::{ValueViewFactory, ValueViewOptions, ViewConstructor};
pub use views::{FloatValueView, IntValueView, StringValueView, TimestampValueView, UintValueView};

/// Callback invoked after the table writes to the record sequence.
pub type SaveCallback = Arc<dyn Fn() + Send + Sync>;

/// Errors raised when committing an edit through a value view.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    /// The edited text is not a valid value of the field's kind.
    #[error("cannot parse '{input}' as {kind}: {message}")]
    Parse {
        input: String,
        kind: FieldKind,
        message: String,
    },

    /// The record rejected the value.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// The bound row was removed from the sequence.
    #[error("record at row {row} no longer exists")]
    RowGone { row: usize },

    /// The view has not been bound to a field.
    #[error("value view is not bound to a field")]
    Unbound,
}

impl ValueError {
    /// Create a parse error.
    pub fn parse(input: impl Into<String>, kind: FieldKind, message: impl fmt::Display) -> Self {
        Self::Parse {
            input: input.into(),
            kind,
            message: message.to_string(),
        }
    }
}

/// Read/write access to one field of one record.
pub trait FieldSlot: Send + Sync {
    /// Row of the record within its sequence.
    fn row(&self) -> usize;

    /// Reads the current value. `None` when the row no longer exists.
    fn read(&self) -> Option<FieldValue>;

    /// Writes a new value into the field.
    fn write(&self, value: FieldValue) -> Result<(), ValueError>;
}

/// A [`FieldSlot`] addressing `records[row].field(ordinal)`.
pub struct RecordFieldSlot<T> {
    records: SharedRecords<T>,
    row: usize,
    ordinal: usize,
}

impl<T: Record> RecordFieldSlot<T> {
    /// Creates a slot for one field of one record.
    pub fn new(records: SharedRecords<T>, row: usize, ordinal: usize) -> Self {
        Self {
            records,
            row,
            ordinal,
        }
    }

    /// Ordinal of the addressed field.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }
}

impl<T: Record> FieldSlot for RecordFieldSlot<T> {
    fn row(&self) -> usize {
        self.row
    }

    fn read(&self) -> Option<FieldValue> {
        self.records.read().get(self.row)?.field(self.ordinal)
    }

    fn write(&self, value: FieldValue) -> Result<(), ValueError> {
        let mut records = self.records.write();
        let record = records
            .get_mut(self.row)
            .ok_or(ValueError::RowGone { row: self.row })?;
        record.set_field(self.ordinal, value)?;
        Ok(())
    }
}

/// Everything a value view is bound to.
#[derive(Clone)]
pub struct BoundField {
    /// Accessor for the field value.
    pub slot: Arc<dyn FieldSlot>,
    /// Static description of the field.
    pub descriptor: FieldDescriptor,
    /// Invoked after every successful commit.
    pub save: Option<SaveCallback>,
}

impl BoundField {
    /// Binds a record field with an optional save callback.
    pub fn new(
        slot: Arc<dyn FieldSlot>,
        descriptor: FieldDescriptor,
        save: Option<SaveCallback>,
    ) -> Self {
        Self {
            slot,
            descriptor,
            save,
        }
    }
}

impl fmt::Debug for BoundField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundField")
            .field("row", &self.slot.row())
            .field("field", &self.descriptor.name)
            .field("has_save", &self.save.is_some())
            .finish()
    }
}

/// Renders one field as a widget and parses edits back.
pub trait ValueView: Send + Sync {
    /// Binds (or re-binds) the view to a field.
    fn bind(&mut self, field: BoundField);

    /// The current binding, if any.
    fn binding(&self) -> Option<&BoundField>;

    /// The widget type to instantiate for this view.
    fn widget_kind(&self) -> WidgetKind;

    /// Formats a value for display.
    fn format(&self, value: &FieldValue) -> String;

    /// Parses edited text into a value of the view's kind.
    fn parse(&self, text: &str) -> Result<FieldValue, ValueError>;

    /// Reads the bound field's current value.
    fn value(&self) -> Option<FieldValue> {
        self.binding()?.slot.read()
    }

    /// Pushes the current field value into `widget`.
    fn refresh(&self, widget: &mut CellWidget) {
        if let Some(value) = self.value() {
            widget.set_text(self.format(&value));
        }
    }

    /// Parses `text`, writes it into the bound field and invokes the save
    /// callback. Returns the committed value.
    fn commit(&self, text: &str) -> Result<FieldValue, ValueError> {
        let binding = self.binding().ok_or(ValueError::Unbound)?;
        let value = self.parse(text)?;
        binding.slot.write(value.clone())?;
        if let Some(save) = &binding.save {
            save();
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use horizon_grid_core::share_records;
    use horizon_grid_macros::Record;

    #[derive(Debug, Default, Clone, PartialEq, Record)]
    struct Part {
        code: u32,
        label: String,
    }

    fn bound(records: &SharedRecords<Part>, row: usize, field: usize) -> BoundField {
        BoundField::new(
            Arc::new(RecordFieldSlot::new(records.clone(), row, field)),
            Part::fields()[field],
            None,
        )
    }

    #[test]
    fn test_slot_read_write() {
        let records = share_records(vec![Part {
            code: 4,
            label: "bolt".into(),
        }]);
        let slot = RecordFieldSlot::new(records.clone(), 0, 1);
        assert_eq!(slot.read(), Some(FieldValue::String("bolt".into())));

        slot.write(FieldValue::String("nut".into())).unwrap();
        assert_eq!(records.read()[0].label, "nut");
    }

    #[test]
    fn test_slot_row_gone() {
        let records = share_records(vec![Part::default()]);
        let slot = RecordFieldSlot::new(records.clone(), 0, 0);
        records.write().clear();

        assert_eq!(slot.read(), None);
        assert_eq!(
            slot.write(FieldValue::Uint(1)),
            Err(ValueError::RowGone { row: 0 })
        );
    }

    #[test]
    fn test_commit_writes_and_saves() {
        let records = share_records(vec![Part::default()]);
        let saves = Arc::new(AtomicUsize::new(0));
        let saves_clone = saves.clone();

        let mut field = bound(&records, 0, 0);
        field.save = Some(Arc::new(move || {
            saves_clone.fetch_add(1, Ordering::SeqCst);
        }));

        let mut view = UintValueView::default();
        view.bind(field);
        assert_eq!(view.commit(" 42 "), Ok(FieldValue::Uint(42)));
        assert_eq!(records.read()[0].code, 42);
        assert_eq!(saves.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_commit_does_not_save() {
        let records = share_records(vec![Part::default()]);
        let saves = Arc::new(AtomicUsize::new(0));
        let saves_clone = saves.clone();

        let mut field = bound(&records, 0, 0);
        field.save = Some(Arc::new(move || {
            saves_clone.fetch_add(1, Ordering::SeqCst);
        }));

        let mut view = UintValueView::default();
        view.bind(field);
        assert!(matches!(view.commit("-3"), Err(ValueError::Parse { .. })));
        assert_eq!(records.read()[0].code, 0);
        assert_eq!(saves.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_out_of_range_commit_is_field_error() {
        let records = share_records(vec![Part::default()]);
        let mut view = UintValueView::default();
        view.bind(bound(&records, 0, 0));

        let err = view.commit("5000000000").unwrap_err();
        assert!(matches!(err, ValueError::Field(FieldError::OutOfRange { .. })));
    }

    #[test]
    fn test_unbound_commit() {
        let view = StringValueView::default();
        assert_eq!(view.commit("x"), Err(ValueError::Unbound));
    }

    #[test]
    fn test_refresh_updates_widget_text() {
        let records = share_records(vec![Part {
            code: 9,
            label: "gear".into(),
        }]);
        let mut view = StringValueView::default();
        view.bind(bound(&records, 0, 1));

        let mut widget = CellWidget::new(WidgetKind::LineEdit, "cell");
        view.refresh(&mut widget);
        assert_eq!(widget.text(), "gear");

        records.write()[0].label = "cog".into();
        view.refresh(&mut widget);
        assert_eq!(widget.text(), "cog");
    }
}
