//! Record insertion, deletion and cell edits.

use horizon_grid_core::logging::targets;
use horizon_grid_core::record::{FieldValue, Record};

use super::{ChangeCause, GridState, StructTableView, TableEvent};
use crate::TableError;
use crate::sort::sort_tracking;
use crate::widget::WidgetTree;

impl<T: Record, W: WidgetTree> StructTableView<T, W> {
    /// Inserts a zero-valued record at `index`, or appends for `None`.
    ///
    /// With an active sort the sequence is re-sorted right away and the new
    /// record lands at its sorted position. Returns the row the new record
    /// ends up in; [`ChangeCause::Insert`] carries the same row.
    pub fn insert_at(&mut self, index: Option<usize>) -> crate::Result<usize> {
        if self.config.read_only {
            return Err(TableError::ReadOnly);
        }
        let records = self.bound_records()?;
        let row = {
            let mut records = records.write();
            let len = records.len();
            let at = index.unwrap_or(len);
            if at > len {
                return Err(TableError::row(at, len));
            }
            records.insert(at, T::default());
            match self.sort.field {
                Some(field) => sort_tracking(&mut records, field, self.sort.ascending, at)
                    .unwrap_or_else(|err| {
                        tracing::warn!(target: targets::TABLE, %err, "cannot re-apply sort");
                        at
                    }),
                None => at,
            }
        };

        tracing::debug!(target: targets::TABLE, row, "inserted record");
        self.after_mutation(ChangeCause::Insert { row });
        Ok(row)
    }

    /// Deletes the record at `index`.
    pub fn delete_at(&mut self, index: usize) -> crate::Result<()> {
        if self.config.read_only {
            return Err(TableError::ReadOnly);
        }
        let records = self.bound_records()?;
        {
            let mut records = records.write();
            let len = records.len();
            if index >= len {
                return Err(TableError::row(index, len));
            }
            records.remove(index);
        }

        tracing::debug!(target: targets::TABLE, row = index, "deleted record");
        self.after_mutation(ChangeCause::Delete { row: index });
        Ok(())
    }

    /// Commits edited `text` into `field` of `row`.
    ///
    /// The value is parsed by the cell's value view, written into the
    /// record, and the save callback runs. Emits exactly one
    /// [`TableEvent::ValueChanged`] on success. Returns the committed value.
    pub fn commit_edit(&mut self, row: usize, field: usize, text: &str) -> crate::Result<FieldValue> {
        if self.config.read_only {
            return Err(TableError::ReadOnly);
        }
        let count = self.fields.len();
        if field >= count {
            return Err(TableError::FieldOutOfRange { field, count });
        }
        let len = self.row_count();
        if row >= len {
            return Err(TableError::row(row, len));
        }

        let view = self.values[field][row]
            .as_deref()
            .ok_or(TableError::NotEditable {
                field: self.fields[field].name,
            })?;
        let value = view.commit(text).inspect_err(|err| {
            tracing::debug!(target: targets::TABLE, row, field, %err, "edit rejected");
        })?;

        self.refresh_cell(row, field);
        self.notifier
            .notify(TableEvent::ValueChanged(ChangeCause::Edit { row, field }));
        Ok(value)
    }

    fn after_mutation(&mut self, cause: ChangeCause) {
        if let Some(save) = &self.save {
            save();
        }
        self.state = GridState::Stale;
        if self.config.auto_rebuild {
            if let Err(err) = self.rebuild() {
                tracing::warn!(target: targets::TABLE, %err, "rebuild after mutation failed");
            }
        }
        self.notifier.notify(TableEvent::ValueChanged(cause));
    }
}
