//! Single-row selection for read-only tables.

use horizon_grid_core::logging::targets;
use horizon_grid_core::record::Record;

use super::{StructTableView, TableEvent};
use crate::TableError;
use crate::widget::WidgetTree;

impl<T: Record, W: WidgetTree> StructTableView<T, W> {
    /// Selects or deselects `row`.
    ///
    /// At most one row is selected: selecting a row clears the previous one,
    /// and deselecting any row clears the selection. Emits
    /// [`TableEvent::SelectionChanged`] on every successful call.
    pub fn select(&mut self, row: usize, selected: bool) -> crate::Result<()> {
        if !self.config.read_only {
            return Err(TableError::NotReadOnly);
        }
        let len = self.row_count();
        if row >= len {
            return Err(TableError::row(row, len));
        }

        if let Some(previous) = self.selected.take() {
            self.paint_row_selected(previous, false);
        }
        if selected {
            self.selected = Some(row);
            self.paint_row_selected(row, true);
        }

        tracing::debug!(target: targets::TABLE, selected = ?self.selected, "selection changed");
        self.notifier
            .notify(TableEvent::SelectionChanged(self.selected));
        Ok(())
    }

    /// Clears the selection without emitting an event.
    pub fn clear_selection(&mut self) {
        if let Some(previous) = self.selected.take() {
            self.paint_row_selected(previous, false);
        }
    }

    /// Re-applies the selected state after widgets were (re)created.
    pub(super) fn reapply_selection(&mut self) {
        match self.selected {
            Some(row) if row < self.row_count() => self.paint_row_selected(row, true),
            Some(_) => self.selected = None,
            None => {}
        }
    }

    fn paint_row_selected(&mut self, row: usize, selected: bool) {
        let per_row = self.widgets_per_row;
        let Some(cells) = self.grid.get(row * per_row..(row + 1) * per_row) else {
            return;
        };
        for id in cells.iter().flatten() {
            if let Some(widget) = self.tree.widget_mut(*id) {
                widget.set_selected(selected);
            }
        }
    }
}
