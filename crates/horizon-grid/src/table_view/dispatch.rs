//! Routing widget interactions back to table operations.
//!
//! Every widget the table creates carries a [`CellContext`]. A toolkit
//! backend only has to forward the widget id of whatever the user clicked,
//! edited or selected.

use horizon_grid_core::record::{FieldValue, Record};

use super::StructTableView;
use crate::TableError;
use crate::widget::{CellContext, WidgetId, WidgetTree};

impl<T: Record, W: WidgetTree> StructTableView<T, W> {
    /// Handles a click on `widget`.
    ///
    /// Header sections sort, row actions insert after or delete their row,
    /// the "Add" button appends. In read-only mode clicking a row selects
    /// it. Other widgets are ignored.
    pub fn activate(&mut self, widget: WidgetId) -> crate::Result<()> {
        match self.context_of(widget)? {
            CellContext::HeaderField { field } => self.sort_by_field(field),
            CellContext::InsertAfter { row } => self.insert_at(Some(row + 1)).map(|_| ()),
            CellContext::Delete { row } => self.delete_at(row),
            CellContext::AppendButton => self.insert_at(None).map(|_| ()),
            CellContext::IndexLabel { row } | CellContext::Value { row, .. }
                if self.config.read_only =>
            {
                self.select(row, true)
            }
            CellContext::IndexLabel { .. } | CellContext::Value { .. } | CellContext::HeaderLabel => {
                Ok(())
            }
        }
    }

    /// Commits text edited in a value widget.
    pub fn commit_widget_edit(&mut self, widget: WidgetId, text: &str) -> crate::Result<FieldValue> {
        match self.context_of(widget)? {
            CellContext::Value { row, field, .. } => self.commit_edit(row, field, text),
            _ => Err(TableError::UnknownWidget(widget)),
        }
    }

    /// Selects or deselects the row of `widget`.
    pub fn set_widget_selected(&mut self, widget: WidgetId, selected: bool) -> crate::Result<()> {
        match self.context_of(widget)? {
            CellContext::Value { row, .. } | CellContext::IndexLabel { row } => {
                self.select(row, selected)
            }
            _ => Err(TableError::UnknownWidget(widget)),
        }
    }

    fn context_of(&self, widget: WidgetId) -> crate::Result<CellContext> {
        self.tree
            .widget(widget)
            .and_then(|w| w.context())
            .ok_or(TableError::UnknownWidget(widget))
    }
}
