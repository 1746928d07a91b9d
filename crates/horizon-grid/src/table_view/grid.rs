//! Grid construction, row refresh and sorting.

use std::sync::Arc;

use horizon_grid_core::logging::{PerfSpan, span_names, targets};
use horizon_grid_core::record::{Record, SharedRecords, introspect};

use super::{CacheKey, GridState, SortState, StructTableView, identity_of};
use crate::TableError;
use crate::sort::sort_records;
use crate::value_view::{BoundField, RecordFieldSlot};
use crate::widget::{CellContext, Icon, WidgetId, WidgetKind, WidgetTree};

const ADD_TOOLTIP: &str = "insert a new record after this one";
const DELETE_TOOLTIP: &str = "delete this record";
const APPEND_TOOLTIP: &str = "add a new record at the end";

impl<T: Record, W: WidgetTree> StructTableView<T, W> {
    /// Rebuilds the grid structure if it is out of date.
    ///
    /// Does nothing while the grid is built from the same sequence with the
    /// same length. Otherwise discards every widget and value view,
    /// reconfigures the header, re-applies the active sort and lays out all
    /// rows. Binding failures are logged and leave the previous grid intact.
    #[tracing::instrument(skip(self), target = "horizon_grid::table", level = "debug")]
    pub fn rebuild(&mut self) -> crate::Result<()> {
        let records = self.bound_records().inspect_err(|err| {
            tracing::warn!(target: targets::TABLE, %err, "cannot rebuild table");
        })?;
        let fields = introspect::<T>().inspect_err(|err| {
            tracing::warn!(target: targets::TABLE, %err, "cannot rebuild table");
        })?;

        let len = records.read().len();
        let key = CacheKey {
            identity: identity_of(&records),
            len,
        };
        if self.state == GridState::Built && self.cache_key == Some(key) {
            tracing::trace!(target: targets::TABLE, len, "grid up to date, skipping rebuild");
            return Ok(());
        }

        let _perf = PerfSpan::new(span_names::REBUILD);
        if self.cache_key.is_some_and(|previous| previous.len != len) {
            self.selected = None;
        }

        let updt = self.tree.begin_update();
        self.clear_grid();

        self.fields = fields;
        self.widgets_per_row = 1 + fields.len() + if self.config.read_only { 0 } else { 2 };
        self.build_header();
        self.grid = vec![None; len * self.widgets_per_row];
        self.values = (0..fields.len())
            .map(|_| (0..len).map(|_| None).collect())
            .collect();

        if let Some(field) = self.sort.field {
            let ascending = self.sort.ascending;
            if let Err(err) = sort_records(records.write().as_mut_slice(), field, ascending) {
                tracing::warn!(target: targets::TABLE, %err, "cannot re-apply sort");
            }
        }

        if !self.config.read_only && self.config.show_add_button {
            let id = self.tree.create_widget(WidgetKind::Button, "add-button");
            if let Some(widget) = self.tree.widget_mut(id) {
                widget.set_text("Add");
                widget.set_icon(Some(Icon::Plus));
                widget.set_tooltip(APPEND_TOOLTIP);
                widget.set_context(CellContext::AppendButton);
            }
            self.add_button = Some(id);
        }

        self.cache_key = Some(key);
        self.state = GridState::Built;
        self.layout_rows(&records);
        self.tree.end_update(updt);

        tracing::debug!(
            target: targets::TABLE,
            rows = len,
            fields = fields.len(),
            widgets_per_row = self.widgets_per_row,
            "rebuilt table grid"
        );
        Ok(())
    }

    /// Fills missing cells and refreshes every existing cell from the
    /// records, keeping the grid structure. Rebuilds instead if the grid is
    /// not built.
    pub fn refresh_rows(&mut self) -> crate::Result<()> {
        if self.state != GridState::Built {
            return self.rebuild();
        }
        let records = self.bound_records()?;
        let _perf = PerfSpan::new(span_names::REFRESH_ROWS);
        let updt = self.tree.begin_update();
        self.layout_rows(&records);
        self.tree.end_update(updt);
        Ok(())
    }

    /// Pushes every cached value into its widget without touching the
    /// grid structure or re-binding views.
    pub fn update_values(&mut self) {
        let updt = self.tree.begin_update();
        for row in 0..self.row_count() {
            for field in 0..self.fields.len() {
                self.refresh_cell(row, field);
            }
        }
        self.tree.end_update(updt);
    }

    /// Sorts by `field`, toggling the direction if it is already the active
    /// sort field and starting ascending otherwise.
    pub fn sort_by_field(&mut self, field: usize) -> crate::Result<()> {
        let ascending = match self.sort.field {
            Some(active) if active == field => !self.sort.ascending,
            _ => true,
        };
        self.sort(field, ascending)
    }

    /// Sorts the records by `field` in the given direction and refreshes
    /// the rows.
    ///
    /// On failure neither the records nor the sort state change.
    pub fn sort(&mut self, field: usize, ascending: bool) -> crate::Result<()> {
        let records = self.bound_records()?;
        let count = T::fields().len();
        if field >= count {
            return Err(TableError::FieldOutOfRange { field, count });
        }

        sort_records(records.write().as_mut_slice(), field, ascending)?;
        self.sort = SortState {
            field: Some(field),
            ascending,
        };
        self.update_sort_indicators();
        self.refresh_rows()
    }

    /// Deletes every widget and value view. The grid becomes `Empty`.
    pub(super) fn clear_grid(&mut self) {
        let widgets: Vec<_> = self
            .grid
            .drain(..)
            .flatten()
            .chain(self.header.drain(..))
            .chain(self.add_button.take())
            .collect();
        for id in widgets {
            self.tree.remove_widget(id);
        }
        self.values.clear();
        self.widgets_per_row = 0;
        self.cache_key = None;
        self.state = GridState::Empty;
    }

    fn build_header(&mut self) {
        let read_only = self.config.read_only;
        let fields = self.fields;
        let mut header = Vec::with_capacity(self.widgets_per_row);

        header.push(self.header_label("head-idx", "Index"));
        for descriptor in fields {
            let id = self
                .tree
                .create_widget(WidgetKind::HeaderAction, &format!("head-{}", descriptor.name));
            if let Some(widget) = self.tree.widget_mut(id) {
                widget.set_text(descriptor.label);
                widget.set_tooltip(format!("sort by {}", descriptor.label));
                widget.set_context(CellContext::HeaderField {
                    field: descriptor.ordinal,
                });
            }
            header.push(id);
        }
        if !read_only {
            header.push(self.header_label("head-add", "Add"));
            header.push(self.header_label("head-del", "Del"));
        }

        self.header = header;
        self.update_sort_indicators();
    }

    fn header_label(&mut self, name: &str, text: &str) -> WidgetId {
        let id = self.tree.create_widget(WidgetKind::Label, name);
        if let Some(widget) = self.tree.widget_mut(id) {
            widget.set_text(text);
            widget.set_context(CellContext::HeaderLabel);
        }
        id
    }

    fn update_sort_indicators(&mut self) {
        for field in 0..self.fields.len() {
            let Some(id) = self.header.get(1 + field).copied() else {
                continue;
            };
            let icon = match self.sort.field {
                Some(active) if active == field => Some(if self.sort.ascending {
                    Icon::WedgeUp
                } else {
                    Icon::WedgeDown
                }),
                _ => None,
            };
            if let Some(widget) = self.tree.widget_mut(id) {
                widget.set_icon(icon);
            }
        }
    }

    /// Creates missing row widgets and value views, re-binds every view and
    /// refreshes it into its widget.
    fn layout_rows(&mut self, records: &SharedRecords<T>) {
        let rows = self.row_count();
        let per_row = self.widgets_per_row;
        let read_only = self.config.read_only;
        let fields = self.fields;

        for row in 0..rows {
            let base = row * per_row;

            if self.grid[base].is_none() {
                let id = self
                    .tree
                    .create_widget(WidgetKind::Label, &format!("index-{row}"));
                self.grid[base] = Some(id);
            }
            if let Some(widget) = self.grid[base].and_then(|id| self.tree.widget_mut(id)) {
                widget.set_text(format!("{:0width$}", row, width = self.config.index_width));
                widget.set_context(CellContext::IndexLabel { row });
            }

            for (field, descriptor) in fields.iter().enumerate() {
                if self.values[field][row].is_none() {
                    let value = records.read().get(row).and_then(|r| r.field(field));
                    let Some(value) = value else {
                        continue;
                    };
                    match self.factory.view_for(&value) {
                        Some(view) => self.values[field][row] = Some(view),
                        None => {
                            tracing::debug!(
                                target: targets::TABLE,
                                row,
                                field = descriptor.name,
                                kind = %descriptor.kind,
                                "no value view for field, skipping cell"
                            );
                            continue;
                        }
                    }
                }

                let Some(view) = self.values[field][row].as_mut() else {
                    continue;
                };
                view.bind(BoundField::new(
                    Arc::new(RecordFieldSlot::new(records.clone(), row, field)),
                    *descriptor,
                    self.save.clone(),
                ));

                let slot = base + 1 + field;
                if self.grid[slot].is_none() {
                    let id = self.tree.create_widget(
                        view.widget_kind(),
                        &format!("value-{}-{row}", descriptor.name),
                    );
                    if let Some(widget) = self.tree.widget_mut(id) {
                        widget.set_context(CellContext::Value {
                            row,
                            column: 1 + field,
                            field,
                        });
                        widget.set_read_only(read_only);
                    }
                    self.grid[slot] = Some(id);
                }
                self.refresh_cell(row, field);
            }

            if !read_only {
                self.ensure_row_action(row, base + 1 + fields.len(), true);
                self.ensure_row_action(row, base + 2 + fields.len(), false);
            }
        }

        self.reapply_selection();
    }

    fn ensure_row_action(&mut self, row: usize, slot: usize, insert: bool) {
        let id = match self.grid[slot] {
            Some(id) => id,
            None => {
                let name = if insert {
                    format!("add-{row}")
                } else {
                    format!("del-{row}")
                };
                let id = self.tree.create_widget(WidgetKind::Action, &name);
                self.grid[slot] = Some(id);
                id
            }
        };
        if let Some(widget) = self.tree.widget_mut(id) {
            if insert {
                widget.set_icon(Some(Icon::Plus));
                widget.set_tooltip(ADD_TOOLTIP);
                widget.set_context(CellContext::InsertAfter { row });
            } else {
                widget.set_icon(Some(Icon::Minus));
                widget.set_tooltip(DELETE_TOOLTIP);
                widget.set_context(CellContext::Delete { row });
            }
        }
    }

    /// Refreshes one value widget from its view and applies the style hook.
    pub(super) fn refresh_cell(&mut self, row: usize, field: usize) {
        let Some(view) = self.values.get(field).and_then(|v| v.get(row)).and_then(|v| v.as_deref())
        else {
            return;
        };
        let Some(id) = self.cell(row, 1 + field) else {
            return;
        };
        let Some(widget) = self.tree.widget_mut(id) else {
            return;
        };
        view.refresh(widget);
        if let Some(style) = &self.style_fn {
            style(widget, row, field, view);
        }
    }
}
