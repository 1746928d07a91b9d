//! Widget-tree seam for table views.
//!
//! Table views do not draw anything. They create, configure and delete
//! widgets through the [`WidgetTree`] trait, and a toolkit backend renders
//! whatever the tree holds. [`WidgetArena`] is the in-crate implementation:
//! a generational arena of [`CellWidget`]s keyed by [`WidgetId`].
//!
//! Widget handles are generational. Once a widget is removed, its
//! `WidgetId` never resolves again, even after the arena slot is reused, so
//! stale handles held across a rebuild are detected instead of aliasing a
//! new widget.
//!
//! # Example
//!
//! ```
//! use horizon_grid::widget::{WidgetArena, WidgetKind, WidgetTree};
//!
//! let mut tree = WidgetArena::new();
//! let updt = tree.begin_update();
//! let label = tree.create_widget(WidgetKind::Label, "head-idx");
//! tree.widget_mut(label).unwrap().set_text("Index");
//! tree.end_update(updt);
//!
//! assert_eq!(tree.widget(label).unwrap().text(), "Index");
//! assert_eq!(tree.render_requests(), 1);
//! ```

use slotmap::{SlotMap, new_key_type};

use horizon_grid_core::logging::targets;

new_key_type! {
    /// Generational handle to a widget in a [`WidgetTree`].
    pub struct WidgetId;
}

/// Concrete widget type to instantiate for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// Static text.
    Label,
    /// Clickable header section with a sort indicator.
    HeaderAction,
    /// Small icon action (per-row add/delete).
    Action,
    /// Push button.
    Button,
    /// Single-line text editor.
    LineEdit,
    /// Integer editor.
    SpinBox,
    /// Floating point editor.
    DoubleSpinBox,
    /// Date/time editor.
    DateTimeEdit,
}

impl WidgetKind {
    /// Returns `true` for widgets that edit a field value.
    pub fn is_editor(self) -> bool {
        matches!(
            self,
            WidgetKind::LineEdit
                | WidgetKind::SpinBox
                | WidgetKind::DoubleSpinBox
                | WidgetKind::DateTimeEdit
        )
    }
}

/// Icons used by table view widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Plus,
    Minus,
    /// Ascending sort indicator.
    WedgeUp,
    /// Descending sort indicator.
    WedgeDown,
}

/// What a widget stands for inside a table view.
///
/// Stored on the widget itself so interactions can be routed back to the
/// table by widget id, without closures capturing loop variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellContext {
    /// Static header text ("Index", "Add", "Del").
    HeaderLabel,
    /// Header section for a record field.
    HeaderField { field: usize },
    /// Row number label.
    IndexLabel { row: usize },
    /// Editor or display for one field of one record.
    Value {
        row: usize,
        column: usize,
        field: usize,
    },
    /// Inserts a new record after `row`.
    InsertAfter { row: usize },
    /// Deletes the record at `row`.
    Delete { row: usize },
    /// Button-box button that appends a record.
    AppendButton,
}

/// A widget as seen by the table view.
#[derive(Debug, Clone, PartialEq)]
pub struct CellWidget {
    kind: WidgetKind,
    name: String,
    text: String,
    icon: Option<Icon>,
    tooltip: Option<String>,
    selected: bool,
    read_only: bool,
    context: Option<CellContext>,
    dirty: bool,
}

impl CellWidget {
    /// Creates an empty widget.
    pub fn new(kind: WidgetKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            text: String::new(),
            icon: None,
            tooltip: None,
            selected: false,
            read_only: false,
            context: None,
            dirty: true,
        }
    }

    /// Widget type.
    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    /// Name of the widget within its parent.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Displayed text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Sets the displayed text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.text != text {
            self.text = text;
            self.dirty = true;
        }
    }

    /// Current icon.
    pub fn icon(&self) -> Option<Icon> {
        self.icon
    }

    /// Sets or clears the icon.
    pub fn set_icon(&mut self, icon: Option<Icon>) {
        if self.icon != icon {
            self.icon = icon;
            self.dirty = true;
        }
    }

    /// Tooltip text.
    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    /// Sets the tooltip text.
    pub fn set_tooltip(&mut self, tooltip: impl Into<String>) {
        self.tooltip = Some(tooltip.into());
    }

    /// Whether the widget is drawn as selected.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Sets the selected state.
    pub fn set_selected(&mut self, selected: bool) {
        if self.selected != selected {
            self.selected = selected;
            self.dirty = true;
        }
    }

    /// Whether the widget rejects edits.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Sets the read-only (inactive) state.
    pub fn set_read_only(&mut self, read_only: bool) {
        if self.read_only != read_only {
            self.read_only = read_only;
            self.dirty = true;
        }
    }

    /// Table context of the widget.
    pub fn context(&self) -> Option<CellContext> {
        self.context
    }

    /// Sets the table context.
    pub fn set_context(&mut self, context: CellContext) {
        self.context = Some(context);
    }

    /// Whether the widget changed since the last [`clear_dirty`](Self::clear_dirty).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Marks the widget as rendered.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

/// The widget-tree operations a table view needs from its toolkit.
pub trait WidgetTree {
    /// Creates a child widget of `kind` named `name` and returns its handle.
    fn create_widget(&mut self, kind: WidgetKind, name: &str) -> WidgetId;

    /// Deletes a widget. Returns it if the handle was live.
    fn remove_widget(&mut self, id: WidgetId) -> Option<CellWidget>;

    /// Resolves a handle. `None` for removed (stale) handles.
    fn widget(&self, id: WidgetId) -> Option<&CellWidget>;

    /// Resolves a handle mutably. `None` for removed (stale) handles.
    fn widget_mut(&mut self, id: WidgetId) -> Option<&mut CellWidget>;

    /// Marks the whole tree as needing a full re-render.
    fn set_full_rerender(&mut self);

    /// Starts an update batch. Visual refresh is deferred until the batch
    /// that returned `true` is ended.
    fn begin_update(&mut self) -> bool;

    /// Ends an update batch started by [`begin_update`](Self::begin_update).
    fn end_update(&mut self, updt: bool);
}

/// Slotmap-backed [`WidgetTree`].
#[derive(Debug, Default)]
pub struct WidgetArena {
    widgets: SlotMap<WidgetId, CellWidget>,
    update_depth: usize,
    full_rerender: bool,
    render_requests: u64,
    revision: u64,
}

impl WidgetArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live widgets.
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Returns `true` if no widgets are alive.
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Structural revision, bumped on every create and remove.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of visual refreshes requested so far.
    pub fn render_requests(&self) -> u64 {
        self.render_requests
    }

    /// Whether a full re-render is pending.
    pub fn needs_full_rerender(&self) -> bool {
        self.full_rerender
    }

    /// Clears and returns the pending full re-render flag.
    pub fn take_full_rerender(&mut self) -> bool {
        std::mem::take(&mut self.full_rerender)
    }

    /// Iterates over all live widgets.
    pub fn iter(&self) -> impl Iterator<Item = (WidgetId, &CellWidget)> {
        self.widgets.iter()
    }

    fn request_render(&mut self) {
        if self.update_depth == 0 {
            self.render_requests += 1;
        }
    }
}

impl WidgetTree for WidgetArena {
    fn create_widget(&mut self, kind: WidgetKind, name: &str) -> WidgetId {
        let id = self.widgets.insert(CellWidget::new(kind, name));
        self.revision += 1;
        tracing::trace!(target: targets::WIDGET, ?id, ?kind, name, "created widget");
        self.request_render();
        id
    }

    fn remove_widget(&mut self, id: WidgetId) -> Option<CellWidget> {
        let removed = self.widgets.remove(id);
        if removed.is_some() {
            self.revision += 1;
            self.request_render();
        }
        removed
    }

    fn widget(&self, id: WidgetId) -> Option<&CellWidget> {
        self.widgets.get(id)
    }

    fn widget_mut(&mut self, id: WidgetId) -> Option<&mut CellWidget> {
        self.widgets.get_mut(id)
    }

    fn set_full_rerender(&mut self) {
        self.full_rerender = true;
    }

    fn begin_update(&mut self) -> bool {
        self.update_depth += 1;
        self.update_depth == 1
    }

    fn end_update(&mut self, updt: bool) {
        self.update_depth = self.update_depth.saturating_sub(1);
        if updt {
            self.render_requests += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_handle_does_not_resolve() {
        let mut arena = WidgetArena::new();
        let first = arena.create_widget(WidgetKind::Label, "a");
        assert!(arena.remove_widget(first).is_some());

        // The slot is reused, but the generation differs.
        let second = arena.create_widget(WidgetKind::Label, "b");
        assert_ne!(first, second);
        assert!(arena.widget(first).is_none());
        assert_eq!(arena.widget(second).unwrap().name(), "b");
        assert!(arena.remove_widget(first).is_none());
    }

    #[test]
    fn test_update_batch_defers_render() {
        let mut arena = WidgetArena::new();
        let outer = arena.begin_update();
        let inner = arena.begin_update();
        assert!(outer);
        assert!(!inner);

        arena.create_widget(WidgetKind::Label, "a");
        arena.create_widget(WidgetKind::Label, "b");
        arena.end_update(inner);
        assert_eq!(arena.render_requests(), 0);
        arena.end_update(outer);
        assert_eq!(arena.render_requests(), 1);

        arena.create_widget(WidgetKind::Label, "c");
        assert_eq!(arena.render_requests(), 2);
    }

    #[test]
    fn test_revision_tracks_structure_only() {
        let mut arena = WidgetArena::new();
        let id = arena.create_widget(WidgetKind::LineEdit, "value");
        let revision = arena.revision();

        arena.widget_mut(id).unwrap().set_text("changed");
        assert_eq!(arena.revision(), revision);

        arena.remove_widget(id);
        assert_eq!(arena.revision(), revision + 1);
    }

    #[test]
    fn test_widget_dirty_tracking() {
        let mut widget = CellWidget::new(WidgetKind::LineEdit, "w");
        widget.clear_dirty();
        widget.set_text("");
        assert!(!widget.is_dirty());
        widget.set_selected(true);
        assert!(widget.is_dirty());
    }

    #[test]
    fn test_full_rerender_flag() {
        let mut arena = WidgetArena::new();
        arena.set_full_rerender();
        assert!(arena.needs_full_rerender());
        assert!(arena.take_full_rerender());
        assert!(!arena.needs_full_rerender());
    }
}
