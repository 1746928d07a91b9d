//! Record-driven table view.
//!
//! [`StructTableView`] shows a [`SharedRecords`] sequence as a grid with
//! one row per record and one column per record field. Everything it needs
//! to know about the record type comes from its [`Record`] implementation.
//!
//! # Layout
//!
//! Each row holds, in order:
//!
//! - a zero-padded index label,
//! - one value widget per field (created by the [`ValueViewFactory`]),
//! - in editable mode, an "insert after" and a "delete" action.
//!
//! The header has an "Index" label, one sortable section per field and, in
//! editable mode, "Add"/"Del" labels. Editable tables also get an "Add"
//! button that appends a record.
//!
//! # Modes
//!
//! - **Editable** (default): cells commit edits, rows can be inserted and
//!   deleted, selection is unavailable.
//! - **Read-only**: cells are inactive, a single row can be selected.
//!
//! # Lifecycle
//!
//! The grid is `Empty` until records are bound, `Built` after a rebuild, and
//! `Stale` after an insert or delete that has not been rebuilt yet. A rebuild
//! is skipped while the grid is `Built` and neither the identity nor the
//! length of the sequence changed. Sorting only refreshes the existing rows.
//!
//! # Example
//!
//! ```
//! use horizon_grid::{Record, StructTableView, TableEvent, TableViewConfig, share_records};
//!
//! #[derive(Debug, Default, Clone, Record)]
//! struct Item {
//!     name: String,
//!     qty: u32,
//! }
//!
//! let records = share_records(vec![
//!     Item { name: "washer".into(), qty: 40 },
//!     Item { name: "bolt".into(), qty: 12 },
//! ]);
//!
//! let mut table = StructTableView::<Item>::new(TableViewConfig::default());
//! table.notifier().subscribe(|event| println!("{event:?}"));
//! table.set_records(records.clone(), None).unwrap();
//!
//! table.sort_by_field(0).unwrap();
//! assert_eq!(records.read()[0].name, "bolt");
//!
//! table.insert_at(None).unwrap();
//! assert_eq!(table.row_count(), 3);
//! ```

mod dispatch;
mod events;
mod grid;
mod mutation;
mod selection;

use std::sync::Arc;

use horizon_grid_core::record::{FieldDescriptor, Record, SharedRecords};

use crate::config::TableViewConfig;
use crate::value_view::{SaveCallback, ValueView, ValueViewFactory, ValueViewOptions};
use crate::widget::{CellWidget, WidgetArena, WidgetId, WidgetTree};

pub use events::{ChangeCause, ChangeNotifier, TableEvent};

/// Per-cell style hook: `(widget, row, field, view)`.
///
/// Runs after every refresh of a value widget.
pub type StyleFn = Box<dyn Fn(&mut CellWidget, usize, usize, &dyn ValueView) + Send + Sync>;

/// Structural state of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridState {
    /// Nothing built yet, or the record sequence was replaced.
    #[default]
    Empty,
    /// Widgets match the record sequence.
    Built,
    /// The sequence changed structurally and needs a rebuild.
    Stale,
}

/// Active sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    /// Field being sorted on, if any.
    pub field: Option<usize>,
    /// Direction of the active sort.
    pub ascending: bool,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            field: None,
            ascending: true,
        }
    }
}

/// What the last rebuild was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheKey {
    identity: usize,
    len: usize,
}

fn identity_of<T>(records: &SharedRecords<T>) -> usize {
    Arc::as_ptr(records) as *const () as usize
}

/// A grid of widgets bound to a sequence of records.
pub struct StructTableView<T: Record, W: WidgetTree = WidgetArena> {
    tree: W,
    config: TableViewConfig,
    factory: ValueViewFactory,
    records: Option<SharedRecords<T>>,
    save: Option<SaveCallback>,
    fields: &'static [FieldDescriptor],
    state: GridState,
    cache_key: Option<CacheKey>,
    sort: SortState,
    selected: Option<usize>,
    /// Value views indexed `[field][row]`.
    values: Vec<Vec<Option<Box<dyn ValueView>>>>,
    /// Row-major cell widgets, `widgets_per_row` slots per row.
    grid: Vec<Option<WidgetId>>,
    widgets_per_row: usize,
    header: Vec<WidgetId>,
    add_button: Option<WidgetId>,
    style_fn: Option<StyleFn>,
    notifier: ChangeNotifier,
}

impl<T: Record> StructTableView<T, WidgetArena> {
    /// Creates a table view backed by its own [`WidgetArena`].
    pub fn new(config: TableViewConfig) -> Self {
        Self::with_tree(WidgetArena::new(), config)
    }
}

impl<T: Record, W: WidgetTree> StructTableView<T, W> {
    /// Creates a table view that builds its widgets in `tree`.
    pub fn with_tree(tree: W, config: TableViewConfig) -> Self {
        let factory = ValueViewFactory::with_options(ValueViewOptions::from(&config));
        Self {
            tree,
            config,
            factory,
            records: None,
            save: None,
            fields: &[],
            state: GridState::Empty,
            cache_key: None,
            sort: SortState::default(),
            selected: None,
            values: Vec::new(),
            grid: Vec::new(),
            widgets_per_row: 0,
            header: Vec::new(),
            add_button: None,
            style_fn: None,
            notifier: ChangeNotifier::new(),
        }
    }

    /// Binds the table to `records` and builds the grid.
    ///
    /// Binding a different sequence resets the sort and the selection and
    /// discards every widget. Rebinding the same sequence only rebuilds if
    /// its length changed, and re-binds the existing value views. `save` is
    /// invoked after every write the table makes to the sequence.
    pub fn set_records(
        &mut self,
        records: SharedRecords<T>,
        save: Option<SaveCallback>,
    ) -> crate::Result<()> {
        let same = self
            .records
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &records));
        if !same {
            tracing::debug!(
                target: horizon_grid_core::logging::targets::TABLE,
                record_type = std::any::type_name::<T>(),
                "binding new record sequence"
            );
            self.sort = SortState::default();
            self.selected = None;
            self.clear_grid();
            self.tree.set_full_rerender();
        }
        self.records = Some(records);
        self.save = save;
        self.rebuild()?;
        if same {
            // The rebuild may have been skipped; views must see the new save callback.
            self.refresh_rows()?;
        }
        Ok(())
    }

    /// The bound record sequence.
    pub fn records(&self) -> Option<&SharedRecords<T>> {
        self.records.as_ref()
    }

    /// Field descriptors of the last build.
    pub fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }

    /// Current configuration.
    pub fn config(&self) -> &TableViewConfig {
        &self.config
    }

    /// Replaces the configuration. The grid is rebuilt from scratch on the
    /// next [`rebuild`](Self::rebuild).
    pub fn set_config(&mut self, config: TableViewConfig) {
        if !config.read_only {
            self.selected = None;
        }
        self.factory.set_options(ValueViewOptions::from(&config));
        self.config = config;
        self.clear_grid();
        self.tree.set_full_rerender();
    }

    /// Returns `true` in read-only mode.
    pub fn is_read_only(&self) -> bool {
        self.config.read_only
    }

    /// The value view factory, for registering custom views.
    ///
    /// Views already built are kept until their row is rebuilt.
    pub fn factory_mut(&mut self) -> &mut ValueViewFactory {
        &mut self.factory
    }

    /// Installs a per-cell style hook.
    pub fn set_style_fn<F>(&mut self, style: F)
    where
        F: Fn(&mut CellWidget, usize, usize, &dyn ValueView) + Send + Sync + 'static,
    {
        self.style_fn = Some(Box::new(style));
    }

    /// Removes the per-cell style hook.
    pub fn clear_style_fn(&mut self) {
        self.style_fn = None;
    }

    /// Change notifications.
    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// The widget tree.
    pub fn tree(&self) -> &W {
        &self.tree
    }

    /// The widget tree, mutably.
    pub fn tree_mut(&mut self) -> &mut W {
        &mut self.tree
    }

    /// Structural state of the grid.
    pub fn state(&self) -> GridState {
        self.state
    }

    /// Active sort.
    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    /// Selected row, if any.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Number of rows in the grid.
    pub fn row_count(&self) -> usize {
        if self.widgets_per_row == 0 {
            0
        } else {
            self.grid.len() / self.widgets_per_row
        }
    }

    /// Widgets per row: index label, one per field, plus add/delete when
    /// editable.
    pub fn widgets_per_row(&self) -> usize {
        self.widgets_per_row
    }

    /// The widget at grid position (`row`, `column`).
    pub fn cell(&self, row: usize, column: usize) -> Option<WidgetId> {
        self.grid.get(self.slot_index(row, column)?).copied().flatten()
    }

    /// The value widget for `field` in `row`.
    pub fn value_widget(&self, row: usize, field: usize) -> Option<WidgetId> {
        if field >= self.fields.len() {
            return None;
        }
        self.cell(row, 1 + field)
    }

    /// The value view for `field` in `row`.
    pub fn value_view(&self, row: usize, field: usize) -> Option<&dyn ValueView> {
        self.values.get(field)?.get(row)?.as_deref()
    }

    /// Header widgets: index label, one per field, then "Add"/"Del".
    pub fn header(&self) -> &[WidgetId] {
        &self.header
    }

    /// Header section of `field`.
    pub fn header_widget(&self, field: usize) -> Option<WidgetId> {
        if field >= self.fields.len() {
            return None;
        }
        self.header.get(1 + field).copied()
    }

    /// The button-box "Add" button.
    pub fn add_button(&self) -> Option<WidgetId> {
        self.add_button
    }

    /// Index into the row-major grid. `None` past the last column or on
    /// overflow.
    fn slot_index(&self, row: usize, column: usize) -> Option<usize> {
        if column >= self.widgets_per_row {
            return None;
        }
        row.checked_mul(self.widgets_per_row)?.checked_add(column)
    }

    fn bound_records(&self) -> crate::Result<SharedRecords<T>> {
        self.records
            .clone()
            .ok_or(crate::TableError::Binding(horizon_grid_core::BindingError::NotBound))
    }
}
