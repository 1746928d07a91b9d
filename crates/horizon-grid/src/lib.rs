//! Horizon Grid - record-driven table views.
//!
//! This is the main crate. It re-exports the core record and signal APIs
//! and the `#[derive(Record)]` macro, and adds the table view itself.
//!
//! # Example
//!
//! ```
//! use horizon_grid::{Record, StructTableView, TableViewConfig, share_records};
//!
//! #[derive(Debug, Default, Clone, Record)]
//! struct Employee {
//!     #[record(label = "ID")]
//!     id: i64,
//!     name: String,
//!     salary: f64,
//! }
//!
//! let staff = share_records(vec![
//!     Employee { id: 2, name: "Ada".into(), salary: 5200.0 },
//!     Employee { id: 1, name: "Grace".into(), salary: 6100.0 },
//! ]);
//!
//! let mut table = StructTableView::<Employee>::new(TableViewConfig::read_only());
//! table.set_records(staff.clone(), None).unwrap();
//! table.sort_by_field(0).unwrap();
//! table.select(1, true).unwrap();
//!
//! assert_eq!(staff.read()[0].id, 1);
//! assert_eq!(table.selected(), Some(1));
//! ```

pub use horizon_grid_core::*;
pub use horizon_grid_macros::*;

pub mod config;
mod error;
pub mod prelude;
pub mod sort;
pub mod table_view;
pub mod value_view;
pub mod widget;

pub use config::{ConfigError, TableViewConfig};
pub use error::{Result, TableError};
pub use sort::{SortError, sort_records};
pub use table_view::{
    ChangeCause, ChangeNotifier, GridState, SortState, StructTableView, StyleFn, TableEvent,
};
pub use value_view::{
    BoundField, FieldSlot, RecordFieldSlot, SaveCallback, ValueError, ValueView,
    ValueViewFactory, ValueViewOptions,
};
pub use widget::{CellContext, CellWidget, Icon, WidgetArena, WidgetId, WidgetKind, WidgetTree};
