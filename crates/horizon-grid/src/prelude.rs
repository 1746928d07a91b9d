//! Prelude module for Horizon Grid.
//!
//! ```
//! use horizon_grid::prelude::*;
//! ```

pub use crate::config::TableViewConfig;
pub use crate::record::{FieldKind, FieldValue, Record, SharedRecords, share_records};
pub use crate::table_view::{ChangeCause, StructTableView, TableEvent};
pub use crate::value_view::{SaveCallback, ValueView};
pub use crate::widget::{CellContext, WidgetArena, WidgetId, WidgetKind, WidgetTree};
pub use horizon_grid_macros::Record;
