//! Core systems for Horizon Grid.
//!
//! This crate provides the foundational pieces the table view is built on:
//!
//! - **Signal/Slot System**: Type-safe, synchronous change notification
//! - **Record Introspection**: The static [`Record`] capability that replaces
//!   runtime reflection, with field descriptors and typed get/set by ordinal
//! - **Errors**: Field access and binding errors
//! - **Logging**: `tracing` targets and span names
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_grid_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```

mod error;
pub mod logging;
pub mod record;
pub mod signal;

pub use error::{BindingError, FieldError, FieldResult};
pub use logging::PerfSpan;
pub use record::{
    FieldDescriptor, FieldKind, FieldRef, FieldType, FieldValue, Record, SharedRecords,
    Timestamp, introspect, share_records,
};
pub use signal::{ConnectionId, Signal};

static_assertions::assert_impl_all!(Signal<()>: Send, Sync);
static_assertions::assert_impl_all!(FieldDescriptor: Copy, Send, Sync);
