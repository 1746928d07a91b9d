//! Logging facilities for Horizon Grid.
//!
//! Horizon Grid uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_grid=debug")
//!         .init();
//! }
//! ```
//!
//! Binding problems are reported at `warn`, cells skipped for lack of a
//! value view at `debug`, signal emissions at `trace`.

/// Span names used throughout Horizon Grid for tracing.
pub mod span_names {
    /// Full structural rebuild of a table grid.
    pub const REBUILD: &str = "horizon_grid::rebuild";
    /// Row refresh pass (after sort or single-row change).
    pub const REFRESH_ROWS: &str = "horizon_grid::refresh_rows";
    /// Sorting a record sequence.
    pub const SORT: &str = "horizon_grid::sort";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "horizon_grid_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_grid_core::signal";
    /// Record introspection target.
    pub const RECORD: &str = "horizon_grid_core::record";
    /// Table view (grid builder, selection, mutation) target.
    pub const TABLE: &str = "horizon_grid::table";
    /// Sort engine target.
    pub const SORT: &str = "horizon_grid::sort";
    /// Value view factory target.
    pub const VALUE_VIEW: &str = "horizon_grid::value_view";
    /// Widget arena target.
    pub const WIDGET: &str = "horizon_grid::widget";
}

/// A performance tracing span guard.
///
/// Enters an `info` span on the `horizon_grid::perf` target for as long as
/// the guard is alive.
///
/// ```
/// use horizon_grid_core::logging::{PerfSpan, span_names};
///
/// {
///     let _span = PerfSpan::new(span_names::REBUILD);
///     // ... timed work ...
/// }
/// ```
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_grid::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_share_prefix() {
        for target in [targets::TABLE, targets::SORT, targets::VALUE_VIEW, targets::WIDGET] {
            assert!(target.starts_with("horizon_grid::"));
        }
        assert!(targets::SIGNAL.starts_with(targets::CORE));
    }

    #[test]
    fn test_perf_span() {
        let _span = PerfSpan::new(span_names::SORT);
    }
}
