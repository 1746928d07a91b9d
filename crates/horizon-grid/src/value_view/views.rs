//! Built-in value views for the primitive field kinds.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use horizon_grid_core::record::{FieldKind, FieldValue};

use super::{BoundField, ValueError, ValueView};
use crate::config::DEFAULT_TIMESTAMP_FORMAT;
use crate::widget::WidgetKind;

/// Signed integer view, edited with a spin box.
#[derive(Debug, Default)]
pub struct IntValueView {
    binding: Option<BoundField>,
}

impl ValueView for IntValueView {
    fn bind(&mut self, field: BoundField) {
        self.binding = Some(field);
    }

    fn binding(&self) -> Option<&BoundField> {
        self.binding.as_ref()
    }

    fn widget_kind(&self) -> WidgetKind {
        WidgetKind::SpinBox
    }

    fn format(&self, value: &FieldValue) -> String {
        match value {
            FieldValue::Int(v) => v.to_string(),
            other => fallback(other),
        }
    }

    fn parse(&self, text: &str) -> Result<FieldValue, ValueError> {
        text.trim()
            .parse::<i64>()
            .map(FieldValue::Int)
            .map_err(|err| ValueError::parse(text, FieldKind::Int, err))
    }
}

/// Unsigned integer view, edited with a spin box.
#[derive(Debug, Default)]
pub struct UintValueView {
    binding: Option<BoundField>,
}

impl ValueView for UintValueView {
    fn bind(&mut self, field: BoundField) {
        self.binding = Some(field);
    }

    fn binding(&self) -> Option<&BoundField> {
        self.binding.as_ref()
    }

    fn widget_kind(&self) -> WidgetKind {
        WidgetKind::SpinBox
    }

    fn format(&self, value: &FieldValue) -> String {
        match value {
            FieldValue::Uint(v) => v.to_string(),
            other => fallback(other),
        }
    }

    fn parse(&self, text: &str) -> Result<FieldValue, ValueError> {
        text.trim()
            .parse::<u64>()
            .map(FieldValue::Uint)
            .map_err(|err| ValueError::parse(text, FieldKind::Uint, err))
    }
}

/// Floating point view, edited with a double spin box.
#[derive(Debug, Default)]
pub struct FloatValueView {
    binding: Option<BoundField>,
    precision: Option<usize>,
}

impl FloatValueView {
    /// Creates a view that prints a fixed number of decimals, or the
    /// shortest round-tripping representation for `None`.
    pub fn new(precision: Option<usize>) -> Self {
        Self {
            binding: None,
            precision,
        }
    }
}

impl ValueView for FloatValueView {
    fn bind(&mut self, field: BoundField) {
        self.binding = Some(field);
    }

    fn binding(&self) -> Option<&BoundField> {
        self.binding.as_ref()
    }

    fn widget_kind(&self) -> WidgetKind {
        WidgetKind::DoubleSpinBox
    }

    fn format(&self, value: &FieldValue) -> String {
        match (value, self.precision) {
            (FieldValue::Float(v), Some(precision)) => format!("{v:.precision$}"),
            (FieldValue::Float(v), None) => v.to_string(),
            (other, _) => fallback(other),
        }
    }

    fn parse(&self, text: &str) -> Result<FieldValue, ValueError> {
        text.trim()
            .parse::<f64>()
            .map(FieldValue::Float)
            .map_err(|err| ValueError::parse(text, FieldKind::Float, err))
    }
}

/// String view, edited with a line edit. Text is taken verbatim.
#[derive(Debug, Default)]
pub struct StringValueView {
    binding: Option<BoundField>,
}

impl ValueView for StringValueView {
    fn bind(&mut self, field: BoundField) {
        self.binding = Some(field);
    }

    fn binding(&self) -> Option<&BoundField> {
        self.binding.as_ref()
    }

    fn widget_kind(&self) -> WidgetKind {
        WidgetKind::LineEdit
    }

    fn format(&self, value: &FieldValue) -> String {
        match value {
            FieldValue::String(s) => s.clone(),
            other => fallback(other),
        }
    }

    fn parse(&self, text: &str) -> Result<FieldValue, ValueError> {
        Ok(FieldValue::String(text.to_owned()))
    }
}

/// Timestamp view, edited with a date/time editor.
///
/// Displays with a `chrono` format string. Accepts RFC 3339 input, the
/// display format (read as UTC) or a bare `YYYY-MM-DD` date (midnight UTC).
#[derive(Debug)]
pub struct TimestampValueView {
    binding: Option<BoundField>,
    format: String,
}

impl Default for TimestampValueView {
    fn default() -> Self {
        Self::new(DEFAULT_TIMESTAMP_FORMAT)
    }
}

impl TimestampValueView {
    /// Creates a view with the given display format.
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            binding: None,
            format: format.into(),
        }
    }
}

impl ValueView for TimestampValueView {
    fn bind(&mut self, field: BoundField) {
        self.binding = Some(field);
    }

    fn binding(&self) -> Option<&BoundField> {
        self.binding.as_ref()
    }

    fn widget_kind(&self) -> WidgetKind {
        WidgetKind::DateTimeEdit
    }

    fn format(&self, value: &FieldValue) -> String {
        match value {
            FieldValue::Timestamp(t) => {
                let mut out = String::new();
                // Invalid format strings surface as a fmt error, not a panic.
                if write!(out, "{}", t.format(&self.format)).is_err() {
                    return t.to_rfc3339();
                }
                out
            }
            other => fallback(other),
        }
    }

    fn parse(&self, text: &str) -> Result<FieldValue, ValueError> {
        let text_trimmed = text.trim();
        if let Ok(t) = DateTime::parse_from_rfc3339(text_trimmed) {
            return Ok(FieldValue::Timestamp(t.with_timezone(&Utc)));
        }
        if let Ok(t) = NaiveDateTime::parse_from_str(text_trimmed, &self.format) {
            return Ok(FieldValue::Timestamp(t.and_utc()));
        }
        let date = NaiveDate::parse_from_str(text_trimmed, "%Y-%m-%d")
            .map_err(|err| ValueError::parse(text, FieldKind::Timestamp, err))?;
        date.and_hms_opt(0, 0, 0)
            .map(|t| FieldValue::Timestamp(t.and_utc()))
            .ok_or_else(|| ValueError::parse(text, FieldKind::Timestamp, "invalid date"))
    }
}

fn fallback(value: &FieldValue) -> String {
    tracing::debug!(
        target: horizon_grid_core::logging::targets::VALUE_VIEW,
        kind = %value.kind(),
        "value of unexpected kind for view"
    );
    match value {
        FieldValue::Int(v) => v.to_string(),
        FieldValue::Uint(v) => v.to_string(),
        FieldValue::Float(v) => v.to_string(),
        FieldValue::String(s) => s.clone(),
        FieldValue::Timestamp(t) => t.to_rfc3339(),
        FieldValue::Unsupported(ty) => format!("<{ty}>"),
    }
}
