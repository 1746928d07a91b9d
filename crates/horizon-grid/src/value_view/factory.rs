//! Field kind to value view registry.

use std::collections::HashMap;
use std::sync::Arc;

use horizon_grid_core::logging::targets;
use horizon_grid_core::record::{FieldKind, FieldValue};

use super::views::{
    FloatValueView, IntValueView, StringValueView, TimestampValueView, UintValueView,
};
use super::ValueView;
use crate::config::{DEFAULT_TIMESTAMP_FORMAT, TableViewConfig};

/// Formatting options passed to view constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueViewOptions {
    /// Fixed number of decimals for float views.
    pub float_precision: Option<usize>,
    /// `chrono` format string for timestamp views.
    pub timestamp_format: String,
}

impl Default for ValueViewOptions {
    fn default() -> Self {
        Self {
            float_precision: None,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl From<&TableViewConfig> for ValueViewOptions {
    fn from(config: &TableViewConfig) -> Self {
        Self {
            float_precision: config.float_precision,
            timestamp_format: config.timestamp_format.clone(),
        }
    }
}

/// Builds a fresh, unbound value view.
pub type ViewConstructor = Arc<dyn Fn(&ValueViewOptions) -> Box<dyn ValueView> + Send + Sync>;

/// Creates value views from field values.
///
/// The registry is closed: only kinds with a registered constructor get a
/// view. [`Default`] registers the five primitive kinds.
pub struct ValueViewFactory {
    constructors: HashMap<FieldKind, ViewConstructor>,
    options: ValueViewOptions,
}

impl Default for ValueViewFactory {
    fn default() -> Self {
        Self::with_options(ValueViewOptions::default())
    }
}

impl ValueViewFactory {
    /// Creates a factory with the default views and the given options.
    pub fn with_options(options: ValueViewOptions) -> Self {
        let mut factory = Self::empty(options);
        factory.register(FieldKind::Int, |_| Box::new(IntValueView::default()));
        factory.register(FieldKind::Uint, |_| Box::new(UintValueView::default()));
        factory.register(FieldKind::Float, |options| {
            Box::new(FloatValueView::new(options.float_precision))
        });
        factory.register(FieldKind::String, |_| Box::new(StringValueView::default()));
        factory.register(FieldKind::Timestamp, |options| {
            Box::new(TimestampValueView::new(options.timestamp_format.clone()))
        });
        factory
    }

    /// Creates a factory with no registered views.
    pub fn empty(options: ValueViewOptions) -> Self {
        Self {
            constructors: HashMap::new(),
            options,
        }
    }

    /// Registers the constructor for `kind`, returning the one it replaces.
    pub fn register<F>(&mut self, kind: FieldKind, constructor: F) -> Option<ViewConstructor>
    where
        F: Fn(&ValueViewOptions) -> Box<dyn ValueView> + Send + Sync + 'static,
    {
        self.constructors.insert(kind, Arc::new(constructor))
    }

    /// Removes the constructor for `kind`.
    pub fn unregister(&mut self, kind: FieldKind) -> Option<ViewConstructor> {
        self.constructors.remove(&kind)
    }

    /// Returns `true` if values of `kind` get a view.
    pub fn supports(&self, kind: FieldKind) -> bool {
        self.constructors.contains_key(&kind)
    }

    /// Current formatting options.
    pub fn options(&self) -> &ValueViewOptions {
        &self.options
    }

    /// Replaces the formatting options used for new views.
    pub fn set_options(&mut self, options: ValueViewOptions) {
        self.options = options;
    }

    /// Creates an unbound view for `value`, or `None` if its kind has no view.
    pub fn view_for(&self, value: &FieldValue) -> Option<Box<dyn ValueView>> {
        self.view_for_kind(value.kind())
    }

    /// Creates an unbound view for values of `kind`.
    pub fn view_for_kind(&self, kind: FieldKind) -> Option<Box<dyn ValueView>> {
        match self.constructors.get(&kind) {
            Some(constructor) => Some(constructor(&self.options)),
            None => {
                tracing::debug!(target: targets::VALUE_VIEW, %kind, "no value view registered");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_view::{BoundField, ValueError};
    use crate::widget::WidgetKind;

    #[test]
    fn test_default_kinds() {
        let factory = ValueViewFactory::default();
        for kind in FieldKind::PRIMITIVES {
            assert!(factory.supports(kind), "{kind} should have a view");
        }
        assert!(!factory.supports(FieldKind::Unsupported));

        let kinds: Vec<_> = [
            FieldValue::Int(1),
            FieldValue::Uint(1),
            FieldValue::Float(1.0),
            FieldValue::String(String::new()),
        ]
        .iter()
        .map(|v| factory.view_for(v).unwrap().widget_kind())
        .collect();
        assert_eq!(
            kinds,
            vec![
                WidgetKind::SpinBox,
                WidgetKind::SpinBox,
                WidgetKind::DoubleSpinBox,
                WidgetKind::LineEdit,
            ]
        );
    }

    #[test]
    fn test_options_reach_views() {
        let factory = ValueViewFactory::with_options(ValueViewOptions {
            float_precision: Some(1),
            timestamp_format: "%Y".into(),
        });
        let view = factory.view_for_kind(FieldKind::Float).unwrap();
        assert_eq!(view.format(&FieldValue::Float(2.26)), "2.3");
    }

    struct Shouting {
        binding: Option<BoundField>,
    }

    impl ValueView for Shouting {
        fn bind(&mut self, field: BoundField) {
            self.binding = Some(field);
        }

        fn binding(&self) -> Option<&BoundField> {
            self.binding.as_ref()
        }

        fn widget_kind(&self) -> WidgetKind {
            WidgetKind::Label
        }

        fn format(&self, value: &FieldValue) -> String {
            match value {
                FieldValue::String(s) => s.to_uppercase(),
                _ => String::new(),
            }
        }

        fn parse(&self, text: &str) -> Result<FieldValue, ValueError> {
            Ok(FieldValue::String(text.to_lowercase()))
        }
    }

    #[test]
    fn test_register_overrides_default() {
        let mut factory = ValueViewFactory::default();
        let previous = factory.register(FieldKind::String, |_| Box::new(Shouting { binding: None }));
        assert!(previous.is_some());

        let view = factory.view_for(&FieldValue::String("hi".into())).unwrap();
        assert_eq!(view.widget_kind(), WidgetKind::Label);
        assert_eq!(view.format(&FieldValue::String("hi".into())), "HI");

        factory.unregister(FieldKind::String);
        assert!(factory.view_for_kind(FieldKind::String).is_none());
    }
}
