//! Table view configuration.
//!
//! [`TableViewConfig`] can be built in code with the `with_*` methods or
//! loaded from TOML. Missing keys take their default values.
//!
//! ```
//! use horizon_grid::TableViewConfig;
//!
//! let config = TableViewConfig::from_toml_str(r#"
//! read_only = true
//! float_precision = 2
//! "#).unwrap();
//!
//! assert!(config.read_only);
//! assert!(config.auto_rebuild);
//! assert_eq!(config.float_precision, Some(2));
//! ```

use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

/// Default `chrono` format string for timestamp cells.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors that can occur while loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed or has invalid values.
    #[error("invalid table view configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration file could not be read.
    #[error("failed to read table view configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value parsed but is not usable.
    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: &'static str, message: String },
}

/// Settings that control how a table view builds and behaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableViewConfig {
    /// Show values without editors, enable row selection, hide add/delete.
    pub read_only: bool,
    /// Rebuild the grid immediately after insert and delete.
    pub auto_rebuild: bool,
    /// Show the button-box "Add" button in editable mode.
    pub show_add_button: bool,
    /// Minimum digits of the zero-padded row index label.
    pub index_width: usize,
    /// Fixed number of decimals for float cells. `None` prints the shortest
    /// representation that round-trips.
    pub float_precision: Option<usize>,
    /// `chrono` format string for timestamp cells.
    pub timestamp_format: String,
}

impl Default for TableViewConfig {
    fn default() -> Self {
        Self {
            read_only: false,
            auto_rebuild: true,
            show_add_button: true,
            index_width: 5,
            float_precision: None,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl TableViewConfig {
    /// Creates the default (editable) configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a read-only configuration.
    pub fn read_only() -> Self {
        Self::default().with_read_only(true)
    }

    /// Parses a configuration from a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Serializes the configuration to a TOML document.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Sets read-only mode.
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Sets whether insert and delete rebuild immediately.
    pub fn with_auto_rebuild(mut self, auto_rebuild: bool) -> Self {
        self.auto_rebuild = auto_rebuild;
        self
    }

    /// Sets whether the button-box "Add" button is shown.
    pub fn with_add_button(mut self, show: bool) -> Self {
        self.show_add_button = show;
        self
    }

    /// Sets the index label width.
    pub fn with_index_width(mut self, width: usize) -> Self {
        self.index_width = width;
        self
    }

    /// Sets a fixed float precision.
    pub fn with_float_precision(mut self, precision: usize) -> Self {
        self.float_precision = Some(precision);
        self
    }

    /// Sets the timestamp format.
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.timestamp_format.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "timestamp_format",
                message: "must not be empty".into(),
            });
        }
        if StrftimeItems::new(&self.timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::InvalidValue {
                key: "timestamp_format",
                message: format!("'{}' is not a valid strftime format", self.timestamp_format),
            });
        }
        if let Some(precision) = self.float_precision.filter(|p| *p > 17) {
            return Err(ConfigError::InvalidValue {
                key: "float_precision",
                message: format!("{precision} exceeds the 17 significant digits of an f64"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TableViewConfig::default();
        assert!(!config.read_only);
        assert!(config.auto_rebuild);
        assert!(config.show_add_button);
        assert_eq!(config.index_width, 5);
        assert_eq!(config.float_precision, None);
        assert_eq!(config.timestamp_format, DEFAULT_TIMESTAMP_FORMAT);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TableViewConfig::from_toml_str("index_width = 3").unwrap();
        assert_eq!(config.index_width, 3);
        assert!(config.auto_rebuild);
    }

    #[test]
    fn test_unknown_type_is_parse_error() {
        let err = TableViewConfig::from_toml_str("read_only = \"yes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = TableViewConfig::from_toml_str("timestamp_format = \"\"").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "timestamp_format",
                ..
            }
        ));

        let err = TableViewConfig::from_toml_str("timestamp_format = \"%Y-%Q\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = TableViewConfig::from_toml_str("float_precision = 40").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "float_precision",
                ..
            }
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = TableViewConfig::read_only()
            .with_float_precision(3)
            .with_timestamp_format("%d.%m.%Y");
        let text = config.to_toml_string().unwrap();
        assert_eq!(TableViewConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TableViewConfig::from_toml_file("/nonexistent/horizon-grid.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
