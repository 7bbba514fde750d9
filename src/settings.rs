//! Global seeder settings, optionally loaded from a YAML or JSON file.

use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Marker used when none is configured.
pub const DEFAULT_EMPTY_STRING_MARKER: &str = "$EMPTY$";

/// Conversion conventions shared by all entities.
///
/// # Example
///
/// ```yaml
/// empty_string_marker: "%%"
/// decimal_separator: ","
/// date_formats: ["%Y/%m/%d", "%d.%m.%Y"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeederSettings {
    /// Raw value that stands for the empty string. Setting it counts as an
    /// explicit marker for the string-override conflict check.
    pub empty_string_marker: Option<String>,

    pub decimal_separator: char,

    /// `chrono` formats for plain dates, tried in order
    pub date_formats: Vec<String>,

    /// `chrono` formats for date-times, tried before `date_formats`
    pub datetime_formats: Vec<String>,
}

impl Default for SeederSettings {
    fn default() -> Self {
        Self {
            empty_string_marker: None,
            decimal_separator: ',',
            date_formats: vec![
                "%Y/%m/%d".to_string(),
                "%Y-%m-%d".to_string(),
                "%d.%m.%Y".to_string(),
            ],
            datetime_formats: vec![
                "%Y/%m/%d %H:%M:%S".to_string(),
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y-%m-%dT%H:%M:%S".to_string(),
                "%d.%m.%Y %H:%M:%S".to_string(),
            ],
        }
    }
}

impl SeederSettings {
    /// Load settings from a YAML (or JSON) file. Missing keys keep their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let settings: SeederSettings =
            serde_yaml::from_str(&contents).map_err(|source| SettingsError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        tracing::debug!("Loaded seeder settings from {}", path.display());
        Ok(settings)
    }
}
