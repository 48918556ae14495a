use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One category entry as it appears in a catalog configuration file.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CategoryConfig {
    /// Category name, also used as its key.
    pub name: String,

    /// Display text for the category.
    #[serde(default)]
    pub description: String,

    /// Upper bound for points in this category. Must be positive.
    pub max_points: i64,
}

/// Configuration describing the reputation catalog.
///
/// ```toml
/// log_level = "info"
///
/// [[categories]]
/// name = "Kind"
/// description = "Helps others"
/// max_points = 100
/// ```
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct CatalogConfig {
    /// Optional log level string (e.g., "info", "debug", "simrep_reputation=trace").
    pub log_level: Option<String>,

    /// Categories in definition order.
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
}

impl CatalogConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Sample catalog used when no configuration file is supplied.
    pub fn default_sims() -> Self {
        let entry = |name: &str, description: &str, max_points| CategoryConfig {
            name: name.to_string(),
            description: description.to_string(),
            max_points,
        };
        Self {
            log_level: None,
            categories: vec![
                entry("Kind", "Known for helping others", 100),
                entry("Funny", "Known for making others laugh", 50),
                entry("Mean", "Known for hurting others", 100),
                entry("Generous", "Known for sharing wealth", 100),
            ],
        }
    }
}
