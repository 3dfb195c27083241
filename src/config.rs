//! Explicit run configuration, replacing a global-singleton config pattern
//! with a value threaded in at construction.

use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogerConfig {
    #[serde(default)]
    pub format: FormatConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormatConfig {
    #[serde(rename = "include-cpe", default)]
    pub include_cpe: bool,
    #[serde(rename = "count-external", default)]
    pub count_external: bool,
}

impl CatalogerConfig {
    /// Loads config from `path` if given, falling back to all-`false` defaults
    /// when no `--config` flag was passed.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}
