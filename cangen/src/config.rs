//! Optional TOML file supplying defaults for generation options.

use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use serde::Deserialize;

/// Settings read from `--config`. Command line flags take precedence.
///
/// ```toml
/// database_name = "motor"
/// package = "com.example.can"
/// android = true
/// node = "Controller"
/// output_directory = "generated"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub database_name: Option<String>,
    pub package: Option<String>,
    pub android: Option<bool>,
    pub node: Option<String>,
    pub output_directory: Option<PathBuf>,
}

impl Config {
    /// Read a config file, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .wrap_err_with(|| format!("failed to parse config file {}", path.display()))
    }
}
