//! Parser options, loadable from a TOML table.
//!
//! ```toml
//! max_depth = 128
//! max_diagnostics = 50
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid parser options: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Maximum expression nesting before the parser reports
    /// `P006` instead of recursing further. Default: 256.
    pub max_depth: usize,
    /// Stop every recovery loop once this many diagnostics were recorded.
    /// Default: unlimited.
    pub max_diagnostics: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { max_depth: 256, max_diagnostics: None }
    }
}

impl ParseOptions {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }
}
