//! Compiler configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for module generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Prefix of every generated defining function (`define`, `define0`, ...)
    pub define_prefix: String,

    /// Host used to build fetch-import URLs
    pub raw_base_url: String,

    /// Ref used when a resource does not name one
    pub default_ref: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            define_prefix: "define".to_string(),
            raw_base_url: "https://github.com".to_string(),
            default_ref: "main".to_string(),
        }
    }
}

impl CompilerConfig {
    /// Load a configuration from a JSON file. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&raw)
    }

    /// Parse a configuration from JSON text.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Override the defining-function prefix.
    pub fn with_define_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.define_prefix = prefix.into();
        self
    }

    /// Override the fetch-import host.
    pub fn with_raw_base_url(mut self, url: impl Into<String>) -> Self {
        self.raw_base_url = url.into();
        self
    }

    /// Check that the prefix can name a JavaScript function.
    pub fn validate(&self) -> Result<()> {
        let mut chars = self.define_prefix.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$');
        if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') {
            return Err(Error::Config(format!(
                "`{}` is not a valid function name prefix",
                self.define_prefix
            )));
        }
        Ok(())
    }
}
