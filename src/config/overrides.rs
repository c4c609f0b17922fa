//! `KEY=VALUE` override file, the second configuration tier.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::config::error::{ConfigError, ConfigResult};

/// Immutable key/value pairs parsed from an override file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileOverrides {
    values: HashMap<String, String>,
}

impl FileOverrides {
    /// Load overrides from `path`. A missing file yields an empty map.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "No override file, skipping");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let overrides = Self::parse(&content);

        tracing::debug!(
            path = %path.display(),
            keys = overrides.len(),
            "Override file loaded"
        );
        Ok(overrides)
    }

    /// Parse override file content.
    ///
    /// Lines without `=` and `#` comments are ignored. Later keys win.
    pub fn parse(content: &str) -> Self {
        let mut values = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            values.insert(key.trim().to_string(), strip_quotes(value.trim()).to_string());
        }
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Strip one layer of matching `"` or `'` quotes.
fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
