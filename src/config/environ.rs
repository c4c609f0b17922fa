//! Write-once-after-read view over environment variables.
//!
//! # Responsibilities
//! - Hold the environment the worker will be launched with
//! - Remember every key that has been read
//! - Refuse writes and deletes of keys that were already read
//!
//! # Design Decisions
//! - Snapshot of the process environment, never mutates the real one
//! - Read tracking is an explicit set, not a wrapper over the map type
//! - `contains_key` and `is_set` are the only lookups that do not count as a read

use std::collections::{BTreeMap, HashSet};

use crate::config::error::{ConfigError, ConfigResult};

/// Mutable key/value environment that forbids overwriting observed keys.
#[derive(Debug, Default, Clone)]
pub struct Environ {
    vars: BTreeMap<String, String>,
    read: HashSet<String>,
}

impl Environ {
    /// Create an empty environ.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current process environment.
    ///
    /// Entries that are not valid UTF-8 are skipped.
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    /// Read a value, marking the key as read.
    ///
    /// The key is marked even when absent, so a later `set` of a key that
    /// someone looked for and did not find is also rejected.
    pub fn get(&mut self, key: &str) -> ConfigResult<&str> {
        self.read.insert(key.to_string());
        self.vars
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))
    }

    /// Write a value. Fails if the key has already been read.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> ConfigResult<()> {
        let key = key.into();
        self.ensure_unread(&key, "set")?;
        self.vars.insert(key, value.into());
        Ok(())
    }

    /// Write a value only if the key is absent.
    pub fn set_default(&mut self, key: &str, value: &str) -> ConfigResult<()> {
        if self.vars.contains_key(key) {
            return Ok(());
        }
        self.set(key, value)
    }

    /// Remove a key. Fails if the key has already been read.
    pub fn delete(&mut self, key: &str) -> ConfigResult<Option<String>> {
        self.ensure_unread(key, "delete")?;
        Ok(self.vars.remove(key))
    }

    /// Presence check that does not mark the key as read.
    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Presence check that treats an empty value as unset. Does not mark the key as read.
    pub fn is_set(&self, key: &str) -> bool {
        self.vars.get(key).is_some_and(|value| !value.is_empty())
    }

    /// Whether `key` has been read through this instance.
    pub fn has_been_read(&self, key: &str) -> bool {
        self.read.contains(key)
    }

    /// Iterate over the current keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    /// Iterate over all entries without marking them read.
    ///
    /// Used to hand the final environment to the worker process.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    fn ensure_unread(&self, key: &str, operation: &'static str) -> ConfigResult<()> {
        if self.read.contains(key) {
            return Err(ConfigError::EnvironConflict {
                key: key.to_string(),
                operation,
            });
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environ {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            read: HashSet::new(),
        }
    }
}
