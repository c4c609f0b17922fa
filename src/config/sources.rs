//! Ordered source lookup.
//!
//! Settings and vault credentials are both "ask each source in turn, the
//! first one with a value wins". This module is that loop, once.

use crate::config::environ::Environ;
use crate::config::overrides::FileOverrides;

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Environment,
    File,
    Default,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Tier::Environment => "environment",
            Tier::File => "file",
            Tier::Default => "default",
        };
        f.write_str(name)
    }
}

/// A raw value selected for a key, before casting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValue {
    pub key: String,
    pub raw: String,
    pub tier: Tier,
}

/// A single tier that may or may not hold a value for a key.
pub trait Source {
    fn tier(&self) -> Tier;

    fn fetch(&mut self, key: &str) -> Option<String>;
}

/// Ask each source in order and return the first value found.
pub fn first_match(key: &str, sources: &mut [&mut dyn Source]) -> Option<ConfigValue> {
    sources.iter_mut().find_map(|source| {
        source.fetch(key).map(|raw| ConfigValue {
            key: key.to_string(),
            raw,
            tier: source.tier(),
        })
    })
}

impl Source for Environ {
    fn tier(&self) -> Tier {
        Tier::Environment
    }

    fn fetch(&mut self, key: &str) -> Option<String> {
        // Only keys actually served from here count as read
        if !self.contains_key(key) {
            return None;
        }
        self.get(key).ok().map(str::to_string)
    }
}

impl Source for FileOverrides {
    fn tier(&self) -> Tier {
        Tier::File
    }

    fn fetch(&mut self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }
}

/// Caller-supplied fallback value.
#[derive(Debug, Clone, Default)]
pub struct DefaultValue(pub Option<String>);

impl Source for DefaultValue {
    fn tier(&self) -> Tier {
        Tier::Default
    }

    fn fetch(&mut self, _key: &str) -> Option<String> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_source_wins() {
        let mut environ: Environ = [("A", "env")].into_iter().collect();
        let mut file = FileOverrides::parse("A=file\nB=file");
        let mut default = DefaultValue(Some("default".into()));

        let value = first_match("A", &mut [&mut environ, &mut file, &mut default]).unwrap();
        assert_eq!(value.raw, "env");
        assert_eq!(value.tier, Tier::Environment);

        let value = first_match("B", &mut [&mut environ, &mut file, &mut default]).unwrap();
        assert_eq!(value.tier, Tier::File);

        let value = first_match("C", &mut [&mut environ, &mut file, &mut default]).unwrap();
        assert_eq!(value.raw, "default");
        assert_eq!(value.tier, Tier::Default);
    }

    #[test]
    fn test_no_match_and_read_marking() {
        let mut environ: Environ = [("A", "env")].into_iter().collect();
        let mut file = FileOverrides::default();

        assert!(first_match("B", &mut [&mut environ, &mut file]).is_none());
        // A miss in the environ tier does not lock the key
        assert!(!environ.has_been_read("B"));

        first_match("A", &mut [&mut environ, &mut file]);
        assert!(environ.has_been_read("A"));
    }
}
