//! Layered configuration resolution with casting.
//!
//! # Precedence
//! ```text
//! Environ (process environment)
//!     → FileOverrides (.env style file)
//!     → caller-supplied default
//!     → ConfigError::Missing
//! ```
//!
//! Every setting declares its type at the call site; the resolver gives
//! all of them the same error shape.

use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use crate::config::environ::Environ;
use crate::config::error::{ConfigError, ConfigResult};
use crate::config::overrides::FileOverrides;
use crate::config::sources::{first_match, ConfigValue, DefaultValue};

/// Settings resolver over the environ and an optional override file.
#[derive(Debug)]
pub struct Config {
    environ: Environ,
    file_values: FileOverrides,
}

impl Config {
    pub fn new(environ: Environ, file_values: FileOverrides) -> Self {
        Self {
            environ,
            file_values,
        }
    }

    /// Build a resolver, loading overrides from `env_file` if it exists.
    pub fn with_env_file(environ: Environ, env_file: &Path) -> ConfigResult<Self> {
        Ok(Self::new(environ, FileOverrides::load(env_file)?))
    }

    pub fn environ(&self) -> &Environ {
        &self.environ
    }

    pub fn environ_mut(&mut self) -> &mut Environ {
        &mut self.environ
    }

    pub fn into_environ(self) -> Environ {
        self.environ
    }

    /// Select the raw value for `key` across all tiers.
    pub fn resolve(&mut self, key: &str, default: Option<&str>) -> ConfigResult<ConfigValue> {
        let mut default = DefaultValue(default.map(str::to_string));
        first_match(key, &mut [&mut self.environ, &mut self.file_values, &mut default])
            .ok_or_else(|| ConfigError::Missing(key.to_string()))
    }

    /// Raw string value, no cast.
    pub fn get(&mut self, key: &str, default: Option<&str>) -> ConfigResult<String> {
        Ok(self.resolve(key, default)?.raw)
    }

    /// Raw string value that may legitimately be absent.
    pub fn get_optional(&mut self, key: &str) -> ConfigResult<Option<String>> {
        Ok(self.lookup(key).map(|value| value.raw))
    }

    /// Boolean value: `true`/`1` and `false`/`0`, case-insensitive.
    pub fn get_bool(&mut self, key: &str, default: Option<bool>) -> ConfigResult<bool> {
        self.get_with(key, "bool", parse_bool, default)
    }

    /// Value parsed with the target type's `FromStr`.
    pub fn get_parsed<T>(&mut self, key: &str, default: Option<T>) -> ConfigResult<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let target = short_type_name::<T>();
        self.get_with(key, target, str::parse::<T>, default)
    }

    /// Value converted by an arbitrary cast function.
    ///
    /// `cast_name` is reported in the error when the conversion fails.
    /// A typed `default` is returned as-is.
    pub fn get_with<T, E, F>(
        &mut self,
        key: &str,
        cast_name: &str,
        cast: F,
        default: Option<T>,
    ) -> ConfigResult<T>
    where
        F: FnOnce(&str) -> Result<T, E>,
        E: Display,
    {
        match self.lookup(key) {
            Some(value) => cast(&value.raw).map_err(|e| {
                tracing::debug!(key = %key, tier = %value.tier, error = %e, "Config cast failed");
                ConfigError::Cast {
                    key: key.to_string(),
                    value: value.raw.clone(),
                    target: cast_name.to_string(),
                }
            }),
            None => default.ok_or_else(|| ConfigError::Missing(key.to_string())),
        }
    }

    fn lookup(&mut self, key: &str) -> Option<ConfigValue> {
        first_match(key, &mut [&mut self.environ, &mut self.file_values])
    }
}

/// The accepted boolean literals.
pub fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.to_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(format!("'{}' is not one of true, 1, false, 0", other)),
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(env: &[(&str, &str)], file: &str) -> Config {
        Config::new(env.iter().copied().collect(), FileOverrides::parse(file))
    }

    #[test]
    fn test_precedence() {
        let mut config = config(&[("TOPIC", "from-env")], "TOPIC=from-file\nONLY_FILE=file");

        assert_eq!(config.get("TOPIC", None).unwrap(), "from-env");
        assert_eq!(config.get("ONLY_FILE", Some("default")).unwrap(), "file");
        assert_eq!(config.get("NOWHERE", Some("default")).unwrap(), "default");
        assert!(matches!(
            config.get("NOWHERE", None),
            Err(ConfigError::Missing(ref key)) if key == "NOWHERE"
        ));
    }

    #[test]
    fn test_resolve_reports_tier() {
        let mut config = config(&[("A", "1")], "B=2");
        assert_eq!(config.resolve("A", None).unwrap().tier, crate::config::Tier::Environment);
        assert_eq!(config.resolve("B", None).unwrap().tier, crate::config::Tier::File);
        assert_eq!(config.resolve("C", Some("3")).unwrap().tier, crate::config::Tier::Default);
    }

    #[test]
    fn test_bool_cast() {
        let mut config = config(
            &[("T1", "true"), ("T2", "1"), ("T3", "TRUE"), ("F1", "false"), ("F2", "0"), ("BAD", "yes")],
            "",
        );
        assert!(config.get_bool("T1", None).unwrap());
        assert!(config.get_bool("T2", None).unwrap());
        assert!(config.get_bool("T3", None).unwrap());
        assert!(!config.get_bool("F1", None).unwrap());
        assert!(!config.get_bool("F2", None).unwrap());
        assert!(!config.get_bool("UNSET", Some(false)).unwrap());

        let err = config.get_bool("BAD", None).unwrap_err();
        match err {
            ConfigError::Cast { key, value, target } => {
                assert_eq!(key, "BAD");
                assert_eq!(value, "yes");
                assert_eq!(target, "bool");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parsed_cast_names_the_type() {
        let mut config = config(&[("PORT", "6066"), ("BAD_PORT", "http")], "");
        assert_eq!(config.get_parsed::<u16>("PORT", None).unwrap(), 6066);
        assert_eq!(config.get_parsed::<u16>("MISSING_PORT", Some(80)).unwrap(), 80);

        let err = config.get_parsed::<u16>("BAD_PORT", None).unwrap_err();
        assert_eq!(err.to_string(), "Config 'BAD_PORT' has value 'http'. Not a valid u16");
    }

    #[test]
    fn test_custom_cast() {
        let mut config = config(&[("SECRET", "not-a-uuid")], "");
        let err = config
            .get_with("SECRET", "UUID", uuid::Uuid::parse_str, None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Cast { ref target, .. } if target == "UUID"));
    }

    #[test]
    fn test_optional() {
        let mut config = config(&[], "VERSION=1.2.3");
        assert_eq!(config.get_optional("VERSION").unwrap().as_deref(), Some("1.2.3"));
        assert_eq!(config.get_optional("KAFKA_URL").unwrap(), None);
    }

    #[test]
    fn test_resolving_marks_environ_read() {
        let mut config = config(&[("KAFKA_TOPIC", "users")], "");
        config.get("KAFKA_TOPIC", None).unwrap();
        assert!(config.environ_mut().set("KAFKA_TOPIC", "other").is_err());
        // Keys served by the default tier stay writable
        config.get("FROM_DEFAULT", Some("x")).unwrap();
        config.environ_mut().set("FROM_DEFAULT", "y").unwrap();
    }
}
