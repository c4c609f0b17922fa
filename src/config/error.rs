//! Configuration error definitions.

use thiserror::Error;

/// Errors raised while reading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A key was written or deleted after something already read it.
    #[error("Attempting to {operation} environ['{key}'], but the value has already been read")]
    EnvironConflict { key: String, operation: &'static str },

    /// The key is not present in the environ.
    #[error("Key '{0}' not found in environ")]
    KeyNotFound(String),

    /// No tier produced a value and no default was supplied.
    #[error("Config '{0}' is missing, and has no default")]
    Missing(String),

    /// The value exists but cannot be converted to the requested type.
    #[error("Config '{key}' has value '{value}'. Not a valid {target}")]
    Cast {
        key: String,
        value: String,
        target: String,
    },

    /// A configuration file exists but could not be read.
    #[error("IO error reading '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The bootstrap config file is not valid TOML for the schema.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The bootstrap config parsed but failed semantic checks.
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::Cast {
            key: "DEBUG".into(),
            value: "yes".into(),
            target: "bool".into(),
        };
        assert_eq!(err.to_string(), "Config 'DEBUG' has value 'yes'. Not a valid bool");

        let err = ConfigError::EnvironConflict {
            key: "SECRET".into(),
            operation: "set",
        };
        assert!(err.to_string().contains("environ['SECRET']"));

        let err = ConfigError::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "Validation failed: a, b");
    }
}
