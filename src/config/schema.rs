//! Bootstrap configuration schema.
//!
//! Tunes the pipeline itself (gating lists, retry policy, worker command).
//! Worker settings do not live here; they come from the layered resolver.
//! All types derive Serde traits for deserialization from a TOML file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the bootstrap pipeline.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Secret injection settings.
    pub vault: VaultConfig,

    /// Broker discovery settings.
    pub discovery: DiscoveryConfig,

    /// Pre-flight host checks.
    pub liveness: LivenessConfig,

    /// Worker runtime command.
    pub worker: WorkerConfig,
}

/// Secret injection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Environments that always get secrets injected.
    pub allow: Vec<String>,

    /// Environments that skip injection unless allowed.
    pub deny: Vec<String>,

    /// Directory holding the `appid` and `userid` fallback files.
    pub credentials_dir: PathBuf,

    /// HTTP timeout for each vault request in seconds.
    pub timeout_secs: u64,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            allow: Vec::new(),
            deny: vec!["local".to_string(), "development".to_string()],
            credentials_dir: PathBuf::from("."),
            timeout_secs: 10,
        }
    }
}

/// Broker discovery configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Registry request timeout in seconds.
    pub timeout_secs: u64,

    /// Scheme prefixed to each discovered broker.
    pub scheme: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            scheme: "kafka".to_string(),
        }
    }
}

/// Host liveness check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LivenessConfig {
    /// Connect timeout per attempt in milliseconds.
    pub timeout_ms: u64,

    /// Total attempts before the host is declared unavailable.
    pub max_attempts: u32,

    /// Delay after the first failure, doubled on each further failure.
    pub base_delay_ms: u64,

    /// Upper bound for a single backoff delay.
    pub max_delay_ms: u64,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 2_000,
            max_attempts: 5,
            base_delay_ms: 1_000,
            max_delay_ms: 60_000,
        }
    }
}

/// Worker runtime command configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Worker executable.
    pub program: String,

    /// Application reference handed to the worker with `-A`.
    pub app: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            program: "faust".to_string(),
            app: "src.resources:faust_app".to_string(),
        }
    }
}
