//! Bootstrap configuration validation.
//!
//! Checks the parsed `BootstrapConfig` before any pipeline step runs:
//! liveness attempts and every timeout must be non-zero, the delay cap must
//! not undercut the base delay, the broker scheme and worker program must be
//! usable. An environment listed in both `allow` and `deny` only logs a
//! warning (allow wins at runtime).
//!
//! Problems are collected into one list so a bad config file is fixed in a
//! single round trip.

use crate::config::schema::BootstrapConfig;

pub fn validate_config(config: &BootstrapConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.liveness.max_attempts == 0 {
        errors.push("liveness.max_attempts must be at least 1".to_string());
    }
    if config.liveness.timeout_ms == 0 {
        errors.push("liveness.timeout_ms must be greater than 0".to_string());
    }
    if config.liveness.max_delay_ms < config.liveness.base_delay_ms {
        errors.push("liveness.max_delay_ms must not be below liveness.base_delay_ms".to_string());
    }
    if config.vault.timeout_secs == 0 {
        errors.push("vault.timeout_secs must be greater than 0".to_string());
    }
    if config.discovery.timeout_secs == 0 {
        errors.push("discovery.timeout_secs must be greater than 0".to_string());
    }
    if config.discovery.scheme.is_empty() || config.discovery.scheme.contains("://") {
        errors.push(format!(
            "discovery.scheme '{}' must be a bare scheme name",
            config.discovery.scheme
        ));
    }
    if config.worker.program.trim().is_empty() {
        errors.push("worker.program must not be empty".to_string());
    }

    // Allowed wins anyway, but listing a name twice is almost always a typo
    for name in &config.vault.allow {
        if config.vault.deny.contains(name) {
            tracing::warn!(environment = %name, "Environment is both allowed and denied for vault injection");
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
