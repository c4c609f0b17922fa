//! Environment gating for secret injection.

/// Decide whether secrets are injected for `environment`.
///
/// Runs when the name is explicitly allowed, or when it is not denied.
/// A name on neither list is injected.
pub fn should_inject(environment: &str, allow: &[String], deny: &[String]) -> bool {
    allow.iter().any(|name| name == environment) || !deny.iter().any(|name| name == environment)
}
