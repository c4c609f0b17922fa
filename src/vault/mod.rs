//! Secret injection subsystem.
//!
//! # Data Flow
//! ```text
//! --environment name
//!     → gating.rs (allow list OR not deny list)
//!     → credentials.rs (VAULT_APP_ID / VAULT_USER_ID, else appid / userid files)
//!     → client.rs (AppID login, token check, read secret/{env}/{ns}/{app})
//!     → injector.rs (merge bundle into Environ, session released)
//! ```
//!
//! # Security Constraints
//! - Secret values and tokens are never logged, only key names
//! - Session token is dropped as soon as the read completes
//! - Injection runs before any setting is read; late merges fail

pub mod client;
pub mod credentials;
pub mod gating;
pub mod injector;
pub mod types;

pub use client::{VaultClient, VaultSession};
pub use credentials::VaultCredential;
pub use gating::should_inject;
pub use injector::{InjectionOutcome, SecretInjector};
pub use types::{SecretBundle, VaultError, VaultResult};
