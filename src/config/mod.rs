//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment
//!     → environ.rs (snapshot, write-once-after-read)
//!     ← injectors write secrets / defaults / broker URL
//!
//! .env override file
//!     → overrides.rs (KEY=VALUE parsing)
//!
//! Environ + FileOverrides + default
//!     → sources.rs (ordered lookup, first match wins)
//!     → resolver.rs (casting, uniform errors)
//!     → settings.rs (typed worker settings)
//!
//! bootstrap.toml (optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → BootstrapConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - A key read once can never be written again; late writers fail loudly
//! - Override file is optional; its absence is not an error
//! - Validation separates syntactic (serde) from semantic checks

pub mod environ;
pub mod error;
pub mod loader;
pub mod overrides;
pub mod resolver;
pub mod schema;
pub mod settings;
pub mod sources;
pub mod validation;

pub use environ::Environ;
pub use error::{ConfigError, ConfigResult};
pub use overrides::FileOverrides;
pub use resolver::Config;
pub use schema::{BootstrapConfig, DiscoveryConfig, LivenessConfig, VaultConfig, WorkerConfig};
pub use settings::Settings;
pub use sources::{ConfigValue, Tier};
