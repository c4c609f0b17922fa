//! Worker Bootstrap Library

pub mod config;
pub mod discovery;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod vault;

pub use config::{BootstrapConfig, Config, Environ, Settings};
pub use lifecycle::{Bootstrap, BootstrapError, BootstrapOptions};
