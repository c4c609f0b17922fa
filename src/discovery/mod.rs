//! Broker discovery subsystem.
//!
//! # Data Flow
//! ```text
//! KAFKA_URL unset AND KAFKA_MANAGER_URL set
//!     → GET KAFKA_MANAGER_URL
//!     → {"brokers": [{"host", "port"}, ...]}
//!     → kafka://host:port;kafka://host:port
//!     → Environ KAFKA_URL
//! ```

pub mod broker;

pub use broker::{BrokerDescriptor, BrokerDiscoverer, DiscoveryError, DiscoveryOutcome};
