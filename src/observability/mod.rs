//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!
//! logging.rs:
//!     → EnvFilter (RUST_LOG or profile default)
//!     → JSON lines (start) or human-readable (development, check)
//!     → stdout
//! ```
//!
//! # Design Decisions
//! - Secret values never appear in events, only key names
//! - Subscriber is installed once, before the first pipeline step

pub mod logging;

pub use logging::{init_logging, LogFormat};
