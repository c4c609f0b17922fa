//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Environ snapshot
//!     → vault secrets (gated)
//!     → application defaults
//!     → override file
//!     → broker discovery
//!     → host liveness checks
//!     → Settings
//!
//! Launch (worker.rs):
//!     Settings + WorkerConfig → worker command line
//!     → spawn with the resolved environ → exit code
//! ```
//!
//! # Design Decisions
//! - Ordered startup: writers first, readers last
//! - Fail fast: nothing is launched after a failed step
//! - No partial bootstrap mode

pub mod startup;
pub mod worker;

pub use startup::{Bootstrap, BootstrapError, BootstrapOptions, Prepared};
pub use worker::{Profile, WorkerCommand, WorkerError};
