//! Host liveness subsystem.
//!
//! # Data Flow
//! ```text
//! --check-host host:port (repeatable)
//!     → HostSpec
//!     → liveness.rs (TCP connect + shutdown, timeout per attempt)
//!     → on failure: resilience::Backoff delay, retry
//!     → attempts exhausted: HostUnavailable, bootstrap aborts
//! ```
//!
//! # Design Decisions
//! - Reachability only; no protocol-level health check
//! - Hosts are checked sequentially in the order given

pub mod liveness;

pub use liveness::{HostSpec, LivenessChecker, LivenessError, LivenessReport, Probe, TcpProbe};
