//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Pre-flight probe fails:
//!     → backoff.rs (doubling delay, capped, jittered)
//!     → caller sleeps, then retries until its attempt budget is spent
//! ```
//!
//! # Design Decisions
//! - Jitter is additive (0-10%) so the floor schedule is a lower bound
//! - Every probe has a deadline; backoff only spaces the attempts

pub mod backoff;

pub use backoff::Backoff;
