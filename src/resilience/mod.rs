//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! accept() fails:
//!     → classify.rs (transient or fatal?)
//!     → transient: backoff.rs picks the next delay, loop sleeps and retries
//!     → fatal: error propagates to the owner of the loop
//! ```
//!
//! # Design Decisions
//! - Transient errors are absorbed next to their source and never bubble up
//! - No restart policy: a dead listener is the supervisor's problem

pub mod backoff;
pub mod classify;

pub use backoff::AcceptBackoff;
pub use classify::is_transient_accept_error;
