//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → metrics exporter → UDP socket → listener group
//!
//! Supervision (group.rs):
//!     Spawn listeners → wait for the first to finish → report its error
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - No restart: a dead listener ends the group, an outside supervisor restarts the process
//! - The group reports errors; only `main` exits the process

pub mod group;
pub mod startup;

pub use group::{run_listener_group, GroupError, GroupState, ListenerGroup};
pub use startup::{start, StartupError};
