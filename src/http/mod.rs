//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection (lifecycle::group)
//!     → server.rs (Axum router, middleware)
//!     → cors.rs (response headers)
//!     → Send to client
//! ```

pub mod cors;
pub mod server;

pub use server::build_router;
