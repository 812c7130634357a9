//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Accept loops, UDP setup, listener group produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Retry and buffer-tuning events use the fixed `bootstrap` target
//! - Metrics are cheap (atomic increments) and no-ops without an exporter

pub mod logging;
pub mod metrics;
