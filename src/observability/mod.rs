//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Connection handles and idle monitors produce:
//!     → logging.rs (structured log events, `connection_id` field)
//!     → metrics.rs (counters, histograms)
//! ```

pub mod logging;
pub mod metrics;
