//! Pool-side collaborators of a connection handle.
//!
//! # Data Flow
//! ```text
//! Pool lends a connection:
//!     → Conn::bind_host(host)          (host.rs)
//! Caller parks it:
//!     → Conn::set_idle(&IdlePolicy)    (collector.rs)
//!     → on expiry: Collector → pool receiver → pool closes it
//! Caller returns it:
//!     → Conn::release(err, score) → Host::release_conn
//! ```
//!
//! # Design Decisions
//! - The pool owns host selection, scoring and the collector loop;
//!   this module only defines the seams

pub mod collector;
pub mod host;

pub use collector::{Collector, CollectorReceiver, IdlePolicy};
pub use host::Host;
