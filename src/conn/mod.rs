//! Connection lifecycle subsystem.
//!
//! # Data Flow
//! ```text
//! User object
//!     → payload.rs (opaque or stream capability)
//!     → handle.rs (Conn: Active ⇄ Idle → Closed)
//!         → idle.rs (per-connection monitor task, delivers to collector)
//!         → release.rs (hand back to host with error + score)
//! ```
//!
//! # Design Decisions
//! - Handles are shared as `Arc<Conn>`; no global lock
//! - Timer cancellation is lock-free and reports its outcome
//! - Release clears the host binding before forwarding

pub mod handle;
pub mod id;
pub mod idle;
pub mod payload;
mod release;

pub use handle::Conn;
pub use id::{ConnectionId, ConnectionState};
pub use idle::Cancel;
pub use payload::{Payload, StreamConnection};
