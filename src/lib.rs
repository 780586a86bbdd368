//! Connection-lifecycle core of a host-scored connection pool.
//!
//! # Architecture Overview
//!
//! ```text
//!        pool (external)                         caller
//!    ┌──────────────────────┐             ┌──────────────────┐
//!    │ host selection       │──bind_host─▶│   Arc<Conn>      │
//!    │ scoring              │             │  Active ⇄ Idle   │
//!    │ collector loop ◀─────┼─Collector───┤  idle monitor    │
//!    └──────────▲───────────┘             └────────┬─────────┘
//!               │                                  │
//!               └──── Host::release_conn ◀─release(err, score)
//! ```
//!
//! A [`Conn`] wraps a caller-defined connection object. Marking it idle arms
//! a single-shot timer whose monitor task hands the connection to the pool's
//! [`Collector`] on expiry; marking it active again cancels the timer and
//! reports whether it was stopped in time. Releasing it detaches it from its
//! [`Host`] exactly once, forwarding the outcome and a health score.

pub mod config;
pub mod conn;
pub mod error;
pub mod observability;
pub mod pool;

pub use config::PoolConfig;
pub use conn::{Cancel, Conn, ConnectionId, ConnectionState, StreamConnection};
pub use error::{BoxError, PoolError, PoolResult};
pub use pool::{Collector, CollectorReceiver, Host, IdlePolicy};
