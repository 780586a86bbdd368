//! Host seam: the backend endpoint that owns a borrowed connection.
//!
//! # Responsibilities
//! - Accept released connections with an outcome and a health score
//! - Report the network address connections are dialed against
//!
//! # Design Decisions
//! - Scoring and close decisions belong to the implementor
//! - Release is async so a host may close the underlying stream inline

use std::sync::Arc;
use async_trait::async_trait;

use crate::conn::Conn;
use crate::error::{BoxError, PoolResult};

/// A backend endpoint holding pooled connections.
#[async_trait]
pub trait Host: Send + Sync {
    /// Take back a released connection.
    ///
    /// `err` is the outcome of the last use and `score` a health assessment
    /// in `[0, 1]`. The returned error reaches the releasing caller as is.
    async fn release_conn(
        &self,
        conn: &Arc<Conn>,
        err: Option<BoxError>,
        score: f64,
    ) -> PoolResult<()>;

    /// Network address of this host.
    fn address(&self) -> String;
}
