//! Release protocol: return a borrowed connection to its host.
//!
//! # Responsibilities
//! - Validate the host binding and the health score
//! - Detach the host before forwarding, so re-entry cannot release twice
//! - Pass the host's verdict back to the caller unchanged

use std::sync::Arc;

use crate::conn::handle::Conn;
use crate::error::{BoxError, PoolError, PoolResult};
use crate::observability::metrics;

impl Conn {
    /// Release the connection back to its host.
    ///
    /// `err` describes the outcome of the last use; `score` is the caller's
    /// health assessment in `[0, 1]` (0 worst, 1 best).
    ///
    /// # Errors
    /// - [`PoolError::NoHostAvailable`] if the handle is not bound (never
    ///   borrowed, already released, or closed)
    /// - [`PoolError::InvalidArgument`] if `score` is outside `[0, 1]`; the binding is kept
    /// - whatever the host's release handler returns
    pub async fn release(self: &Arc<Self>, err: Option<BoxError>, score: f64) -> PoolResult<()> {
        let host = match self.take_host(score) {
            Ok(host) => host,
            Err(e) => {
                tracing::debug!(connection_id = %self.id(), score, error = %e, "Release rejected");
                metrics::record_release("rejected", None);
                return Err(e);
            }
        };

        tracing::debug!(
            connection_id = %self.id(),
            address = %host.address(),
            score,
            failed = err.is_some(),
            "Releasing connection to host"
        );
        metrics::record_release("forwarded", Some(score));

        host.release_conn(self, err, score).await
    }

    /// Network address of the host currently holding this connection.
    pub fn address(&self) -> PoolResult<String> {
        self.host()
            .map(|host| host.address())
            .ok_or(PoolError::NoHostAvailable)
    }
}
