//! Idle timer monitor.
//!
//! # Responsibilities
//! - Arm a single-shot idle deadline for one connection
//! - Run a monitor task waiting on cancellation or expiry
//! - Deliver the connection to the collector on expiry
//!
//! # Cancellation
//! ```text
//!            cancel()                     monitor task
//!               │                              │
//!     Armed ──CAS──▶ Cancelled         Armed ──CAS──▶ Fired
//!               │                              │
//!        stop signal sent              deliver to collector
//! ```
//! Exactly one side wins the gate. A caller that wins is guaranteed no
//! delivery happens; a caller that loses gets [`Cancel::InFlight`].
//!
//! # Design Decisions
//! - No rearming inside the task; a fresh `set_idle` arms a fresh timer
//! - A fired timer is kept by its handle so it is never armed again
//! - The stop signal only wakes the task early, the gate decides

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time;

use crate::conn::handle::Conn;
use crate::observability::metrics;
use crate::pool::collector::Collector;

const ARMED: u8 = 0;
const CANCELLED: u8 = 1;
const FIRED: u8 = 2;

/// Outcome of a cancellation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cancel {
    /// The timer was stopped before expiry; no delivery will happen.
    Cancelled,
    /// The timer already expired; the connection is on its way to the collector.
    InFlight,
}

impl Cancel {
    /// Whether the timer was stopped in time.
    pub fn is_cancelled(self) -> bool {
        matches!(self, Cancel::Cancelled)
    }

    fn as_str(self) -> &'static str {
        match self {
            Cancel::Cancelled => "cancelled",
            Cancel::InFlight => "in_flight",
        }
    }
}

/// An armed idle deadline owned by a connection handle.
#[derive(Debug)]
pub(crate) struct IdleTimer {
    gate: Arc<AtomicU8>,
    stop: Option<oneshot::Sender<()>>,
}

impl IdleTimer {
    /// Arm a timer for `conn` and spawn its monitor task.
    ///
    /// Must be called from within a Tokio runtime.
    pub(crate) fn arm(conn: Arc<Conn>, timeout: Duration, collector: Collector) -> Self {
        let gate = Arc::new(AtomicU8::new(ARMED));
        let (stop_tx, stop_rx) = oneshot::channel();

        tracing::trace!(
            connection_id = %conn.id(),
            ?timeout,
            "Idle timer armed"
        );
        metrics::record_idle_armed();

        tokio::spawn(monitor(conn, timeout, collector, Arc::clone(&gate), stop_rx));

        Self {
            gate,
            stop: Some(stop_tx),
        }
    }

    /// Whether the timer is still pending (neither cancelled nor fired).
    pub(crate) fn is_pending(&self) -> bool {
        self.gate.load(Ordering::Acquire) == ARMED
    }

    /// Try to stop the timer without waiting on the monitor task.
    ///
    /// Once the timer fired every further call reports [`Cancel::InFlight`].
    pub(crate) fn cancel(&mut self) -> Cancel {
        let outcome = match self
            .gate
            .compare_exchange(ARMED, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => {
                if let Some(stop) = self.stop.take() {
                    // Receiver gone means the task already observed the gate.
                    let _ = stop.send(());
                }
                Cancel::Cancelled
            }
            Err(_) => Cancel::InFlight,
        };
        metrics::record_idle_cancel(outcome.as_str());
        outcome
    }
}

async fn monitor(
    conn: Arc<Conn>,
    timeout: Duration,
    collector: Collector,
    gate: Arc<AtomicU8>,
    stop: oneshot::Receiver<()>,
) {
    tokio::select! {
        _ = stop => {
            tracing::trace!(connection_id = %conn.id(), "Idle timer cancelled");
            return;
        }
        _ = time::sleep(timeout) => {}
    }

    if gate
        .compare_exchange(ARMED, FIRED, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        // Cancelled between expiry and the gate check.
        return;
    }

    tracing::debug!(connection_id = %conn.id(), "Connection idle too long, handing to collector");
    metrics::record_idle_expired();

    let id = conn.id();
    if collector.deliver(conn).await.is_err() {
        tracing::warn!(connection_id = %id, "Collector closed, dropping idle connection");
    }
}
