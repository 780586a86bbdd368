//! Collector sink and idle policy consumed from the pool.
//!
//! # Responsibilities
//! - Carry idle-expired connections from monitor tasks to the pool
//! - Bundle the idle timeout with the sink it delivers to
//!
//! # Design Decisions
//! - Bounded channel; a full collector applies backpressure to monitors
//! - A zero timeout disables idle tracking entirely

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::IdleConfig;
use crate::conn::Conn;

/// Receiving half of the collector, drained by the pool.
pub type CollectorReceiver = mpsc::Receiver<Arc<Conn>>;

/// Shared sink accepting idle-expired connections.
#[derive(Debug, Clone)]
pub struct Collector {
    tx: mpsc::Sender<Arc<Conn>>,
}

impl Collector {
    /// Create a collector with room for `capacity` pending connections.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn channel(capacity: usize) -> (Self, CollectorReceiver) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Hand a connection to the pool, waiting for capacity.
    ///
    /// Gives the connection back if the pool dropped its receiver.
    pub(crate) async fn deliver(&self, conn: Arc<Conn>) -> Result<(), Arc<Conn>> {
        self.tx.send(conn).await.map_err(|e| e.0)
    }

    /// Whether the pool has stopped collecting.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Idle-tracking settings a handle needs from its pool.
#[derive(Debug, Clone)]
pub struct IdlePolicy {
    timeout: Duration,
    collector: Collector,
}

impl IdlePolicy {
    pub fn new(timeout: Duration, collector: Collector) -> Self {
        Self { timeout, collector }
    }

    /// Build a policy and its collector channel from configuration.
    pub fn from_config(config: &IdleConfig) -> (Self, CollectorReceiver) {
        let (collector, rx) = Collector::channel(config.collector_capacity.max(1));
        (Self::new(config.timeout(), collector), rx)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether idle connections are tracked at all.
    pub fn is_enabled(&self) -> bool {
        !self.timeout.is_zero()
    }

    pub fn collector(&self) -> &Collector {
        &self.collector
    }
}
