//! Connection identity and derived lifecycle state.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Process-wide sequence number of a [`Conn`](crate::Conn) handle.
///
/// Shows up as `connection_id` in every tracing event about the handle.
/// Numbers start at 1 and are never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub(crate) fn next() -> Self {
        Self(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Lifecycle state of a connection handle.
///
/// Not stored directly: derived from the closed flag and the idle timer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Borrowed and in use, no idle timer armed.
    Active,
    /// Waiting with a pending idle timer.
    Idle,
    /// Idle timeout fired; the handle was handed to the collector and can
    /// only be closed from here.
    Expired,
    /// Terminal.
    Closed,
}
