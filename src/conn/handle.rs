//! Connection handle and its lifecycle state machine.
//!
//! # States
//! ```text
//! Active ──set_idle──▶ Idle ──set_active──▶ Active
//!    │                   │
//!    │                   └──expiry──▶ Expired ──collector──▶ set_closed
//!    │                                   │
//!    └────────────set_closed─────────────┴──▶ Closed (terminal)
//! ```
//!
//! # Design Decisions
//! - State is derived from the closed flag and the timer slot, never stored
//! - One small lock per slot (timer, host); the payload has its own async lock
//! - `closed` only flips while both slots are held, so a concurrent
//!   `set_idle` or `bind_host` can never touch a closed handle
//! - A fired timer stays in its slot until close; an expired handle cannot
//!   be re-armed or reclaimed

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{MappedMutexGuard, Mutex as AsyncMutex, MutexGuard as AsyncMutexGuard};

use crate::conn::id::{ConnectionId, ConnectionState};
use crate::conn::idle::{Cancel, IdleTimer};
use crate::conn::payload::{Payload, StreamConnection, STREAM_CAPABILITY};
use crate::error::{PoolError, PoolResult};
use crate::pool::collector::IdlePolicy;
use crate::pool::host::Host;

/// A single pooled connection wrapping a caller-defined object.
///
/// Shared as `Arc<Conn>` between the caller, its idle monitor and the
/// pool's collector.
pub struct Conn {
    id: ConnectionId,
    payload: Option<AsyncMutex<Payload>>,
    closed: AtomicBool,
    timer: Mutex<Option<IdleTimer>>,
    host: Mutex<Option<Arc<dyn Host>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Slots hold plain data; a panicked holder cannot leave them half-written.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cancel the timer in `slot`, emptying it only when cancellation won.
fn cancel_slot(slot: &mut Option<IdleTimer>, id: ConnectionId) -> Option<Cancel> {
    let outcome = slot.as_mut()?.cancel();
    match outcome {
        Cancel::Cancelled => *slot = None,
        Cancel::InFlight => {
            tracing::debug!(connection_id = %id, "Idle timer already fired, connection in flight to collector")
        }
    }
    Some(outcome)
}

impl Conn {
    /// Wrap an arbitrary user object.
    pub fn new<T: Any + Send>(object: T) -> Self {
        Self::from_payload(Some(Payload::Opaque(Box::new(object))))
    }

    /// Wrap an object carrying the stream capability.
    pub fn with_stream<S: StreamConnection>(stream: S) -> Self {
        Self::from_payload(Some(Payload::Stream(Box::new(stream))))
    }

    /// A handle with no user object.
    pub fn empty() -> Self {
        Self::from_payload(None)
    }

    fn from_payload(payload: Option<Payload>) -> Self {
        Self {
            id: ConnectionId::next(),
            payload: payload.map(AsyncMutex::new),
            closed: AtomicBool::new(false),
            timer: Mutex::new(None),
            host: Mutex::new(None),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Whether a user object was supplied at construction.
    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    /// Borrow the user object as a `T`.
    ///
    /// Returns `None` when no object was supplied or it is not a `T`.
    pub async fn interface<T: Any>(&self) -> Option<MappedMutexGuard<'_, T>> {
        let payload = self.payload.as_ref()?;
        AsyncMutexGuard::try_map(payload.lock().await, |p| p.downcast_mut::<T>()).ok()
    }

    /// Borrow the user object as a byte stream.
    pub async fn stream(&self) -> PoolResult<MappedMutexGuard<'_, dyn StreamConnection + 'static>> {
        let mismatch = || PoolError::CapabilityMismatch {
            expected: STREAM_CAPABILITY,
        };
        let payload = self.payload.as_ref().ok_or_else(mismatch)?;
        AsyncMutexGuard::try_map(payload.lock().await, |p| p.as_stream_mut().ok())
            .map_err(|_| mismatch())
    }

    /// Associate the handle with the host that currently owns it.
    ///
    /// Called by the pool when lending the connection out. A closed handle
    /// stays unbound; returns whether the binding took.
    pub fn bind_host(&self, host: Arc<dyn Host>) -> bool {
        let mut slot = lock(&self.host);
        if self.is_closed() {
            tracing::debug!(connection_id = %self.id, "Refusing to bind host to closed connection");
            return false;
        }
        tracing::trace!(connection_id = %self.id, address = %host.address(), "Host bound");
        *slot = Some(host);
        true
    }

    /// The host currently bound, if any.
    pub fn host(&self) -> Option<Arc<dyn Host>> {
        lock(&self.host).clone()
    }

    /// Take the host binding for a release with the given score.
    ///
    /// The binding is left untouched when the checks fail.
    pub(super) fn take_host(&self, score: f64) -> PoolResult<Arc<dyn Host>> {
        let mut slot = lock(&self.host);
        if slot.is_none() || self.is_closed() {
            return Err(PoolError::NoHostAvailable);
        }
        if !(0.0..=1.0).contains(&score) {
            return Err(PoolError::InvalidArgument(format!(
                "score {} outside [0, 1]",
                score
            )));
        }
        slot.take().ok_or(PoolError::NoHostAvailable)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn state(&self) -> ConnectionState {
        let timer = lock(&self.timer);
        if self.is_closed() {
            return ConnectionState::Closed;
        }
        match timer.as_ref() {
            Some(timer) if timer.is_pending() => ConnectionState::Idle,
            Some(_) => ConnectionState::Expired,
            None => ConnectionState::Active,
        }
    }

    /// Whether an idle timer is armed and has neither fired nor been cancelled.
    pub fn is_idle_pending(&self) -> bool {
        lock(&self.timer).as_ref().is_some_and(IdleTimer::is_pending)
    }

    /// Mark the connection idle, arming its idle timer.
    ///
    /// Does nothing when idle tracking is disabled, the handle is closed, or
    /// its previous timer already fired. A pending timer is cancelled first.
    /// Returns whether a timer was armed. Must be called from within a Tokio
    /// runtime.
    pub fn set_idle(self: &Arc<Self>, policy: &IdlePolicy) -> bool {
        if !policy.is_enabled() {
            return false;
        }

        let mut slot = lock(&self.timer);
        if self.is_closed() {
            return false;
        }
        if cancel_slot(&mut slot, self.id) == Some(Cancel::InFlight) {
            return false;
        }
        *slot = Some(IdleTimer::arm(
            Arc::clone(self),
            policy.timeout(),
            policy.collector().clone(),
        ));
        true
    }

    /// Mark the connection active again, cancelling its idle timer.
    ///
    /// Returns `true` if there was no timer or it was stopped in time.
    /// `false` means the timer already expired (the connection may be
    /// mid-eviction) or the handle is closed. An expired handle keeps
    /// reporting `false`.
    pub fn set_active(&self) -> bool {
        let mut slot = lock(&self.timer);
        if self.is_closed() {
            return false;
        }
        cancel_slot(&mut slot, self.id).map_or(true, Cancel::is_cancelled)
    }

    /// Cancel the idle timer, reporting how the race with expiry ended.
    ///
    /// `None` when no timer was armed.
    pub fn cancel_idle(&self) -> Option<Cancel> {
        cancel_slot(&mut lock(&self.timer), self.id)
    }

    /// Mark the connection closed. Irreversible.
    ///
    /// Cancels any idle timer on a best-effort basis; a timer that already
    /// fired still delivers, so collectors must check [`Conn::is_closed`].
    /// Any host binding is dropped, so a closed handle cannot be released.
    pub fn set_closed(&self) {
        let mut timer = lock(&self.timer);
        let mut host = lock(&self.host);
        if let Some(mut previous) = timer.take() {
            let _ = previous.cancel();
        }
        self.closed.store(true, Ordering::Release);
        if host.take().is_some() {
            tracing::debug!(connection_id = %self.id, "Host binding dropped on close");
        }
        tracing::trace!(connection_id = %self.id, "Connection closed");
    }
}

impl std::fmt::Debug for Conn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conn")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("has_payload", &self.has_payload())
            .field("host", &self.host().map(|h| h.address()))
            .finish()
    }
}
