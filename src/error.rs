//! Error definitions for the connection core.

use thiserror::Error;

/// Boxed error used for use outcomes and host-defined failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by connection handle operations.
#[derive(Debug, Error)]
pub enum PoolError {
    /// The handle is not bound to a host (never borrowed, or already released).
    #[error("no host available")]
    NoHostAvailable,

    /// An argument was outside its accepted range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The wrapped object does not provide the requested capability.
    #[error("connection does not support the {expected} capability")]
    CapabilityMismatch { expected: &'static str },

    /// Failure reported by a host's release handler.
    #[error(transparent)]
    Host(BoxError),
}

/// Result type for connection handle operations.
pub type PoolResult<T> = Result<T, PoolError>;
