//! Opaque payload carried by a connection handle.
//!
//! # Responsibilities
//! - Hold the caller-defined connection object, type-erased
//! - Declare the stream capability a payload may carry
//! - Narrow a payload to that capability, failing explicitly otherwise
//!
//! # Design Decisions
//! - Closed set of payload shapes: opaque or stream
//! - Capability is chosen at construction, checked at the narrowing call site

use std::any::Any;
use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::{PoolError, PoolResult};

/// Name reported by [`PoolError::CapabilityMismatch`] for stream narrowing.
pub const STREAM_CAPABILITY: &str = "stream";

/// Bidirectional byte stream capability.
///
/// Reads and writes come from `AsyncRead`/`AsyncWrite`; closing is
/// `AsyncWriteExt::shutdown`. Implementors only add the peer address.
pub trait StreamConnection: AsyncRead + AsyncWrite + Unpin + Send + AsAny {
    /// Address of the remote end.
    fn peer_addr(&self) -> io::Result<SocketAddr>;
}

impl StreamConnection for tokio::net::TcpStream {
    fn peer_addr(&self) -> io::Result<SocketAddr> {
        tokio::net::TcpStream::peer_addr(self)
    }
}

/// Access to a stream payload as `Any`, for typed downcasts.
///
/// Call through the trait object (`(**boxed).as_any()`), never on the box:
/// the box itself is `Any` too.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The user object wrapped by a handle.
pub enum Payload {
    /// Any object; no capability beyond downcasting.
    Opaque(Box<dyn Any + Send>),
    /// An object carrying the stream capability.
    Stream(Box<dyn StreamConnection>),
}

impl Payload {
    /// Downcast to the concrete user type.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        match self {
            Payload::Opaque(obj) => obj.downcast_mut::<T>(),
            Payload::Stream(stream) => (**stream).as_any_mut().downcast_mut::<T>(),
        }
    }

    /// Whether the payload is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        match self {
            Payload::Opaque(obj) => obj.is::<T>(),
            Payload::Stream(stream) => (**stream).as_any().is::<T>(),
        }
    }

    /// Narrow to the stream capability.
    pub fn as_stream_mut(&mut self) -> PoolResult<&mut (dyn StreamConnection + 'static)> {
        match self {
            Payload::Stream(stream) => Ok(&mut **stream),
            Payload::Opaque(_) => Err(PoolError::CapabilityMismatch {
                expected: STREAM_CAPABILITY,
            }),
        }
    }
}

impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Payload::Opaque(_) => f.write_str("Payload::Opaque"),
            Payload::Stream(_) => f.write_str("Payload::Stream"),
        }
    }
}
