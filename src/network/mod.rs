//! A network abstraction layer for embedded systems
//!
//! The HTTP engine never touches a concrete TCP stack. It talks to a
//! [`NetworkInterface`] that can open sockets and resolve host names, and to
//! the sockets themselves through four small capabilities: [`Connect`],
//! [`Read`], [`Write`] and [`Close`]. Anything implementing all four is a
//! [`Socket`].
//!
//! All socket operations are expected to be non-blocking. An operation that
//! cannot make progress reports [`Error::WouldBlock`](error::Error::WouldBlock)
//! and is retried by the caller later.

#![allow(missing_docs)]
#![deny(unsafe_code)]

use core::net::{IpAddr, SocketAddr};

/// Common error types for network operations
pub mod error;

/// Application layer protocols built on the socket traits.
pub mod application;

/// Socket and network interface backed by `std::net`.
#[cfg(feature = "std")]
pub mod std_net;

use error::Error;

/// Re-exports of common traits
pub mod prelude {
    pub use super::{Close, Connect, NetworkInterface, Read, Socket, Write};
}

/// Where a socket should connect to.
///
/// `address` is what a plain TCP socket needs. `host` is the name from the
/// URL, for transports that must present it to the peer (TLS SNI).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint<'a> {
    pub host: &'a str,
    pub address: SocketAddr,
}

impl<'a> Endpoint<'a> {
    pub fn new(host: &'a str, address: SocketAddr) -> Self {
        Self { host, address }
    }
}

/// Establish a byte stream to a remote endpoint.
pub trait Connect {
    /// Start or continue connecting.
    ///
    /// Non-blocking implementations may return [`Error::WouldBlock`] while
    /// the handshake is in flight; the call is repeated until it returns
    /// `Ok(())` or a different error.
    fn connect(&mut self, endpoint: &Endpoint<'_>) -> Result<(), Error>;

    /// Whether the stream is already established.
    fn is_connected(&self) -> bool;
}

pub trait Read {
    /// Read received bytes into `buf`.
    ///
    /// `Ok(0)` and `Err(Error::ConnectionClosed)` both mean the peer closed
    /// the stream. `Err(Error::WouldBlock)` means nothing is available yet.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error>;
}

pub trait Write {
    /// Write as much of `buf` as the socket accepts, returning the count.
    fn write(&mut self, buf: &[u8]) -> Result<usize, Error>;

    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

pub trait Close {
    /// Close the connection
    fn close(&mut self) -> Result<(), Error>;
}

/// A non-blocking, connectable byte stream.
pub trait Socket: Connect + Read + Write + Close {}

impl<T: Connect + Read + Write + Close> Socket for T {}

/// A network stack that hands out sockets and resolves names.
pub trait NetworkInterface {
    /// Associated socket type
    type Socket: Socket;

    /// Open a fresh, unconnected socket on this interface.
    fn open(&mut self) -> Result<Self::Socket, Error>;

    /// Resolve a host name to an address.
    fn resolve(&mut self, host: &str) -> Result<IpAddr, Error>;
}
