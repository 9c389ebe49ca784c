//! Common error types for network operations

/// Status reported by a socket or network interface.
///
/// This is the small, fixed vocabulary every [`Socket`](super::Socket)
/// implementation reports in. It is designed to be simple and portable for
/// `no_std` environments, and is passed through unchanged by the HTTP layer
/// so callers can see exactly what the transport said.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The operation cannot complete right now; retry once the socket is ready.
    WouldBlock,
    /// The peer closed the connection.
    ConnectionClosed,
    /// An operation was attempted on a socket that is not open.
    NotOpen,
    /// The socket could not be opened on the network interface.
    OpenError,
    /// A connection attempt was refused.
    ConnectionRefused,
    /// The host name could not be resolved.
    DnsFailure,
    /// An invalid address was provided.
    InvalidAddress,
    /// An error occurred during a write operation.
    WriteError,
    /// An error occurred during a read operation.
    ReadError,
    /// A timeout occurred.
    Timeout,
}

impl Error {
    /// Whether the operation should simply be retried later.
    pub fn is_would_block(&self) -> bool {
        matches!(self, Error::WouldBlock)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            Error::WouldBlock => "operation would block",
            Error::ConnectionClosed => "connection closed",
            Error::NotOpen => "socket not open",
            Error::OpenError => "socket could not be opened",
            Error::ConnectionRefused => "connection refused",
            Error::DnsFailure => "host name could not be resolved",
            Error::InvalidAddress => "invalid address",
            Error::WriteError => "write error",
            Error::ReadError => "read error",
            Error::Timeout => "timed out",
        };
        f.write_str(text)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::WouldBlock => defmt::write!(f, "WouldBlock"),
            Error::ConnectionClosed => defmt::write!(f, "ConnectionClosed"),
            Error::NotOpen => defmt::write!(f, "NotOpen"),
            Error::OpenError => defmt::write!(f, "OpenError"),
            Error::ConnectionRefused => defmt::write!(f, "ConnectionRefused"),
            Error::DnsFailure => defmt::write!(f, "DnsFailure"),
            Error::InvalidAddress => defmt::write!(f, "InvalidAddress"),
            Error::WriteError => defmt::write!(f, "WriteError"),
            Error::ReadError => defmt::write!(f, "ReadError"),
            Error::Timeout => defmt::write!(f, "Timeout"),
        }
    }
}
