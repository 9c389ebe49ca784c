//! Socket and network interface implementations over `std::net`.
//!
//! Useful on Linux-class devices and for exercising the HTTP engine against
//! real servers from a host machine.

use super::error::Error;
use super::{Close, Connect, Endpoint, NetworkInterface, Read, Write};
use core::net::IpAddr;
use std::io::{self, ErrorKind, Read as _, Write as _};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// The host's network stack.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdNetwork {
    connect_timeout: Option<Duration>,
}

impl StdNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound how long a single connect attempt may block.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }
}

impl NetworkInterface for StdNetwork {
    type Socket = TcpSocket;

    fn open(&mut self) -> Result<Self::Socket, Error> {
        Ok(TcpSocket {
            stream: None,
            connect_timeout: self.connect_timeout,
        })
    }

    fn resolve(&mut self, host: &str) -> Result<IpAddr, Error> {
        (host, 0)
            .to_socket_addrs()
            .map_err(|_| Error::DnsFailure)?
            .next()
            .map(|addr| addr.ip())
            .ok_or(Error::DnsFailure)
    }
}

/// A non-blocking TCP socket.
///
/// The connect itself blocks (optionally bounded by a timeout); once
/// established the stream is switched to non-blocking mode.
#[derive(Debug)]
pub struct TcpSocket {
    stream: Option<TcpStream>,
    connect_timeout: Option<Duration>,
}

impl TcpSocket {
    /// Wrap an already connected stream.
    pub fn from_stream(stream: TcpStream) -> Result<Self, Error> {
        stream.set_nonblocking(true).map_err(|_| Error::OpenError)?;
        Ok(Self {
            stream: Some(stream),
            connect_timeout: None,
        })
    }

    fn stream(&mut self) -> Result<&mut TcpStream, Error> {
        self.stream.as_mut().ok_or(Error::NotOpen)
    }
}

fn map_io_error(error: io::Error, fallback: Error) -> Error {
    match error.kind() {
        ErrorKind::WouldBlock | ErrorKind::Interrupted => Error::WouldBlock,
        ErrorKind::TimedOut => Error::Timeout,
        ErrorKind::ConnectionRefused => Error::ConnectionRefused,
        ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted | ErrorKind::BrokenPipe => {
            Error::ConnectionClosed
        }
        ErrorKind::NotConnected => Error::NotOpen,
        _ => fallback,
    }
}

impl Connect for TcpSocket {
    fn connect(&mut self, endpoint: &Endpoint<'_>) -> Result<(), Error> {
        let stream = match self.connect_timeout {
            Some(timeout) => TcpStream::connect_timeout(&endpoint.address, timeout),
            None => TcpStream::connect(endpoint.address),
        }
        .map_err(|e| map_io_error(e, Error::ConnectionRefused))?;
        stream
            .set_nonblocking(true)
            .map_err(|_| Error::ConnectionRefused)?;
        self.stream = Some(stream);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}

impl Read for TcpSocket {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        self.stream()?
            .read(buf)
            .map_err(|e| map_io_error(e, Error::ReadError))
    }
}

impl Write for TcpSocket {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Error> {
        self.stream()?
            .write(buf)
            .map_err(|e| map_io_error(e, Error::WriteError))
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.stream()?
            .flush()
            .map_err(|e| map_io_error(e, Error::WriteError))
    }
}

impl Close for TcpSocket {
    fn close(&mut self) -> Result<(), Error> {
        match self.stream.take() {
            Some(stream) => {
                // The peer may already have gone away.
                let _ = stream.shutdown(Shutdown::Both);
                Ok(())
            }
            None => Err(Error::NotOpen),
        }
    }
}
