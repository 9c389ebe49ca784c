//! HTTP/1.1 client exchange engine for embedded systems.
//!
//! One [`HttpRequest`] carries out one request/response exchange over a
//! non-blocking socket. Everything lives in fixed-size buffers sized by the
//! constants below, so the memory an exchange needs is known at compile time.
//!
//! # Features
//!
//! - Incremental response parsing, robust to reads split at any byte
//! - `Content-Length`, chunked and read-until-close body framing
//! - Buffered bodies or streaming to a callback through a [`BodySink`]
//! - Sockets opened by the request or borrowed from the caller
//! - A non-blocking [`HttpRequest::poll`] step and a blocking
//!   [`HttpRequest::send`] built on it
//!
//! # Usage
//!
//! ```rust,no_run
//! use libiot_http::network::application::http::{HttpRequest, Method, Streamed};
//! # use libiot_http::network::{Endpoint, NetworkInterface};
//! # use libiot_http::network::error::Error;
//! # struct Net;
//! # struct Sock;
//! # impl libiot_http::network::Connect for Sock {
//! #     fn connect(&mut self, _: &Endpoint<'_>) -> Result<(), Error> { Ok(()) }
//! #     fn is_connected(&self) -> bool { true }
//! # }
//! # impl libiot_http::network::Read for Sock {
//! #     fn read(&mut self, _: &mut [u8]) -> Result<usize, Error> { Ok(0) }
//! # }
//! # impl libiot_http::network::Write for Sock {
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Error> { Ok(buf.len()) }
//! # }
//! # impl libiot_http::network::Close for Sock {
//! #     fn close(&mut self) -> Result<(), Error> { Ok(()) }
//! # }
//! # impl NetworkInterface for Net {
//! #     type Socket = Sock;
//! #     fn open(&mut self) -> Result<Sock, Error> { Ok(Sock) }
//! #     fn resolve(&mut self, _: &str) -> Result<core::net::IpAddr, Error> {
//! #         Err(Error::DnsFailure)
//! #     }
//! # }
//! let mut network = Net;
//! let mut received = 0;
//! let mut request = HttpRequest::new(
//!     &mut network,
//!     Method::Get,
//!     "http://192.168.1.10/firmware.bin",
//!     Streamed::new(|fragment: &[u8]| received += fragment.len()),
//! );
//! let status = request.send().map(|response| response.status_code());
//! ```

/// Size of the receive buffer, the most read from the socket at once.
pub const HTTP_RECEIVE_BUFFER_SIZE: usize = 8 * 1024;

/// Most headers kept per request or response.
pub const MAX_HEADERS: usize = 16;

pub const MAX_HEADER_NAME_LEN: usize = 64;

pub const MAX_HEADER_VALUE_LEN: usize = 256;

pub const MAX_REASON_LEN: usize = 64;

/// Capacity of a [`Buffered`] body.
pub const MAX_BODY_SIZE: usize = 4 * 1024;

/// Capacity for the serialized request line and headers.
pub const MAX_REQUEST_HEAD_SIZE: usize = 1024;

/// Longest line the parser accepts: a header of maximum size with its
/// separator and line ending.
pub(crate) const MAX_LINE_LEN: usize = MAX_HEADER_NAME_LEN + MAX_HEADER_VALUE_LEN + 8;

/// The exchange state machine and socket ownership.
pub mod client;

/// Errors surfaced by an exchange.
pub mod error;

/// Incremental response parsing.
pub mod parser;

/// Request serialization.
pub mod request;

pub mod response;

/// Body delivery strategies.
pub mod sink;

/// URL parsing.
pub mod url;

pub use client::{HttpRequest, SocketHandle, State};
pub use error::HttpError;
pub use parser::ResponseParser;
pub use request::{Header, Method, RequestBuilder};
pub use response::Response;
pub use sink::{Body, BodySink, Buffered, Streamed};
pub use url::{ParsedUrl, Scheme};
