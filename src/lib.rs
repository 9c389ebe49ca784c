//! # libiot-http - HTTP/1.1 client for IoT devices
//!
//! A small HTTP/1.1 client exchange engine for embedded systems. It performs a
//! single request/response exchange over any non-blocking socket the platform
//! provides, using fixed-size buffers only, and supports `no_std`
//! environments.
//!
//! ## Features
//!
//! - Incremental parsing of the status line, headers and body
//! - `Content-Length`, chunked and read-until-close framing
//! - Response bodies either buffered or streamed to a callback
//! - Sockets opened by the request or lent by the caller
//! - Blocking, polled and async (`async` feature) drivers
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! libiot-http = "0.1.0"
//! ```
//!
//! ### Buffered GET
//!
//! ```rust,no_run
//! # #[cfg(feature = "std")]
//! # fn main() -> Result<(), libiot_http::network::application::http::HttpError> {
//! use libiot_http::network::application::http::{Buffered, HttpRequest, Method};
//! use libiot_http::network::std_net::StdNetwork;
//!
//! let mut network = StdNetwork::new();
//! let mut request = HttpRequest::new(
//!     &mut network,
//!     Method::Get,
//!     "http://192.168.1.20/api/status",
//!     Buffered::new(),
//! );
//! let response = request.send()?;
//! if response.is_success() {
//!     let _text = response.body_str();
//! }
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "std"))]
//! # fn main() {}
//! ```
//!
//! ## Platform Support
//!
//! The engine only needs `core`. Platforms plug in by implementing
//! [`network::NetworkInterface`] and the socket traits for their TCP stack;
//! with the `std` feature, [`network::std_net`] provides them over
//! `std::net`.
//!
//! ## Optional Features
//!
//! - `std`: Socket implementation over `std::net` (default: disabled)
//! - `async`: `HttpRequest::send_async` for use inside async executors
//! - `defmt`: Log exchange progress through defmt

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

// This must go FIRST so that all the other modules see its macros.
#[macro_use]
mod fmt;

/// Network abstraction layer and the HTTP client built on it.
///
/// Contains the socket traits a platform implements and the application
/// protocols that run on top of them.
pub mod network;
