//! # Application Layer Network Protocols
//!
//! Application layer protocols built on the socket traits in
//! [`crate::network`]. Each protocol is connection agnostic, `no_std`
//! compatible and works in fixed-size buffers.
//!
//! ## Available Protocols
//!
//! - **[`http`]**: HTTP/1.1 client exchange engine

/// HTTP client implementation.
///
/// Performs one request/response exchange per [`http::HttpRequest`], over
/// any [`Socket`](crate::network::Socket).
pub mod http;
