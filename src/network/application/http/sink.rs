//! Where decoded body bytes go.
//!
//! The parser is written once against [`BodySink`]. [`Buffered`] keeps the
//! body for the [`Response`](super::Response); [`Streamed`] hands each
//! fragment to the caller and keeps nothing.

use super::MAX_BODY_SIZE;
use super::error::HttpError;
use heapless::Vec;

/// Storage for a buffered response body.
pub type Body = Vec<u8, MAX_BODY_SIZE>;

/// Accepts decoded body fragments.
///
/// Fragments arrive in order, already de-chunked, and are never empty.
pub trait BodySink {
    fn accept(&mut self, fragment: &[u8]) -> Result<(), HttpError>;

    /// Hand the accumulated body to the response. Streaming sinks keep nothing.
    fn take_body(&mut self) -> Option<Body> {
        None
    }
}

/// Append every fragment to an inline buffer of [`MAX_BODY_SIZE`] bytes.
#[derive(Debug, Default)]
pub struct Buffered {
    body: Body,
}

impl Buffered {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BodySink for Buffered {
    fn accept(&mut self, fragment: &[u8]) -> Result<(), HttpError> {
        self.body
            .extend_from_slice(fragment)
            .map_err(|_| HttpError::BufferOverflow)
    }

    fn take_body(&mut self) -> Option<Body> {
        Some(core::mem::take(&mut self.body))
    }
}

/// Forward every fragment to a callback as soon as it is decoded.
///
/// ```rust
/// use libiot_http::network::application::http::{BodySink, Streamed};
///
/// let mut total = 0;
/// let mut sink = Streamed::new(|fragment: &[u8]| total += fragment.len());
/// sink.accept(b"hello").unwrap();
/// sink.accept(b" world").unwrap();
/// drop(sink);
/// assert_eq!(total, 11);
/// ```
pub struct Streamed<F> {
    callback: F,
}

impl<F: FnMut(&[u8])> Streamed<F> {
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F: FnMut(&[u8])> BodySink for Streamed<F> {
    fn accept(&mut self, fragment: &[u8]) -> Result<(), HttpError> {
        (self.callback)(fragment);
        Ok(())
    }
}

impl<F> core::fmt::Debug for Streamed<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Streamed").finish_non_exhaustive()
    }
}
