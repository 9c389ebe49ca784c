use super::request::Header;
use super::sink::Body;
use super::{MAX_HEADERS, MAX_REASON_LEN};
use heapless::{String, Vec};

/// A parsed HTTP response.
///
/// Only handed out once the exchange completed. The body is present when the
/// request was made with a [`Buffered`](super::Buffered) sink; with a
/// [`Streamed`](super::Streamed) sink every byte went to the callback and
/// [`body`](Self::body) is `None`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Response {
    pub(super) status_code: u16,
    pub(super) reason: String<MAX_REASON_LEN>,
    pub(super) headers: Vec<Header, MAX_HEADERS>,
    pub(super) body: Option<Body>,
}

impl Response {
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Reason phrase from the status line, possibly empty.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// All headers, in the order the server sent them.
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Value of the first header called `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    pub fn content_length(&self) -> Option<usize> {
        self.header("Content-Length")?.parse().ok()
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// The buffered body as text, if it is valid UTF-8.
    pub fn body_str(&self) -> Option<&str> {
        core::str::from_utf8(self.body()?).ok()
    }

    /// Deserialize a buffered JSON body.
    ///
    /// A streamed response has no body to decode and fails like an empty
    /// document would.
    ///
    /// ```rust
    /// # use libiot_http::network::application::http::Response;
    /// #[derive(serde::Deserialize)]
    /// struct Reading {
    ///     celsius: f32,
    /// }
    ///
    /// fn temperature(response: &Response) -> Option<f32> {
    ///     response.json::<Reading>().ok().map(|r| r.celsius)
    /// }
    /// ```
    pub fn json<'de, T>(&'de self) -> Result<T, serde_json_core::de::Error>
    where
        T: serde::Deserialize<'de>,
    {
        let body = self.body().unwrap_or(&[]);
        serde_json_core::from_slice(body).map(|(value, _)| value)
    }
}
