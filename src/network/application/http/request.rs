//! Request line and header serialization.

use super::error::HttpError;
use super::url::ParsedUrl;
use super::{MAX_HEADER_NAME_LEN, MAX_HEADER_VALUE_LEN, MAX_HEADERS};
use base64ct::{Base64, Encoding};
use core::fmt::Write;
use heapless::{String, Vec};

/// HTTP request methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Patch,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Patch => "PATCH",
            Method::Options => "OPTIONS",
        }
    }
}

/// A single header line, stored inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String<MAX_HEADER_NAME_LEN>,
    pub value: String<MAX_HEADER_VALUE_LEN>,
}

impl Header {
    /// Copy `name` and `value` into a header.
    ///
    /// Fails with [`HttpError::BufferOverflow`] when either does not fit.
    pub fn new(name: &str, value: &str) -> Result<Self, HttpError> {
        Ok(Self {
            name: String::try_from(name).map_err(|_| HttpError::BufferOverflow)?,
            value: String::try_from(value).map_err(|_| HttpError::BufferOverflow)?,
        })
    }
}

/// Builds the bytes of an HTTP/1.1 request for one method and URL.
///
/// Unless the caller sets them, the builder adds `Host`, `Authorization`
/// (from URL userinfo), `Connection: close` and, when a body is present,
/// `Content-Length`. Setting a header that already exists replaces its value;
/// names compare case-insensitively.
#[derive(Debug, Clone)]
pub struct RequestBuilder<'a> {
    method: Method,
    url: ParsedUrl<'a>,
    headers: Vec<Header, MAX_HEADERS>,
    body: Option<&'a [u8]>,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(method: Method, url: ParsedUrl<'a>) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &ParsedUrl<'a> {
        &self.url
    }

    /// Headers set by the caller, in insertion order.
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    pub fn body(&self) -> Option<&'a [u8]> {
        self.body
    }

    /// Set or replace a request header.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), HttpError> {
        let header = Header::new(name, value)?;
        match self
            .headers
            .iter_mut()
            .find(|h| h.name.eq_ignore_ascii_case(name))
        {
            Some(existing) => *existing = header,
            None => self
                .headers
                .push(header)
                .map_err(|_| HttpError::BufferOverflow)?,
        }
        Ok(())
    }

    pub fn set_body(&mut self, body: &'a [u8]) {
        self.body = Some(body);
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h.name.eq_ignore_ascii_case(name))
    }

    /// Serialize the request line and headers, through the blank line.
    pub fn write_head<const N: usize>(&self, out: &mut Vec<u8, N>) -> Result<(), HttpError> {
        out.clear();

        // Request line
        push(out, self.method.as_str().as_bytes())?;
        push(out, b" ")?;
        push(out, self.url.path().as_bytes())?;
        if let Some(query) = self.url.query() {
            push(out, b"?")?;
            push(out, query.as_bytes())?;
        }
        push(out, b" HTTP/1.1\r\n")?;

        // Defaults
        if !self.has_header("Host") {
            push(out, b"Host: ")?;
            if self.url.host().contains(':') {
                push(out, b"[")?;
                push(out, self.url.host().as_bytes())?;
                push(out, b"]")?;
            } else {
                push(out, self.url.host().as_bytes())?;
            }
            if self.url.has_non_default_port() {
                let mut port: String<6> = String::new();
                write!(port, ":{}", self.url.port()).map_err(|_| HttpError::BufferOverflow)?;
                push(out, port.as_bytes())?;
            }
            push(out, b"\r\n")?;
        }

        if let Some(userinfo) = self.url.userinfo() {
            if !self.has_header("Authorization") {
                let mut encoded = [0u8; MAX_HEADER_VALUE_LEN];
                let credentials = Base64::encode(userinfo.as_bytes(), &mut encoded)
                    .map_err(|_| HttpError::BufferOverflow)?;
                push(out, b"Authorization: Basic ")?;
                push(out, credentials.as_bytes())?;
                push(out, b"\r\n")?;
            }
        }

        if !self.has_header("Connection") {
            push(out, b"Connection: close\r\n")?;
        }

        if let Some(body) = self.body {
            if !self.has_header("Content-Length") && !self.has_header("Transfer-Encoding") {
                let mut len: String<32> = String::new();
                write!(len, "Content-Length: {}\r\n", body.len())
                    .map_err(|_| HttpError::BufferOverflow)?;
                push(out, len.as_bytes())?;
            }
        }

        // Caller headers
        for header in &self.headers {
            push(out, header.name.as_bytes())?;
            push(out, b": ")?;
            push(out, header.value.as_bytes())?;
            push(out, b"\r\n")?;
        }

        push(out, b"\r\n")
    }

    /// Serialize the whole request, head followed by body.
    pub fn build<const N: usize>(&self, out: &mut Vec<u8, N>) -> Result<(), HttpError> {
        self.write_head(out)?;
        if let Some(body) = self.body {
            push(out, body)?;
        }
        Ok(())
    }
}

fn push<const N: usize>(out: &mut Vec<u8, N>, bytes: &[u8]) -> Result<(), HttpError> {
    out.extend_from_slice(bytes)
        .map_err(|_| HttpError::BufferOverflow)
}
