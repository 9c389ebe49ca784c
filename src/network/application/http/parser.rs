//! Incremental HTTP/1.1 response parser.
//!
//! Bytes may be fed in slices of any size, split at any position. Lines
//! (status line, headers, chunk sizes, trailers) are accumulated in a small
//! line buffer; body bytes are passed straight through to the [`BodySink`]
//! without being copied.

use super::error::HttpError;
use super::request::{Header, Method};
use super::response::Response;
use super::sink::{Body, BodySink};
use super::MAX_LINE_LEN;
use heapless::{String, Vec};

/// How the end of the body is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Framing {
    /// `Content-Length`: this many bytes are still expected.
    Length(usize),
    Chunked(Chunk),
    /// No length information: the body ends when the peer closes.
    UntilClose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chunk {
    /// Waiting for a `<hex>[;ext]` line.
    Size,
    /// Inside chunk data, this many bytes left.
    Data(usize),
    /// Expecting the CRLF that closes a chunk.
    DataEnd,
    /// After the zero-size chunk, reading trailer lines up to the blank line.
    Trailers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    StatusLine,
    Headers,
    Body(Framing),
    Done,
}

/// Parses one response, reporting body bytes to a sink as they arrive.
#[derive(Debug)]
pub struct ResponseParser {
    phase: Phase,
    head_request: bool,
    line: Vec<u8, MAX_LINE_LEN>,
    response: Response,
    content_length: Option<usize>,
    chunked: bool,
}

impl ResponseParser {
    /// `method` is the method of the request this response answers; a
    /// response to `HEAD` never has a body.
    pub fn new(method: Method) -> Self {
        Self {
            phase: Phase::StatusLine,
            head_request: method == Method::Head,
            line: Vec::new(),
            response: Response::default(),
            content_length: None,
            chunked: false,
        }
    }

    /// The status line and the whole header block have been parsed.
    pub fn headers_complete(&self) -> bool {
        matches!(self.phase, Phase::Body(_) | Phase::Done)
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Consume `data`, forwarding decoded body bytes to `sink`.
    ///
    /// Bytes after the end of the response are ignored.
    pub fn feed<K: BodySink>(&mut self, mut data: &[u8], sink: &mut K) -> Result<(), HttpError> {
        while !data.is_empty() {
            match self.phase {
                Phase::Done => break,
                Phase::Body(Framing::Length(remaining)) => {
                    let n = remaining.min(data.len());
                    sink.accept(&data[..n])?;
                    data = &data[n..];
                    self.phase = match remaining - n {
                        0 => Phase::Done,
                        left => Phase::Body(Framing::Length(left)),
                    };
                }
                Phase::Body(Framing::Chunked(Chunk::Data(remaining))) => {
                    let n = remaining.min(data.len());
                    sink.accept(&data[..n])?;
                    data = &data[n..];
                    let chunk = match remaining - n {
                        0 => Chunk::DataEnd,
                        left => Chunk::Data(left),
                    };
                    self.phase = Phase::Body(Framing::Chunked(chunk));
                }
                Phase::Body(Framing::UntilClose) => {
                    sink.accept(data)?;
                    data = &[];
                }
                Phase::StatusLine | Phase::Headers | Phase::Body(Framing::Chunked(_)) => {
                    if !self.buffer_line(&mut data)? {
                        break;
                    }
                    let line = core::mem::take(&mut self.line);
                    self.on_line(trim_line_ending(&line))?;
                }
            }
        }
        Ok(())
    }

    /// The peer closed the connection.
    ///
    /// Completes a read-until-close body; anything else still in progress is
    /// an [`HttpError::IncompleteResponse`].
    pub fn finish(&mut self) -> Result<(), HttpError> {
        match self.phase {
            Phase::Done => Ok(()),
            Phase::Body(Framing::UntilClose) => {
                self.phase = Phase::Done;
                Ok(())
            }
            _ => Err(HttpError::IncompleteResponse),
        }
    }

    /// Take the parsed response, attaching `body`.
    pub fn take_response(&mut self, body: Option<Body>) -> Response {
        let mut response = core::mem::take(&mut self.response);
        response.body = body;
        response
    }

    /// Move bytes up to and including the next `\n` into the line buffer.
    /// Returns `true` when a full line is buffered.
    fn buffer_line(&mut self, data: &mut &[u8]) -> Result<bool, HttpError> {
        let (taken, complete) = match data.iter().position(|&b| b == b'\n') {
            Some(pos) => (pos + 1, true),
            None => (data.len(), false),
        };
        self.line
            .extend_from_slice(&data[..taken])
            .map_err(|_| HttpError::BufferOverflow)?;
        *data = &data[taken..];
        Ok(complete)
    }

    fn on_line(&mut self, line: &[u8]) -> Result<(), HttpError> {
        match self.phase {
            Phase::StatusLine => self.on_status_line(line),
            Phase::Headers => self.on_header_line(line),
            Phase::Body(Framing::Chunked(Chunk::Size)) => {
                let size = parse_chunk_size(line)?;
                let chunk = if size == 0 {
                    Chunk::Trailers
                } else {
                    Chunk::Data(size)
                };
                self.phase = Phase::Body(Framing::Chunked(chunk));
                Ok(())
            }
            Phase::Body(Framing::Chunked(Chunk::DataEnd)) => {
                if !line.is_empty() {
                    return Err(HttpError::ParseError);
                }
                self.phase = Phase::Body(Framing::Chunked(Chunk::Size));
                Ok(())
            }
            Phase::Body(Framing::Chunked(Chunk::Trailers)) => {
                // Trailer fields are not merged into the header set.
                if line.is_empty() {
                    self.phase = Phase::Done;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn on_status_line(&mut self, line: &[u8]) -> Result<(), HttpError> {
        // Tolerate stray blank lines ahead of the status line.
        if line.is_empty() {
            return Ok(());
        }

        let (version, rest) = split_once(line, b' ').ok_or(HttpError::ParseError)?;
        if !version.starts_with(b"HTTP/") {
            return Err(HttpError::ParseError);
        }
        let (code, reason) = split_once(rest, b' ').unwrap_or((rest, &[][..]));
        if code.len() != 3 || !code.iter().all(u8::is_ascii_digit) {
            return Err(HttpError::ParseError);
        }

        self.response.status_code = code
            .iter()
            .fold(0, |status, &digit| status * 10 + u16::from(digit - b'0'));
        self.response.reason = lossy(reason)?;
        self.phase = Phase::Headers;
        trace!("status line parsed: {}", self.response.status_code);
        Ok(())
    }

    fn on_header_line(&mut self, line: &[u8]) -> Result<(), HttpError> {
        if line.is_empty() {
            return self.on_headers_end();
        }
        // Obsolete line folding is rejected.
        if line[0] == b' ' || line[0] == b'\t' {
            return Err(HttpError::ParseError);
        }

        let (name, value) = split_once(line, b':').ok_or(HttpError::ParseError)?;
        if name.is_empty() || name.iter().any(|&b| b == b' ' || b == b'\t') {
            return Err(HttpError::ParseError);
        }
        let name = core::str::from_utf8(name).map_err(|_| HttpError::ParseError)?;
        let value = value.trim_ascii();

        if name.eq_ignore_ascii_case("Content-Length") {
            let length = parse_content_length(value)?;
            match self.content_length {
                Some(previous) if previous != length => return Err(HttpError::ParseError),
                _ => self.content_length = Some(length),
            }
        } else if name.eq_ignore_ascii_case("Transfer-Encoding") {
            let value = core::str::from_utf8(value).map_err(|_| HttpError::ParseError)?;
            self.chunked = value
                .rsplit(',')
                .next()
                .is_some_and(|coding| coding.trim().eq_ignore_ascii_case("chunked"));
        }

        let header = Header {
            name: String::try_from(name).map_err(|_| HttpError::BufferOverflow)?,
            value: lossy(value)?,
        };
        self.response
            .headers
            .push(header)
            .map_err(|_| HttpError::BufferOverflow)
    }

    fn on_headers_end(&mut self) -> Result<(), HttpError> {
        let status = self.response.status_code;

        // Interim responses are followed by the real one.
        if (100..200).contains(&status) && status != 101 {
            debug!("skipping interim response {}", status);
            self.response = Response::default();
            self.content_length = None;
            self.chunked = false;
            self.phase = Phase::StatusLine;
            return Ok(());
        }

        let bodiless = self.head_request || status == 101 || status == 204 || status == 304;
        self.phase = if bodiless {
            Phase::Done
        } else if let Some(length) = self.content_length {
            match length {
                0 => Phase::Done,
                _ => Phase::Body(Framing::Length(length)),
            }
        } else if self.chunked {
            Phase::Body(Framing::Chunked(Chunk::Size))
        } else {
            Phase::Body(Framing::UntilClose)
        };
        Ok(())
    }
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn split_once(line: &[u8], separator: u8) -> Option<(&[u8], &[u8])> {
    let pos = line.iter().position(|&b| b == separator)?;
    Some((&line[..pos], &line[pos + 1..]))
}

/// Copy field text that may carry obs-text bytes. Invalid UTF-8 sequences
/// become U+FFFD.
fn lossy<const N: usize>(bytes: &[u8]) -> Result<String<N>, HttpError> {
    let mut text = String::new();
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid())
            .map_err(|_| HttpError::BufferOverflow)?;
        if !chunk.invalid().is_empty() {
            text.push(char::REPLACEMENT_CHARACTER)
                .map_err(|_| HttpError::BufferOverflow)?;
        }
    }
    Ok(text)
}

/// Decimal digits only; no sign, no whitespace.
fn parse_content_length(value: &[u8]) -> Result<usize, HttpError> {
    if value.is_empty() || !value.iter().all(u8::is_ascii_digit) {
        return Err(HttpError::ParseError);
    }
    value.iter().try_fold(0usize, |length, &digit| {
        length
            .checked_mul(10)
            .and_then(|length| length.checked_add(usize::from(digit - b'0')))
            .ok_or(HttpError::ParseError)
    })
}

/// Parse `<hex>[;extensions]`.
fn parse_chunk_size(line: &[u8]) -> Result<usize, HttpError> {
    let digits = match line.iter().position(|&b| b == b';') {
        Some(pos) => &line[..pos],
        None => line,
    };
    let digits = digits.trim_ascii();
    if digits.is_empty() {
        return Err(HttpError::ParseError);
    }

    digits.iter().try_fold(0usize, |size, &b| {
        let digit = (b as char).to_digit(16).ok_or(HttpError::ParseError)?;
        size.checked_mul(16)
            .and_then(|size| size.checked_add(digit as usize))
            .ok_or(HttpError::ParseError)
    })
}
