use crate::network::error::Error as NetworkError;

/// Why an exchange failed.
///
/// The socket-layer variants carry the transport's status unchanged so the
/// caller can tell a refused connection from a DNS failure or a reset.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum HttpError {
    /// The URL could not be parsed. Detected when the request is constructed.
    UrlParse,
    /// The socket could not be opened or connected.
    Connect(NetworkError),
    /// Writing the request failed.
    SendError(NetworkError),
    /// Reading the response failed.
    ReceiveError(NetworkError),
    /// Malformed status line, header block or chunk framing.
    ParseError,
    /// The peer closed the connection before the response was complete.
    IncompleteResponse,
    /// Request or response data did not fit a fixed-capacity buffer.
    BufferOverflow,
    /// The request was changed after the exchange had started.
    AlreadyStarted,
}

impl HttpError {
    /// A stable, non-zero integer for each category, for C-style callers.
    pub fn code(&self) -> i32 {
        match self {
            HttpError::UrlParse => -1,
            HttpError::Connect(_) => -2,
            HttpError::SendError(_) => -3,
            HttpError::ReceiveError(_) => -4,
            HttpError::ParseError => -5,
            HttpError::IncompleteResponse => -6,
            HttpError::BufferOverflow => -7,
            HttpError::AlreadyStarted => -8,
        }
    }

    /// The socket status behind this error, if it came from the transport.
    pub fn network_error(&self) -> Option<NetworkError> {
        match *self {
            HttpError::Connect(e) | HttpError::SendError(e) | HttpError::ReceiveError(e) => Some(e),
            _ => None,
        }
    }
}

impl core::fmt::Display for HttpError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HttpError::UrlParse => f.write_str("malformed url"),
            HttpError::Connect(e) => write!(f, "connect failed: {e}"),
            HttpError::SendError(e) => write!(f, "send failed: {e}"),
            HttpError::ReceiveError(e) => write!(f, "receive failed: {e}"),
            HttpError::ParseError => f.write_str("malformed response"),
            HttpError::IncompleteResponse => f.write_str("connection closed before response was complete"),
            HttpError::BufferOverflow => f.write_str("buffer capacity exceeded"),
            HttpError::AlreadyStarted => f.write_str("request already started"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for HttpError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            HttpError::UrlParse => defmt::write!(f, "UrlParse"),
            HttpError::Connect(e) => defmt::write!(f, "Connect({})", e),
            HttpError::SendError(e) => defmt::write!(f, "SendError({})", e),
            HttpError::ReceiveError(e) => defmt::write!(f, "ReceiveError({})", e),
            HttpError::ParseError => defmt::write!(f, "ParseError"),
            HttpError::IncompleteResponse => defmt::write!(f, "IncompleteResponse"),
            HttpError::BufferOverflow => defmt::write!(f, "BufferOverflow"),
            HttpError::AlreadyStarted => defmt::write!(f, "AlreadyStarted"),
        }
    }
}
