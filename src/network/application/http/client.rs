//! The request/response exchange engine.
//!
//! [`HttpRequest`] owns one exchange: it connects the socket (unless the
//! caller handed in one that is already connected), writes the request,
//! and parses the response as bytes trickle in through a fixed receive
//! buffer. The state machine advances through [`HttpRequest::poll`], which
//! never blocks; [`HttpRequest::send`] simply polls until the exchange is
//! finished.
//!
//! ```text
//! Idle -> Connecting -> Sending -> ReceivingHeaders -> ReceivingBody -> Complete
//!   \________\______________\_____________\__________________\-------> Failed
//! ```

use super::error::HttpError;
use super::parser::ResponseParser;
use super::request::{Method, RequestBuilder};
use super::response::Response;
use super::sink::BodySink;
use super::url::ParsedUrl;
use super::{HTTP_RECEIVE_BUFFER_SIZE, MAX_REQUEST_HEAD_SIZE};
use crate::network::error::Error as NetworkError;
use crate::network::{Connect, Endpoint, NetworkInterface, Read, Socket, Write};
use core::net::{IpAddr, SocketAddr};
use core::task::Poll;
use heapless::Vec;

/// Where an exchange is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    Idle,
    Connecting,
    Sending,
    ReceivingHeaders,
    ReceivingBody,
    Complete,
    Failed,
}

/// A socket together with who is responsible for closing it.
#[derive(Debug)]
pub enum SocketHandle<'s, S: Socket> {
    /// Opened by the engine; closed when the handle is dropped.
    Owned(S),
    /// Supplied by the caller, who keeps responsibility for its lifetime.
    Borrowed(&'s mut S),
}

impl<S: Socket> SocketHandle<'_, S> {
    pub fn is_owned(&self) -> bool {
        matches!(self, SocketHandle::Owned(_))
    }

    pub fn get_mut(&mut self) -> &mut S {
        match self {
            SocketHandle::Owned(socket) => socket,
            SocketHandle::Borrowed(socket) => &mut **socket,
        }
    }
}

impl<S: Socket> Drop for SocketHandle<'_, S> {
    fn drop(&mut self) {
        if let SocketHandle::Owned(socket) = self {
            if let Err(_e) = socket.close() {
                warn!("closing owned socket failed: {}", _e);
            }
        }
    }
}

/// What a single step of the state machine achieved.
enum Step {
    /// State changed or data moved; keep going.
    Continue,
    /// The socket cannot make progress right now.
    Blocked,
}

/// One HTTP request and the response it produces.
///
/// The body sink picks how the response body is delivered: with
/// [`Buffered`](super::Buffered) it ends up in [`Response::body`], with
/// [`Streamed`](super::Streamed) every decoded fragment goes to the callback
/// and nothing is retained. `N` is the size of the receive buffer, the most
/// that is read from the socket in one go.
///
/// # Examples
///
/// ```rust,no_run
/// # #[cfg(feature = "std")]
/// # fn main() -> Result<(), libiot_http::network::application::http::HttpError> {
/// use libiot_http::network::application::http::{Buffered, HttpRequest, Method};
/// use libiot_http::network::std_net::StdNetwork;
///
/// let mut network = StdNetwork::new();
/// let mut request = HttpRequest::new(
///     &mut network,
///     Method::Get,
///     "http://example.com/data",
///     Buffered::new(),
/// );
/// request.set_header("Accept", "application/json")?;
///
/// let response = request.send()?;
/// assert_eq!(response.status_code(), 200);
/// # Ok(())
/// # }
/// # #[cfg(not(feature = "std"))]
/// # fn main() {}
/// ```
pub struct HttpRequest<'a, Net, K, const N: usize = HTTP_RECEIVE_BUFFER_SIZE>
where
    Net: NetworkInterface,
    K: BodySink,
{
    network: &'a mut Net,
    socket: Option<SocketHandle<'a, Net::Socket>>,
    request: Option<RequestBuilder<'a>>,
    remote: Option<SocketAddr>,
    head: Vec<u8, MAX_REQUEST_HEAD_SIZE>,
    sent: usize,
    parser: ResponseParser,
    sink: K,
    buffer: [u8; N],
    state: State,
    error: Option<HttpError>,
    response: Option<Response>,
}

impl<'a, Net, K> HttpRequest<'a, Net, K>
where
    Net: NetworkInterface,
    K: BodySink,
{
    /// Open a new socket on `network` for this request. The request owns the
    /// socket and closes it when dropped.
    ///
    /// A malformed `url` does not panic or fail here; it is recorded and
    /// reported by [`error`](Self::error) and by [`send`](Self::send).
    pub fn new(network: &'a mut Net, method: Method, url: &'a str, sink: K) -> Self {
        Self::open(network, method, url, sink)
    }

    /// Run the request over a socket the caller already opened (and possibly
    /// connected). The socket is never closed by the request.
    pub fn with_socket(
        network: &'a mut Net,
        socket: &'a mut Net::Socket,
        method: Method,
        url: &'a str,
        sink: K,
    ) -> Self {
        Self::attach(network, socket, method, url, sink)
    }
}

impl<'a, Net, K, const N: usize> HttpRequest<'a, Net, K, N>
where
    Net: NetworkInterface,
    K: BodySink,
{
    /// Like [`new`](HttpRequest::new), with a receive buffer of `N` bytes.
    pub fn open(network: &'a mut Net, method: Method, url: &'a str, sink: K) -> Self {
        let socket = match network.open() {
            Ok(socket) => Ok(SocketHandle::Owned(socket)),
            Err(e) => Err(HttpError::Connect(e)),
        };
        Self::build(network, socket, method, url, sink)
    }

    /// Like [`with_socket`](HttpRequest::with_socket), with a receive buffer
    /// of `N` bytes.
    pub fn attach(
        network: &'a mut Net,
        socket: &'a mut Net::Socket,
        method: Method,
        url: &'a str,
        sink: K,
    ) -> Self {
        Self::build(network, Ok(SocketHandle::Borrowed(socket)), method, url, sink)
    }

    fn build(
        network: &'a mut Net,
        socket: Result<SocketHandle<'a, Net::Socket>, HttpError>,
        method: Method,
        url: &'a str,
        sink: K,
    ) -> Self {
        let request = ParsedUrl::parse(url).map(|url| RequestBuilder::new(method, url));
        let error = match (&request, &socket) {
            (Err(e), _) | (_, Err(e)) => Some(*e),
            _ => None,
        };
        if let Some(_e) = error {
            warn!("request cannot be sent: {}", _e);
        }

        Self {
            network,
            socket: socket.ok(),
            request: request.ok(),
            remote: None,
            head: Vec::new(),
            sent: 0,
            parser: ResponseParser::new(method),
            sink,
            buffer: [0; N],
            state: if error.is_some() {
                State::Failed
            } else {
                State::Idle
            },
            error,
            response: None,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// The error that ended the exchange, or one found at construction.
    pub fn error(&self) -> Option<HttpError> {
        self.error
    }

    /// The response, once the exchange completed successfully.
    pub fn response(&self) -> Option<&Response> {
        match self.state {
            State::Complete => self.response.as_ref(),
            _ => None,
        }
    }

    /// The parsed target URL, unless it was malformed.
    pub fn url(&self) -> Option<&ParsedUrl<'a>> {
        self.request.as_ref().map(|r| r.url())
    }

    /// Whether the request closes its socket when dropped.
    pub fn owns_socket(&self) -> bool {
        self.socket.as_ref().is_some_and(|s| s.is_owned())
    }

    /// Set or replace a request header.
    ///
    /// Only possible while the exchange is [`State::Idle`]; afterwards this
    /// returns [`HttpError::AlreadyStarted`] and the request is unchanged.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), HttpError> {
        self.builder_mut()?.set_header(name, value)
    }

    /// Attach a request body. `Content-Length` is derived from it unless set
    /// explicitly.
    pub fn set_body(&mut self, body: &'a [u8]) -> Result<(), HttpError> {
        self.builder_mut()?.set_body(body);
        Ok(())
    }

    fn builder_mut(&mut self) -> Result<&mut RequestBuilder<'a>, HttpError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        if self.state != State::Idle {
            return Err(HttpError::AlreadyStarted);
        }
        self.request.as_mut().ok_or(HttpError::UrlParse)
    }

    /// Run the exchange to completion, busy-polling the socket.
    ///
    /// Nothing here bounds how long that takes; a caller that needs a timeout
    /// should drive [`poll`](Self::poll) itself.
    pub fn send(&mut self) -> Result<&Response, HttpError> {
        loop {
            match self.poll() {
                Poll::Ready(result) => {
                    result?;
                    break;
                }
                Poll::Pending => core::hint::spin_loop(),
            }
        }
        self.response.as_ref().ok_or(HttpError::IncompleteResponse)
    }

    /// Run the exchange from an async task, yielding to the executor
    /// whenever the socket would block.
    #[cfg(feature = "async")]
    pub async fn send_async(&mut self) -> Result<&Response, HttpError> {
        loop {
            match self.poll() {
                Poll::Ready(result) => {
                    result?;
                    break;
                }
                Poll::Pending => YieldNow::default().await,
            }
        }
        self.response.as_ref().ok_or(HttpError::IncompleteResponse)
    }

    /// Make as much progress as possible without blocking.
    ///
    /// Returns `Poll::Pending` when the socket would block; call again once
    /// it is readable or writable. Once `Ready`, further calls return the
    /// same outcome and perform no I/O.
    pub fn poll(&mut self) -> Poll<Result<(), HttpError>> {
        loop {
            let step = match self.state {
                State::Complete | State::Failed => return Poll::Ready(self.outcome()),
                State::Idle => self.start(),
                State::Connecting => self.step_connect(),
                State::Sending => self.step_send(),
                State::ReceivingHeaders | State::ReceivingBody => self.step_receive(),
            };
            match step {
                Ok(Step::Continue) => {}
                Ok(Step::Blocked) => return Poll::Pending,
                Err(e) => {
                    self.fail(e);
                    return Poll::Ready(Err(e));
                }
            }
        }
    }

    /// Abort the exchange and release the socket if it is owned.
    pub fn close(self) {}

    fn outcome(&self) -> Result<(), HttpError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn fail(&mut self, error: HttpError) {
        debug!("exchange failed in {}: {}", self.state, error);
        self.error = Some(error);
        self.state = State::Failed;
    }

    fn transition(&mut self, state: State) {
        trace!("{} -> {}", self.state, state);
        self.state = state;
    }

    fn socket(&mut self) -> Result<&mut Net::Socket, HttpError> {
        self.socket
            .as_mut()
            .map(SocketHandle::get_mut)
            .ok_or(HttpError::Connect(NetworkError::NotOpen))
    }

    fn start(&mut self) -> Result<Step, HttpError> {
        let request = self.request.as_ref().ok_or(HttpError::UrlParse)?;
        request.write_head(&mut self.head)?;
        self.sent = 0;

        let next = if self.socket()?.is_connected() {
            State::Sending
        } else {
            State::Connecting
        };
        self.transition(next);
        Ok(Step::Continue)
    }

    fn step_connect(&mut self) -> Result<Step, HttpError> {
        match self.connect_socket() {
            Ok(()) => {
                self.transition(State::Sending);
                Ok(Step::Continue)
            }
            Err(e) if e.is_would_block() => Ok(Step::Blocked),
            Err(e) => Err(HttpError::Connect(e)),
        }
    }

    /// Resolve the URL's host and connect. The socket's status is returned
    /// as is.
    fn connect_socket(&mut self) -> Result<(), NetworkError> {
        let url = match self.request.as_ref() {
            Some(request) => *request.url(),
            None => return Err(NetworkError::InvalidAddress),
        };

        let address = match self.remote {
            Some(address) => address,
            None => {
                let ip = match url.host().parse::<IpAddr>() {
                    Ok(ip) => ip,
                    Err(_) => self.network.resolve(url.host())?,
                };
                let address = SocketAddr::new(ip, url.port());
                self.remote = Some(address);
                address
            }
        };

        let socket = match self.socket.as_mut() {
            Some(handle) => handle.get_mut(),
            None => return Err(NetworkError::NotOpen),
        };
        socket.connect(&Endpoint::new(url.host(), address))
    }

    fn step_send(&mut self) -> Result<Step, HttpError> {
        let body = self.request.as_ref().and_then(|r| r.body()).unwrap_or(&[]);
        let head_len = self.head.len();
        let total = head_len + body.len();

        let socket = match self.socket.as_mut() {
            Some(handle) => handle.get_mut(),
            None => return Err(HttpError::SendError(NetworkError::NotOpen)),
        };

        while self.sent < total {
            let pending = if self.sent < head_len {
                &self.head[self.sent..]
            } else {
                &body[self.sent - head_len..]
            };
            match socket.write(pending) {
                Ok(0) => return Err(HttpError::SendError(NetworkError::ConnectionClosed)),
                Ok(n) => self.sent += n,
                Err(NetworkError::WouldBlock) => return Ok(Step::Blocked),
                Err(e) => return Err(HttpError::SendError(e)),
            }
        }

        match socket.flush() {
            Ok(()) => {}
            Err(NetworkError::WouldBlock) => return Ok(Step::Blocked),
            Err(e) => return Err(HttpError::SendError(e)),
        }

        trace!("request sent: {} bytes", total);
        self.transition(State::ReceivingHeaders);
        Ok(Step::Continue)
    }

    fn step_receive(&mut self) -> Result<Step, HttpError> {
        let socket = match self.socket.as_mut() {
            Some(handle) => handle.get_mut(),
            None => return Err(HttpError::ReceiveError(NetworkError::NotOpen)),
        };

        match socket.read(&mut self.buffer) {
            Ok(0) | Err(NetworkError::ConnectionClosed) => {
                trace!("peer closed the connection");
                self.parser.finish()?;
            }
            Ok(n) => {
                trace!("received {} bytes", n);
                self.parser.feed(&self.buffer[..n], &mut self.sink)?;
            }
            Err(NetworkError::WouldBlock) => return Ok(Step::Blocked),
            Err(e) => return Err(HttpError::ReceiveError(e)),
        }

        if self.parser.is_complete() {
            self.complete();
        } else if self.parser.headers_complete() && self.state == State::ReceivingHeaders {
            self.transition(State::ReceivingBody);
        }
        Ok(Step::Continue)
    }

    fn complete(&mut self) {
        let response = self.parser.take_response(self.sink.take_body());
        debug!("response complete: {}", response.status_code());
        self.response = Some(response);
        self.transition(State::Complete);
    }
}

impl<Net, K, const N: usize> core::fmt::Debug for HttpRequest<'_, Net, K, N>
where
    Net: NetworkInterface,
    K: BodySink,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HttpRequest")
            .field("url", &self.url())
            .field("state", &self.state)
            .field("error", &self.error)
            .field("owns_socket", &self.owns_socket())
            .finish_non_exhaustive()
    }
}

/// Completes on its second poll, giving other tasks a turn.
#[cfg(feature = "async")]
#[derive(Default)]
struct YieldNow {
    yielded: bool,
}

#[cfg(feature = "async")]
impl core::future::Future for YieldNow {
    type Output = ();

    fn poll(
        mut self: core::pin::Pin<&mut Self>,
        cx: &mut core::task::Context<'_>,
    ) -> Poll<Self::Output> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}
