//! Scripted socket and network interface for driving the HTTP engine.

use core::net::{IpAddr, Ipv4Addr, SocketAddr};
use libiot_http::network::error::Error;
use libiot_http::network::Endpoint;
use libiot_http::network::prelude::*;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// What the next call to `read` returns.
#[derive(Debug, Clone)]
pub enum ReadEvent {
    Data(Vec<u8>),
    WouldBlock,
    Error(Error),
}

/// Everything observable about a socket, shared so it survives the socket.
#[derive(Debug, Default)]
pub struct SocketLog {
    pub written: Vec<u8>,
    pub connects: Vec<SocketAddr>,
    pub hosts: Vec<String>,
    pub reads: usize,
    pub closes: usize,
}

#[derive(Debug)]
pub struct MockSocket {
    reads: VecDeque<ReadEvent>,
    /// `Ok(n)` accepts at most `n` bytes; once empty every write is accepted whole.
    writes: VecDeque<Result<usize, Error>>,
    connects: VecDeque<Result<(), Error>>,
    connected: bool,
    log: Rc<RefCell<SocketLog>>,
}

impl MockSocket {
    pub fn new() -> Self {
        Self {
            reads: VecDeque::new(),
            writes: VecDeque::new(),
            connects: VecDeque::new(),
            connected: false,
            log: Rc::new(RefCell::new(SocketLog::default())),
        }
    }

    /// Queue one read returning exactly `data`.
    pub fn read(mut self, data: &[u8]) -> Self {
        self.reads.push_back(ReadEvent::Data(data.to_vec()));
        self
    }

    /// Queue each of `parts` as its own read.
    pub fn reads<'p>(mut self, parts: impl IntoIterator<Item = &'p [u8]>) -> Self {
        for part in parts {
            self = self.read(part);
        }
        self
    }

    pub fn would_block(mut self) -> Self {
        self.reads.push_back(ReadEvent::WouldBlock);
        self
    }

    pub fn read_error(mut self, error: Error) -> Self {
        self.reads.push_back(ReadEvent::Error(error));
        self
    }

    pub fn write_plan(mut self, plan: &[Result<usize, Error>]) -> Self {
        self.writes.extend(plan.iter().copied());
        self
    }

    pub fn connect_plan(mut self, plan: &[Result<(), Error>]) -> Self {
        self.connects.extend(plan.iter().copied());
        self
    }

    /// Pretend the caller already connected this socket.
    pub fn connected(mut self) -> Self {
        self.connected = true;
        self
    }

    pub fn log(&self) -> Rc<RefCell<SocketLog>> {
        Rc::clone(&self.log)
    }
}

impl Connect for MockSocket {
    fn connect(&mut self, endpoint: &Endpoint<'_>) -> Result<(), Error> {
        let mut log = self.log.borrow_mut();
        log.connects.push(endpoint.address);
        log.hosts.push(endpoint.host.to_string());
        let result = self.connects.pop_front().unwrap_or(Ok(()));
        if result.is_ok() {
            self.connected = true;
        }
        result
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

impl Read for MockSocket {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        self.log.borrow_mut().reads += 1;
        match self.reads.pop_front() {
            None => Ok(0),
            Some(ReadEvent::WouldBlock) => Err(Error::WouldBlock),
            Some(ReadEvent::Error(e)) => Err(e),
            Some(ReadEvent::Data(mut data)) => {
                let len = buf.len().min(data.len());
                buf[..len].copy_from_slice(&data[..len]);
                if len < data.len() {
                    self.reads.push_front(ReadEvent::Data(data.split_off(len)));
                }
                Ok(len)
            }
        }
    }
}

impl Write for MockSocket {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Error> {
        let len = match self.writes.pop_front() {
            None => buf.len(),
            Some(Ok(limit)) => limit.min(buf.len()),
            Some(Err(e)) => return Err(e),
        };
        self.log.borrow_mut().written.extend_from_slice(&buf[..len]);
        Ok(len)
    }
}

impl Close for MockSocket {
    fn close(&mut self) -> Result<(), Error> {
        self.connected = false;
        self.log.borrow_mut().closes += 1;
        Ok(())
    }
}

/// Hands out queued sockets and resolves every name to one address.
#[derive(Debug)]
pub struct MockNetwork {
    sockets: VecDeque<MockSocket>,
    address: Result<IpAddr, Error>,
    pub lookups: Vec<String>,
}

impl MockNetwork {
    pub const ADDRESS: IpAddr = IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34));

    pub fn new() -> Self {
        Self {
            sockets: VecDeque::new(),
            address: Ok(Self::ADDRESS),
            lookups: Vec::new(),
        }
    }

    pub fn with_socket(mut self, socket: MockSocket) -> Self {
        self.sockets.push_back(socket);
        self
    }

    pub fn failing_dns(mut self) -> Self {
        self.address = Err(Error::DnsFailure);
        self
    }
}

impl NetworkInterface for MockNetwork {
    type Socket = MockSocket;

    fn open(&mut self) -> Result<MockSocket, Error> {
        self.sockets.pop_front().ok_or(Error::OpenError)
    }

    fn resolve(&mut self, host: &str) -> Result<IpAddr, Error> {
        self.lookups.push(host.to_string());
        self.address
    }
}
