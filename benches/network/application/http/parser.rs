use criterion::{BatchSize, Criterion, Throughput};
use libiot_http::network::application::http::{
    Buffered, HttpRequest, Method, ResponseParser, Streamed,
};
use libiot_http::network::error::Error;
use libiot_http::network::{Close, Connect, Endpoint, NetworkInterface, Read, Write};
use std::hint::black_box;

const BODY_LEN: usize = 4000;

fn content_length_response() -> Vec<u8> {
    let mut raw = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\n\
         Server: bench\r\nContent-Length: {BODY_LEN}\r\n\r\n"
    )
    .into_bytes();
    raw.resize(raw.len() + BODY_LEN, b'x');
    raw
}

fn chunked_response() -> Vec<u8> {
    let mut raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n".to_vec();
    for _ in 0..BODY_LEN / 100 {
        raw.extend_from_slice(b"64\r\n");
        raw.resize(raw.len() + 100, b'y');
        raw.extend_from_slice(b"\r\n");
    }
    raw.extend_from_slice(b"0\r\n\r\n");
    raw
}

pub fn bench_content_length(c: &mut Criterion) {
    let raw = content_length_response();
    let mut group = c.benchmark_group("parser");
    group.throughput(Throughput::Bytes(raw.len() as u64));

    for segment in [64, 1460, raw.len()] {
        group.bench_function(format!("content_length/{segment}"), |b| {
            b.iter(|| {
                let mut parser = ResponseParser::new(Method::Get);
                let mut sink = Buffered::new();
                for part in raw.chunks(segment) {
                    parser.feed(black_box(part), &mut sink).unwrap();
                }
                assert!(parser.is_complete());
                parser.take_response(sink.take_body())
            })
        });
    }
    group.finish();
}

pub fn bench_chunked(c: &mut Criterion) {
    let raw = chunked_response();
    let mut group = c.benchmark_group("parser");
    group.throughput(Throughput::Bytes(raw.len() as u64));

    group.bench_function("chunked/streamed", |b| {
        b.iter(|| {
            let mut total = 0;
            let mut parser = ResponseParser::new(Method::Get);
            let mut sink = Streamed::new(|fragment: &[u8]| total += fragment.len());
            for part in raw.chunks(536) {
                parser.feed(black_box(part), &mut sink).unwrap();
            }
            drop(sink);
            assert_eq!(total, BODY_LEN);
        })
    });
    group.finish();
}

/// Replays a canned response in fixed-size reads.
struct ReplaySocket {
    data: Vec<u8>,
    pos: usize,
    segment: usize,
}

impl Connect for ReplaySocket {
    fn connect(&mut self, _endpoint: &Endpoint<'_>) -> Result<(), Error> {
        Ok(())
    }

    fn is_connected(&self) -> bool {
        true
    }
}

impl Read for ReplaySocket {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let len = buf.len().min(self.segment).min(self.data.len() - self.pos);
        buf[..len].copy_from_slice(&self.data[self.pos..self.pos + len]);
        self.pos += len;
        Ok(len)
    }
}

impl Write for ReplaySocket {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Error> {
        Ok(buf.len())
    }
}

impl Close for ReplaySocket {
    fn close(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

struct ReplayNetwork;

impl NetworkInterface for ReplayNetwork {
    type Socket = ReplaySocket;

    fn open(&mut self) -> Result<ReplaySocket, Error> {
        Err(Error::OpenError)
    }

    fn resolve(&mut self, _host: &str) -> Result<core::net::IpAddr, Error> {
        Err(Error::DnsFailure)
    }
}

pub fn bench_exchange(c: &mut Criterion) {
    let raw = content_length_response();
    let mut group = c.benchmark_group("exchange");
    group.throughput(Throughput::Bytes(raw.len() as u64));

    group.bench_function("buffered_get", |b| {
        b.iter_batched(
            || ReplaySocket {
                data: raw.clone(),
                pos: 0,
                segment: 1460,
            },
            |mut socket| {
                let mut network = ReplayNetwork;
                let mut request = HttpRequest::with_socket(
                    &mut network,
                    &mut socket,
                    Method::Get,
                    "http://192.168.1.10/blob",
                    Buffered::new(),
                );
                request.send().map(|r| r.status_code()).unwrap()
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}
