use dotenvy::dotenv;
use libiot_http::network::application::http::{Buffered, HttpRequest, Method, Streamed};
use libiot_http::network::std_net::{StdNetwork, TcpSocket};
use libiot_http::network::{Close, Connect};
use std::env;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

/// Accept one connection, read the request head, answer with `response` and
/// close. The request bytes are returned through the join handle.
fn serve_once(response: &'static [u8]) -> (String, thread::JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/status", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 512];
        while !request.ends_with(b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        // Dribble the response out to exercise partial reads.
        for part in response.chunks(7) {
            stream.write_all(part).unwrap();
            stream.flush().unwrap();
            thread::sleep(Duration::from_millis(1));
        }
        request
    });

    (url, handle)
}

#[test]
fn test_std_network_local_server() {
    let (url, server) = serve_once(
        b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n",
    );

    let mut network = StdNetwork::new().with_connect_timeout(Duration::from_secs(5));
    let mut request = HttpRequest::new(&mut network, Method::Get, &url, Buffered::new());
    let response = request.send().unwrap();
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.body_str(), Some("Wikipedia"));
    drop(request);

    let received = server.join().unwrap();
    assert!(received.starts_with(b"GET /status HTTP/1.1\r\nHost: 127.0.0.1:"));
}

#[test]
fn test_std_network_read_until_close() {
    let (url, server) = serve_once(b"HTTP/1.0 200 OK\r\nContent-Type: text/plain\r\n\r\nbye");

    let mut network = StdNetwork::new();
    let mut body = Vec::new();
    let mut request = HttpRequest::new(
        &mut network,
        Method::Get,
        &url,
        Streamed::new(|fragment: &[u8]| body.extend_from_slice(fragment)),
    );
    assert_eq!(request.send().unwrap().header("content-type"), Some("text/plain"));
    drop(request);
    server.join().unwrap();

    assert_eq!(body, b"bye");
}

#[test]
fn test_std_network_borrowed_stream() {
    let (url, server) = serve_once(b"HTTP/1.1 204 No Content\r\nX-Device: porch\r\n\r\n");
    let address = url
        .trim_start_matches("http://")
        .trim_end_matches("/status")
        .to_string();

    let stream = TcpStream::connect(address.as_str()).unwrap();
    let mut socket = TcpSocket::from_stream(stream).unwrap();
    assert!(socket.is_connected());

    let mut network = StdNetwork::new();
    let mut request =
        HttpRequest::with_socket(&mut network, &mut socket, Method::Get, &url, Buffered::new());
    assert!(!request.owns_socket());
    let response = request.send().unwrap();
    assert_eq!(response.status_code(), 204);
    assert_eq!(response.header("x-device"), Some("porch"));
    drop(request);

    // Still ours to close.
    assert!(socket.is_connected());
    socket.close().unwrap();
    assert!(!socket.is_connected());
    server.join().unwrap();
}

#[test]
#[ignore = "needs a reachable HTTP server"]
fn test_http_get_live() {
    dotenv().ok();
    let address = env::var("TEST_HTTP_ADDRESS").unwrap_or("httpbin.org:80".to_string());
    let url = format!("http://{address}/get");

    let mut network = StdNetwork::new().with_connect_timeout(Duration::from_secs(5));
    let mut request = HttpRequest::new(&mut network, Method::Get, &url, Buffered::new());
    request.set_header("Accept", "application/json").unwrap();

    let response = request.send();
    assert!(response.is_ok());
    assert_eq!(response.unwrap().status_code(), 200);
}

#[test]
#[ignore = "needs a reachable HTTP server"]
fn test_http_post_live() {
    dotenv().ok();
    let address = env::var("TEST_HTTP_ADDRESS").unwrap_or("httpbin.org:80".to_string());
    let url = format!("http://{address}/post");

    let mut network = StdNetwork::new().with_connect_timeout(Duration::from_secs(5));
    let mut body = Vec::new();
    let mut request = HttpRequest::new(
        &mut network,
        Method::Post,
        &url,
        Streamed::new(|fragment: &[u8]| body.extend_from_slice(fragment)),
    );
    request.set_header("Content-Type", "application/json").unwrap();
    request.set_body(br#"{"hello":"world"}"#).unwrap();

    assert_eq!(request.send().unwrap().status_code(), 200);
    drop(request);
    assert!(!body.is_empty());
}
