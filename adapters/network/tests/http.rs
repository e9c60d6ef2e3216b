use std::{
    io::{BufRead, BufReader, Read, Write},
    net::TcpListener,
    thread::{self, JoinHandle},
};

use scroller_core::{CellCoord, Marker, SelectionReport};
use scroller_network::{DataSource, Endpoints, HttpClient, NetworkError, SelectionSink};

/// Request line, lower-cased headers and body captured by the test server.
struct CapturedRequest {
    request_line: String,
    headers: Vec<String>,
    body: Vec<u8>,
}

/// Answers a single request on a loopback port with a canned response.
fn serve_once(status: &'static str, body: &'static [u8]) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let address = listener.local_addr().expect("local address");
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept connection");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

        let mut request_line = String::new();
        let _ = reader
            .read_line(&mut request_line)
            .expect("read request line");
        let mut headers = Vec::new();
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            let _ = reader.read_line(&mut line).expect("read header");
            let line = line.trim_end().to_ascii_lowercase();
            if line.is_empty() {
                break;
            }
            if let Some(value) = line.strip_prefix("content-length:") {
                content_length = value.trim().parse().expect("numeric content length");
            }
            headers.push(line);
        }
        let mut request_body = vec![0; content_length];
        reader.read_exact(&mut request_body).expect("read body");

        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        )
        .expect("write head");
        stream.write_all(body).expect("write body");

        CapturedRequest {
            request_line: request_line.trim_end().to_owned(),
            headers,
            body: request_body,
        }
    });
    (format!("http://{address}"), handle)
}

/// Client that talks to the loopback server directly, ignoring proxy variables.
fn client_for(base: &str) -> HttpClient {
    let client = reqwest::blocking::Client::builder()
        .no_proxy()
        .build()
        .expect("client builds");
    HttpClient::with_client(
        client,
        Endpoints {
            map_url: format!("{base}/map.csv"),
            sprite_url: format!("{base}/tank.png"),
            report_url: format!("{base}/selection"),
        },
    )
}

#[test]
fn default_client_builds_with_timeouts() {
    let client = HttpClient::new(Endpoints::default()).expect("client builds");

    assert_eq!(client.endpoints(), &Endpoints::default());
}

#[test]
fn map_is_downloaded_and_parsed() {
    let (base, server) = serve_once("200 OK", b"x,o,1\n ,2,3\n");
    let map = client_for(&base).fetch_map().expect("map downloads");
    let request = server.join().expect("server thread");

    assert_eq!(request.request_line, "GET /map.csv HTTP/1.1");
    assert_eq!((map.width(), map.height()), (3, 2));
    assert_eq!(map.marker_at(CellCoord::new(0, 0)), Some(Marker::Tank));
    assert_eq!(map.marker_at(CellCoord::new(0, 1)), Some(Marker::Empty));
}

#[test]
fn blank_map_payload_is_malformed() {
    let (base, server) = serve_once("200 OK", b"\n\n");
    let error = client_for(&base)
        .fetch_map()
        .expect_err("blank payload must fail");
    let _ = server.join().expect("server thread");

    assert!(matches!(error, NetworkError::Malformed(_)));
}

#[test]
fn sprite_bytes_are_returned_verbatim() {
    let (base, server) = serve_once("200 OK", b"\x89PNG\r\n\x1a\nrest");
    let sprite = client_for(&base).fetch_sprite().expect("sprite downloads");
    let request = server.join().expect("server thread");

    assert_eq!(request.request_line, "GET /tank.png HTTP/1.1");
    assert_eq!(sprite, b"\x89PNG\r\n\x1a\nrest".to_vec());
}

#[test]
fn error_status_is_reported() {
    let (base, server) = serve_once("503 Service Unavailable", b"busy");
    let error = client_for(&base)
        .fetch_sprite()
        .expect_err("error status must fail");
    let _ = server.join().expect("server thread");

    assert!(matches!(error, NetworkError::Status { status: 503, .. }));
}

#[test]
fn selection_is_posted_as_json() {
    let (base, server) = serve_once("201 Created", b"");
    client_for(&base)
        .notify(&SelectionReport::new(CellCoord::new(3, 0), "XH"))
        .expect("report accepted");
    let request = server.join().expect("server thread");

    assert_eq!(request.request_line, "POST /selection HTTP/1.1");
    assert!(request
        .headers
        .iter()
        .any(|header| header == "content-type: application/json"));
    let body: serde_json::Value = serde_json::from_slice(&request.body).expect("json body");
    assert_eq!(body, serde_json::json!({"x": 3, "y": 0, "value": "XH"}));
}

#[test]
fn unreachable_server_fails_without_panicking() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let address = listener.local_addr().expect("local address");
    drop(listener);

    let error = client_for(&format!("http://{address}"))
        .fetch_map()
        .expect_err("closed port must fail");

    assert!(matches!(error, NetworkError::Request(_)));
}
