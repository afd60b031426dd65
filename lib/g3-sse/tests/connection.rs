/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::TryStreamExt;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use url::Url;

use g3_sse::{StreamingHttpConfig, StreamingHttpConnection, StreamingHttpError, StreamingHttpErrorKind};

const SSE_RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\n\
    Content-Type: text/event-stream\r\n\
    Transfer-Encoding: chunked\r\n\r\n\
    d\r\nevent: ping\r\n\r\nb\r\ndata: 1\r\n\r\n\r\n\
    0\r\n\r\n";

async fn read_head(stream: &mut TcpStream) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut byte = [0u8; 1];
    while !buf.ends_with(b"\r\n\r\n") {
        let nr = stream.read(&mut byte).await.unwrap();
        if nr == 0 {
            break;
        }
        buf.push(byte[0]);
    }
    buf
}

async fn wait_peer_close(stream: &mut TcpStream) -> bool {
    let mut buf = [0u8; 16];
    matches!(stream.read(&mut buf).await, Ok(0) | Err(_))
}

/// Accept a single connection, reply with `response` and return the request head.
async fn serve_once(response: &'static [u8]) -> (SocketAddr, JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let req = read_head(&mut stream).await;
        stream.write_all(response).await.unwrap();
        req
    });
    (addr, handle)
}

/// Accept a single connection as a proxy, then act as the target inside the tunnel.
async fn serve_proxy_once(
    connect_response: &'static [u8],
    response: &'static [u8],
) -> (SocketAddr, JoinHandle<(Vec<u8>, Vec<u8>)>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let connect_req = read_head(&mut stream).await;
        stream.write_all(connect_response).await.unwrap();
        if !connect_response.starts_with(b"HTTP/1.1 200") {
            wait_peer_close(&mut stream).await;
            return (connect_req, Vec::new());
        }
        let req = read_head(&mut stream).await;
        stream.write_all(response).await.unwrap();
        (connect_req, req)
    });
    (addr, handle)
}

fn new_config(url: &str) -> StreamingHttpConfig {
    let url = Url::parse(url).unwrap();
    let mut config = StreamingHttpConfig::new(url).unwrap();
    config.connect_timeout = Duration::from_secs(5);
    config.read_timeout = Duration::from_secs(5);
    config
}

#[tokio::test]
async fn direct_lines() {
    let (addr, server) = serve_once(SSE_RESPONSE).await;
    let mut config = new_config(&format!("http://{addr}/events?topic=a"));
    config.append_header("Host", &addr.to_string()).unwrap();
    config.append_header("Accept", "text/event-stream").unwrap();

    let mut conn = StreamingHttpConnection::connect(&config).await.unwrap();
    assert_eq!(conn.status(), 200);
    assert_eq!(
        conn.headers().get("Content-Type"),
        Some("text/event-stream")
    );

    let lines: Vec<String> = conn.read_lines().try_collect().await.unwrap();
    assert_eq!(lines, vec!["event: ping\r\n", "data: 1\r\n", "\r\n"]);

    let req = server.await.unwrap();
    let expected = format!(
        "GET /events?topic=a HTTP/1.1\r\nHost: {addr}\r\nAccept: text/event-stream\r\n\r\n"
    );
    assert_eq!(req, expected.as_bytes());
}

#[tokio::test]
async fn direct_read_all() {
    let (addr, server) =
        serve_once(b"HTTP/1.1 200 OK\r\nContent-Length: 11\r\n\r\nhello world").await;
    let config = new_config(&format!("http://{addr}/"));

    let mut conn = StreamingHttpConnection::connect(&config).await.unwrap();
    let body = conn.read_all().await.unwrap();
    assert_eq!(body.as_ref(), b"hello world");
    assert!(conn.next_line().await.unwrap().is_none());
    server.await.unwrap();
}

#[tokio::test]
async fn early_stop() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        read_head(&mut stream).await;
        stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\n\r\ndata: 1\n\n")
            .await
            .unwrap();
        // keep the stream open until the client gives up
        wait_peer_close(&mut stream).await
    });

    let config = new_config(&format!("http://{addr}/"));
    let mut conn = StreamingHttpConnection::connect(&config).await.unwrap();
    assert_eq!(conn.next_line().await.unwrap().unwrap(), "data: 1\n");
    conn.close();
    assert!(conn.is_closed());
    assert!(server.await.unwrap());
}

#[tokio::test]
async fn proxy_tunnel_with_auth() {
    let (addr, server) = serve_proxy_once(
        b"HTTP/1.1 200 Connection established\r\n\r\n",
        b"HTTP/1.1 200 OK\r\nContent-Length: 8\r\n\r\ndata: 1\n",
    )
    .await;
    let mut config = new_config("http://stream.example.com:8080/sse");
    config.set_proxy_url(&format!("http://u:p@{addr}")).unwrap();
    config.append_header("Host", "stream.example.com:8080").unwrap();

    let mut conn = StreamingHttpConnection::connect(&config).await.unwrap();
    assert_eq!(conn.next_line().await.unwrap().unwrap(), "data: 1\n");
    assert!(conn.next_line().await.unwrap().is_none());

    let (connect_req, req) = server.await.unwrap();
    assert_eq!(
        connect_req,
        b"CONNECT stream.example.com:8080 HTTP/1.1\r\n\
          Host: stream.example.com:8080\r\n\
          Proxy-Authorization: Basic dTpw\r\n\r\n"
    );
    assert_eq!(
        req,
        b"GET /sse HTTP/1.1\r\nHost: stream.example.com:8080\r\n\r\n"
    );
}

#[tokio::test]
async fn proxy_tunnel_without_auth() {
    let (addr, server) = serve_proxy_once(
        b"HTTP/1.1 200 OK\r\n\r\n",
        b"HTTP/1.1 204 No Content\r\n\r\n",
    )
    .await;
    let mut config = new_config("http://127.0.0.1:1/");
    config.set_proxy_url(&format!("http://{addr}")).unwrap();

    let mut conn = StreamingHttpConnection::connect(&config).await.unwrap();
    assert_eq!(conn.status(), 204);
    assert!(conn.read_all().await.unwrap().is_empty());

    let (connect_req, _) = server.await.unwrap();
    let connect_req = String::from_utf8(connect_req).unwrap();
    assert!(connect_req.starts_with("CONNECT 127.0.0.1:1 HTTP/1.1\r\n"));
    assert!(!connect_req.contains("Proxy-Authorization"));
}

#[tokio::test]
async fn proxy_auth_required() {
    let (addr, server) = serve_proxy_once(
        b"HTTP/1.1 407 Proxy Authentication Required\r\nContent-Length: 0\r\n\r\n",
        b"",
    )
    .await;
    let mut config = new_config("http://stream.example.com/sse");
    config.set_proxy_url(&format!("http://{addr}")).unwrap();

    let Err(e) = StreamingHttpConnection::connect(&config).await else {
        panic!("the proxy tunnel should fail");
    };
    assert!(matches!(e, StreamingHttpError::ProxyConnectFailed(_)));
    assert_eq!(e.kind(), StreamingHttpErrorKind::Connection);
    server.await.unwrap();
}

#[tokio::test]
async fn proxy_no_response() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        read_head(&mut stream).await;
        wait_peer_close(&mut stream).await
    });

    let mut config = new_config("http://stream.example.com/sse");
    config.set_proxy_url(&format!("http://{addr}")).unwrap();
    config.connect_timeout = Duration::from_millis(200);

    let Err(e) = StreamingHttpConnection::connect(&config).await else {
        panic!("the proxy tunnel should time out");
    };
    assert!(matches!(e, StreamingHttpError::ConnectTimeout(_)));
    assert_eq!(e.kind(), StreamingHttpErrorKind::Connection);
    assert!(server.await.unwrap());
}

#[tokio::test]
async fn eof_before_header() {
    let (addr, server) = serve_once(b"HTTP/1.1 200 OK\r\n").await;
    let config = new_config(&format!("http://{addr}/"));

    let Err(e) = StreamingHttpConnection::connect(&config).await else {
        panic!("no complete response header received");
    };
    assert!(matches!(e, StreamingHttpError::UnexpectedEof));
    assert_eq!(e.kind(), StreamingHttpErrorKind::Protocol);
    server.await.unwrap();
}

#[tokio::test]
async fn connect_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = new_config(&format!("http://{addr}/"));
    let Err(e) = StreamingHttpConnection::connect(&config).await else {
        panic!("nothing is listening");
    };
    assert!(matches!(e, StreamingHttpError::ConnectFailed(..)));
    assert_eq!(e.kind(), StreamingHttpErrorKind::Connection);
}
