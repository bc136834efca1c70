//! End-to-end request handling over an in-memory stream.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use rootserve::fs::ContentRoot;
use rootserve::http::connection::Connection;
use rootserve::http::writer::CHUNK_SIZE;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

fn content_root() -> (TempDir, Arc<ContentRoot>) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    fs::create_dir_all(root.join("a/b")).unwrap();
    fs::create_dir_all(root.join("docs")).unwrap();
    fs::write(root.join("index.html"), "<h1>home</h1>\n").unwrap();
    fs::write(root.join("a/b/c.txt"), "hello from c\n").unwrap();
    fs::write(root.join("docs/index.html"), "<h1>docs</h1>\n").unwrap();

    let big: Vec<u8> = (0..CHUNK_SIZE * 3 + 17).map(|i| (i % 253) as u8).collect();
    fs::write(root.join("big.png"), &big).unwrap();

    let content = ContentRoot::open(root).unwrap();
    (dir, Arc::new(content))
}

/// Sends `request` and returns everything the server wrote before closing.
async fn exchange(root: Arc<ContentRoot>, request: &[u8]) -> Vec<u8> {
    let (mut client, server) = tokio::io::duplex(64 * 1024);

    let task = tokio::spawn(async move {
        let mut conn = Connection::new(server, root);
        conn.run().await
    });

    client.write_all(request).await.unwrap();

    let mut response = Vec::new();
    client.read_to_end(&mut response).await.unwrap();

    task.await.unwrap().unwrap();
    response
}

fn split_response(raw: &[u8]) -> (String, Vec<u8>) {
    let end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has a header terminator");
    let head = String::from_utf8(raw[..end].to_vec()).unwrap();
    (head, raw[end + 4..].to_vec())
}

#[tokio::test]
async fn test_get_file() {
    let (_dir, root) = content_root();
    let raw = exchange(root, b"GET /a/b/c.txt HTTP/1.1\r\nHost: x\r\n\r\n").await;
    let (head, body) = split_response(&raw);

    assert_eq!(
        head,
        "HTTP/1.1 200 OK\r\n\
         Content-Length: 13\r\n\
         Content-Type: text/plain; charset=utf-8\r\n\
         Connection: close"
    );
    assert_eq!(body, b"hello from c\n");
}

#[tokio::test]
async fn test_head_file_has_no_body() {
    let (_dir, root) = content_root();
    let raw = exchange(root, b"HEAD /a/b/c.txt HTTP/1.1\r\n\r\n").await;
    let (head, body) = split_response(&raw);

    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(head.contains("Content-Length: 13\r\n"));
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_get_root_matches_index() {
    let (_dir, root) = content_root();
    let slash = exchange(Arc::clone(&root), b"GET / HTTP/1.1\r\n\r\n").await;
    let explicit = exchange(root, b"GET /index.html HTTP/1.1\r\n\r\n").await;

    assert_eq!(slash, explicit);
    assert!(slash.ends_with(b"<h1>home</h1>\n"));
}

#[tokio::test]
async fn test_get_directory_index() {
    let (_dir, root) = content_root();
    let raw = exchange(root, b"GET /docs/ HTTP/1.1\r\n\r\n").await;
    let (head, body) = split_response(&raw);

    assert!(head.contains("Content-Type: text/html; charset=utf-8\r\n"));
    assert_eq!(body, b"<h1>docs</h1>\n");
}

#[tokio::test]
async fn test_get_large_file_streams_all_chunks() {
    let (dir, root) = content_root();
    let expected = fs::read(dir.path().join("big.png")).unwrap();

    let raw = exchange(root, b"GET /big.png HTTP/1.1\r\n\r\n").await;
    let (head, body) = split_response(&raw);

    assert!(head.contains(&format!("Content-Length: {}\r\n", expected.len())));
    assert!(head.contains("Content-Type: image/png\r\n"));
    assert_eq!(body, expected);
}

#[tokio::test]
async fn test_missing_file_is_404() {
    let (_dir, root) = content_root();
    let raw = exchange(root, b"GET /missing HTTP/1.1\r\n\r\n").await;

    assert_eq!(
        raw,
        b"HTTP/1.1 404 Not Found\r\n\
          Content-Type: text/plain; charset=utf-8\r\n\
          Content-Length: 10\r\n\
          Connection: close\r\n\
          \r\n\
          not found\n"
    );
}

#[tokio::test]
async fn test_traversal_is_404() {
    let (_dir, root) = content_root();

    for request in [
        &b"GET /a/../../etc/passwd HTTP/1.1\r\n\r\n"[..],
        b"GET /%2e%2e/etc/passwd HTTP/1.1\r\n\r\n",
        b"GET //etc/passwd HTTP/1.1\r\n\r\n",
        b"HEAD /a/./b/c.txt HTTP/1.1\r\n\r\n",
    ] {
        let raw = exchange(Arc::clone(&root), request).await;
        let (head, body) = split_response(&raw);

        assert!(head.starts_with("HTTP/1.1 404 Not Found\r\n"), "{}", head);
        assert_eq!(body, b"not found\n");
    }
}

#[tokio::test]
async fn test_post_is_405() {
    let (_dir, root) = content_root();
    let raw = exchange(root, b"POST /a HTTP/1.1\r\nContent-Length: 0\r\n\r\n").await;
    let (head, body) = split_response(&raw);

    assert!(head.starts_with("HTTP/1.1 405 Method Not Allowed\r\n"));
    assert!(head.contains("Connection: close"));
    assert_eq!(body, b"method not allowed\n");
}

#[tokio::test]
async fn test_missing_space_is_400() {
    let (_dir, root) = content_root();
    let raw = exchange(root, b"GET\r\n\r\n").await;
    let (head, body) = split_response(&raw);

    assert!(head.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    assert_eq!(body, b"bad request\n");
}

#[tokio::test]
async fn test_absolute_form_is_400() {
    let (_dir, root) = content_root();
    let raw = exchange(root, b"GET http://example.com/ HTTP/1.1\r\n\r\n").await;

    assert!(raw.starts_with(b"HTTP/1.1 400 Bad Request\r\n"));
}

#[tokio::test]
async fn test_client_closing_without_request_gets_nothing() {
    let (_dir, root) = content_root();
    let (mut client, server) = tokio::io::duplex(1024);

    let task = tokio::spawn(async move {
        let mut conn = Connection::new(server, root);
        conn.run().await
    });

    client.shutdown().await.unwrap();
    let mut response = Vec::new();
    client.read_to_end(&mut response).await.unwrap();

    task.await.unwrap().unwrap();
    assert!(response.is_empty());
}

#[tokio::test]
async fn test_read_timeout_closes_silent_connection() {
    let (_dir, root) = content_root();
    let (mut client, server) = tokio::io::duplex(1024);

    let task = tokio::spawn(async move {
        let mut conn = Connection::new(server, root)
            .with_read_timeout(Some(Duration::from_millis(50)));
        conn.run().await
    });

    let mut response = Vec::new();
    client.read_to_end(&mut response).await.unwrap();

    task.await.unwrap().unwrap();
    assert!(response.is_empty());
}
