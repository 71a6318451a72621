//! End-to-end tests of a single connection over an in-memory stream

use std::fs;
use std::net::SocketAddr;
use std::sync::Arc;

use lantern::config::SiteConfig;
use lantern::http::connection::{Connection, LEGACY_POST_ACK};
use lantern::site::router::Router;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt, duplex};

const ECHO_POST: &str = "read -r body\nprintf 'Content-Type: text/plain\\n'\nprintf 'got %s\\n' \"$body\"\n";

fn site() -> (TempDir, Arc<Router>) {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir(root.path().join("docs")).unwrap();
    fs::write(root.path().join("docs/notes.txt"), "some notes\n").unwrap();
    fs::write(root.path().join("echo.pl"), ECHO_POST).unwrap();

    let mut site = SiteConfig::rooted_at(root.path());
    site.cgi_interpreter = "/bin/sh".into();
    (root, Arc::new(Router::new(Arc::new(site))))
}

fn peer() -> SocketAddr {
    "192.0.2.7:40000".parse().unwrap()
}

/// Sends `raw` on a fresh connection and returns everything the server
/// wrote before closing.
async fn exchange(router: Arc<Router>, raw: &[u8], legacy_post_ack: bool) -> Vec<u8> {
    let (mut client, server) = duplex(64 * 1024);

    let task = tokio::spawn(async move {
        let mut conn = Connection::new(server, peer(), router).legacy_post_ack(legacy_post_ack);
        conn.run().await
    });

    client.write_all(raw).await.unwrap();
    client.shutdown().await.unwrap();
    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    task.await.unwrap().unwrap();
    out
}

fn status_line(out: &[u8]) -> String {
    let text = String::from_utf8_lossy(out);
    text.lines().next().unwrap_or("").to_string()
}

#[tokio::test]
async fn test_static_file_round_trip() {
    let (_root, router) = site();
    let out = exchange(router, b"GET /docs/notes.txt HTTP/1.1\r\nHost: localhost\r\n\r\n", false).await;
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(text.contains("Content-Type: text/plain\r\n"));
    assert!(text.contains("Content-Length: 11\r\n"));
    assert!(text.ends_with("\r\n\r\nsome notes\n"));
}

#[tokio::test]
async fn test_redirect_round_trip() {
    let (_root, router) = site();
    let out = exchange(router, b"GET /docs HTTP/1.1\r\nHost: localhost:21215\r\n\r\n", false).await;
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("HTTP/1.1 301 Moved Permanently\r\nLocation: http://localhost:21215/docs/\r\n"));
}

#[tokio::test]
async fn test_bad_request_line_gets_500() {
    let (_root, router) = site();
    let out = exchange(router, b"GARBAGE\r\n\r\n", false).await;

    assert_eq!(status_line(&out), "HTTP/1.1 500 Internal Server Error");
}

#[tokio::test]
async fn test_post_without_content_length_gets_500() {
    let (_root, router) = site();
    let out = exchange(router, b"POST /echo.pl HTTP/1.1\r\nHost: x\r\n\r\nname=doge", false).await;

    assert_eq!(status_line(&out), "HTTP/1.1 500 Internal Server Error");
}

#[tokio::test]
async fn test_post_reads_exactly_content_length() {
    let (_root, router) = site();
    let raw = b"POST /echo.pl HTTP/1.1\r\nHost: x\r\nContent-Length: 4\r\n\r\ndogeEXTRA";
    let out = exchange(router, raw, false).await;
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(text.ends_with("\r\n\r\ngot doge\r\n\r\n"));
}

#[tokio::test]
async fn test_legacy_post_ack_precedes_response() {
    let (_root, router) = site();
    let raw = b"POST /echo.pl HTTP/1.1\r\nHost: x\r\nContent-Length: 4\r\n\r\ndoge";
    let out = exchange(router, raw, true).await;

    assert!(out.starts_with(LEGACY_POST_ACK));
    let rest = String::from_utf8(out[LEGACY_POST_ACK.len()..].to_vec()).unwrap();
    assert!(rest.starts_with("HTTP/1.1 200 OK\r\n"));
}

#[tokio::test]
async fn test_get_never_acks() {
    let (_root, router) = site();
    let out = exchange(router, b"GET /docs/ HTTP/1.1\r\nHost: x\r\n\r\n", true).await;

    assert_eq!(status_line(&out), "HTTP/1.1 200 OK");
}

#[tokio::test]
async fn test_close_without_request_sends_nothing() {
    let (_root, router) = site();
    let out = exchange(router, b"", false).await;

    assert!(out.is_empty());
}

#[tokio::test]
async fn test_repeated_get_is_byte_identical() {
    let (_root, router) = site();
    let raw = b"GET /docs/ HTTP/1.1\r\nHost: localhost\r\n\r\n";

    let first = exchange(router.clone(), raw, false).await;
    let second = exchange(router, raw, false).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_undeliverable_500_still_closes_cleanly() {
    let (_root, router) = site();
    let (mut client, server) = duplex(64 * 1024);

    client.write_all(b"GARBAGE\r\n\r\n").await.unwrap();
    drop(client);

    let mut conn = Connection::new(server, peer(), router);
    assert!(conn.run().await.is_ok());
}
