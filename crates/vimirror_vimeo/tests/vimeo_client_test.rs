//! HTTP-level tests for the Vimeo client.

use mockito::{Matcher, Server};
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use vimirror_core::VideoId;
use vimirror_error::{DownloadErrorKind, FetchErrorKind};
use vimirror_vimeo::{VideoSource, VimeoClient};

fn client(server: &Server) -> VimeoClient {
    VimeoClient::new("test_token", server.url(), Duration::from_secs(5)).unwrap()
}

fn video_id(id: &str) -> VideoId {
    VideoId::parse(id).unwrap()
}

/// Serve one response whose body trickles out a byte at a time.
async fn trickling_server(body_len: usize, interval: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;

        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body_len
        );
        if socket.write_all(head.as_bytes()).await.is_err() {
            return;
        }
        for _ in 0..body_len {
            tokio::time::sleep(interval).await;
            if socket.write_all(b"x").await.is_err() {
                return;
            }
        }
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_fetch_renditions_sends_token_and_fields() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/videos/123")
        .match_query(Matcher::UrlEncoded("fields".into(), "download".into()))
        .match_header("authorization", "bearer test_token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"download": [
                {"rendition": "1080p", "width": 1920, "created_time": "2024-03-01T12:00:00+00:00",
                 "size": 1000, "link": "https://example.com/a.mp4"}
            ]}"#,
        )
        .create_async()
        .await;

    let renditions = client(&server)
        .fetch_renditions(&video_id("123"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(renditions.len(), 1);
    assert_eq!(renditions[0].rendition(), "1080p");
}

#[tokio::test]
async fn test_fetch_renditions_error_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/videos/404")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"error": "The requested video couldn't be found."}"#)
        .create_async()
        .await;

    let err = client(&server)
        .fetch_renditions(&video_id("404"))
        .await
        .unwrap_err();

    assert!(matches!(err.kind, FetchErrorKind::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_fetch_renditions_error_payload() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/videos/1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"error": "Something strange happened"}"#)
        .create_async()
        .await;

    let err = client(&server)
        .fetch_renditions(&video_id("1"))
        .await
        .unwrap_err();

    assert_eq!(
        err.kind,
        FetchErrorKind::Api("Something strange happened".to_string())
    );
}

#[tokio::test]
async fn test_fetch_renditions_malformed_body() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/videos/1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let err = client(&server)
        .fetch_renditions(&video_id("1"))
        .await
        .unwrap_err();

    assert!(matches!(err.kind, FetchErrorKind::Decode(_)));
}

#[tokio::test]
async fn test_fetch_renditions_connection_refused() {
    let client = VimeoClient::new("token", "http://127.0.0.1:1", Duration::from_secs(2)).unwrap();

    let err = client.fetch_renditions(&video_id("1")).await.unwrap_err();
    assert!(matches!(err.kind, FetchErrorKind::Transport(_)));
}

#[tokio::test]
async fn test_download_writes_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/download/clip.mp4")
        .match_header("authorization", "bearer test_token")
        .with_status(200)
        .with_body(b"\x00\x00\x00\x18ftypmp42")
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("buffer");
    let link = format!("{}/download/clip.mp4", server.url());

    let bytes = client(&server).download(&link, &destination).await.unwrap();

    mock.assert_async().await;
    assert_eq!(bytes, 12);
    assert_eq!(std::fs::read(&destination).unwrap(), b"\x00\x00\x00\x18ftypmp42");
}

#[tokio::test]
async fn test_download_error_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/download/expired.mp4")
        .with_status(410)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("buffer");
    let link = format!("{}/download/expired.mp4", server.url());

    let err = client(&server)
        .download(&link, &destination)
        .await
        .unwrap_err();

    assert_eq!(err.kind, DownloadErrorKind::Status(410));
    assert!(!destination.exists());
}

#[tokio::test]
async fn test_download_outlives_request_timeout_while_progressing() {
    // 20 bytes at 150 ms each take 3 s, well past the 1 s request timeout
    let base = trickling_server(20, Duration::from_millis(150)).await;
    let client = VimeoClient::new("token", &base, Duration::from_secs(1)).unwrap();

    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("buffer");
    let link = format!("{}/download/large.mp4", base);

    let bytes = client.download(&link, &destination).await.unwrap();

    assert_eq!(bytes, 20);
    assert_eq!(std::fs::read(&destination).unwrap(), vec![b'x'; 20]);
}

#[tokio::test]
async fn test_download_respects_total_download_timeout() {
    let base = trickling_server(20, Duration::from_millis(150)).await;
    let client = VimeoClient::new("token", &base, Duration::from_secs(1))
        .unwrap()
        .with_download_timeout(Duration::from_millis(600));

    let dir = TempDir::new().unwrap();
    let link = format!("{}/download/large.mp4", base);

    let err = client
        .download(&link, &dir.path().join("buffer"))
        .await
        .unwrap_err();

    assert!(matches!(err.kind, DownloadErrorKind::Transport(_)));
}

#[tokio::test]
async fn test_metadata_request_keeps_short_timeout() {
    let base = trickling_server(20, Duration::from_millis(150)).await;
    let client = VimeoClient::new("token", &base, Duration::from_secs(1)).unwrap();

    let err = client.fetch_renditions(&video_id("1")).await.unwrap_err();

    assert!(matches!(err.kind, FetchErrorKind::Transport(_)));
}
