//! Mock HTTP tests for UploadClient.
//!
//! These tests cover:
//! - Multipart body layout (image + caption fields)
//! - Empty captions are still sent
//! - Error mapping for rejected and unreachable endpoints

use std::time::Duration;

use snapcap::snapshot::Payload;
use snapcap::upload::{UploadClient, UploadError, UploadRequest, IMAGE_FILE_NAME};
use wiremock::matchers::{header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn jpeg_payload() -> Payload {
    Payload::new(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x10, 0x20, 0x30, 0xFF, 0xD9])
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

async fn client_for(server: &MockServer) -> UploadClient {
    UploadClient::new(&format!("{}/images/upload", server.uri())).unwrap()
}

#[tokio::test]
async fn test_submit_posts_multipart_with_caption() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images/upload"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let receipt = client
        .submit(UploadRequest::new(jpeg_payload(), "sunset"))
        .await
        .unwrap();
    assert_eq!(receipt.status, 201);
    assert_eq!(receipt.body, "created");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body = &requests[0].body;
    assert!(contains(body, b"name=\"image\""));
    assert!(contains(body, format!("filename=\"{}\"", IMAGE_FILE_NAME).as_bytes()));
    assert!(contains(body, b"image/jpeg"));
    assert!(contains(body, jpeg_payload().as_bytes()));
    assert!(contains(body, b"name=\"caption\"\r\n\r\nsunset\r\n"));
}

#[tokio::test]
async fn test_submit_sends_empty_caption_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client
        .submit(UploadRequest::new(jpeg_payload(), ""))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(contains(&requests[0].body, b"name=\"caption\"\r\n\r\n\r\n"));
}

#[tokio::test]
async fn test_submit_without_auth_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client_for(&server)
        .await
        .submit(UploadRequest::new(jpeg_payload(), "x"))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_server_error_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("disk full"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .await
        .submit(UploadRequest::new(jpeg_payload(), "x"))
        .await;

    match result {
        Err(UploadError::Rejected { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "disk full");
        }
        other => panic!("Expected Rejected, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_payload_never_reaches_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .await
        .submit(UploadRequest::new(Payload::default(), "x"))
        .await;
    assert!(matches!(result, Err(UploadError::EmptyPayload)));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_http_error() {
    // Port 9 (discard) is not listening on test machines
    let client = UploadClient::new("http://127.0.0.1:9/images/upload").unwrap();
    let result = client.submit(UploadRequest::new(jpeg_payload(), "x")).await;
    assert!(matches!(result, Err(UploadError::Http(_))));
}

#[tokio::test]
async fn test_timeout_applies_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let client = UploadClient::with_timeout(
        &format!("{}/images/upload", server.uri()),
        Some(Duration::from_millis(200)),
    )
    .unwrap();
    let result = client.submit(UploadRequest::new(jpeg_payload(), "x")).await;

    match result {
        Err(UploadError::Http(e)) => assert!(e.is_timeout()),
        other => panic!("Expected timeout, got {:?}", other),
    }
}
