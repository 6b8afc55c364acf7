//! Gateway endpoint tests: multipart sign/verify flows driven through the
//! router with an in-process software authority behind it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde::de::DeserializeOwned;
use tower::ServiceExt;

use costamp_client::testutil::TestAuthority;
use costamp_client::StampConfig;
use costamp_gateway::{build_router, AppState, GatewayConfig};
use costamp_types::{ErrorEnvelope, SignatureEnvelope, VerifyEnvelope};

const BOUNDARY: &str = "costamp-test-boundary";

fn test_router(stamp: StampConfig) -> Router {
    let config = GatewayConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
        max_upload_bytes: 32 * 1024 * 1024,
        stamp_timeout: Duration::from_secs(10),
        stamp,
    };
    build_router(Arc::new(AppState::new(&config)), config.max_upload_bytes)
}

/// Assemble a multipart/form-data body from (field, filename, content)
/// triples.
fn multipart_body(parts: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, content) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                name, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn multipart_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header(header::ACCEPT, "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn read_json<T: DeserializeOwned>(response: axum::http::Response<Body>) -> T {
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
    let bytes = axum::body::to_bytes(response.into_body(), 2 * 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

async fn sign_file(router: &Router, filename: &str, content: &[u8]) -> SignatureEnvelope {
    let body = multipart_body(&[("file-sign", filename, content)]);
    let response = router
        .clone()
        .oneshot(multipart_request("/sign", body))
        .await
        .unwrap();
    read_json(response).await
}

async fn verify_files(router: &Router, content: &[u8], signature_json: &[u8]) -> VerifyEnvelope {
    let body = multipart_body(&[
        ("file-verify[]", "original.txt", content),
        ("file-verify[]", "original.txt.sig", signature_json),
    ]);
    let response = router
        .clone()
        .oneshot(multipart_request("/verify", body))
        .await
        .unwrap();
    read_json(response).await
}

#[tokio::test]
async fn test_sign_then_verify() {
    let authority = TestAuthority::start().await;
    let router = test_router(authority.config());

    let content = b"the quick brown fox";
    let envelope = sign_file(&router, "fox.txt", content).await;

    assert_eq!(envelope.data.filename, "fox.txt");
    assert_eq!(envelope.data.suite, "ristretto255-blake3");

    let signature_json = serde_json::to_vec(&envelope).unwrap();
    let verdict = verify_files(&router, content, &signature_json).await;
    assert!(verdict.valid_signature);
}

#[tokio::test]
async fn test_verify_rejects_tampered_file() {
    let authority = TestAuthority::start().await;
    let router = test_router(authority.config());

    let content = b"original content";
    let envelope = sign_file(&router, "doc.txt", content).await;
    let signature_json = serde_json::to_vec(&envelope).unwrap();

    // One flipped byte in the file: a verdict of false, not an error.
    let verdict = verify_files(&router, b"original contenu", &signature_json).await;
    assert!(!verdict.valid_signature);
}

#[tokio::test]
async fn test_verify_rejects_corrupted_signature_root() {
    let authority = TestAuthority::start().await;
    let router = test_router(authority.config());

    let content = b"content";
    let envelope = sign_file(&router, "doc.txt", content).await;

    // Corrupt the merkle root inside the signature document.
    let mut tampered = envelope.clone();
    let mut root = tampered.data.merkle_root.clone().into_bytes();
    root[0] = if root[0] == b'A' { b'B' } else { b'A' };
    tampered.data.merkle_root = String::from_utf8(root).unwrap();

    let signature_json = serde_json::to_vec(&tampered).unwrap();
    let verdict = verify_files(&router, content, &signature_json).await;
    assert!(!verdict.valid_signature);
}

#[tokio::test]
async fn test_verify_wrong_file_count() {
    let authority = TestAuthority::start().await;
    let router = test_router(authority.config());

    let body = multipart_body(&[("file-verify[]", "only-one.txt", b"data")]);
    let response = router
        .clone()
        .oneshot(multipart_request("/verify", body))
        .await
        .unwrap();

    let error: ErrorEnvelope = read_json(response).await;
    assert_eq!(error.error, "Expected 2 files but received 1");

    let body = multipart_body(&[
        ("file-verify[]", "a", b"1"),
        ("file-verify[]", "b", b"2"),
        ("file-verify[]", "c", b"3"),
    ]);
    let response = router
        .clone()
        .oneshot(multipart_request("/verify", body))
        .await
        .unwrap();

    let error: ErrorEnvelope = read_json(response).await;
    assert_eq!(error.error, "Expected 2 files but received 3");
}

#[tokio::test]
async fn test_verify_non_multipart_post() {
    let authority = TestAuthority::start().await;
    let router = test_router(authority.config());

    let request = Request::builder()
        .method("POST")
        .uri("/verify")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::ACCEPT, "application/json")
        .body(Body::from("a=b"))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let error: ErrorEnvelope = read_json(response).await;
    assert_eq!(error.error, "Invalid POST data.");
}

#[tokio::test]
async fn test_sign_without_file_field() {
    let authority = TestAuthority::start().await;
    let router = test_router(authority.config());

    let body = multipart_body(&[("unrelated-field", "x.txt", b"data")]);
    let response = router
        .clone()
        .oneshot(multipart_request("/sign", body))
        .await
        .unwrap();

    let error: ErrorEnvelope = read_json(response).await;
    assert_eq!(error.error, "No file submitted.");
}

#[tokio::test]
async fn test_sign_unreachable_authority_reports_error_envelope() {
    let authority = TestAuthority::start().await;
    let mut stamp = authority.config();
    stamp.servers = vec!["http://127.0.0.1:1".to_string()];
    drop(authority);

    let router = test_router(stamp);
    let body = multipart_body(&[("file-sign", "doc.txt", b"data")]);
    let response = router
        .clone()
        .oneshot(multipart_request("/sign", body))
        .await
        .unwrap();

    let error: ErrorEnvelope = read_json(response).await;
    assert!(
        error.error.contains("unavailable") || error.error.contains("Unavailable"),
        "unexpected error message: {}",
        error.error
    );
}

#[tokio::test]
async fn test_identical_content_different_name_verifies() {
    let authority = TestAuthority::start().await;
    let router = test_router(authority.config());

    let content = b"same bytes";
    let envelope = sign_file(&router, "first-name.txt", content).await;
    let signature_json = serde_json::to_vec(&envelope).unwrap();

    // The verify upload carries a different filename; only content counts.
    let body = multipart_body(&[
        ("file-verify[]", "renamed.txt", content),
        ("file-verify[]", "sig.json", &signature_json),
    ]);
    let response = router
        .clone()
        .oneshot(multipart_request("/verify", body))
        .await
        .unwrap();

    let verdict: VerifyEnvelope = read_json(response).await;
    assert!(verdict.valid_signature);
}

#[tokio::test]
async fn test_landing_page_served() {
    let authority = TestAuthority::start().await;
    let router = test_router(authority.config());

    let request = Request::builder()
        .method("GET")
        .uri("/start")
        .body(Body::empty())
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Costamp"));
}

#[tokio::test]
async fn test_plain_accept_gets_text_content_type() {
    let authority = TestAuthority::start().await;
    let router = test_router(authority.config());

    let body = multipart_body(&[("file-sign", "doc.txt", b"data")]);
    let request = Request::builder()
        .method("POST")
        .uri("/sign")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/plain"));

    // Still a JSON body underneath.
    let bytes = axum::body::to_bytes(response.into_body(), 2 * 1024 * 1024)
        .await
        .unwrap();
    let envelope: SignatureEnvelope = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(envelope.data.filename, "doc.txt");
}
