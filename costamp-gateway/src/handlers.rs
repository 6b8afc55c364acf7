//! Request handlers for the gateway endpoints
//!
//! Responses always carry an HTTP 200 with one of the three JSON
//! envelopes: `{"data": ...}` for a fresh signature, `{"validSignature":
//! ...}` for a verification verdict, `{"error": ...}` for anything the
//! user can act on. A failed verification is a verdict, not an error.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::multipart::{Field, Multipart, MultipartRejection};
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;
use tracing::{debug, warn};

use costamp_types::{Digest, ErrorEnvelope, SignatureEnvelope, VerifyEnvelope};

use crate::AppState;

/// Multipart field name of the single file on the signing form.
const SIGN_FIELD: &str = "file-sign";

/// Multipart field name shared by both files on the verification form.
const VERIFY_FIELD: &str = "file-verify[]";

pub async fn landing(State(state): State<Arc<AppState>>) -> Response {
    serve_page(&state, "landing.html").await
}

pub async fn sign_form(State(state): State<Arc<AppState>>) -> Response {
    serve_page(&state, "sign.html").await
}

pub async fn verify_form(State(state): State<Arc<AppState>>) -> Response {
    serve_page(&state, "verify.html").await
}

/// Accept one file, stamp its digest, return the portable signature.
pub async fn sign(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let Ok(mut multipart) = multipart else {
        return error_response(&headers, "Invalid POST data.");
    };

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return error_response(&headers, "No file submitted."),
            Err(_) => return error_response(&headers, "Invalid POST data."),
        };

        if field.name() != Some(SIGN_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .unwrap_or("upload")
            .to_string();

        let digest = match hash_field(&state, field).await {
            Ok(digest) => digest,
            Err(()) => return error_response(&headers, "Invalid POST data."),
        };
        debug!(%digest, %filename, "hashed upload");

        // The stamping call itself never times out; the bound is ours.
        let stamped = tokio::time::timeout(
            state.stamp_timeout,
            state.client.request_stamp(&digest, None),
        )
        .await;

        return match stamped {
            Err(_) => error_response(&headers, "Timestamping authority timed out."),
            Ok(Err(e)) => {
                warn!("stamping failed: {}", e);
                error_response(&headers, &e.to_string())
            }
            Ok(Ok(signature)) => {
                let envelope = SignatureEnvelope {
                    data: state.codec.encode(&signature, &filename),
                };
                json_response(&headers, &envelope)
            }
        };
    }
}

/// Accept exactly two files (original, then signature document), return a
/// boolean verdict.
pub async fn verify(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let Ok(mut multipart) = multipart else {
        return error_response(&headers, "Invalid POST data.");
    };

    let mut file_count = 0usize;
    let mut digest: Option<Digest> = None;
    let mut signature_json: Option<Vec<u8>> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(_) => return error_response(&headers, "Invalid POST data."),
        };

        if field.name() != Some(VERIFY_FIELD) {
            continue;
        }

        match file_count {
            0 => match hash_field(&state, field).await {
                Ok(d) => digest = Some(d),
                Err(()) => return error_response(&headers, "Invalid POST data."),
            },
            1 => match field.bytes().await {
                Ok(bytes) => signature_json = Some(bytes.to_vec()),
                Err(_) => return error_response(&headers, "Invalid POST data."),
            },
            // Past two files the count alone decides the outcome.
            _ => {}
        }
        file_count += 1;
    }

    if file_count != 2 {
        return error_response(
            &headers,
            &format!("Expected 2 files but received {}", file_count),
        );
    }

    // Both set when file_count == 2
    let (digest, signature_json) = match (digest, signature_json) {
        (Some(d), Some(s)) => (d, s),
        _ => return error_response(&headers, "Invalid POST data."),
    };

    let envelope: SignatureEnvelope = match serde_json::from_slice(&signature_json) {
        Ok(envelope) => envelope,
        Err(e) => return error_response(&headers, &format!("Invalid signature document: {}", e)),
    };

    let signature = match state.codec.decode(&envelope.data) {
        Ok(signature) => signature,
        Err(e) => return error_response(&headers, &e.to_string()),
    };

    // A signature that does not check out is a normal `false`, carrying
    // no hint of which check failed.
    let valid = state.verifier.verify(&digest, &signature);
    json_response(&headers, &VerifyEnvelope {
        valid_signature: valid,
    })
}

/// Stream one multipart field through the configured hasher. A transport
/// error mid-field aborts with no partial digest.
async fn hash_field(state: &AppState, mut field: Field<'_>) -> Result<Digest, ()> {
    let mut acc = state.hasher.begin();
    loop {
        match field.chunk().await {
            Ok(Some(chunk)) => acc.update(&chunk),
            Ok(None) => return Ok(acc.finish()),
            Err(_) => return Err(()),
        }
    }
}

async fn serve_page(state: &AppState, name: &str) -> Response {
    match tokio::fs::read_to_string(state.static_dir.join(name)).await {
        Ok(html) => Html(html).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "page not found").into_response(),
    }
}

fn error_response(headers: &HeaderMap, message: &str) -> Response {
    json_response(
        headers,
        &ErrorEnvelope {
            error: message.to_string(),
        },
    )
}

/// Serialize an envelope, honoring the request's `Accept` header the way
/// the browser client expects: the body is always JSON text, but the JSON
/// content type is only declared when asked for.
fn json_response<T: Serialize>(headers: &HeaderMap, envelope: &T) -> Response {
    let body = serde_json::to_string(envelope)
        .unwrap_or_else(|_| r#"{"error":"internal serialization failure"}"#.to_string());

    let content_type = if accepts_json(headers) {
        "application/json"
    } else {
        "text/plain; charset=utf-8"
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .expect("static response parts are valid")
}

fn accepts_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}
