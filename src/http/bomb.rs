//! Payload response framing.
//!
//! # Responsibilities
//! - Resolve the configured payload reference
//! - Emit the response with the exact content-transfer framing: HTML
//!   content type, gzip content encoding, content length equal to the
//!   compressed byte count
//! - On resolution failure, answer with a generic missing-resource status
//!
//! # Design Decisions
//! - The body is the compressed bytes verbatim; the client's own
//!   decompression amplifies the transferred size
//! - The failure response carries no body and no detail, so a probing
//!   client cannot map the server's registry or filesystem

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::bombs;

/// Build the response served to a blocked client.
///
/// Resolution failure yields a bodyless `404 Not Found`; the request ends
/// here either way.
pub async fn serve_bomb(reference: &str) -> Response {
    match bombs::resolve(reference).await {
        Ok(payload) => {
            let length = payload.len();
            let mut response = Response::new(Body::from(payload));
            let headers = response.headers_mut();
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/html; charset=UTF-8"),
            );
            headers.insert(header::CONTENT_ENCODING, HeaderValue::from_static("gzip"));
            headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
            response
        }
        Err(error) => {
            tracing::error!(bomb = %reference, %error, "payload resolution failed");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
