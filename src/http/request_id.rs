//! Request ID injection.
//!
//! # Responsibilities
//! - Ensure every request carries an `x-request-id` header before any
//!   other processing
//! - Preserve a client-supplied ID rather than overwriting it
//!
//! # Design Decisions
//! - Implemented as a plain `tower` layer so it sits outside the trap
//!   middleware and the ID shows up in trap log events and upstream calls

use std::task::{Context, Poll};

use axum::http::{HeaderValue, Request};
use tower::{Layer, Service};
use uuid::Uuid;

/// Header carrying the per-request correlation ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Layer that equips requests with an `x-request-id` header.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

/// Service produced by [`RequestIdLayer`].
#[derive(Clone, Debug)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S, B> Service<Request<B>> for RequestIdService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<B>) -> Self::Future {
        if !request.headers().contains_key(REQUEST_ID_HEADER) {
            let id = Uuid::new_v4().to_string();
            // A fresh UUID is always a valid header value.
            if let Ok(value) = HeaderValue::from_str(&id) {
                request.headers_mut().insert(REQUEST_ID_HEADER, value);
            }
        }
        self.inner.call(request)
    }
}
