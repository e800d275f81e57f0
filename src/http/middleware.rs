//! Trap middleware.
//!
//! Decides, per request, between three terminal outcomes:
//! exempt path → forward; blocked identity → payload response;
//! allowed identity → forward. Logging of each outcome is gated by the
//! rule set's show flags.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::Response;

use crate::http::bomb::serve_bomb;
use crate::http::server::AppState;

/// Request-filter stage of the proxy.
///
/// The declared identity is the `User-Agent` header; an absent or
/// non-UTF-8 header counts as the empty string, which is only caught by
/// rules that explicitly match it.
pub async fn trap_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();
    let rules = &state.rules;

    // Exempt paths skip blocking regardless of identity.
    if rules.is_path_exempt(&path) {
        if rules.show_public {
            tracing::info!(user_agent = %user_agent, path = %path, "public path access");
        }
        return next.run(request).await;
    }

    if rules.is_blocked(&user_agent) {
        if rules.show_hits {
            tracing::warn!(user_agent = %user_agent, path = %path, "trapped client");
        }
        // The request ends here: a payload on success, a generic error on
        // resolution failure, never a fall-through to forwarding.
        return serve_bomb(&rules.bomb).await;
    }

    if rules.show_misses {
        tracing::info!(user_agent = %user_agent, path = %path, "allowed client");
    }
    next.run(request).await
}
