//! Request logging and bearer-token auth

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;
use tracing::{info, warn};

use super::AppState;
use super::error::ApiError;

/// Log method, URI, peer, status and latency of every request
pub async fn log_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let remote = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let response = next.run(req).await;

    info!(
        remote = ?remote,
        status = response.status().as_u16(),
        "[{:?}] {} {}",
        start.elapsed(),
        method,
        uri
    );
    response
}

/// Compare a presented token against the expected one in constant time
fn token_matches(presented: Option<&str>, expected: &str) -> bool {
    match presented {
        Some(token) => bool::from(token.as_bytes().ct_eq(expected.as_bytes())),
        None => false,
    }
}

/// Reject requests whose `Authorization` header does not carry the configured token
pub async fn require_bearer(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let Some(expected) = state.auth_token.as_deref() else {
        return next.run(req).await;
    };

    let presented = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    if !token_matches(presented, expected) {
        warn!("Rejected unauthenticated request to {}", req.uri());
        return ApiError::unauthorized().into_response();
    }

    next.run(req).await
}
