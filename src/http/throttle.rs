//! Request throttling middleware and the standard blocked response.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

use crate::ratelimit::{LimitPolicy, QuotaInfo};

use super::server::AppState;

/// Middleware consulting the shared rate limiter, keyed by caller IP.
pub async fn throttle(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let identifier = addr.ip().to_string();
    if let Some(blocked) = enforce(&state, &identifier, request.uri().path()) {
        return blocked;
    }
    next.run(request).await
}

/// Record a request against the limiter and build the blocked response
/// when the caller is over quota.
pub(crate) fn enforce(state: &AppState, identifier: &str, route: &str) -> Option<Response> {
    let policy = LimitPolicy::resolve(&state.config.rate_limiting, route);

    if state.limiter.check(identifier, &policy) {
        let info = state.limiter.info(identifier, &policy);
        warn!(identifier, route, "Throttled request");
        return Some(too_many_requests(&info));
    }
    None
}

/// Build the standard "too many requests" response: HTTP 429 with a
/// `Retry-After` header and a JSON body carrying the same hint.
pub fn too_many_requests(info: &QuotaInfo) -> Response {
    let retry_after = info.reset_in.as_secs().max(1);
    let body = json!({
        "error": "rate_limited",
        "message": format!("Too many requests. Retry in {} seconds.", retry_after),
        "retryAfter": retry_after,
    });

    (
        StatusCode::TOO_MANY_REQUESTS,
        [(header::RETRY_AFTER, retry_after.to_string())],
        Json(body),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FluxoConfig;
    use crate::ratelimit::RateLimiter;
    use crate::store::InMemoryMovementStore;
    use std::sync::Arc;
    use std::time::Duration;

    fn state(max_requests: u64) -> AppState {
        let config = FluxoConfig {
            rate_limiting: crate::config::RateLimitingConfig {
                window_ms: 60_000,
                max_requests,
                ..Default::default()
            },
            ..Default::default()
        };
        AppState {
            limiter: Arc::new(RateLimiter::new()),
            store: Arc::new(InMemoryMovementStore::new()),
            config: Arc::new(config),
        }
    }

    #[test]
    fn test_enforce_allows_until_cap() {
        let state = state(3);

        for _ in 0..3 {
            assert!(enforce(&state, "10.0.0.1", "/projections/cashflow").is_none());
        }
        let blocked = enforce(&state, "10.0.0.1", "/projections/cashflow");
        assert!(blocked.is_some());
        assert_eq!(
            blocked.unwrap().status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_enforce_keys_by_identifier() {
        let state = state(1);

        assert!(enforce(&state, "10.0.0.1", "/projections/cashflow").is_none());
        assert!(enforce(&state, "10.0.0.2", "/projections/cashflow").is_none());
        assert!(enforce(&state, "10.0.0.1", "/projections/cashflow").is_some());
    }

    #[tokio::test]
    async fn test_too_many_requests_shape() {
        let info = QuotaInfo {
            remaining: 0,
            reset_in: Duration::from_secs(42),
        };
        let response = too_many_requests(&info);

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            "42"
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "rate_limited");
        assert_eq!(body["retryAfter"], 42);
        assert!(body["message"].as_str().unwrap().contains("42"));
    }

    #[tokio::test]
    async fn test_retry_after_is_never_zero() {
        let info = QuotaInfo {
            remaining: 0,
            reset_in: Duration::from_millis(200),
        };
        let response = too_many_requests(&info);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "1");
    }
}
