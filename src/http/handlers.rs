//! Request handlers for the projection service.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Days, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::projection;

use super::server::AppState;

/// JSON request body for a cash-flow projection.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectionRequest {
    /// Horizon length in days; the configured default applies when omitted
    pub days: Option<u32>,
}

/// Handle `POST /projections/cashflow`.
///
/// Fetches movements due between today and the end of the requested
/// horizon, projects them into a daily series, and returns the series as
/// a JSON array.
pub async fn project_cashflow(
    State(state): State<AppState>,
    body: Option<Json<ProjectionRequest>>,
) -> Response {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let days = request
        .days
        .unwrap_or(state.config.projection.default_horizon_days);
    let max_days = state.config.projection.max_horizon_days;

    if days == 0 || days > max_days {
        warn!(days, max_days, "Rejected projection horizon");
        return bad_request(&format!("days must be between 1 and {}", max_days));
    }

    let today = Utc::now().date_naive();
    let last_day = match today.checked_add_days(Days::new(u64::from(days) - 1)) {
        Some(day) => day,
        None => return bad_request("horizon extends past the supported calendar"),
    };

    let movements = match state.store.movements_due_between(today, last_day).await {
        Ok(movements) => movements,
        Err(e) => {
            error!(error = %e, "Failed to fetch movements");
            return internal_error();
        }
    };

    match projection::project(&movements, days, today) {
        Ok(points) => {
            info!(
                days,
                movements = movements.len(),
                "Served cash-flow projection"
            );
            Json(points).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Projection rejected");
            bad_request(&e.to_string())
        }
    }
}

/// Handle `GET /healthz`.
pub async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "invalid_request", "message": message })),
    )
        .into_response()
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal", "message": "Internal server error" })),
    )
        .into_response()
}
