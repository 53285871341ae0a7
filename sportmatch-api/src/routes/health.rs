use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;

use sportmatch_shared::{HealthCheck, HealthResponse};

use crate::AppState;

/// Liveness plus a round trip to the store.
pub async fn health_check(State(state): State<AppState>) -> Response {
    let store_check = match state.store.ping().await {
        Ok(()) => HealthCheck::healthy(state.store.backend()),
        Err(e) => {
            tracing::warn!(error = %e, backend = state.store.backend(), "store health check failed");
            HealthCheck::unhealthy(state.store.backend(), e.to_string())
        }
    };

    let response = HealthResponse::healthy("sportmatch-api", env!("CARGO_PKG_VERSION"))
        .with_checks(vec![store_check]);

    (response.http_status(), Json(response)).into_response()
}

pub async fn metrics(State(state): State<AppState>) -> String {
    state.metrics_handle.render()
}
