use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use cxhook_core::TagRegistry;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    registry: Arc<TagRegistry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub registered_tags: Vec<String>,
    pub checked_at: String,
}

pub fn router(registry: Arc<TagRegistry>) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { registry })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let registered_tags: Vec<String> =
        state.registry.tags().into_iter().map(str::to_owned).collect();
    let ready = !registered_tags.is_empty();

    let service = if ready {
        HealthCheck { status: "ready", detail: "fulfillment handlers registered".to_string() }
    } else {
        HealthCheck { status: "degraded", detail: "no fulfillment handlers registered".to_string() }
    };

    let payload = HealthResponse {
        status: service.status,
        service,
        registered_tags,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}
