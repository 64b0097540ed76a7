//! The fulfillment endpoint: decode → dispatch → encode, with every
//! failure collapsed into a plain-text 500.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use cxhook_core::{decode_request, encode_response, TagRegistry, WebhookError};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

const JSON_CONTENT_TYPE: &str = "application/json";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

#[derive(Clone)]
pub struct WebhookState {
    registry: Arc<TagRegistry>,
}

pub fn router(webhook_path: &str, registry: Arc<TagRegistry>, max_body_bytes: usize) -> Router {
    Router::new()
        .route(webhook_path, post(handle_webhook))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(WebhookState { registry })
}

pub async fn handle_webhook(
    State(state): State<WebhookState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4().to_string();

    match fulfill(&state.registry, body, &correlation_id) {
        Ok(encoded) => {
            (StatusCode::OK, [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], encoded).into_response()
        }
        Err(error) => error_response(&error, &correlation_id),
    }
}

fn fulfill(
    registry: &TagRegistry,
    body: Result<Bytes, BytesRejection>,
    correlation_id: &str,
) -> Result<Vec<u8>, WebhookError> {
    let body = body.map_err(|rejection| WebhookError::Body { message: rejection.body_text() })?;
    let request = decode_request(&body)?;
    debug!(
        event_name = "webhook.request.decoded",
        correlation_id = %correlation_id,
        tag = request.tag(),
        session = request.session_id(),
        request = ?request,
        "webhook request decoded"
    );

    let response = registry.dispatch(&request)?;
    debug!(
        event_name = "webhook.response.built",
        correlation_id = %correlation_id,
        response = ?response,
        "webhook response built"
    );

    let encoded = encode_response(&response)?;
    info!(
        event_name = "webhook.fulfilled",
        correlation_id = %correlation_id,
        tag = request.tag(),
        message_count = response.fulfillment_response.messages.len(),
        "webhook request fulfilled"
    );
    Ok(encoded)
}

pub fn error_response(error: &WebhookError, correlation_id: &str) -> Response {
    if error.is_caller_fault() {
        warn!(
            event_name = "webhook.rejected",
            correlation_id = %correlation_id,
            error_class = error.error_class(),
            error = %error,
            "webhook request rejected"
        );
    } else {
        error!(
            event_name = "webhook.failed",
            correlation_id = %correlation_id,
            error_class = error.error_class(),
            error = %error,
            "webhook request failed"
        );
    }

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, TEXT_CONTENT_TYPE)],
        format!("ERROR: {error}"),
    )
        .into_response()
}
