//! Token-gated programmatic trigger endpoint.

use {
    axum::{
        Json,
        extract::State,
        http::HeaderMap,
    },
    serde::Deserialize,
    serde_json::{Value, json},
};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TriggerRequest {
    pub trigger_id: String,
}

/// `POST /api/trigger`: synchronous request/response.
///
/// Validation failures come back as success-shaped bodies with an `error`
/// field; the transport status is 200 either way, so callers cannot
/// distinguish auth failures from unknown ids by status code alone.
pub async fn trigger_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<TriggerRequest>,
) -> Json<Value> {
    let token = headers
        .get("x-auth-token")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let outcome = state.relay.execute_trigger(&request.trigger_id, token).await;
    match outcome.error_code() {
        None => Json(json!({ "success": true })),
        Some(code) => Json(json!({ "error": code })),
    }
}
