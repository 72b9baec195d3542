//! Relay control endpoints: event injection, status and health

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::relay_impl::AppState;
use crate::worker::{EventOutcome, WorkerEvent};

#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    pub tag: String,
}

/// Inject a push event; an empty body is a push without data
pub async fn push_handler(State(worker): State<AppState>, body: Bytes) -> Response {
    let data = (!body.is_empty()).then(|| body.to_vec());
    outcome_response(worker.dispatch(WorkerEvent::Push(data)).await)
}

/// Inject a background sync event
pub async fn sync_handler(State(worker): State<AppState>, Json(request): Json<SyncRequest>) -> Response {
    outcome_response(worker.dispatch(WorkerEvent::Sync(request.tag)).await)
}

pub async fn status_handler(State(worker): State<AppState>) -> Response {
    Json(worker.status().await).into_response()
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

fn outcome_response(outcome: EventOutcome) -> Response {
    match outcome {
        EventOutcome::Notified { delivered } => Json(json!({"status": "notified", "delivered": delivered})).into_response(),
        EventOutcome::Synced { tag } => Json(json!({"status": "synced", "tag": tag})).into_response(),
        EventOutcome::Ignored { reason } => {
            (StatusCode::ACCEPTED, Json(json!({"status": "ignored", "reason": reason}))).into_response()
        }
        EventOutcome::Failed { reason } => {
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"status": "failed", "reason": reason}))).into_response()
        }
        other => Json(json!({"status": "ok", "outcome": format!("{:?}", other)})).into_response(),
    }
}
