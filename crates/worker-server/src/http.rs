//! HTTP ingress for the record processor.
//!
//! One route, `POST /processEvent`, accepting the notifier's wire shape. The caller
//! is a fire-and-forget notifier: every internal outcome maps to a plain-text
//! acknowledgment with status 200.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use common::{EventRequest, ProcessOutcome, SkipReason};
use event_worker::ProcessEventService;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::instrument;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ProcessEventService>,
}

/// Inbound notification body. `recordIds` arrives as a stringified JSON list,
/// e.g. `"[\"003A\",\"003B\"]"`.
#[derive(Debug, Deserialize)]
pub struct ProcessEventBody {
    #[serde(rename = "orgId", default)]
    pub org_id: Option<String>,
    #[serde(rename = "eventId", default)]
    pub event_id: Option<String>,
    #[serde(rename = "recordIds", default)]
    pub record_ids: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Parse the stringified record-id list; anything unparseable degrades to an
/// empty batch (the pipeline then takes its no-record-ids path).
fn parse_record_ids(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str::<Vec<String>>(s).ok())
        .unwrap_or_default()
}

impl From<ProcessEventBody> for EventRequest {
    fn from(body: ProcessEventBody) -> Self {
        EventRequest {
            organization_id: body.org_id.unwrap_or_default(),
            event_id: body.event_id.unwrap_or_default(),
            record_ids: parse_record_ids(body.record_ids.as_deref()),
            namespace: body.namespace,
        }
    }
}

/// Render the acknowledgment string for one invocation.
fn acknowledgment(request: &EventRequest, outcome: &ProcessOutcome) -> String {
    let received = format!(
        "Received event with ID = {} for org: {}",
        request.event_id, request.organization_id
    );
    match outcome {
        ProcessOutcome::Rejected { reason } => format!("Error: {reason}"),
        ProcessOutcome::Skipped {
            reason: SkipReason::NoConnectionInfo,
        } => format!("{received}. No connection info found for org."),
        ProcessOutcome::Skipped {
            reason: SkipReason::NoRecordIds,
        } => format!("{received}. No record ids provided."),
        ProcessOutcome::Completed {
            status,
            attempt_count,
        } => format!("Success! {received}. Status: {status}, attempt count: {attempt_count}."),
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/processEvent", post(process_event))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[instrument(skip_all)]
async fn process_event(State(state): State<AppState>, Json(body): Json<ProcessEventBody>) -> String {
    let request: EventRequest = body.into();
    let outcome = state.service.process_event(request.clone()).await;
    acknowledgment(&request, &outcome)
}
