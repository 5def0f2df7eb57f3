//! Lead intake and CRM webhook endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use leadflow_core::errors::{ApplicationError, InterfaceError};
use leadflow_core::{BriefExtractor, NormalizedRecord, WebhookEvent};
use leadflow_crm::{DeliveryClient, WebhookVerifier};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::health;

pub const WEBHOOK_TIMESTAMP_HEADER: &str = "x-webhook-timestamp";
pub const WEBHOOK_SIGNATURE_HEADER: &str = "x-webhook-signature";

#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<BriefExtractor>,
    pub delivery: Arc<DeliveryClient>,
    /// `None` when no webhook secret is configured.
    pub webhooks: Option<Arc<WebhookVerifier>>,
}

#[derive(Debug, Deserialize)]
pub struct BriefRequest {
    pub brief: String,
}

#[derive(Debug, Serialize)]
pub struct LeadResponse {
    pub record: NormalizedRecord,
    pub delivered: bool,
    pub upstream_status: u16,
    pub attempts: usize,
    /// Upstream body when it is JSON, passed through unmodified.
    pub upstream_body: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub verified: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: &'static str,
    pub detail: Option<String>,
    pub correlation_id: String,
}

#[derive(Debug)]
pub struct ApiError(pub InterfaceError);

impl ApiError {
    fn from_application(error: ApplicationError, correlation_id: &str) -> Self {
        Self(error.into_interface(correlation_id))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, detail) = match &self.0 {
            InterfaceError::BadRequest { message, .. } => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(message.clone()))
            }
            InterfaceError::Unauthorized { message, .. } => {
                (StatusCode::UNAUTHORIZED, "unauthorized", Some(message.clone()))
            }
            InterfaceError::ServiceUnavailable { message, .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", Some(message.clone()))
            }
            InterfaceError::Internal { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", None)
            }
        };

        let body = ErrorBody {
            error: kind,
            message: self.0.user_message(),
            detail,
            correlation_id: self.0.correlation_id().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/normalize", post(normalize))
        .route("/leads", post(create_lead))
        .route("/webhooks/crm", post(crm_webhook))
        .route("/health", get(health::health))
        .with_state(state)
}

pub async fn normalize(
    State(state): State<AppState>,
    Json(request): Json<BriefRequest>,
) -> Json<NormalizedRecord> {
    Json(state.extractor.parse(&request.brief))
}

pub async fn create_lead(
    State(state): State<AppState>,
    Json(request): Json<BriefRequest>,
) -> Result<Json<LeadResponse>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();
    let record = state.extractor.parse(&request.brief);
    record
        .ensure_deliverable()
        .map_err(|error| ApiError::from_application(error.into(), &correlation_id))?;

    let outcome = state.delivery.upsert_contact(&record).await.map_err(|error| {
        warn!(
            event_name = "api.leads.delivery_failed",
            correlation_id = %correlation_id,
            error = %error,
            "lead could not be delivered to the crm"
        );
        ApiError::from_application(error.into(), &correlation_id)
    })?;

    info!(
        event_name = "api.leads.delivered",
        correlation_id = %correlation_id,
        upstream_status = outcome.status().as_u16(),
        attempts = outcome.attempt_count(),
        "lead delivery finished"
    );

    Ok(Json(LeadResponse {
        delivered: outcome.is_success(),
        upstream_status: outcome.status().as_u16(),
        attempts: outcome.attempt_count(),
        upstream_body: outcome.response.json().ok(),
        record,
    }))
}

pub async fn crm_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();
    let Some(verifier) = state.webhooks.as_deref() else {
        return Err(ApiError(InterfaceError::ServiceUnavailable {
            message: "webhook secret is not configured".to_string(),
            correlation_id,
        }));
    };

    let event = WebhookEvent::new(
        body.to_vec(),
        header_value(&headers, WEBHOOK_TIMESTAMP_HEADER),
        header_value(&headers, WEBHOOK_SIGNATURE_HEADER),
    );

    if let Err(rejection) = verifier.inspect(&event) {
        warn!(
            event_name = "api.webhook.rejected",
            correlation_id = %correlation_id,
            reason = %rejection,
            "crm webhook failed verification"
        );
        return Err(ApiError::from_application(ApplicationError::Authentication, &correlation_id));
    }

    if !verifier.is_fresh(&event.timestamp, Utc::now().timestamp()) {
        warn!(
            event_name = "api.webhook.stale",
            correlation_id = %correlation_id,
            timestamp = %event.timestamp,
            max_skew_secs = verifier.max_skew_secs(),
            "crm webhook timestamp is outside the skew window"
        );
    }

    info!(
        event_name = "api.webhook.verified",
        correlation_id = %correlation_id,
        body_bytes = event.raw_body.len(),
        "crm webhook verified"
    );
    Ok(Json(WebhookAck { verified: true }))
}

fn header_value(headers: &HeaderMap, name: &str) -> String {
    headers.get(name).and_then(|value| value.to_str().ok()).unwrap_or_default().to_string()
}
