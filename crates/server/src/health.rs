use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;

use crate::api::AppState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub crm: HealthCheck,
    pub webhooks: HealthCheck,
    pub checked_at: String,
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let crm = crm_check(&state);
    let ready = crm.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "leadflow-server runtime initialized".to_string(),
        },
        crm,
        webhooks: webhook_check(&state),
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

fn crm_check(state: &AppState) -> HealthCheck {
    let settings = state.delivery.settings();
    if settings.has_credentials() {
        HealthCheck { status: "ready", detail: format!("delivering to {}", settings.base_url) }
    } else {
        HealthCheck { status: "degraded", detail: "crm app id or api token is missing".to_string() }
    }
}

// Webhooks are optional; a missing secret never degrades readiness.
fn webhook_check(state: &AppState) -> HealthCheck {
    match &state.webhooks {
        Some(verifier) => HealthCheck {
            status: "ready",
            detail: format!("signature verification enabled (skew {}s)", verifier.max_skew_secs()),
        },
        None => HealthCheck {
            status: "disabled",
            detail: "no webhook secret configured".to_string(),
        },
    }
}
