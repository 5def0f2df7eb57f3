//! Contact upsert delivery with bounded, server-paced retries.
//!
//! A delivery is at most [`RetrySchedule::max_attempts`] POSTs. Only 429 and
//! 5xx responses are retried; any other status, and the last retryable one,
//! is handed back to the caller untouched. Transport failures are never
//! retried.

use std::sync::Arc;
use std::time::Duration;

use leadflow_core::config::{CrmConfig, IdempotencyScope};
use leadflow_core::errors::ApplicationError;
use leadflow_core::{NormalizedRecord, UpsertPayload};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::delay::{RetryDelay, TokioDelay};
use crate::transport::{
    CrmTransport, OutboundRequest, ReqwestTransport, TransportError, TransportResponse,
};

pub const CONTACTS_UPSERT_PATH: &str = "/v1/contacts:upsert";
pub const WRITE_SCOPE: &str = "contacts.write";

const APP_ID_HEADER: HeaderName = HeaderName::from_static("x-app-id");
const SCOPE_HEADER: HeaderName = HeaderName::from_static("x-scope");
const IDEMPOTENCY_KEY_HEADER: HeaderName = HeaderName::from_static("idempotency-key");

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("request body could not be serialized: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("header `{name}` has an invalid value")]
    InvalidHeader { name: &'static str },
}

impl From<DeliveryError> for ApplicationError {
    fn from(error: DeliveryError) -> Self {
        match error {
            DeliveryError::InvalidHeader { .. } => Self::Configuration(error.to_string()),
            DeliveryError::Transport(_) | DeliveryError::Serialization(_) => {
                Self::Integration(error.to_string())
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetrySchedule {
    pub max_attempts: usize,
    /// Wait used after attempt `n` fails without a usable `Retry-After`.
    pub fallback_delays: Vec<Duration>,
}

impl Default for RetrySchedule {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            fallback_delays: vec![
                Duration::from_millis(500),
                Duration::from_millis(1_000),
                Duration::from_millis(2_000),
            ],
        }
    }
}

impl RetrySchedule {
    pub fn is_retryable(&self, status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }

    /// Server hint when it parses as decimal seconds, else the fallback entry.
    pub fn delay_for(&self, attempt: usize, retry_after: Option<&str>) -> Duration {
        retry_after.and_then(parse_retry_after).unwrap_or_else(|| self.fallback_delay(attempt))
    }

    fn fallback_delay(&self, attempt: usize) -> Duration {
        self.fallback_delays
            .get(attempt)
            .or_else(|| self.fallback_delays.last())
            .copied()
            .unwrap_or_default()
    }
}

/// `Retry-After` in decimal seconds. HTTP-date values, negatives and
/// non-finite numbers are not usable hints.
fn parse_retry_after(raw: &str) -> Option<Duration> {
    let seconds = raw.trim().parse::<f64>().ok()?;
    Duration::try_from_secs_f64(seconds).ok()
}

fn saturating_millis(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Clone, Debug)]
pub struct DeliverySettings {
    pub base_url: String,
    pub api_token: SecretString,
    pub app_id: String,
    pub idempotency_scope: IdempotencyScope,
}

impl DeliverySettings {
    pub fn has_credentials(&self) -> bool {
        !self.app_id.trim().is_empty() && !self.api_token.expose_secret().trim().is_empty()
    }
}

impl From<&CrmConfig> for DeliverySettings {
    fn from(config: &CrmConfig) -> Self {
        Self {
            base_url: config.base_url.trim().to_string(),
            api_token: config.api_token.clone(),
            app_id: config.app_id.clone(),
            idempotency_scope: config.idempotency_scope,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryAttempt {
    pub path: String,
    pub body: Arc<[u8]>,
    pub attempt: usize,
    pub idempotency_key: Uuid,
    /// Wait chosen before the next attempt; `None` when this attempt was final.
    pub delay: Option<Duration>,
    pub status: StatusCode,
}

#[derive(Clone, Debug)]
pub struct DeliveryOutcome {
    pub response: TransportResponse,
    pub attempts: Vec<DeliveryAttempt>,
}

impl DeliveryOutcome {
    pub fn status(&self) -> StatusCode {
        self.response.status
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_success(&self) -> bool {
        self.response.status.is_success()
    }
}

pub struct DeliveryClient {
    settings: DeliverySettings,
    transport: Arc<dyn CrmTransport>,
    delay: Arc<dyn RetryDelay>,
    schedule: RetrySchedule,
}

impl DeliveryClient {
    pub fn new(
        settings: DeliverySettings,
        transport: Arc<dyn CrmTransport>,
        delay: Arc<dyn RetryDelay>,
    ) -> Self {
        Self { settings, transport, delay, schedule: RetrySchedule::default() }
    }

    pub fn from_config(config: &CrmConfig) -> Result<Self, DeliveryError> {
        let transport = ReqwestTransport::new(Duration::from_secs(config.timeout_secs))?;
        Ok(Self::new(DeliverySettings::from(config), Arc::new(transport), Arc::new(TokioDelay)))
    }

    pub fn with_schedule(mut self, schedule: RetrySchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn settings(&self) -> &DeliverySettings {
        &self.settings
    }

    pub async fn upsert_contact(
        &self,
        record: &NormalizedRecord,
    ) -> Result<DeliveryOutcome, DeliveryError> {
        self.deliver(CONTACTS_UPSERT_PATH, &UpsertPayload::from(record)).await
    }

    pub async fn deliver<B>(&self, path: &str, body: &B) -> Result<DeliveryOutcome, DeliveryError>
    where
        B: Serialize + ?Sized,
    {
        let body: Arc<[u8]> = serde_json::to_vec(body)?.into();
        let url = format!("{}{}", self.settings.base_url, path);
        let operation_key = Uuid::new_v4();
        let mut attempts = Vec::with_capacity(self.schedule.max_attempts);

        let mut attempt = 0;
        loop {
            let idempotency_key = match self.settings.idempotency_scope {
                IdempotencyScope::Operation => operation_key,
                IdempotencyScope::Attempt if attempt == 0 => operation_key,
                IdempotencyScope::Attempt => Uuid::new_v4(),
            };

            let request = OutboundRequest {
                url: url.clone(),
                headers: self.envelope(idempotency_key)?,
                body: Arc::clone(&body),
            };

            let response = match self.transport.send(request).await {
                Ok(response) => response,
                Err(error) => {
                    warn!(
                        event_name = "crm.delivery.transport_error",
                        correlation_id = %operation_key,
                        path,
                        attempt,
                        error = %error,
                        "crm delivery failed before a response was received"
                    );
                    return Err(DeliveryError::Transport(error));
                }
            };

            let status = response.status;
            let has_next = attempt + 1 < self.schedule.max_attempts;
            let delay = (self.schedule.is_retryable(status) && has_next)
                .then(|| self.schedule.delay_for(attempt, response.retry_after()));

            attempts.push(DeliveryAttempt {
                path: path.to_string(),
                body: Arc::clone(&body),
                attempt,
                idempotency_key,
                delay,
                status,
            });

            let Some(delay) = delay else {
                let event_name = if self.schedule.is_retryable(status) {
                    "crm.delivery.exhausted"
                } else {
                    "crm.delivery.completed"
                };
                info!(
                    event_name,
                    correlation_id = %operation_key,
                    path,
                    attempts = attempts.len(),
                    status = status.as_u16(),
                    "crm delivery finished"
                );
                return Ok(DeliveryOutcome { response, attempts });
            };

            warn!(
                event_name = "crm.delivery.retry_scheduled",
                correlation_id = %operation_key,
                path,
                attempt,
                status = status.as_u16(),
                delay_ms = saturating_millis(delay),
                server_hint = response.retry_after().is_some(),
                "crm delivery got a retryable status"
            );
            self.delay.wait(delay).await;
            attempt += 1;
        }
    }

    fn envelope(&self, idempotency_key: Uuid) -> Result<HeaderMap, DeliveryError> {
        let mut headers = HeaderMap::new();

        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {}", self.settings.api_token.expose_secret()))
                .map_err(|_| DeliveryError::InvalidHeader { name: "authorization" })?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);

        headers.insert(
            APP_ID_HEADER,
            HeaderValue::from_str(&self.settings.app_id)
                .map_err(|_| DeliveryError::InvalidHeader { name: "x-app-id" })?,
        );
        headers.insert(SCOPE_HEADER, HeaderValue::from_static(WRITE_SCOPE));
        headers.insert(
            IDEMPOTENCY_KEY_HEADER,
            HeaderValue::from_str(&idempotency_key.to_string())
                .map_err(|_| DeliveryError::InvalidHeader { name: "idempotency-key" })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(headers)
    }
}

impl std::fmt::Debug for DeliveryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryClient")
            .field("base_url", &self.settings.base_url)
            .field("schedule", &self.schedule)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use leadflow_core::config::IdempotencyScope;
    use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
    use reqwest::StatusCode;
    use serde_json::json;

    use super::{
        saturating_millis, DeliveryClient, DeliveryError, DeliverySettings, RetrySchedule,
    };
    use crate::delay::RetryDelay;
    use crate::transport::{CrmTransport, OutboundRequest, TransportError, TransportResponse};

    #[derive(Default)]
    struct ScriptedTransport {
        script: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
        requests: Mutex<Vec<OutboundRequest>>,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<TransportResponse, TransportError>>) -> Arc<Self> {
            Arc::new(Self { script: Mutex::new(script.into()), requests: Mutex::default() })
        }

        fn repeating(status: StatusCode, times: usize) -> Arc<Self> {
            Self::new((0..times).map(|_| Ok(TransportResponse::new(status))).collect())
        }

        fn requests(&self) -> Vec<OutboundRequest> {
            self.requests.lock().expect("requests lock").clone()
        }
    }

    #[async_trait]
    impl CrmTransport for ScriptedTransport {
        async fn send(&self, request: OutboundRequest) -> Result<TransportResponse, TransportError> {
            self.requests.lock().expect("requests lock").push(request);
            self.script
                .lock()
                .expect("script lock")
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Request("script exhausted".to_string())))
        }
    }

    #[derive(Default)]
    struct RecordingDelay {
        waits: Mutex<Vec<Duration>>,
    }

    impl RecordingDelay {
        fn waits(&self) -> Vec<Duration> {
            self.waits.lock().expect("waits lock").clone()
        }
    }

    #[async_trait]
    impl RetryDelay for RecordingDelay {
        async fn wait(&self, delay: Duration) {
            self.waits.lock().expect("waits lock").push(delay);
        }
    }

    fn settings(scope: IdempotencyScope) -> DeliverySettings {
        DeliverySettings {
            base_url: "https://crm.example.test".to_string(),
            api_token: "tok-123".to_string().into(),
            app_id: "app-42".to_string(),
            idempotency_scope: scope,
        }
    }

    fn client(
        transport: Arc<ScriptedTransport>,
        delay: Arc<RecordingDelay>,
        scope: IdempotencyScope,
    ) -> DeliveryClient {
        DeliveryClient::new(settings(scope), transport, delay)
    }

    fn with_retry_after(status: StatusCode, value: &'static str) -> TransportResponse {
        let mut response = TransportResponse::new(status);
        response.headers.insert(RETRY_AFTER, HeaderValue::from_static(value));
        response
    }

    fn idempotency_keys(requests: &[OutboundRequest]) -> Vec<String> {
        requests
            .iter()
            .map(|request| {
                request
                    .headers
                    .get("idempotency-key")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or_default()
                    .to_string()
            })
            .collect()
    }

    #[tokio::test]
    async fn retryable_statuses_use_exactly_three_attempts() {
        for status in [
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
            StatusCode::SERVICE_UNAVAILABLE,
        ] {
            let transport = ScriptedTransport::repeating(status, 5);
            let delay = Arc::new(RecordingDelay::default());
            let client = client(transport.clone(), delay.clone(), IdempotencyScope::Operation);

            let outcome = client
                .deliver("/v1/contacts:upsert", &json!({"email": "a@b.pe"}))
                .await
                .expect("exhausted retries still return the response");

            assert_eq!(transport.requests().len(), 3, "status {status} should be tried 3 times");
            assert_eq!(outcome.status(), status);
            assert_eq!(outcome.attempt_count(), 3);
            assert_eq!(delay.waits().len(), 2);
        }
    }

    #[tokio::test]
    async fn non_retryable_statuses_use_a_single_attempt() {
        for status in [
            StatusCode::OK,
            StatusCode::CREATED,
            StatusCode::BAD_REQUEST,
            StatusCode::UNAUTHORIZED,
            StatusCode::NOT_FOUND,
            StatusCode::CONFLICT,
        ] {
            let transport = ScriptedTransport::repeating(status, 3);
            let delay = Arc::new(RecordingDelay::default());
            let client = client(transport.clone(), delay.clone(), IdempotencyScope::Operation);

            let outcome = client.deliver("/v1/contacts:upsert", &json!({})).await.expect("outcome");

            assert_eq!(transport.requests().len(), 1, "status {status} must not be retried");
            assert_eq!(outcome.status(), status);
            assert!(delay.waits().is_empty());
            assert_eq!(outcome.attempts[0].delay, None);
        }
    }

    #[tokio::test]
    async fn success_after_transient_failure_stops_retrying() {
        let transport = ScriptedTransport::new(vec![
            Ok(TransportResponse::new(StatusCode::SERVICE_UNAVAILABLE)),
            Ok(TransportResponse::new(StatusCode::OK)),
        ]);
        let delay = Arc::new(RecordingDelay::default());
        let client = client(transport.clone(), delay.clone(), IdempotencyScope::Operation);

        let outcome = client.deliver("/v1/contacts:upsert", &json!({})).await.expect("outcome");

        assert!(outcome.is_success());
        assert_eq!(transport.requests().len(), 2);
        assert_eq!(delay.waits(), vec![Duration::from_millis(500)]);
    }

    #[tokio::test]
    async fn fallback_table_paces_retries_without_server_hint() {
        let transport = ScriptedTransport::repeating(StatusCode::INTERNAL_SERVER_ERROR, 3);
        let delay = Arc::new(RecordingDelay::default());
        let client = client(transport, delay.clone(), IdempotencyScope::Operation);

        let outcome = client.deliver("/x", &json!({})).await.expect("outcome");

        assert_eq!(delay.waits(), vec![Duration::from_millis(500), Duration::from_millis(1_000)]);
        let chosen: Vec<_> = outcome.attempts.iter().map(|attempt| attempt.delay).collect();
        assert_eq!(
            chosen,
            vec![Some(Duration::from_millis(500)), Some(Duration::from_millis(1_000)), None]
        );
    }

    #[tokio::test]
    async fn server_retry_after_is_used_verbatim() {
        let transport = ScriptedTransport::new(vec![
            Ok(with_retry_after(StatusCode::TOO_MANY_REQUESTS, "3")),
            Ok(with_retry_after(StatusCode::TOO_MANY_REQUESTS, "0.25")),
            Ok(TransportResponse::new(StatusCode::OK)),
        ]);
        let delay = Arc::new(RecordingDelay::default());
        let client = client(transport, delay.clone(), IdempotencyScope::Operation);

        client.deliver("/x", &json!({})).await.expect("outcome");

        assert_eq!(delay.waits(), vec![Duration::from_secs(3), Duration::from_millis(250)]);
    }

    #[tokio::test]
    async fn huge_retry_after_is_waited_verbatim() {
        let transport = ScriptedTransport::new(vec![
            Ok(with_retry_after(StatusCode::SERVICE_UNAVAILABLE, "100000000000000000")),
            Ok(TransportResponse::new(StatusCode::OK)),
        ]);
        let delay = Arc::new(RecordingDelay::default());
        let client = client(transport, delay.clone(), IdempotencyScope::Operation);

        client.deliver("/x", &json!({})).await.expect("outcome");

        let huge = Duration::from_secs(100_000_000_000_000_000);
        assert_eq!(delay.waits(), vec![huge]);
        assert_eq!(saturating_millis(huge), u64::MAX);
        assert_eq!(saturating_millis(Duration::from_millis(1_500)), 1_500);
    }

    #[tokio::test]
    async fn unusable_retry_after_falls_back_to_table() {
        let transport = ScriptedTransport::new(vec![
            Ok(with_retry_after(StatusCode::SERVICE_UNAVAILABLE, "Wed, 21 Oct 2026 07:28:00 GMT")),
            Ok(with_retry_after(StatusCode::SERVICE_UNAVAILABLE, "-1")),
            Ok(TransportResponse::new(StatusCode::SERVICE_UNAVAILABLE)),
        ]);
        let delay = Arc::new(RecordingDelay::default());
        let client = client(transport, delay.clone(), IdempotencyScope::Operation);

        client.deliver("/x", &json!({})).await.expect("outcome");

        assert_eq!(delay.waits(), vec![Duration::from_millis(500), Duration::from_millis(1_000)]);
    }

    #[tokio::test]
    async fn attempt_scope_regenerates_idempotency_key_per_attempt() {
        let transport = ScriptedTransport::repeating(StatusCode::BAD_GATEWAY, 3);
        let delay = Arc::new(RecordingDelay::default());
        let client = client(transport.clone(), delay, IdempotencyScope::Attempt);

        let outcome = client.deliver("/x", &json!({})).await.expect("outcome");

        let keys = idempotency_keys(&transport.requests());
        assert_eq!(keys.len(), 3);
        assert_ne!(keys[0], keys[1]);
        assert_ne!(keys[1], keys[2]);
        assert_ne!(keys[0], keys[2]);
        assert_ne!(outcome.attempts[0].idempotency_key, outcome.attempts[1].idempotency_key);
    }

    #[tokio::test]
    async fn operation_scope_reuses_idempotency_key_across_retries() {
        let transport = ScriptedTransport::repeating(StatusCode::BAD_GATEWAY, 3);
        let delay = Arc::new(RecordingDelay::default());
        let client = client(transport.clone(), delay, IdempotencyScope::Operation);

        client.deliver("/x", &json!({})).await.expect("outcome");

        let keys = idempotency_keys(&transport.requests());
        assert_eq!(keys.len(), 3);
        assert!(keys.iter().all(|key| key == &keys[0]));
        assert!(uuid::Uuid::parse_str(&keys[0]).is_ok());
    }

    #[tokio::test]
    async fn envelope_carries_credentials_scope_and_content_type() {
        let transport = ScriptedTransport::repeating(StatusCode::OK, 1);
        let delay = Arc::new(RecordingDelay::default());
        let client = client(transport.clone(), delay, IdempotencyScope::Operation);

        client
            .deliver("/v1/contacts:upsert", &json!({"email": "camila.ramos@retail.pe"}))
            .await
            .expect("outcome");

        let requests = transport.requests();
        let request = &requests[0];
        assert_eq!(request.url, "https://crm.example.test/v1/contacts:upsert");
        assert_eq!(request.headers.get(AUTHORIZATION).expect("auth"), "Bearer tok-123");
        assert!(request.headers.get(AUTHORIZATION).expect("auth").is_sensitive());
        assert_eq!(request.headers.get("x-app-id").expect("app id"), "app-42");
        assert_eq!(request.headers.get("x-scope").expect("scope"), "contacts.write");
        assert_eq!(request.headers.get(CONTENT_TYPE).expect("type"), "application/json");
        let body: serde_json::Value = serde_json::from_slice(&request.body).expect("json body");
        assert_eq!(body, json!({"email": "camila.ramos@retail.pe"}));
    }

    #[tokio::test]
    async fn body_is_identical_across_attempts() {
        let transport = ScriptedTransport::repeating(StatusCode::SERVICE_UNAVAILABLE, 3);
        let delay = Arc::new(RecordingDelay::default());
        let client = client(transport.clone(), delay, IdempotencyScope::Attempt);

        let outcome = client.deliver("/x", &json!({"budget_usd": 13500})).await.expect("outcome");

        let requests = transport.requests();
        assert!(requests.iter().all(|request| request.body == requests[0].body));
        let indices: Vec<_> = outcome.attempts.iter().map(|attempt| attempt.attempt).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn transport_failure_propagates_without_retry() {
        let transport = ScriptedTransport::new(vec![Err(TransportError::Connect(
            "connection refused".to_string(),
        ))]);
        let delay = Arc::new(RecordingDelay::default());
        let client = client(transport.clone(), delay.clone(), IdempotencyScope::Operation);

        let result = client.deliver("/x", &json!({})).await;

        assert!(matches!(result, Err(DeliveryError::Transport(TransportError::Connect(_)))));
        assert_eq!(transport.requests().len(), 1);
        assert!(delay.waits().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_mid_retry_propagates() {
        let transport = ScriptedTransport::new(vec![
            Ok(TransportResponse::new(StatusCode::SERVICE_UNAVAILABLE)),
            Err(TransportError::Timeout("deadline elapsed".to_string())),
        ]);
        let delay = Arc::new(RecordingDelay::default());
        let client = client(transport.clone(), delay.clone(), IdempotencyScope::Operation);

        let result = client.deliver("/x", &json!({})).await;

        assert!(matches!(result, Err(DeliveryError::Transport(TransportError::Timeout(_)))));
        assert_eq!(transport.requests().len(), 2);
        assert_eq!(delay.waits().len(), 1);
    }

    #[tokio::test]
    async fn control_characters_in_app_id_are_rejected_before_sending() {
        let transport = ScriptedTransport::repeating(StatusCode::OK, 1);
        let mut settings = settings(IdempotencyScope::Operation);
        settings.app_id = "app\n42".to_string();
        let client =
            DeliveryClient::new(settings, transport.clone(), Arc::new(RecordingDelay::default()));

        let result = client.deliver("/x", &json!({})).await;

        assert!(matches!(result, Err(DeliveryError::InvalidHeader { name: "x-app-id" })));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn credentials_require_both_app_id_and_token() {
        let mut settings = settings(IdempotencyScope::Operation);
        assert!(settings.has_credentials());

        settings.api_token = " ".to_string().into();
        assert!(!settings.has_credentials());

        let mut settings = super::DeliverySettings {
            app_id: String::new(),
            ..self::settings(IdempotencyScope::Operation)
        };
        assert!(!settings.has_credentials());
        settings.app_id = "app-42".to_string();
        assert!(settings.has_credentials());
    }

    #[test]
    fn schedule_classifies_statuses() {
        let schedule = RetrySchedule::default();

        assert!(schedule.is_retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(schedule.is_retryable(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(schedule.is_retryable(StatusCode::GATEWAY_TIMEOUT));
        assert!(!schedule.is_retryable(StatusCode::NOT_FOUND));
        assert!(!schedule.is_retryable(StatusCode::REQUEST_TIMEOUT));
        assert!(!schedule.is_retryable(StatusCode::OK));
    }

    #[test]
    fn schedule_delay_prefers_numeric_hint() {
        let schedule = RetrySchedule::default();

        assert_eq!(schedule.delay_for(0, Some(" 2.5 ")), Duration::from_millis(2_500));
        assert_eq!(schedule.delay_for(1, Some("soon")), Duration::from_millis(1_000));
        assert_eq!(schedule.delay_for(2, None), Duration::from_millis(2_000));
        assert_eq!(schedule.delay_for(0, Some("NaN")), Duration::from_millis(500));
    }
}
