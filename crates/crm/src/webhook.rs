//! Inbound webhook authentication.
//!
//! The CRM signs `{timestamp}.{raw body}` with HMAC-SHA256 using the shared
//! app secret and sends `sha256=<lowercase hex>` alongside the timestamp.

use hmac::{Hmac, Mac};
use leadflow_core::config::CrmConfig;
use leadflow_core::WebhookEvent;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_PREFIX: &str = "sha256=";
pub const DEFAULT_MAX_SKEW_SECS: u64 = 300;

/// Why an event was rejected. Only for diagnostics: [`verify`] reports a
/// plain `false` for all of these.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum WebhookRejection {
    #[error("timestamp is not an integer")]
    MalformedTimestamp,
    #[error("signature does not match")]
    SignatureMismatch,
}

/// Computes the signature header value for a body and timestamp.
pub fn sign(raw_body: &[u8], timestamp: &str, secret: impl AsRef<[u8]>) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_ref()).ok()?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(raw_body);
    Some(format!("{SIGNATURE_PREFIX}{}", hex::encode(mac.finalize().into_bytes())))
}

/// Checks a webhook signature.
///
/// `max_skew_secs` is accepted for callers that pass their configured window,
/// but staleness is not enforced here: a correctly signed old event still
/// verifies. See [`WebhookVerifier::is_fresh`] for the opt-in check.
pub fn verify(
    raw_body: &[u8],
    timestamp: &str,
    signature_header: &str,
    secret: impl AsRef<[u8]>,
    max_skew_secs: u64,
) -> bool {
    let _ = max_skew_secs;
    check(raw_body, timestamp, signature_header, secret.as_ref()).is_ok()
}

fn check(
    raw_body: &[u8],
    timestamp: &str,
    signature_header: &str,
    secret: &[u8],
) -> Result<(), WebhookRejection> {
    if !is_integer_timestamp(timestamp) {
        return Err(WebhookRejection::MalformedTimestamp);
    }

    let expected =
        sign(raw_body, timestamp, secret).ok_or(WebhookRejection::SignatureMismatch)?;
    if constant_time_eq(signature_header.as_bytes(), expected.as_bytes()) {
        Ok(())
    } else {
        Err(WebhookRejection::SignatureMismatch)
    }
}

/// Integer syntax without a width limit: optional sign, ASCII digits, and
/// single `_` separators between digits.
pub fn is_integer_timestamp(timestamp: &str) -> bool {
    let trimmed = timestamp.trim();
    let digits = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    digits
        .split('_')
        .all(|group| !group.is_empty() && group.bytes().all(|byte| byte.is_ascii_digit()))
}

fn parse_timestamp(timestamp: &str) -> Option<i64> {
    if !is_integer_timestamp(timestamp) {
        return None;
    }
    timestamp.trim().replace('_', "").parse::<i64>().ok()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Verifier bound to the process-wide webhook secret.
#[derive(Clone, Debug)]
pub struct WebhookVerifier {
    secret: SecretString,
    max_skew_secs: u64,
}

impl WebhookVerifier {
    pub fn new(secret: SecretString, max_skew_secs: u64) -> Self {
        Self { secret, max_skew_secs }
    }

    /// `None` when no secret is configured; callers must then refuse webhooks.
    pub fn from_config(config: &CrmConfig) -> Option<Self> {
        if !config.has_webhook_secret() {
            return None;
        }
        let secret = config.webhook_secret.clone()?;
        Some(Self::new(secret, config.webhook_max_skew_secs))
    }

    pub fn max_skew_secs(&self) -> u64 {
        self.max_skew_secs
    }

    pub fn verify(&self, event: &WebhookEvent) -> bool {
        verify(
            &event.raw_body,
            &event.timestamp,
            &event.signature,
            self.secret.expose_secret().as_bytes(),
            self.max_skew_secs,
        )
    }

    pub fn inspect(&self, event: &WebhookEvent) -> Result<(), WebhookRejection> {
        check(
            &event.raw_body,
            &event.timestamp,
            &event.signature,
            self.secret.expose_secret().as_bytes(),
        )
    }

    pub fn sign(&self, raw_body: &[u8], timestamp: &str) -> Option<String> {
        sign(raw_body, timestamp, self.secret.expose_secret().as_bytes())
    }

    /// Whether the event timestamp lies within the skew window around `now`.
    ///
    /// Not consulted by [`WebhookVerifier::verify`]; replay policy is left to
    /// the caller.
    pub fn is_fresh(&self, timestamp: &str, now_unix_secs: i64) -> bool {
        let Some(sent_at) = parse_timestamp(timestamp) else {
            return false;
        };
        let skew = i128::from(now_unix_secs) - i128::from(sent_at);
        skew.unsigned_abs() <= u128::from(self.max_skew_secs)
    }
}
