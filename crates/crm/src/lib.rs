//! Outbound delivery to the CRM contacts API and inbound webhook verification.

pub mod delay;
pub mod delivery;
pub mod transport;
pub mod webhook;

pub use delay::{NoopDelay, RetryDelay, TokioDelay};
pub use delivery::{
    DeliveryAttempt, DeliveryClient, DeliveryError, DeliveryOutcome, DeliverySettings,
    RetrySchedule, CONTACTS_UPSERT_PATH,
};
pub use transport::{
    CrmTransport, OutboundRequest, ReqwestTransport, TransportError, TransportResponse,
};
pub use webhook::{is_integer_timestamp, sign, verify, WebhookRejection, WebhookVerifier};
