/// Inbound CRM notification as received on the wire.
///
/// The body is kept byte-exact because the signature is computed over it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebhookEvent {
    pub raw_body: Vec<u8>,
    pub timestamp: String,
    pub signature: String,
}

impl WebhookEvent {
    pub fn new(
        raw_body: impl Into<Vec<u8>>,
        timestamp: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self { raw_body: raw_body.into(), timestamp: timestamp.into(), signature: signature.into() }
    }
}
