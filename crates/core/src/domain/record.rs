use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Marks contacts created through the brief intake so the CRM side can
/// attribute them.
pub const RFP_SOURCE: &str = "AI-RFP";

pub const DEFAULT_COMPANY: &str = "Retail Group";
pub const DEFAULT_BUDGET_USD: u64 = 13_500;

/// Flat contact/budget record extracted from a free-text sales brief.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub company: String,
    pub country: String,
    pub cities: Vec<String>,
    pub need: String,
    pub languages: Vec<String>,
    pub budget_usd: u64,
    pub timeline_weeks: u32,
    pub contact_email: String,
}

impl NormalizedRecord {
    pub fn has_contact(&self) -> bool {
        !self.contact_email.trim().is_empty()
    }

    /// Rejects records the CRM cannot key a contact on.
    pub fn ensure_deliverable(&self) -> Result<(), DomainError> {
        if !self.has_contact() {
            return Err(DomainError::MissingContactEmail);
        }
        Ok(())
    }
}

/// Body sent to the contacts upsert endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertPayload {
    pub email: String,
    pub country: String,
    pub budget_usd: u64,
    pub rfp_source: String,
    pub company: String,
    pub cities: Vec<String>,
    pub languages: Vec<String>,
    pub need: String,
    pub timeline_weeks: u32,
}

impl From<&NormalizedRecord> for UpsertPayload {
    fn from(record: &NormalizedRecord) -> Self {
        Self {
            email: record.contact_email.clone(),
            country: record.country.clone(),
            budget_usd: record.budget_usd,
            rfp_source: RFP_SOURCE.to_string(),
            company: record.company.clone(),
            cities: record.cities.clone(),
            languages: record.languages.clone(),
            need: record.need.clone(),
            timeline_weeks: record.timeline_weeks,
        }
    }
}
