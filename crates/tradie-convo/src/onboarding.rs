// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contractor onboarding: a strict ordered sequence of prompts.
//!
//! Each step validates its input locally; a failed validation re-prompts
//! without advancing. The draft accumulates answers until the final step
//! persists a contractor.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use tradie_core::types::NewContractor;

static ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}$").expect("zip pattern"));

/// The fixed onboarding sequence, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    BusinessName,
    Trade,
    ZipCode,
    Services,
    BaseFee,
    HourlyRate,
    EmergencyMarkup,
    Availability,
}

impl OnboardingStep {
    pub fn next(self) -> Option<OnboardingStep> {
        use OnboardingStep::*;
        match self {
            BusinessName => Some(Trade),
            Trade => Some(ZipCode),
            ZipCode => Some(Services),
            Services => Some(BaseFee),
            BaseFee => Some(HourlyRate),
            HourlyRate => Some(EmergencyMarkup),
            EmergencyMarkup => Some(Availability),
            Availability => None,
        }
    }

    /// What to ask the contractor for this step.
    pub fn prompt(self) -> &'static str {
        use OnboardingStep::*;
        match self {
            BusinessName => "What's your business name?",
            Trade => "What's your trade? (e.g. plumber, electrician)",
            ZipCode => "What 5-digit zip code is your service area centered on?",
            Services => "What services do you offer? List them in one message.",
            BaseFee => "What's your base call-out fee in dollars?",
            HourlyRate => "What's your hourly rate in dollars?",
            EmergencyMarkup => "What's your emergency markup percentage? (e.g. 25)",
            Availability => "What are your available hours? (e.g. Mon-Fri 8-5)",
        }
    }

    /// Corrective message used when this step's validation fails.
    pub fn reprompt(self) -> &'static str {
        use OnboardingStep::*;
        match self {
            ZipCode => "That doesn't look like a zip code. Please send a 5-digit zip code.",
            BaseFee => "Please send your base fee as a non-negative number, e.g. 75.",
            HourlyRate => "Please send your hourly rate as a non-negative number, e.g. 100.",
            EmergencyMarkup => {
                "Please send your emergency markup as a non-negative percentage, e.g. 25."
            }
            _ => "Sorry, I didn't catch that. Please try again.",
        }
    }
}

/// Answers accumulated across onboarding steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractorDraft {
    pub business_name: Option<String>,
    pub trade: Option<String>,
    pub zip_code: Option<String>,
    pub services: Option<Vec<String>>,
    pub base_fee: Option<f64>,
    pub hourly_rate: Option<f64>,
    pub emergency_markup: Option<f64>,
    pub availability: Option<String>,
}

impl ContractorDraft {
    /// Assemble the contractor once every step has an answer.
    pub fn build(&self, phone: &str) -> Option<NewContractor> {
        Some(NewContractor {
            phone: phone.to_string(),
            business_name: self.business_name.clone()?,
            trade: self.trade.clone()?,
            zip_code: self.zip_code.clone()?,
            service_radius_miles: 25.0,
            services: self.services.clone()?,
            base_fee: self.base_fee?,
            hourly_rate: self.hourly_rate?,
            emergency_markup: self.emergency_markup?,
            availability: parse_availability(self.availability.as_deref()?),
        })
    }
}

/// Validate a 5-digit postal code.
pub fn valid_zip(text: &str) -> bool {
    ZIP_RE.is_match(text.trim())
}

/// System prompt for parsing a contractor's free-text service list.
pub const SERVICES_SYSTEM_PROMPT: &str = "\
Extract the individual services from the contractor's message. \
Reply with ONLY a JSON array of short lowercase strings, \
e.g. [\"drain cleaning\", \"water heaters\"].";

/// Extract the service list from a generator reply. `None` when the reply
/// carries no parseable array; the caller falls back to the raw text.
pub fn parse_services_reply(reply: &str) -> Option<Vec<String>> {
    let start = reply.find('[')?;
    let end = reply.rfind(']')?;
    if end <= start {
        return None;
    }
    let services: Vec<String> = serde_json::from_str(&reply[start..=end]).ok()?;
    let services: Vec<String> = services
        .into_iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    (!services.is_empty()).then_some(services)
}

/// Parse a non-negative dollar amount, tolerating `$` and commas.
pub fn parse_amount(text: &str) -> Option<f64> {
    let cleaned = text.trim().trim_start_matches('$').replace(',', "");
    let value: f64 = cleaned.parse().ok()?;
    (value >= 0.0 && value.is_finite()).then_some(value)
}

/// Parse a percentage into a fraction: `25` and `25%` both become 0.25.
/// Values of 1.0 or less are already fractions and pass through.
pub fn parse_percent(text: &str) -> Option<f64> {
    let cleaned = text.trim().trim_end_matches('%');
    let value: f64 = cleaned.trim().parse().ok()?;
    if !(value.is_finite() && value >= 0.0) {
        return None;
    }
    Some(if value > 1.0 { value / 100.0 } else { value })
}

/// Minimally normalize free-text availability into a day -> hours map.
///
/// "Mon-Fri 8-5" expands the day range; anything unrecognized is stored
/// whole under `all`, preserving what the contractor said.
pub fn parse_availability(text: &str) -> std::collections::BTreeMap<String, String> {
    const DAYS: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];
    let mut map = std::collections::BTreeMap::new();
    let text = text.trim();

    let mut parts = text.splitn(2, ' ');
    let days_part = parts.next().unwrap_or_default().to_lowercase();
    let hours_part = parts.next().unwrap_or("").trim();

    if let Some((start, end)) = days_part.split_once('-') {
        let start_idx = DAYS.iter().position(|d| start.starts_with(d));
        let end_idx = DAYS.iter().position(|d| end.starts_with(d));
        if let (Some(start_idx), Some(end_idx)) = (start_idx, end_idx) {
            if start_idx <= end_idx && !hours_part.is_empty() {
                for day in &DAYS[start_idx..=end_idx] {
                    map.insert(day.to_string(), hours_part.to_string());
                }
                return map;
            }
        }
    }

    map.insert("all".to_string(), text.to_string());
    map
}
