// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Customer intake via the message-generation collaborator.
//!
//! The generator converses freely until it has the problem, category, and
//! urgency, then embeds a JSON payload in its reply. Extraction is lenient:
//! a reply with no parseable payload is ordinary conversation, never an
//! error.

use serde::Deserialize;

use tradie_core::Urgency;

/// System prompt seeding the intake dialogue.
pub const INTAKE_SYSTEM_PROMPT: &str = "\
You help customers describe a home service problem over text. \
Ask short questions until you know: what the problem is, which trade it \
belongs to (plumbing, electrical, hvac, or general), how urgent it is \
(low, medium, high, or emergency), and the customer's 5-digit zip code. \
Keep replies under 300 characters. Once you have everything, reply with \
ONLY a JSON object: {\"problem\": \"...\", \"category\": \"...\", \
\"urgency\": \"...\", \"zip\": \"...\", \"details\": \"...\"}";

/// Structured fields the generator emits when intake is complete.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakePayload {
    pub problem: String,
    pub category: String,
    pub urgency: Urgency,
    pub zip: Option<String>,
    pub details: Option<String>,
}

#[derive(Deserialize)]
struct RawPayload {
    problem: String,
    category: String,
    urgency: String,
    zip: Option<String>,
    details: Option<String>,
}

/// Extract an embedded payload from a generator reply.
///
/// Scans the outermost `{ ... }` span; anything that does not deserialize
/// into the expected shape yields `None`. Unknown urgency text normalizes to
/// medium rather than failing.
pub fn extract_payload(reply: &str) -> Option<IntakePayload> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end <= start {
        return None;
    }
    let raw: RawPayload = serde_json::from_str(&reply[start..=end]).ok()?;
    if raw.problem.trim().is_empty() || raw.category.trim().is_empty() {
        return None;
    }
    Some(IntakePayload {
        problem: raw.problem,
        category: raw.category.trim().to_lowercase(),
        urgency: Urgency::parse_lossy(&raw.urgency),
        zip: raw.zip.filter(|z| crate::onboarding::valid_zip(z)),
        details: raw.details,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_json_reply_parses() {
        let reply = r#"{"problem": "clogged kitchen drain", "category": "Plumbing", "urgency": "high", "zip": "90210", "details": "standing water"}"#;
        let payload = extract_payload(reply).unwrap();
        assert_eq!(payload.problem, "clogged kitchen drain");
        assert_eq!(payload.category, "plumbing");
        assert_eq!(payload.urgency, Urgency::High);
        assert_eq!(payload.zip.as_deref(), Some("90210"));
        assert_eq!(payload.details.as_deref(), Some("standing water"));
    }

    #[test]
    fn invalid_zip_in_payload_is_dropped() {
        let reply = r#"{"problem": "no heat", "category": "hvac", "urgency": "high", "zip": "nearby"}"#;
        assert!(extract_payload(reply).unwrap().zip.is_none());
    }

    #[test]
    fn payload_embedded_in_prose_parses() {
        let reply = concat!(
            "Got it, here's what I have: ",
            r#"{"problem": "no hot water", "category": "plumbing", "urgency": "medium"}"#,
            " - sending you a quote now."
        );
        let payload = extract_payload(reply).unwrap();
        assert_eq!(payload.problem, "no hot water");
        assert!(payload.details.is_none());
    }

    #[test]
    fn plain_conversation_is_not_a_payload() {
        assert!(extract_payload("How long has the drain been slow?").is_none());
        assert!(extract_payload("").is_none());
    }

    #[test]
    fn malformed_or_incomplete_json_is_treated_as_text() {
        assert!(extract_payload(r#"{"problem": "x""#).is_none());
        assert!(extract_payload(r#"{"category": "plumbing"}"#).is_none());
        assert!(extract_payload(r#"{"problem": "", "category": "plumbing", "urgency": "low"}"#).is_none());
    }

    #[test]
    fn unknown_urgency_normalizes_to_medium() {
        let reply = r#"{"problem": "flickering lights", "category": "electrical", "urgency": "soonish"}"#;
        assert_eq!(extract_payload(reply).unwrap().urgency, Urgency::Medium);
    }
}
