// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local gateway implementations for the `serve` and `shell` transports.
//!
//! Outbound texts go to stdout, calendar events are a no-op, and customer
//! intake runs through a deterministic keyword classifier instead of a
//! hosted language model. Real SMS/calendar/LLM integrations plug in behind
//! the same traits.

use std::sync::LazyLock;

use async_trait::async_trait;
use colored::Colorize;
use regex::Regex;
use serde_json::json;

use tradie_core::types::{Contractor, Customer, Job, MessageRecord};
use tradie_core::{Calendar, MessageGenerator, Notifier, TradieError, Urgency};

/// Prints outbound texts to stdout. Never fails.
pub struct StdoutNotifier;

#[async_trait]
impl Notifier for StdoutNotifier {
    async fn send(&self, to_phone: &str, body: &str) -> Result<(), TradieError> {
        println!("{} {body}", format!("[sms -> {to_phone}]").dimmed());
        Ok(())
    }
}

/// No linked calendars in local mode.
pub struct NoopCalendar;

#[async_trait]
impl Calendar for NoopCalendar {
    async fn create_event(
        &self,
        _contractor: &Contractor,
        _job: &Job,
        _customer: &Customer,
    ) -> Result<Option<String>, TradieError> {
        Ok(None)
    }
}

static ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{5}\b").expect("zip pattern"));

const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "plumbing",
        &["sink", "drain", "leak", "pipe", "toilet", "faucet", "water heater", "shower"],
    ),
    (
        "electrical",
        &["outlet", "breaker", "wiring", "light", "fuse", "socket", "panel"],
    ),
    (
        "hvac",
        &["furnace", "heating", "cooling", "thermostat", "air conditioning", "ac unit"],
    ),
    ("locksmith", &["lock", "key", "deadbolt"]),
    ("roofing", &["roof", "gutter", "shingle"]),
];

const EMERGENCY_WORDS: &[&str] = &["emergency", "burst", "flooding", "flood", "sparking"];
const HIGH_WORDS: &[&str] = &["urgent", "asap", "today", "right away"];
const LOW_WORDS: &[&str] = &["no rush", "whenever", "sometime", "next week"];

/// Deterministic stand-in for the language-model collaborator.
///
/// Classifies the customer's text by keyword: when a trade category is
/// recognizable it emits the embedded quote payload, otherwise it asks a
/// follow-up question. Service lists are split on commas and "and".
pub struct HeuristicGenerator;

impl HeuristicGenerator {
    fn intake_reply(text: &str) -> String {
        let lowered = text.to_lowercase();
        let Some(category) = classify_category(&lowered) else {
            return "Can you tell me a bit more about the problem? For example: \
                    plumbing, electrical, or heating/cooling, and what's going wrong."
                .to_string();
        };
        let payload = json!({
            "problem": text.trim(),
            "category": category,
            "urgency": classify_urgency(&lowered).to_string(),
            "zip": ZIP_RE.find(text).map(|m| m.as_str()),
        });
        format!("Thanks! Let me get you an estimate. {payload}")
    }

    fn services_reply(text: &str) -> String {
        let services: Vec<String> = text
            .replace(" and ", ",")
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        json!(services).to_string()
    }
}

#[async_trait]
impl MessageGenerator for HeuristicGenerator {
    async fn reply(
        &self,
        system_prompt: &str,
        _transcript: &[MessageRecord],
        user_text: &str,
    ) -> Result<String, TradieError> {
        if system_prompt.contains("JSON array") {
            return Ok(Self::services_reply(user_text));
        }
        Ok(Self::intake_reply(user_text))
    }
}

fn classify_category(lowered: &str) -> Option<&'static str> {
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lowered.contains(w)))
        .map(|(category, _)| *category)
}

fn classify_urgency(lowered: &str) -> Urgency {
    if EMERGENCY_WORDS.iter().any(|w| lowered.contains(w)) {
        Urgency::Emergency
    } else if HIGH_WORDS.iter().any(|w| lowered.contains(w)) {
        Urgency::High
    } else if LOW_WORDS.iter().any(|w| lowered.contains(w)) {
        Urgency::Low
    } else {
        Urgency::Medium
    }
}
