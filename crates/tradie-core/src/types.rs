// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain entities and common enums shared across the Tradie workspace.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Urgency of a requested job.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Emergency,
}

impl Urgency {
    /// Parse free text into an urgency level, normalizing anything
    /// unrecognized to `Medium`.
    pub fn parse_lossy(text: &str) -> Self {
        match text.trim().to_lowercase().as_str() {
            "low" => Urgency::Low,
            "high" => Urgency::High,
            "emergency" | "urgent" => Urgency::Emergency,
            _ => Urgency::Medium,
        }
    }
}

/// Lifecycle status of a job. Transitions are legalized exclusively by the
/// job lifecycle manager; these values appear verbatim in the `jobs.status`
/// column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Quoted,
    Approved,
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    ContractorPassed,
    NoContractorsAvailable,
}

impl JobStatus {
    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Cancelled | JobStatus::NoContractorsAvailable
        )
    }
}

/// State of a per-phone-number conversation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    Idle,
    ContractorOnboarding,
    CustomerIntake,
    AwaitingQuoteApproval,
    AwaitingContractorResponse,
    JobScheduled,
}

/// Direction of a persisted message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Inbound,
    Outbound,
}

/// A registered contractor. Never hard-deleted; deactivated via `active`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contractor {
    pub id: i64,
    pub phone: String,
    pub business_name: String,
    pub trade: String,
    pub zip_code: String,
    pub service_radius_miles: f64,
    /// Offered services, in the order the contractor listed them.
    pub services: Vec<String>,
    pub base_fee: f64,
    pub hourly_rate: f64,
    /// Emergency markup as a fraction (0.25 = +25%).
    pub emergency_markup: f64,
    /// Weekly availability, day name -> "open-close" hour range.
    pub availability: BTreeMap<String, String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to register a contractor at onboarding completion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewContractor {
    pub phone: String,
    pub business_name: String,
    pub trade: String,
    pub zip_code: String,
    pub service_radius_miles: f64,
    pub services: Vec<String>,
    pub base_fee: f64,
    pub hourly_rate: f64,
    pub emergency_markup: f64,
    pub availability: BTreeMap<String, String>,
}

/// A customer, created lazily on first inbound contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub phone: String,
    pub name: Option<String>,
    pub address: Option<String>,
    pub zip_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One unit of requested service work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Internal row id.
    pub id: i64,
    /// Stable external reference.
    pub uuid: Uuid,
    pub customer_id: i64,
    /// Nullable until matched.
    pub contractor_id: Option<i64>,
    pub description: String,
    pub category: String,
    pub urgency: Urgency,
    pub address: Option<String>,
    pub zip_code: String,
    pub estimate_min: f64,
    pub estimate_max: f64,
    /// Final negotiated quote, set by a contractor custom quote or invoice.
    pub final_quote: Option<f64>,
    pub status: JobStatus,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: Option<NaiveTime>,
    pub completed_at: Option<DateTime<Utc>>,
    /// 1-5 customer rating.
    pub rating: Option<u8>,
    pub feedback: Option<String>,
    pub notes: Option<String>,
    pub invoice_sent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to create a job once intake completes.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub customer_id: i64,
    pub contractor_id: Option<i64>,
    pub description: String,
    pub category: String,
    pub urgency: Urgency,
    pub address: Option<String>,
    pub zip_code: String,
    pub estimate_min: f64,
    pub estimate_max: f64,
}

/// One conversation per phone number. The `context` blob is the serialized
/// tagged context enum owned by the conversation state machine; its shape
/// always matches `state`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub phone: String,
    pub state: ConversationState,
    pub context: String,
    pub job_id: Option<i64>,
    pub contractor_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

/// Immutable audit record of one inbound or outbound text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: i64,
    pub conversation_id: i64,
    pub from_phone: String,
    pub to_phone: String,
    pub body: String,
    pub direction: Direction,
    pub transport_message_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields to append a message to the audit log.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub conversation_id: i64,
    pub from_phone: String,
    pub to_phone: String,
    pub body: String,
    pub direction: Direction,
    pub transport_message_id: Option<String>,
}

/// A short-lived dashboard login session issued by the `DASHBOARD` command.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    pub id: i64,
    pub token: String,
    pub contractor_id: i64,
    pub expires_at: DateTime<Utc>,
}

/// An inbound message event from the transport layer.
#[derive(Debug, Clone)]
pub struct InboundSms {
    pub from: String,
    pub to: String,
    pub body: String,
    pub transport_message_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn urgency_parse_lossy_normalizes_unknown_to_medium() {
        assert_eq!(Urgency::parse_lossy("LOW"), Urgency::Low);
        assert_eq!(Urgency::parse_lossy("emergency"), Urgency::Emergency);
        assert_eq!(Urgency::parse_lossy("urgent"), Urgency::Emergency);
        assert_eq!(Urgency::parse_lossy("whenever"), Urgency::Medium);
        assert_eq!(Urgency::parse_lossy(""), Urgency::Medium);
    }

    #[test]
    fn job_status_round_trips_through_snake_case() {
        for status in [
            JobStatus::Pending,
            JobStatus::Quoted,
            JobStatus::Approved,
            JobStatus::Scheduled,
            JobStatus::InProgress,
            JobStatus::Completed,
            JobStatus::Cancelled,
            JobStatus::ContractorPassed,
            JobStatus::NoContractorsAvailable,
        ] {
            let s = status.to_string();
            assert_eq!(JobStatus::from_str(&s).unwrap(), status);
        }
        assert_eq!(JobStatus::InProgress.to_string(), "in_progress");
    }

    #[test]
    fn terminal_statuses() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
        assert!(JobStatus::NoContractorsAvailable.is_terminal());
        assert!(!JobStatus::ContractorPassed.is_terminal());
        assert!(!JobStatus::Scheduled.is_terminal());
    }

    #[test]
    fn conversation_state_round_trips() {
        let s = ConversationState::AwaitingQuoteApproval.to_string();
        assert_eq!(s, "awaiting_quote_approval");
        assert_eq!(
            ConversationState::from_str(&s).unwrap(),
            ConversationState::AwaitingQuoteApproval
        );
    }
}
