// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed conversation context.
//!
//! Each conversation state carries exactly the context its handler expects,
//! serialized as a tagged JSON blob in the `conversations.context` column.
//! Transitions always replace the whole value; nothing is merged, so no key
//! from a previous state can leak into the next one.

use serde::{Deserialize, Serialize};
use tracing::warn;

use tradie_core::ConversationState;

use crate::onboarding::{ContractorDraft, OnboardingStep};

/// Context for the current conversation state. The `state` tag mirrors the
/// `conversations.state` column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConversationContext {
    #[default]
    Idle,
    ContractorOnboarding {
        step: OnboardingStep,
        draft: ContractorDraft,
    },
    CustomerIntake,
    AwaitingQuoteApproval {
        job_id: i64,
        contractor_id: i64,
    },
    AwaitingContractorResponse {
        job_id: i64,
        contractor_id: i64,
    },
    JobScheduled {
        job_id: i64,
    },
}

impl ConversationContext {
    /// The state column value this context belongs to.
    pub fn state(&self) -> ConversationState {
        match self {
            ConversationContext::Idle => ConversationState::Idle,
            ConversationContext::ContractorOnboarding { .. } => {
                ConversationState::ContractorOnboarding
            }
            ConversationContext::CustomerIntake => ConversationState::CustomerIntake,
            ConversationContext::AwaitingQuoteApproval { .. } => {
                ConversationState::AwaitingQuoteApproval
            }
            ConversationContext::AwaitingContractorResponse { .. } => {
                ConversationState::AwaitingContractorResponse
            }
            ConversationContext::JobScheduled { .. } => ConversationState::JobScheduled,
        }
    }

    /// Deserialize a stored context blob. A blob that does not parse is a
    /// data-integrity fault: logged, and the conversation restarts from idle
    /// rather than getting stuck.
    pub fn load(blob: &str) -> Self {
        match serde_json::from_str(blob) {
            Ok(context) => context,
            Err(err) => {
                warn!(%err, "unreadable conversation context, resetting to idle");
                ConversationContext::Idle
            }
        }
    }

    pub fn to_json(&self) -> String {
        // A context is plain data; serialization cannot fail.
        serde_json::to_string(self).expect("context serialization")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_round_trips_to_the_schema_default() {
        let blob = ConversationContext::Idle.to_json();
        assert_eq!(blob, r#"{"state":"idle"}"#);
        assert_eq!(ConversationContext::load(&blob), ConversationContext::Idle);
    }

    #[test]
    fn context_tag_matches_state_column_values() {
        let context = ConversationContext::AwaitingQuoteApproval {
            job_id: 7,
            contractor_id: 3,
        };
        assert_eq!(context.state(), ConversationState::AwaitingQuoteApproval);
        assert!(context.to_json().contains(r#""state":"awaiting_quote_approval""#));
    }

    #[test]
    fn onboarding_context_round_trips_with_draft() {
        let context = ConversationContext::ContractorOnboarding {
            step: OnboardingStep::BaseFee,
            draft: ContractorDraft {
                business_name: Some("Ace Plumbing".into()),
                trade: Some("plumber".into()),
                zip_code: Some("90210".into()),
                services: Some(vec!["drain cleaning".into()]),
                ..ContractorDraft::default()
            },
        };
        let reloaded = ConversationContext::load(&context.to_json());
        assert_eq!(reloaded, context);
    }

    #[test]
    fn garbage_blob_resets_to_idle() {
        assert_eq!(ConversationContext::load("not json"), ConversationContext::Idle);
        assert_eq!(
            ConversationContext::load(r#"{"state":"no_such_state"}"#),
            ConversationContext::Idle
        );
    }

    #[test]
    fn transition_replaces_whole_context() {
        // Serializing the new state must not carry keys from the old one.
        let blob = ConversationContext::JobScheduled { job_id: 9 }.to_json();
        assert!(!blob.contains("contractor_id"));
    }
}
