// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message generator gateway: the language-model collaborator used for
//! open-ended customer dialogue and free-text parsing.

use async_trait::async_trait;

use crate::error::TradieError;
use crate::types::MessageRecord;

/// Produces a reply to a customer message given a system prompt and the
/// conversation transcript so far.
///
/// The reply may carry an embedded structured payload (problem summary,
/// category, urgency) that the conversation engine extracts; an unparseable
/// payload is treated as ordinary conversational text, never an error.
#[async_trait]
pub trait MessageGenerator: Send + Sync {
    async fn reply(
        &self,
        system_prompt: &str,
        transcript: &[MessageRecord],
        user_text: &str,
    ) -> Result<String, TradieError>;
}
