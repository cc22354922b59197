// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification gateway: fire-and-forget text delivery.

use async_trait::async_trait;

use crate::error::TradieError;

/// Sends a text message to a phone number.
///
/// Callers log failures and continue; a failed send never blocks a job
/// status transition or a conversation reply.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to_phone: &str, body: &str) -> Result<(), TradieError>;
}
