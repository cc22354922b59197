// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Calendar gateway: best-effort event creation for scheduled jobs.

use async_trait::async_trait;

use crate::error::TradieError;
use crate::types::{Contractor, Customer, Job};

/// Creates a calendar event for a scheduled job.
///
/// Returns `Ok(None)` when the contractor has no linked calendar, which is
/// not an error. Failures are logged by callers and never roll back the
/// transition that triggered them.
#[async_trait]
pub trait Calendar: Send + Sync {
    async fn create_event(
        &self,
        contractor: &Contractor,
        job: &Job,
        customer: &Customer,
    ) -> Result<Option<String>, TradieError>;
}
