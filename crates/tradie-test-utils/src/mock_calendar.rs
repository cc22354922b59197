// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock calendar gateway.

use std::sync::Mutex;

use async_trait::async_trait;

use tradie_core::types::{Contractor, Customer, Job};
use tradie_core::{Calendar, TradieError};

/// Records event-creation calls by job id.
///
/// By default behaves like a contractor with no linked calendar and returns
/// `Ok(None)`; configure an event reference to simulate a linked one.
#[derive(Debug, Default)]
pub struct MockCalendar {
    event_ref: Mutex<Option<String>>,
    calls: Mutex<Vec<i64>>,
}

impl MockCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event_ref(event_ref: impl Into<String>) -> Self {
        Self {
            event_ref: Mutex::new(Some(event_ref.into())),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Job ids passed to `create_event`, in call order.
    pub fn calls(&self) -> Vec<i64> {
        self.calls.lock().expect("mock calendar lock poisoned").clone()
    }
}

#[async_trait]
impl Calendar for MockCalendar {
    async fn create_event(
        &self,
        _contractor: &Contractor,
        job: &Job,
        _customer: &Customer,
    ) -> Result<Option<String>, TradieError> {
        self.calls
            .lock()
            .expect("mock calendar lock poisoned")
            .push(job.id);
        Ok(self
            .event_ref
            .lock()
            .expect("mock calendar lock poisoned")
            .clone())
    }
}
