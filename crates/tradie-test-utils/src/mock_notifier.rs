// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock notification gateway that records every send.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use tradie_core::{Notifier, TradieError};

/// Records outbound notifications instead of sending them.
///
/// Flip `set_failing(true)` to make every send return an error; callers are
/// expected to log and continue, so tests use this to assert that transitions
/// survive notification failure.
#[derive(Debug, Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<(String, String)>>,
    failing: AtomicBool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// All recorded `(to_phone, body)` pairs, in send order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().expect("mock notifier lock poisoned").clone()
    }

    /// Bodies of every message sent to one phone number.
    pub fn sent_to(&self, phone: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(to, _)| to == phone)
            .map(|(_, body)| body)
            .collect()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().expect("mock notifier lock poisoned").len()
    }

    pub fn clear(&self) {
        self.sent.lock().expect("mock notifier lock poisoned").clear();
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, to_phone: &str, body: &str) -> Result<(), TradieError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TradieError::Notify {
                message: "mock notifier configured to fail".into(),
                source: None,
            });
        }
        self.sent
            .lock()
            .expect("mock notifier lock poisoned")
            .push((to_phone.to_string(), body.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_sends_in_order() {
        let notifier = MockNotifier::new();
        notifier.send("+15551", "first").await.unwrap();
        notifier.send("+15552", "second").await.unwrap();
        notifier.send("+15551", "third").await.unwrap();

        assert_eq!(notifier.count(), 3);
        assert_eq!(notifier.sent_to("+15551"), vec!["first", "third"]);
    }

    #[tokio::test]
    async fn failing_mode_returns_error_and_records_nothing() {
        let notifier = MockNotifier::new();
        notifier.set_failing(true);
        assert!(notifier.send("+15551", "lost").await.is_err());
        assert_eq!(notifier.count(), 0);
    }
}
