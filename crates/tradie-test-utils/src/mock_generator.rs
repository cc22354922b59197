// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock message generator with a scripted reply queue.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use tradie_core::types::MessageRecord;
use tradie_core::{MessageGenerator, TradieError};

/// Returns pre-configured replies in FIFO order.
///
/// When the queue is empty a default "mock reply" text is returned, so tests
/// that do not care about generator output never block on scripting.
#[derive(Debug, Default)]
pub struct MockGenerator {
    replies: Mutex<VecDeque<String>>,
    failing: AtomicBool,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            failing: AtomicBool::new(false),
        }
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        self.replies
            .lock()
            .expect("mock generator lock poisoned")
            .push_back(reply.into());
    }

    /// Make every call fail, simulating an unreachable generation service.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl MessageGenerator for MockGenerator {
    async fn reply(
        &self,
        _system_prompt: &str,
        _transcript: &[MessageRecord],
        _user_text: &str,
    ) -> Result<String, TradieError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TradieError::Generator {
                message: "mock generator configured to fail".into(),
                source: None,
            });
        }
        Ok(self
            .replies
            .lock()
            .expect("mock generator lock poisoned")
            .pop_front()
            .unwrap_or_else(|| "mock reply".to_string()))
    }
}
