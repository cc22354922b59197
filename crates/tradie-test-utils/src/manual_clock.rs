// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Manually advanced clock for exercising timers without wall-clock waits.

use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};

use tradie_scheduler::Clock;

/// A clock whose time only moves when a test tells it to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    /// Convenience constructor from calendar fields.
    pub fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> Self {
        Self::new(Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap())
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().expect("manual clock lock poisoned") = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("manual clock lock poisoned");
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("manual clock lock poisoned")
    }
}
