// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory registry of pending one-shot timers.
//!
//! Timers are keyed by `(job id, purpose)` so a job can carry at most one
//! timer of each purpose; registering again for the same key replaces the
//! previous fire time. The registry only stores fire times — the side effect
//! a timer performs is decided at fire time from fresh job state, never
//! captured at registration time.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use strum::Display;

/// What a pending timer does when it fires.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum TimerPurpose {
    /// Reminder sent at 18:00 the day before the scheduled date.
    DayBefore,
    /// Reminder sent 2 hours before the scheduled time (08:00 if none).
    DayOf,
    /// Post-completion follow-up sent at 18:00 the day after completion.
    FollowUp,
}

/// Keyed collection of pending fire times.
#[derive(Debug, Default)]
pub struct TimerRegistry {
    pending: Mutex<HashMap<(i64, TimerPurpose), DateTime<Utc>>>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a timer, replacing any existing one for the same key.
    pub fn register(&self, job_id: i64, purpose: TimerPurpose, fire_at: DateTime<Utc>) {
        self.pending
            .lock()
            .expect("timer registry lock poisoned")
            .insert((job_id, purpose), fire_at);
    }

    /// Cancel one timer. Returns whether one was pending.
    pub fn cancel(&self, job_id: i64, purpose: TimerPurpose) -> bool {
        self.pending
            .lock()
            .expect("timer registry lock poisoned")
            .remove(&(job_id, purpose))
            .is_some()
    }

    /// Cancel every timer for a job. Returns how many were pending.
    pub fn cancel_job(&self, job_id: i64) -> usize {
        let mut pending = self.pending.lock().expect("timer registry lock poisoned");
        let before = pending.len();
        pending.retain(|(id, _), _| *id != job_id);
        before - pending.len()
    }

    /// The registered fire time for a key, if any.
    pub fn fire_time(&self, job_id: i64, purpose: TimerPurpose) -> Option<DateTime<Utc>> {
        self.pending
            .lock()
            .expect("timer registry lock poisoned")
            .get(&(job_id, purpose))
            .copied()
    }

    /// Remove and return every timer due at or before `now`.
    ///
    /// A timer returned here has already left the pending set, so it fires
    /// at most once even if `due` races with a re-registration.
    pub fn due(&self, now: DateTime<Utc>) -> Vec<(i64, TimerPurpose)> {
        let mut pending = self.pending.lock().expect("timer registry lock poisoned");
        let fired: Vec<(i64, TimerPurpose)> = pending
            .iter()
            .filter(|(_, fire_at)| **fire_at <= now)
            .map(|(key, _)| *key)
            .collect();
        for key in &fired {
            pending.remove(key);
        }
        fired
    }

    pub fn len(&self) -> usize {
        self.pending
            .lock()
            .expect("timer registry lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 18:00 the day before the scheduled date.
pub fn day_before_fire_time(scheduled_date: NaiveDate) -> DateTime<Utc> {
    (scheduled_date - Duration::days(1))
        .and_hms_opt(18, 0, 0)
        .expect("18:00 is a valid time")
        .and_utc()
}

/// 2 hours before the scheduled time, or 08:00 when no time was given.
pub fn day_of_fire_time(
    scheduled_date: NaiveDate,
    scheduled_time: Option<NaiveTime>,
) -> DateTime<Utc> {
    match scheduled_time {
        Some(time) => (scheduled_date.and_time(time) - Duration::hours(2)).and_utc(),
        None => scheduled_date
            .and_hms_opt(8, 0, 0)
            .expect("08:00 is a valid time")
            .and_utc(),
    }
}

/// 18:00 the day after completion.
pub fn followup_fire_time(completed_at: DateTime<Utc>) -> DateTime<Utc> {
    (completed_at.date_naive() + Duration::days(1))
        .and_hms_opt(18, 0, 0)
        .expect("18:00 is a valid time")
        .and_utc()
}
