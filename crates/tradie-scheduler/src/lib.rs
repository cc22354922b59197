// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reminder timers and periodic sweeps.
//!
//! The [`Scheduler`] owns a keyed registry of per-job one-shot timers
//! (day-before reminder, day-of reminder, post-completion follow-up) and
//! three daily cron-driven sweeps. It runs on its own tick loop with an
//! injected [`Clock`], so all timing behavior is testable without waits.

pub mod clock;
pub mod engine;
pub mod timers;

pub use clock::{Clock, SystemClock};
pub use engine::Scheduler;
pub use timers::{TimerPurpose, TimerRegistry};
