// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock gateway implementations and fixtures for testing Tradie components.
//!
//! All mocks are deterministic and CI-runnable: no transport, no real clock,
//! no external services.

pub mod fixtures;
pub mod manual_clock;
pub mod mock_calendar;
pub mod mock_generator;
pub mod mock_notifier;

pub use fixtures::{contractor_fixture, job_fixture};
pub use manual_clock::ManualClock;
pub use mock_calendar::MockCalendar;
pub use mock_generator::MockGenerator;
pub use mock_notifier::MockNotifier;
