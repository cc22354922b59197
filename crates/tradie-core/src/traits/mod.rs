// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway trait definitions.
//!
//! External collaborators (persistence, notification transport, calendar,
//! message generation) are specified only at these boundaries. Everything
//! above them is written against `dyn` trait objects so tests can swap in
//! mocks from `tradie-test-utils`.

mod calendar;
mod generator;
mod notifier;
mod storage;

pub use calendar::Calendar;
pub use generator::MessageGenerator;
pub use notifier::Notifier;
pub use storage::Storage;
