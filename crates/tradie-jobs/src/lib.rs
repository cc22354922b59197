// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Job lifecycle management.
//!
//! Owns the job status transition graph and the side effects each transition
//! triggers. Reusable from the conversation engine and the administrative
//! surface alike.

pub mod manager;
pub mod transitions;

pub use manager::JobLifecycle;
pub use transitions::{can_transition, valid_targets};
