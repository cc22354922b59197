// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMS conversation handling: per-phone-number state machine, contractor
//! onboarding and commands, and generator-assisted customer intake.

pub mod commands;
pub mod context;
pub mod engine;
pub mod intake;
pub mod onboarding;

pub use context::ConversationContext;
pub use engine::ConversationEngine;
