// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Tradie dispatch system.
//!
//! This crate provides the foundational gateway trait definitions, error
//! type, and domain entities used throughout the Tradie workspace. The
//! conversation engine, job lifecycle manager, quoting engine, and scheduler
//! are all written against the traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TradieError;
pub use types::{ConversationState, JobStatus, Urgency};

// Re-export all gateway traits at crate root.
pub use traits::{Calendar, MessageGenerator, Notifier, Storage};
