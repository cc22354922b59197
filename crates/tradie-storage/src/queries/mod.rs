// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per entity.

pub mod contractors;
pub mod conversations;
pub mod customers;
pub mod dashboard;
pub mod jobs;
pub mod messages;
