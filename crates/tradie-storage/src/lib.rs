// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for the marketplace: schema migrations, typed query
//! modules, and the [`SqliteStorage`] adapter that implements the core
//! `Storage` gateway trait.

pub mod adapter;
pub(crate) mod codec;
pub mod database;
mod migrations;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
