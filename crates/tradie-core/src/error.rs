// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Tradie dispatch system.

use thiserror::Error;

use crate::types::JobStatus;

/// The primary error type used across all Tradie gateway traits and core operations.
#[derive(Debug, Error)]
pub enum TradieError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Persistence gateway errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Notification gateway errors (send failure, rate limiting).
    #[error("notify error: {message}")]
    Notify {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Message generator errors (service unreachable, malformed response).
    #[error("generator error: {message}")]
    Generator {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Calendar gateway errors (event creation failure).
    #[error("calendar error: {message}")]
    Calendar {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An entity that was expected to exist could not be found.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// A job status transition outside the lifecycle graph was requested.
    #[error("invalid transition: {from} -> {action}")]
    InvalidTransition { from: JobStatus, action: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TradieError {
    /// Wrap an arbitrary error as a storage failure.
    pub fn storage<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        TradieError::Storage {
            source: Box::new(source),
        }
    }

    /// Shorthand for a not-found failure with an owned key.
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        TradieError::NotFound {
            entity,
            key: key.into(),
        }
    }
}
