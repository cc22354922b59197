// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./tradie.toml` > `~/.config/tradie/tradie.toml` >
//! `/etc/tradie/tradie.toml` with environment variable overrides via the
//! `TRADIE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::TradieConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tradie/tradie.toml` (system-wide)
/// 3. `~/.config/tradie/tradie.toml` (user XDG config)
/// 4. `./tradie.toml` (local directory)
/// 5. `TRADIE_*` environment variables
pub fn load_config() -> Result<TradieConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TradieConfig::default()))
        .merge(Toml::file("/etc/tradie/tradie.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("tradie/tradie.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("tradie.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<TradieConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TradieConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TradieConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TradieConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `TRADIE_STORAGE_DATABASE_PATH` must map
/// to `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("TRADIE_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("quoting_", "quoting.", 1)
            .replacen("scheduler_", "scheduler.", 1)
            .replacen("dashboard_", "dashboard.", 1);
        mapped.into()
    })
}
