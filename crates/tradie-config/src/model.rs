// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Tradie dispatch system.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Tradie configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TradieConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Quoting engine settings.
    #[serde(default)]
    pub quoting: QuotingConfig,

    /// Scheduler sweep settings.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Contractor dashboard settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name used in outbound message copy.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "Tradie".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Whether to enable WAL journal mode.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: true,
        }
    }
}

fn default_database_path() -> String {
    "tradie.db".to_string()
}

fn default_true() -> bool {
    true
}

/// Quoting engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QuotingConfig {
    /// Cost model: "detailed" (complexity-classified) or "simple" (flat hour band).
    #[serde(default = "default_strategy")]
    pub strategy: String,
}

impl Default for QuotingConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
        }
    }
}

fn default_strategy() -> String {
    "detailed".to_string()
}

/// Scheduler sweep configuration.
///
/// The per-job one-shot timer offsets (day-before 18:00, day-of minus 2h,
/// follow-up 18:00 next day) are fixed by the reminder contract and are not
/// configurable; only the sweep schedules and tick cadence are.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Seconds between scheduler ticks.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,

    /// Cron expression for the daily reminder sweep.
    #[serde(default = "default_reminder_sweep")]
    pub reminder_sweep: String,

    /// Cron expression for the daily follow-up sweep.
    #[serde(default = "default_followup_sweep")]
    pub followup_sweep: String,

    /// Cron expression for the daily cleanup sweep.
    #[serde(default = "default_cleanup_sweep")]
    pub cleanup_sweep: String,

    /// Days a conversation may sit idle before the cleanup sweep blanks its context.
    #[serde(default = "default_idle_reset_days")]
    pub idle_reset_days: i64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: default_tick_interval(),
            reminder_sweep: default_reminder_sweep(),
            followup_sweep: default_followup_sweep(),
            cleanup_sweep: default_cleanup_sweep(),
            idle_reset_days: default_idle_reset_days(),
        }
    }
}

fn default_tick_interval() -> u64 {
    30
}

fn default_reminder_sweep() -> String {
    "0 9 * * *".to_string()
}

fn default_followup_sweep() -> String {
    "0 10 * * *".to_string()
}

fn default_cleanup_sweep() -> String {
    "0 3 * * *".to_string()
}

fn default_idle_reset_days() -> i64 {
    7
}

/// Contractor dashboard configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    /// Base URL included in the `DASHBOARD` command reply.
    #[serde(default = "default_login_url")]
    pub login_url: String,

    /// Minutes a dashboard login session stays valid.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_minutes: i64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            login_url: default_login_url(),
            session_ttl_minutes: default_session_ttl(),
        }
    }
}

fn default_login_url() -> String {
    "https://dashboard.tradie.example/login".to_string()
}

fn default_session_ttl() -> i64 {
    30
}
