// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as known strategy names and positive intervals.

use crate::diagnostic::ConfigError;
use crate::model::TradieConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TradieConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    match config.quoting.strategy.as_str() {
        "simple" | "detailed" => {}
        other => errors.push(ConfigError::Validation {
            message: format!(
                "quoting.strategy must be \"simple\" or \"detailed\", got `{other}`"
            ),
        }),
    }

    if config.scheduler.tick_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "scheduler.tick_interval_secs must be at least 1".to_string(),
        });
    }

    if config.scheduler.idle_reset_days < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "scheduler.idle_reset_days must be at least 1, got {}",
                config.scheduler.idle_reset_days
            ),
        });
    }

    for (name, expr) in [
        ("scheduler.reminder_sweep", &config.scheduler.reminder_sweep),
        ("scheduler.followup_sweep", &config.scheduler.followup_sweep),
        ("scheduler.cleanup_sweep", &config.scheduler.cleanup_sweep),
    ] {
        if expr.split_whitespace().count() != 5 {
            errors.push(ConfigError::Validation {
                message: format!("{name} must be a 5-field cron expression, got `{expr}`"),
            });
        }
    }

    if config.dashboard.session_ttl_minutes < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "dashboard.session_ttl_minutes must be at least 1, got {}",
                config.dashboard.session_ttl_minutes
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&TradieConfig::default()).is_ok());
    }

    #[test]
    fn bad_strategy_is_rejected() {
        let mut config = TradieConfig::default();
        config.quoting.strategy = "cheapest".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("quoting.strategy"));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = TradieConfig::default();
        config.storage.database_path = "  ".to_string();
        config.scheduler.tick_interval_secs = 0;
        config.scheduler.reminder_sweep = "not cron".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
