// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tradie doctor` command implementation.
//!
//! Runs diagnostic checks against the local environment: configuration,
//! database health, quoting strategy, and sweep schedules. With `--deep`,
//! also runs a SQLite integrity check.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use croner::Cron;

use tradie_config::TradieConfig;
use tradie_core::TradieError;
use tradie_quote::QuoteStrategy;
use tradie_storage::SqliteStorage;

#[derive(Debug, Clone, PartialEq, Eq)]
enum CheckStatus {
    Pass,
    Fail,
}

#[derive(Debug, Clone)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    message: String,
    duration: Duration,
}

impl CheckResult {
    fn pass(name: &str, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Pass,
            message: message.into(),
            duration: start.elapsed(),
        }
    }

    fn fail(name: &str, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Fail,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `tradie doctor` command.
///
/// With `--deep`, runs additional intensive checks. With `--plain`,
/// disables colored output.
pub async fn run_doctor(
    config: &TradieConfig,
    deep: bool,
    plain: bool,
) -> Result<(), TradieError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let mut results = Vec::new();

    results.push(check_config());
    results.push(check_database(config).await);
    results.push(check_quoting(config));
    results.push(check_sweeps(config));

    if deep {
        results.push(check_db_integrity(config));
    }

    println!();
    println!("  tradie doctor");
    println!("  {}", "-".repeat(50));

    let mut fail_count = 0;
    for result in &results {
        let duration_ms = result.duration.as_millis();
        let line = match result.status {
            CheckStatus::Pass => {
                if use_color {
                    use colored::Colorize;
                    format!(
                        "    {} {:<20} {} ({duration_ms}ms)",
                        "✓".green(),
                        result.name,
                        result.message
                    )
                } else {
                    format!(
                        "    [OK]   {:<20} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                }
            }
            CheckStatus::Fail => {
                fail_count += 1;
                if use_color {
                    use colored::Colorize;
                    format!(
                        "    {} {:<20} {} ({duration_ms}ms)",
                        "✗".red(),
                        result.name,
                        result.message.red()
                    )
                } else {
                    format!(
                        "    [FAIL] {:<20} {} ({duration_ms}ms)",
                        result.name, result.message
                    )
                }
            }
        };
        println!("{line}");
    }

    println!();
    if fail_count > 0 {
        let word = if fail_count == 1 { "issue" } else { "issues" };
        println!("  {fail_count} {word} found.");
        if !deep {
            println!("  Run with --deep for detailed diagnostics.");
        }
    } else {
        println!("  All checks passed.");
    }
    println!();

    Ok(())
}

fn check_config() -> CheckResult {
    let start = Instant::now();
    match tradie_config::load_and_validate() {
        Ok(_) => CheckResult::pass("Configuration", "valid", start),
        Err(errors) => CheckResult::fail(
            "Configuration",
            format!("{} error(s); run the command again after fixing", errors.len()),
            start,
        ),
    }
}

async fn check_database(config: &TradieConfig) -> CheckResult {
    let start = Instant::now();
    match SqliteStorage::open(&config.storage).await {
        Ok(storage) => {
            let message = format!("open, migrations applied ({})", config.storage.database_path);
            match storage.close().await {
                Ok(()) => CheckResult::pass("Database", message, start),
                Err(e) => CheckResult::fail("Database", format!("close failed: {e}"), start),
            }
        }
        Err(e) => CheckResult::fail("Database", e.to_string(), start),
    }
}

fn check_quoting(config: &TradieConfig) -> CheckResult {
    let start = Instant::now();
    match config.quoting.strategy.parse::<QuoteStrategy>() {
        Ok(strategy) => CheckResult::pass("Quoting", format!("{strategy:?} cost model"), start),
        Err(e) => CheckResult::fail("Quoting", e, start),
    }
}

fn check_sweeps(config: &TradieConfig) -> CheckResult {
    let start = Instant::now();
    let sweeps = [
        ("reminder_sweep", &config.scheduler.reminder_sweep),
        ("followup_sweep", &config.scheduler.followup_sweep),
        ("cleanup_sweep", &config.scheduler.cleanup_sweep),
    ];
    for (name, expr) in sweeps {
        if let Err(e) = expr.parse::<Cron>() {
            return CheckResult::fail("Sweeps", format!("{name} `{expr}`: {e}"), start);
        }
    }
    CheckResult::pass("Sweeps", "3 cron expressions valid", start)
}

fn check_db_integrity(config: &TradieConfig) -> CheckResult {
    let start = Instant::now();
    let result = rusqlite::Connection::open(&config.storage.database_path)
        .and_then(|conn| conn.query_row("PRAGMA integrity_check", [], |row| row.get::<_, String>(0)));
    match result {
        Ok(answer) if answer == "ok" => CheckResult::pass("Integrity", "ok", start),
        Ok(answer) => CheckResult::fail("Integrity", answer, start),
        Err(e) => CheckResult::fail("Integrity", e.to_string(), start),
    }
}
