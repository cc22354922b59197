// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wires storage, scheduler, lifecycle, and the conversation engine into
//! one running stack shared by the `serve` and `shell` commands.

use std::sync::Arc;

use tradie_config::TradieConfig;
use tradie_convo::ConversationEngine;
use tradie_core::TradieError;
use tradie_jobs::JobLifecycle;
use tradie_quote::QuoteStrategy;
use tradie_scheduler::{Scheduler, SystemClock};
use tradie_storage::SqliteStorage;

use crate::local::{HeuristicGenerator, NoopCalendar, StdoutNotifier};

/// The number inbound texts are addressed to in local mode.
pub const SERVICE_NUMBER: &str = "+15550000000";

pub struct Stack {
    pub storage: Arc<SqliteStorage>,
    pub scheduler: Arc<Scheduler>,
    pub engine: ConversationEngine,
}

pub async fn build_stack(config: &TradieConfig) -> Result<Stack, TradieError> {
    let strategy: QuoteStrategy = config
        .quoting
        .strategy
        .parse()
        .map_err(TradieError::Config)?;

    let storage = Arc::new(SqliteStorage::open(&config.storage).await?);
    let notifier = Arc::new(StdoutNotifier);
    let clock = Arc::new(SystemClock);

    let scheduler = Arc::new(Scheduler::new(
        storage.clone(),
        notifier.clone(),
        clock.clone(),
        config.scheduler.clone(),
    )?);
    let lifecycle = Arc::new(JobLifecycle::new(
        storage.clone(),
        notifier,
        Arc::new(NoopCalendar),
        scheduler.clone(),
        clock,
        strategy,
    ));
    let engine = ConversationEngine::new(
        storage.clone(),
        Arc::new(HeuristicGenerator),
        lifecycle,
        strategy,
        config.dashboard.clone(),
    );

    Ok(Stack {
        storage,
        scheduler,
        engine,
    })
}
