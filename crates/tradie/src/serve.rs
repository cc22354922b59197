// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tradie serve` command implementation.
//!
//! Runs the scheduler plus a line-based stdin transport: each line is one
//! inbound text in `from|body` form, replies and outbound notifications go
//! to stdout. Ctrl+C or closing stdin shuts the stack down.

use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use tradie_config::TradieConfig;
use tradie_core::types::InboundSms;
use tradie_core::TradieError;

use crate::stack::{build_stack, SERVICE_NUMBER};

pub async fn run_serve(config: TradieConfig) -> Result<(), TradieError> {
    let stack = build_stack(&config).await?;
    let cancel = stack.scheduler.clone().start();

    info!(service = %config.service.name, "serve started");
    println!("{}", "Reading texts from stdin, one per line: from|body".dimmed());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => handle_line(&stack, &line).await,
                    Ok(None) => {
                        info!("stdin closed");
                        break;
                    }
                    Err(err) => {
                        error!(%err, "stdin read failed");
                        break;
                    }
                }
            }
        }
    }

    cancel.cancel();
    stack.storage.close().await?;
    Ok(())
}

async fn handle_line(stack: &crate::stack::Stack, line: &str) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    let Some((from, body)) = line.split_once('|') else {
        eprintln!("{}: expected `from|body`, got {line:?}", "error".red());
        return;
    };
    let sms = InboundSms {
        from: from.trim().to_string(),
        to: SERVICE_NUMBER.to_string(),
        body: body.trim().to_string(),
        transport_message_id: None,
    };
    match stack.engine.handle_inbound(&sms).await {
        Ok(Some(reply)) => {
            println!("{} {reply}", format!("[sms -> {}]", sms.from).dimmed());
        }
        Ok(None) => {}
        Err(err) => match err {
            TradieError::Storage { .. } => error!(%err, "inbound text failed"),
            _ => warn!(%err, "inbound text rejected"),
        },
    }
}
