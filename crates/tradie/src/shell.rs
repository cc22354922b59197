// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tradie shell` command implementation.
//!
//! Interactive REPL simulating inbound texts from a single phone number,
//! with readline history. The scheduler also runs so reminder timers fire
//! while the shell is open.

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;

use tradie_config::TradieConfig;
use tradie_core::types::InboundSms;
use tradie_core::TradieError;

use crate::stack::{build_stack, SERVICE_NUMBER};

pub async fn run_shell(config: TradieConfig, phone: &str) -> Result<(), TradieError> {
    let stack = build_stack(&config).await?;
    let cancel = stack.scheduler.clone().start();

    let mut rl = DefaultEditor::new()
        .map_err(|e| TradieError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "tradie shell".bold().green());
    println!("Texting as {}. Type {} to exit.\n", phone.cyan(), "/quit".yellow());

    let prompt = format!("{}> ", phone.green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                let sms = InboundSms {
                    from: phone.to_string(),
                    to: SERVICE_NUMBER.to_string(),
                    body: trimmed.to_string(),
                    transport_message_id: None,
                };
                match stack.engine.handle_inbound(&sms).await {
                    Ok(Some(reply)) => println!("{} {reply}", "tradie:".cyan()),
                    Ok(None) => {}
                    Err(e) => eprintln!("{}: {e}", "error".red()),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    info!("shell exiting");
    cancel.cancel();
    stack.storage.close().await?;
    Ok(())
}
