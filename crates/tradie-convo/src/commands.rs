// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contractor reply-code parsing.
//!
//! Contractor commands are handled independently of the conversation state:
//! a registered contractor can always text `A`, `C`, `X`, `Q <amount>`,
//! `INVOICE <amount> [description]`, or `DASHBOARD`.

use crate::onboarding::parse_amount;

/// A parsed contractor command.
#[derive(Debug, Clone, PartialEq)]
pub enum ContractorCommand {
    /// `A`: accept the quoted job.
    Approve,
    /// `C`: ask us to tell the customer to expect a call.
    CallCustomer,
    /// `X`: pass on the quoted job.
    Pass,
    /// `Q <amount>`: propose a custom quote.
    CustomQuote(f64),
    /// `INVOICE <amount> [description…]`: invoice the latest completed job.
    Invoice(f64, Option<String>),
    /// `DASHBOARD`: request a dashboard login link.
    Dashboard,
}

/// Parse an inbound contractor text. `None` means the text is not a command
/// and falls through to normal conversation handling.
pub fn parse(body: &str) -> Option<ContractorCommand> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    let (head, tail) = match trimmed.split_once(char::is_whitespace) {
        Some((head, tail)) => (head.to_uppercase(), Some(tail.trim())),
        None => (trimmed.to_uppercase(), None),
    };

    match (head.as_str(), tail) {
        ("A", None) => Some(ContractorCommand::Approve),
        ("C", None) => Some(ContractorCommand::CallCustomer),
        ("X", None) => Some(ContractorCommand::Pass),
        ("DASHBOARD", None) => Some(ContractorCommand::Dashboard),
        ("Q", Some(amount)) => parse_amount(amount).map(ContractorCommand::CustomQuote),
        ("INVOICE", Some(tail)) => {
            let (amount, description) = match tail.split_once(char::is_whitespace) {
                Some((amount, description)) => (amount, Some(description.trim().to_string())),
                None => (tail, None),
            };
            parse_amount(amount).map(|amt| ContractorCommand::Invoice(amt, description))
        }
        _ => None,
    }
}

/// Legend sent when a contractor's text is not a recognized command.
pub const COMMAND_HELP: &str = "Commands: A accept, C call customer, Q <amount> custom quote, \
     X pass, INVOICE <amount> send invoice, DASHBOARD login link.";
