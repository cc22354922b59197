// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The conversation engine: one inbound text in, at most one reply out.
//!
//! Processing order is fixed: persist the inbound message, check the global
//! `CANCEL` command, route registered contractors to command handling
//! (independent of conversation state), then dispatch on the typed context.
//! Handlers never panic to the transport layer; anything unclassifiable gets
//! a contextual help reply and leaves state unchanged.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

use tradie_config::model::DashboardConfig;
use tradie_core::types::{Contractor, Conversation, Customer, Direction, InboundSms, NewJob, NewMessage};
use tradie_core::{JobStatus, MessageGenerator, Storage, TradieError};
use tradie_jobs::JobLifecycle;
use tradie_quote::{estimate, QuoteRequest, QuoteStrategy};

use crate::commands::{self, ContractorCommand, COMMAND_HELP};
use crate::context::ConversationContext;
use crate::intake::{extract_payload, IntakePayload, INTAKE_SYSTEM_PROMPT};
use crate::onboarding::{
    parse_amount, parse_percent, parse_services_reply, valid_zip, ContractorDraft,
    OnboardingStep, SERVICES_SYSTEM_PROMPT,
};

const RESET_REPLY: &str = "Okay, I've reset our conversation. Text me anytime to start over.";
const DEGRADED_REPLY: &str = "I'm having trouble right now - please try again in a few minutes.";
const CLOSED_JOB_REPLY: &str = "That job is closed. Text me anytime to start a new request.";
const FAILURE_REPLY: &str =
    "Sorry, something went wrong on our end. Please text me again to start over.";

pub struct ConversationEngine {
    storage: Arc<dyn Storage>,
    generator: Arc<dyn MessageGenerator>,
    lifecycle: Arc<JobLifecycle>,
    strategy: QuoteStrategy,
    dashboard: DashboardConfig,
}

impl ConversationEngine {
    pub fn new(
        storage: Arc<dyn Storage>,
        generator: Arc<dyn MessageGenerator>,
        lifecycle: Arc<JobLifecycle>,
        strategy: QuoteStrategy,
        dashboard: DashboardConfig,
    ) -> Self {
        Self {
            storage,
            generator,
            lifecycle,
            strategy,
            dashboard,
        }
    }

    /// Process one inbound text and return the reply, if any.
    ///
    /// The inbound message, the reply, and the conversation row are all
    /// persisted before this returns.
    pub async fn handle_inbound(&self, sms: &InboundSms) -> Result<Option<String>, TradieError> {
        let mut conversation = self.storage.get_or_create_conversation(&sms.from).await?;
        self.storage
            .insert_message(&NewMessage {
                conversation_id: conversation.id,
                from_phone: sms.from.clone(),
                to_phone: sms.to.clone(),
                body: sms.body.clone(),
                direction: Direction::Inbound,
                transport_message_id: sms.transport_message_id.clone(),
            })
            .await?;

        let body = sms.body.trim();

        // A failure mid-dispatch aborts the operation, replies generically,
        // and resets the conversation rather than killing the transport.
        let (next, reply) = match self.dispatch(&mut conversation, sms, body).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(%err, phone = %sms.from, "inbound dispatch failed, resetting");
                (ConversationContext::Idle, Some(FAILURE_REPLY.to_string()))
            }
        };

        conversation.state = next.state();
        conversation.job_id = match &next {
            ConversationContext::AwaitingQuoteApproval { job_id, .. }
            | ConversationContext::AwaitingContractorResponse { job_id, .. }
            | ConversationContext::JobScheduled { job_id } => Some(*job_id),
            _ => None,
        };
        conversation.context = next.to_json();
        conversation.updated_at = Utc::now();
        self.storage.update_conversation(&conversation).await?;

        if let Some(text) = &reply {
            self.storage
                .insert_message(&NewMessage {
                    conversation_id: conversation.id,
                    from_phone: sms.to.clone(),
                    to_phone: sms.from.clone(),
                    body: text.clone(),
                    direction: Direction::Outbound,
                    transport_message_id: None,
                })
                .await?;
        }
        Ok(reply)
    }

    async fn dispatch(
        &self,
        conversation: &mut Conversation,
        sms: &InboundSms,
        body: &str,
    ) -> Result<(ConversationContext, Option<String>), TradieError> {
        if body.eq_ignore_ascii_case("cancel") {
            return Ok((ConversationContext::Idle, Some(RESET_REPLY.to_string())));
        }
        if let Some(contractor) = self.storage.contractor_by_phone(&sms.from).await? {
            conversation.contractor_id = Some(contractor.id);
            return self.handle_contractor(&contractor, body).await;
        }
        let context = ConversationContext::load(&conversation.context);
        self.handle_customer(conversation, context, sms, body).await
    }

    /// Contractor texts are command-driven and state-free.
    async fn handle_contractor(
        &self,
        contractor: &Contractor,
        body: &str,
    ) -> Result<(ConversationContext, Option<String>), TradieError> {
        let Some(command) = commands::parse(body) else {
            let reply = if body.to_uppercase().contains("SETUP") {
                format!("You're already set up, {}. {COMMAND_HELP}", contractor.business_name)
            } else {
                COMMAND_HELP.to_string()
            };
            return Ok((ConversationContext::Idle, Some(reply)));
        };

        let reply = match command {
            ContractorCommand::Dashboard => {
                let token = Uuid::new_v4().to_string();
                let ttl = self.dashboard.session_ttl_minutes;
                let expires_at = Utc::now() + Duration::minutes(ttl);
                self.storage
                    .create_dashboard_session(contractor.id, &token, expires_at)
                    .await?;
                format!(
                    "{}?token={token} (link valid for {ttl} minutes)",
                    self.dashboard.login_url
                )
            }
            ContractorCommand::Approve => match self.latest_quoted(contractor.id).await? {
                Some(mut job) => {
                    self.lifecycle.approve(&mut job, None).await?;
                    "Approved. The customer has your contact info and we'll confirm a time."
                        .to_string()
                }
                None => no_quoted_job_reply(),
            },
            ContractorCommand::CallCustomer => match self.latest_quoted(contractor.id).await? {
                Some(job) => {
                    self.lifecycle.request_call(&job).await?;
                    "Got it. We've told the customer to expect your call.".to_string()
                }
                None => no_quoted_job_reply(),
            },
            ContractorCommand::CustomQuote(amount) => {
                match self.latest_quoted(contractor.id).await? {
                    Some(mut job) => {
                        self.lifecycle.custom_quote(&mut job, amount).await?;
                        format!("Sent your quote of ${amount:.2} to the customer.")
                    }
                    None => no_quoted_job_reply(),
                }
            }
            ContractorCommand::Pass => match self.latest_quoted(contractor.id).await? {
                Some(mut job) => {
                    self.lifecycle.pass(&mut job, contractor).await?;
                    "No problem. We'll look for another contractor.".to_string()
                }
                None => no_quoted_job_reply(),
            },
            ContractorCommand::Invoice(amount, description) => {
                let job = self
                    .storage
                    .latest_job_for_contractor(contractor.id, &[JobStatus::Completed])
                    .await?;
                match job {
                    Some(mut job) => {
                        self.lifecycle
                            .send_invoice(&mut job, amount, description.as_deref())
                            .await?;
                        "Invoice sent to the customer.".to_string()
                    }
                    None => "You have no completed job to invoice.".to_string(),
                }
            }
        };
        Ok((ConversationContext::Idle, Some(reply)))
    }

    async fn handle_customer(
        &self,
        conversation: &mut Conversation,
        context: ConversationContext,
        sms: &InboundSms,
        body: &str,
    ) -> Result<(ConversationContext, Option<String>), TradieError> {
        match context {
            ConversationContext::Idle => {
                if body.to_uppercase().contains("SETUP") {
                    let step = OnboardingStep::BusinessName;
                    return Ok((
                        ConversationContext::ContractorOnboarding {
                            step,
                            draft: ContractorDraft::default(),
                        },
                        Some(format!("Welcome! Let's get you set up. {}", step.prompt())),
                    ));
                }
                let customer = self.storage.get_or_create_customer(&sms.from).await?;
                conversation.customer_id = Some(customer.id);

                if let Some(reply) = self.try_record_rating(&customer, body).await? {
                    return Ok((ConversationContext::Idle, Some(reply)));
                }
                self.intake_step(conversation, &customer, body).await
            }
            ConversationContext::ContractorOnboarding { step, draft } => {
                self.onboarding_step(step, draft, &sms.from, body).await
            }
            ConversationContext::CustomerIntake => {
                let customer = self.storage.get_or_create_customer(&sms.from).await?;
                conversation.customer_id = Some(customer.id);
                self.intake_step(conversation, &customer, body).await
            }
            ConversationContext::AwaitingQuoteApproval { job_id, contractor_id } => {
                self.quote_approval_step(job_id, contractor_id, body).await
            }
            ConversationContext::AwaitingContractorResponse { job_id, contractor_id } => {
                match self.storage.job_by_id(job_id).await? {
                    Some(job) if !job.status.is_terminal() => Ok((
                        ConversationContext::AwaitingContractorResponse { job_id, contractor_id },
                        Some(
                            "Your contractor is reviewing the job - I'll update you as soon \
                             as they respond."
                                .to_string(),
                        ),
                    )),
                    _ => Ok((ConversationContext::Idle, Some(CLOSED_JOB_REPLY.to_string()))),
                }
            }
            ConversationContext::JobScheduled { job_id } => {
                match self.storage.job_by_id(job_id).await? {
                    Some(job) if !job.status.is_terminal() => Ok((
                        ConversationContext::JobScheduled { job_id },
                        Some(
                            "You're all set - I'll send reminders before the visit.".to_string(),
                        ),
                    )),
                    _ => Ok((ConversationContext::Idle, Some(CLOSED_JOB_REPLY.to_string()))),
                }
            }
        }
    }

    /// A leading 1-5 from a customer rates their latest completed job; any
    /// trailing text is stored as feedback.
    async fn try_record_rating(
        &self,
        customer: &Customer,
        body: &str,
    ) -> Result<Option<String>, TradieError> {
        let (first, feedback) = match body.split_once(char::is_whitespace) {
            Some((first, rest)) => (first, Some(rest.trim()).filter(|r| !r.is_empty())),
            None => (body, None),
        };
        let Ok(rating) = first.parse::<u8>() else {
            return Ok(None);
        };
        if !(1..=5).contains(&rating) {
            return Ok(None);
        }
        let job = self
            .storage
            .latest_job_for_customer(customer.id, &[JobStatus::Completed])
            .await?;
        match job {
            Some(mut job) if job.rating.is_none() => {
                self.lifecycle.record_rating(&mut job, rating, feedback).await?;
                info!(job_id = job.id, rating, "rating recorded");
                Ok(Some("Thanks for the feedback!".to_string()))
            }
            _ => Ok(None),
        }
    }

    /// One step of the onboarding sequence. Validation failures re-prompt
    /// without advancing.
    async fn onboarding_step(
        &self,
        step: OnboardingStep,
        mut draft: ContractorDraft,
        phone: &str,
        body: &str,
    ) -> Result<(ConversationContext, Option<String>), TradieError> {
        if body.is_empty() {
            return Ok((
                ConversationContext::ContractorOnboarding { step, draft },
                Some(step.reprompt().to_string()),
            ));
        }

        match step {
            OnboardingStep::BusinessName => draft.business_name = Some(body.to_string()),
            OnboardingStep::Trade => draft.trade = Some(body.to_lowercase()),
            OnboardingStep::ZipCode => {
                if !valid_zip(body) {
                    return Ok((
                        ConversationContext::ContractorOnboarding { step, draft },
                        Some(step.reprompt().to_string()),
                    ));
                }
                draft.zip_code = Some(body.trim().to_string());
            }
            OnboardingStep::Services => {
                // Generator parse with raw-text fallback; a generator outage
                // must not stall onboarding.
                let services = match self.generator.reply(SERVICES_SYSTEM_PROMPT, &[], body).await
                {
                    Ok(reply) => parse_services_reply(&reply),
                    Err(err) => {
                        warn!(%err, "service list parse failed, keeping raw text");
                        None
                    }
                };
                draft.services = Some(services.unwrap_or_else(|| vec![body.to_lowercase()]));
            }
            OnboardingStep::BaseFee => match parse_amount(body) {
                Some(fee) => draft.base_fee = Some(fee),
                None => {
                    return Ok((
                        ConversationContext::ContractorOnboarding { step, draft },
                        Some(step.reprompt().to_string()),
                    ));
                }
            },
            OnboardingStep::HourlyRate => match parse_amount(body) {
                Some(rate) => draft.hourly_rate = Some(rate),
                None => {
                    return Ok((
                        ConversationContext::ContractorOnboarding { step, draft },
                        Some(step.reprompt().to_string()),
                    ));
                }
            },
            OnboardingStep::EmergencyMarkup => match parse_percent(body) {
                Some(markup) => draft.emergency_markup = Some(markup),
                None => {
                    return Ok((
                        ConversationContext::ContractorOnboarding { step, draft },
                        Some(step.reprompt().to_string()),
                    ));
                }
            },
            OnboardingStep::Availability => draft.availability = Some(body.to_string()),
        }

        match step.next() {
            Some(next) => Ok((
                ConversationContext::ContractorOnboarding { step: next, draft },
                Some(next.prompt().to_string()),
            )),
            None => match draft.build(phone) {
                Some(new) => {
                    let contractor = self.storage.create_contractor(&new).await?;
                    info!(contractor_id = contractor.id, "contractor onboarded");
                    Ok((
                        ConversationContext::Idle,
                        Some(format!(
                            "You're all set, {}! We'll text you when a job matches your \
                             services. {COMMAND_HELP}",
                            contractor.business_name
                        )),
                    ))
                }
                // A hole in the draft at the last step means the stored
                // context was damaged; restart rather than guess.
                None => Ok((
                    ConversationContext::Idle,
                    Some("Something went wrong with your setup. Text SETUP to restart.".to_string()),
                )),
            },
        }
    }

    /// Drive the intake dialogue; a completed payload quotes inline.
    async fn intake_step(
        &self,
        conversation: &mut Conversation,
        customer: &Customer,
        body: &str,
    ) -> Result<(ConversationContext, Option<String>), TradieError> {
        let transcript = self
            .storage
            .messages_for_conversation(conversation.id, Some(20))
            .await?;
        let reply = match self
            .generator
            .reply(INTAKE_SYSTEM_PROMPT, &transcript, body)
            .await
        {
            Ok(reply) => reply,
            Err(err) => {
                // The generator is essential here; degrade without moving state.
                warn!(%err, "message generator unavailable");
                return Ok((
                    ConversationContext::CustomerIntake,
                    Some(DEGRADED_REPLY.to_string()),
                ));
            }
        };

        match extract_payload(&reply) {
            Some(payload) => self.quote_path(customer, payload).await,
            None => Ok((ConversationContext::CustomerIntake, Some(reply))),
        }
    }

    /// Create a pending job with an estimate and ask the customer to approve.
    async fn quote_path(
        &self,
        customer: &Customer,
        payload: IntakePayload,
    ) -> Result<(ConversationContext, Option<String>), TradieError> {
        let contractors = self.storage.active_contractors().await?;
        let Some(contractor) = contractors.first() else {
            return Ok((
                ConversationContext::Idle,
                Some(
                    "Sorry - no contractors are available right now. Please try again later."
                        .to_string(),
                ),
            ));
        };

        if let Some(zip) = &payload.zip {
            if customer.zip_code.as_deref() != Some(zip) {
                let mut updated = customer.clone();
                updated.zip_code = Some(zip.clone());
                self.storage.update_customer(&updated).await?;
            }
        }
        let zip_code = payload
            .zip
            .clone()
            .or_else(|| customer.zip_code.clone())
            .unwrap_or_else(|| contractor.zip_code.clone());

        let description = match &payload.details {
            Some(details) => format!("{} ({details})", payload.problem),
            None => payload.problem.clone(),
        };
        let quote = estimate(
            self.strategy,
            &QuoteRequest {
                description: &description,
                category: &payload.category,
                urgency: payload.urgency,
                scheduled: None,
            },
            contractor,
        );

        let job = self
            .storage
            .create_job(&NewJob {
                customer_id: customer.id,
                contractor_id: None,
                description,
                category: payload.category.clone(),
                urgency: payload.urgency,
                address: customer.address.clone(),
                zip_code,
                estimate_min: quote.min,
                estimate_max: quote.max,
            })
            .await?;
        info!(job_id = job.id, category = %job.category, "job created from intake");

        Ok((
            ConversationContext::AwaitingQuoteApproval {
                job_id: job.id,
                contractor_id: contractor.id,
            },
            Some(format!(
                "Here's your estimate from {}: ${:.2}-${:.2} for {}. Reply YES to send them \
                 the job, or NO to cancel.",
                contractor.business_name, quote.min, quote.max, payload.problem
            )),
        ))
    }

    /// YES assigns the contractor and sends the quote; NO cancels.
    async fn quote_approval_step(
        &self,
        job_id: i64,
        contractor_id: i64,
        body: &str,
    ) -> Result<(ConversationContext, Option<String>), TradieError> {
        let job = self.storage.job_by_id(job_id).await?;
        let Some(mut job) = job.filter(|j| !j.status.is_terminal()) else {
            return Ok((ConversationContext::Idle, Some(CLOSED_JOB_REPLY.to_string())));
        };
        let Some(contractor) = self.storage.contractor_by_id(contractor_id).await? else {
            // Contractor row vanished between quote and approval.
            warn!(job_id, contractor_id, "contractor missing at approval");
            return Ok((
                ConversationContext::Idle,
                Some("Something went wrong with that quote. Text me to start over.".to_string()),
            ));
        };

        match body.to_uppercase().as_str() {
            "YES" | "Y" => {
                self.lifecycle.send_quote(&mut job, &contractor).await?;
                Ok((
                    ConversationContext::AwaitingContractorResponse {
                        job_id,
                        contractor_id,
                    },
                    Some(format!(
                        "Great - I've sent your job to {}. I'll text you as soon as they \
                         respond.",
                        contractor.business_name
                    )),
                ))
            }
            "NO" | "N" => {
                self.lifecycle.cancel(&mut job).await?;
                Ok((
                    ConversationContext::Idle,
                    Some("No problem - I've cancelled the request.".to_string()),
                ))
            }
            _ => Ok((
                ConversationContext::AwaitingQuoteApproval { job_id, contractor_id },
                Some(format!(
                    "Reply YES to send this job to {}, or NO to cancel.",
                    contractor.business_name
                )),
            )),
        }
    }

    async fn latest_quoted(
        &self,
        contractor_id: i64,
    ) -> Result<Option<tradie_core::types::Job>, TradieError> {
        self.storage
            .latest_job_for_contractor(contractor_id, &[JobStatus::Quoted])
            .await
    }
}

fn no_quoted_job_reply() -> String {
    "No quoted job is waiting on you right now.".to_string()
}
