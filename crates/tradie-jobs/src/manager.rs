// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Job lifecycle manager.
//!
//! Every status change flows through [`JobLifecycle::apply`], which validates
//! the edge against the transition graph before any mutation. Side effects
//! (notifications, calendar events, timer registration) run after the status
//! write is durable; their failures are logged, never rolled back. The same
//! methods serve the conversation path and the administrative path.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::{info, warn};

use tradie_core::types::{Contractor, Customer, Job};
use tradie_core::{Calendar, JobStatus, Notifier, Storage, TradieError};
use tradie_quote::{estimate, QuoteRequest, QuoteStrategy};
use tradie_scheduler::{Clock, Scheduler};

use crate::transitions;

/// Reply-code legend appended to every contractor quote notification.
const REPLY_LEGEND: &str =
    "Reply A to accept, C to request a call, Q <amount> for a custom quote, X to pass.";

pub struct JobLifecycle {
    storage: Arc<dyn Storage>,
    notifier: Arc<dyn Notifier>,
    calendar: Arc<dyn Calendar>,
    scheduler: Arc<Scheduler>,
    clock: Arc<dyn Clock>,
    strategy: QuoteStrategy,
}

impl JobLifecycle {
    pub fn new(
        storage: Arc<dyn Storage>,
        notifier: Arc<dyn Notifier>,
        calendar: Arc<dyn Calendar>,
        scheduler: Arc<Scheduler>,
        clock: Arc<dyn Clock>,
        strategy: QuoteStrategy,
    ) -> Self {
        Self {
            storage,
            notifier,
            calendar,
            scheduler,
            clock,
            strategy,
        }
    }

    /// Assign a contractor and move the job to `quoted`, notifying the
    /// contractor with the problem summary and reply-code legend.
    pub async fn send_quote(&self, job: &mut Job, contractor: &Contractor) -> Result<(), TradieError> {
        job.contractor_id = Some(contractor.id);
        self.apply(job, JobStatus::Quoted).await?;
        self.notify(&contractor.phone, &quote_notification(job)).await;
        Ok(())
    }

    /// Contractor accepted: move to `approved` and tell the customer who is
    /// coming. A supplied schedule also moves the job straight to `scheduled`.
    pub async fn approve(
        &self,
        job: &mut Job,
        schedule: Option<(NaiveDate, Option<NaiveTime>)>,
    ) -> Result<(), TradieError> {
        self.apply(job, JobStatus::Approved).await?;
        if let Some(contractor) = self.contractor_of(job).await {
            if let Some(customer) = self.customer_of(job).await {
                self.notify(
                    &customer.phone,
                    &format!(
                        "{} accepted your {} job. You can reach them at {}.",
                        contractor.business_name, job.category, contractor.phone
                    ),
                )
                .await;
            }
        }
        if let Some((date, time)) = schedule {
            self.schedule(job, date, time).await?;
        }
        Ok(())
    }

    /// Confirm a date/time: notify both parties, attempt a calendar event,
    /// and (re-)register the day-before and day-of reminders.
    pub async fn schedule(
        &self,
        job: &mut Job,
        date: NaiveDate,
        time: Option<NaiveTime>,
    ) -> Result<(), TradieError> {
        job.scheduled_date = Some(date);
        job.scheduled_time = time;
        self.apply(job, JobStatus::Scheduled).await?;

        let when = fmt_schedule(date, time);
        if let (Some(contractor), Some(customer)) =
            (self.contractor_of(job).await, self.customer_of(job).await)
        {
            self.notify(
                &customer.phone,
                &format!("Confirmed: {} on {when}.", contractor.business_name),
            )
            .await;
            self.notify(
                &contractor.phone,
                &format!(
                    "Confirmed: job #{} on {when} at {}.",
                    job.id,
                    job.address.as_deref().unwrap_or(&job.zip_code)
                ),
            )
            .await;

            // Best-effort; a contractor without a linked calendar is not an error.
            match self.calendar.create_event(&contractor, job, &customer).await {
                Ok(Some(event_ref)) => info!(job_id = job.id, event_ref, "calendar event created"),
                Ok(None) => {}
                Err(err) => warn!(job_id = job.id, %err, "calendar event failed"),
            }
        }

        self.scheduler.schedule_job_reminders(job);
        Ok(())
    }

    /// Contractor is on the way.
    pub async fn start_work(&self, job: &mut Job) -> Result<(), TradieError> {
        self.apply(job, JobStatus::InProgress).await?;
        if let (Some(contractor), Some(customer)) =
            (self.contractor_of(job).await, self.customer_of(job).await)
        {
            self.notify(
                &customer.phone,
                &format!("{} is on the way.", contractor.business_name),
            )
            .await;
        }
        Ok(())
    }

    /// Stamp completion, ask the contractor for an invoice, and register the
    /// follow-up timer. Outstanding reminder timers are cancelled.
    pub async fn complete(&self, job: &mut Job) -> Result<(), TradieError> {
        job.completed_at = Some(self.clock.now());
        self.apply(job, JobStatus::Completed).await?;

        if let Some(contractor) = self.contractor_of(job).await {
            self.notify(
                &contractor.phone,
                &format!(
                    "Job #{} marked complete. Reply INVOICE to send the invoice.",
                    job.id
                ),
            )
            .await;
        }

        self.scheduler.cancel_job_timers(job.id);
        self.scheduler.schedule_followup(job);
        Ok(())
    }

    /// Cancel the job and every pending timer, notifying the customer.
    pub async fn cancel(&self, job: &mut Job) -> Result<(), TradieError> {
        self.apply(job, JobStatus::Cancelled).await?;
        self.scheduler.cancel_job_timers(job.id);
        if let Some(customer) = self.customer_of(job).await {
            self.notify(
                &customer.phone,
                &format!("Your {} job has been cancelled.", job.category),
            )
            .await;
        }
        Ok(())
    }

    /// Contractor passed: re-rank the remaining active contractors in the
    /// job's postal code and either reassign with a freshly computed quote or
    /// mark the job exhausted. The customer gets exactly one message either way.
    pub async fn pass(&self, job: &mut Job, passed: &Contractor) -> Result<(), TradieError> {
        self.apply(job, JobStatus::ContractorPassed).await?;

        let candidates: Vec<Contractor> = self
            .storage
            .active_contractors_in_zip(&job.zip_code)
            .await?
            .into_iter()
            .filter(|c| c.id != passed.id)
            .collect();

        let request = QuoteRequest {
            description: &job.description,
            category: &job.category,
            urgency: job.urgency,
            scheduled: job
                .scheduled_date
                .zip(job.scheduled_time)
                .map(|(d, t)| d.and_time(t)),
        };

        let Some(best) = tradie_quote::find_best_contractor(&request, &candidates, self.strategy)
        else {
            self.apply(job, JobStatus::NoContractorsAvailable).await?;
            if let Some(customer) = self.customer_of(job).await {
                self.notify(
                    &customer.phone,
                    &format!(
                        "Unfortunately {} is unavailable, and no other contractors \
                         are available in your area right now.",
                        passed.business_name
                    ),
                )
                .await;
            }
            return Ok(());
        };

        let quote = estimate(self.strategy, &request, best);
        job.estimate_min = quote.min;
        job.estimate_max = quote.max;
        job.contractor_id = Some(best.id);
        let best = best.clone();
        self.apply(job, JobStatus::Quoted).await?;
        info!(job_id = job.id, contractor_id = best.id, "job reassigned");

        self.notify(&best.phone, &quote_notification(job)).await;
        if let Some(customer) = self.customer_of(job).await {
            self.notify(
                &customer.phone,
                &format!(
                    "{} is unavailable, so we've sent your job to {}.",
                    passed.business_name, best.business_name
                ),
            )
            .await;
        }
        Ok(())
    }

    /// Contractor proposed a custom amount; the job stays `quoted`.
    pub async fn custom_quote(&self, job: &mut Job, amount: f64) -> Result<(), TradieError> {
        if job.status != JobStatus::Quoted {
            return Err(TradieError::InvalidTransition {
                from: job.status,
                action: "custom_quote".into(),
            });
        }
        job.final_quote = Some(amount);
        self.storage.update_job(job).await?;
        if let (Some(contractor), Some(customer)) =
            (self.contractor_of(job).await, self.customer_of(job).await)
        {
            self.notify(
                &customer.phone,
                &format!(
                    "{} quoted {} for your {} job.",
                    contractor.business_name,
                    fmt_money(amount),
                    job.category
                ),
            )
            .await;
        }
        Ok(())
    }

    /// Contractor will call; no status change.
    pub async fn request_call(&self, job: &Job) -> Result<(), TradieError> {
        if let (Some(contractor), Some(customer)) =
            (self.contractor_of(job).await, self.customer_of(job).await)
        {
            self.notify(
                &customer.phone,
                &format!("{} will call you shortly.", contractor.business_name),
            )
            .await;
        }
        Ok(())
    }

    /// Send the invoice for a completed job and mark it sent. A description,
    /// when given, lands in the job notes.
    pub async fn send_invoice(
        &self,
        job: &mut Job,
        amount: f64,
        description: Option<&str>,
    ) -> Result<(), TradieError> {
        if job.status != JobStatus::Completed {
            return Err(TradieError::InvalidTransition {
                from: job.status,
                action: "invoice".into(),
            });
        }
        job.final_quote = Some(amount);
        job.invoice_sent = true;
        if let Some(description) = description {
            job.notes = Some(description.to_string());
        }
        self.storage.update_job(job).await?;
        if let (Some(contractor), Some(customer)) =
            (self.contractor_of(job).await, self.customer_of(job).await)
        {
            self.notify(
                &customer.phone,
                &format!(
                    "Invoice from {}: {} for your {} job.",
                    contractor.business_name,
                    fmt_money(amount),
                    job.category
                ),
            )
            .await;
        }
        Ok(())
    }

    /// Store a 1-5 rating, with optional free-text feedback.
    pub async fn record_rating(
        &self,
        job: &mut Job,
        rating: u8,
        feedback: Option<&str>,
    ) -> Result<(), TradieError> {
        if !(1..=5).contains(&rating) {
            return Err(TradieError::Internal(format!("rating out of range: {rating}")));
        }
        job.rating = Some(rating);
        if let Some(feedback) = feedback {
            job.feedback = Some(feedback.to_string());
        }
        self.storage.update_job(job).await
    }

    /// Administrative override: set any status directly, skipping graph
    /// validation and side effects. Logged loudly; dashboard-only.
    pub async fn force_status(&self, job: &mut Job, status: JobStatus) -> Result<(), TradieError> {
        warn!(job_id = job.id, from = %job.status, to = %status, "forced status override");
        job.status = status;
        self.storage.update_job(job).await
    }

    /// Validate the edge, then persist the new status. Rejected transitions
    /// leave the job untouched.
    async fn apply(&self, job: &mut Job, to: JobStatus) -> Result<(), TradieError> {
        if !transitions::can_transition(job.status, to) {
            return Err(TradieError::InvalidTransition {
                from: job.status,
                action: to.to_string(),
            });
        }
        let from = job.status;
        job.status = to;
        self.storage.update_job(job).await?;
        info!(job_id = job.id, %from, %to, "job transitioned");
        Ok(())
    }

    async fn contractor_of(&self, job: &Job) -> Option<Contractor> {
        let contractor = match job.contractor_id {
            Some(id) => self.storage.contractor_by_id(id).await.ok().flatten(),
            None => None,
        };
        if contractor.is_none() {
            warn!(job_id = job.id, "contractor missing, notification skipped");
        }
        contractor
    }

    async fn customer_of(&self, job: &Job) -> Option<Customer> {
        let customer = self
            .storage
            .customer_by_id(job.customer_id)
            .await
            .ok()
            .flatten();
        if customer.is_none() {
            warn!(job_id = job.id, "customer missing, notification skipped");
        }
        customer
    }

    async fn notify(&self, to_phone: &str, body: &str) {
        if let Err(err) = self.notifier.send(to_phone, body).await {
            warn!(to = to_phone, %err, "notification failed");
        }
    }
}

fn quote_notification(job: &Job) -> String {
    format!(
        "New job: {} in {}. Urgency: {}. Estimate: {}-{}. {}",
        job.description,
        job.zip_code,
        job.urgency,
        fmt_money(job.estimate_min),
        fmt_money(job.estimate_max),
        REPLY_LEGEND
    )
}

fn fmt_money(amount: f64) -> String {
    format!("${amount:.2}")
}

fn fmt_schedule(date: NaiveDate, time: Option<NaiveTime>) -> String {
    match time {
        Some(t) => format!("{date} at {}", t.format("%H:%M")),
        None => date.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_formatting_keeps_cents() {
        assert_eq!(fmt_money(187.5), "$187.50");
        assert_eq!(fmt_money(75.0), "$75.00");
    }

    #[test]
    fn schedule_formatting_with_and_without_time() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 2).unwrap();
        assert_eq!(
            fmt_schedule(date, NaiveTime::from_hms_opt(9, 0, 0)),
            "2026-09-02 at 09:00"
        );
        assert_eq!(fmt_schedule(date, None), "2026-09-02");
    }
}
