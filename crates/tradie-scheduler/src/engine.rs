// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The scheduler engine: one-shot reminder timers plus three daily sweeps.
//!
//! The engine runs on its own tick loop, independent of inbound-message
//! processing. Timer handlers read job, contractor, and customer state fresh
//! at fire time and no-op when the job has left the expected status, so a
//! reminder firing after a cancellation is silently dropped. Notification
//! failures are logged and never retried.

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, NaiveTime, Utc};
use croner::Cron;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use tradie_config::model::SchedulerConfig;
use tradie_core::types::{Contractor, Customer, Job, JobStatus};
use tradie_core::{Notifier, Storage, TradieError};

use crate::clock::Clock;
use crate::timers::{
    day_before_fire_time, day_of_fire_time, followup_fire_time, TimerPurpose, TimerRegistry,
};

/// Conversation context reset to by the cleanup sweep.
const IDLE_CONTEXT: &str = r#"{"state":"idle"}"#;

/// A periodic sweep with its cron schedule and next computed run.
struct Sweep {
    kind: SweepKind,
    cron: Cron,
    next_run: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SweepKind {
    Reminder,
    FollowUp,
    Cleanup,
}

/// Owns the pending-timer registry and the daily sweeps.
///
/// Registration methods are callable from both the conversation path and the
/// administrative path; the tick loop is started once per process with
/// [`Scheduler::start`] and stopped through the returned token.
pub struct Scheduler {
    storage: Arc<dyn Storage>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    config: SchedulerConfig,
    timers: TimerRegistry,
    sweeps: Mutex<Vec<Sweep>>,
}

impl Scheduler {
    pub fn new(
        storage: Arc<dyn Storage>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        config: SchedulerConfig,
    ) -> Result<Self, TradieError> {
        let now = clock.now();
        let sweeps = vec![
            Sweep::parse(SweepKind::Reminder, &config.reminder_sweep, now)?,
            Sweep::parse(SweepKind::FollowUp, &config.followup_sweep, now)?,
            Sweep::parse(SweepKind::Cleanup, &config.cleanup_sweep, now)?,
        ];
        Ok(Self {
            storage,
            notifier,
            clock,
            config,
            timers: TimerRegistry::new(),
            sweeps: Mutex::new(sweeps),
        })
    }

    /// The pending-timer registry, exposed for transition side effects and
    /// for asserting registration state in tests.
    pub fn timers(&self) -> &TimerRegistry {
        &self.timers
    }

    /// Cancel and re-register both reminder timers for a scheduled job.
    ///
    /// Fire times already in the past are never registered. Returns how many
    /// timers were registered.
    pub fn schedule_job_reminders(&self, job: &Job) -> usize {
        self.timers.cancel(job.id, TimerPurpose::DayBefore);
        self.timers.cancel(job.id, TimerPurpose::DayOf);

        let Some(date) = job.scheduled_date else {
            debug!(job_id = job.id, "no scheduled date, reminders not registered");
            return 0;
        };

        let now = self.clock.now();
        let mut registered = 0;
        for (purpose, fire_at) in [
            (TimerPurpose::DayBefore, day_before_fire_time(date)),
            (TimerPurpose::DayOf, day_of_fire_time(date, job.scheduled_time)),
        ] {
            if fire_at > now {
                self.timers.register(job.id, purpose, fire_at);
                registered += 1;
            } else {
                debug!(job_id = job.id, %purpose, %fire_at, "fire time in the past, skipped");
            }
        }
        info!(job_id = job.id, registered, "job reminders registered");
        registered
    }

    /// Register the post-completion follow-up timer.
    pub fn schedule_followup(&self, job: &Job) {
        let completed_at = job.completed_at.unwrap_or_else(|| self.clock.now());
        let fire_at = followup_fire_time(completed_at);
        if fire_at > self.clock.now() {
            self.timers.register(job.id, TimerPurpose::FollowUp, fire_at);
            info!(job_id = job.id, %fire_at, "follow-up registered");
        }
    }

    /// Cancel every pending timer for a job (cancellation, reschedule).
    pub fn cancel_job_timers(&self, job_id: i64) -> usize {
        let cancelled = self.timers.cancel_job(job_id);
        if cancelled > 0 {
            info!(job_id, cancelled, "pending timers cancelled");
        }
        cancelled
    }

    /// One scheduler pass: run due sweeps, then fire due one-shot timers.
    ///
    /// Sweeps run first so the follow-up sweep still sees pending timers and
    /// can defer to them instead of double-nudging in the same pass.
    pub async fn tick(&self) -> Result<(), TradieError> {
        let now = self.clock.now();

        let due_kinds = {
            let mut sweeps = self.sweeps.lock().expect("sweep state lock poisoned");
            let mut due = Vec::new();
            for sweep in sweeps.iter_mut() {
                if sweep.next_run <= now {
                    due.push(sweep.kind);
                    sweep.next_run = next_occurrence(&sweep.cron, now)?;
                }
            }
            due
        };

        for kind in due_kinds {
            let result = match kind {
                SweepKind::Reminder => self.reminder_sweep(now).await,
                SweepKind::FollowUp => self.followup_sweep(now).await,
                SweepKind::Cleanup => self.cleanup_sweep(now).await,
            };
            if let Err(err) = result {
                error!(?kind, %err, "sweep failed");
            }
        }

        for (job_id, purpose) in self.timers.due(now) {
            if let Err(err) = self.fire_timer(job_id, purpose).await {
                // Per-timer failures are isolated to the job involved.
                error!(job_id, %purpose, %err, "timer handler failed");
            }
        }

        Ok(())
    }

    /// Spawn the tick loop. Cancelling the token stops it.
    pub fn start(self: Arc<Self>) -> CancellationToken {
        let token = CancellationToken::new();
        let loop_token = token.clone();
        let interval = StdDuration::from_secs(self.config.tick_interval_secs);

        tokio::spawn(async move {
            info!(interval_secs = interval.as_secs(), "scheduler started");
            loop {
                tokio::select! {
                    _ = loop_token.cancelled() => {
                        info!("scheduler stopped");
                        break;
                    }
                    _ = tokio::time::sleep(interval) => {
                        if let Err(err) = self.tick().await {
                            error!(%err, "scheduler tick failed");
                        }
                    }
                }
            }
        });

        token
    }

    async fn fire_timer(&self, job_id: i64, purpose: TimerPurpose) -> Result<(), TradieError> {
        // Fresh read: the job may have been rescheduled or cancelled since
        // registration.
        let Some(job) = self.storage.job_by_id(job_id).await? else {
            warn!(job_id, %purpose, "job gone, timer dropped");
            return Ok(());
        };

        let expected = match purpose {
            TimerPurpose::DayBefore | TimerPurpose::DayOf => JobStatus::Scheduled,
            TimerPurpose::FollowUp => JobStatus::Completed,
        };
        if job.status != expected {
            debug!(job_id, %purpose, status = %job.status, "status changed, timer skipped");
            return Ok(());
        }

        match purpose {
            TimerPurpose::DayBefore => self.send_day_before(&job).await,
            TimerPurpose::DayOf => self.send_day_of(&job).await,
            TimerPurpose::FollowUp => self.send_followup(&job).await,
        }
        Ok(())
    }

    async fn send_day_before(&self, job: &Job) {
        let Some((contractor, customer)) = self.job_parties(job).await else {
            return;
        };
        let when = format!(
            "tomorrow ({}) at {}",
            job.scheduled_date.map(|d| d.to_string()).unwrap_or_default(),
            fmt_time(job.scheduled_time),
        );
        self.notify(
            &customer.phone,
            &format!(
                "Reminder: {} is coming {} for your {} job.",
                contractor.business_name, when, job.category
            ),
        )
        .await;
        self.notify(
            &contractor.phone,
            &format!(
                "Reminder: job #{} ({}) is scheduled {} at {}.",
                job.id,
                job.category,
                when,
                job.address.as_deref().unwrap_or(&job.zip_code),
            ),
        )
        .await;
    }

    async fn send_day_of(&self, job: &Job) {
        let Some((contractor, customer)) = self.job_parties(job).await else {
            return;
        };
        let time = fmt_time(job.scheduled_time);
        self.notify(
            &customer.phone,
            &format!(
                "Reminder: {} is scheduled today at {} for your {} job.",
                contractor.business_name, time, job.category
            ),
        )
        .await;
        self.notify(
            &contractor.phone,
            &format!(
                "Today: job #{} ({}) at {}, {}.",
                job.id,
                job.category,
                time,
                job.address.as_deref().unwrap_or(&job.zip_code),
            ),
        )
        .await;
    }

    async fn send_followup(&self, job: &Job) {
        let Some((contractor, customer)) = self.job_parties(job).await else {
            return;
        };
        if job.rating.is_none() {
            self.notify(
                &customer.phone,
                &format!(
                    "How did your {} job with {} go? Reply with a rating from 1 to 5.",
                    job.category, contractor.business_name
                ),
            )
            .await;
        }
        if !job.invoice_sent {
            self.notify(
                &contractor.phone,
                &format!("Job #{} is complete. Reply INVOICE to send the invoice.", job.id),
            )
            .await;
        }
    }

    /// Daily reminder sweep: restore reminder timers for upcoming scheduled
    /// jobs. The registry is in-memory, so this also repairs timers lost to a
    /// process restart.
    async fn reminder_sweep(&self, now: DateTime<Utc>) -> Result<(), TradieError> {
        let today = now.date_naive();
        let mut restored = 0;
        for date in [today, today + Duration::days(1)] {
            for job in self.storage.jobs_scheduled_on(date).await? {
                if job.status != JobStatus::Scheduled {
                    continue;
                }
                let missing = self.timers.fire_time(job.id, TimerPurpose::DayBefore).is_none()
                    && self.timers.fire_time(job.id, TimerPurpose::DayOf).is_none();
                if missing {
                    restored += self.schedule_job_reminders(&job);
                }
            }
        }
        info!(restored, "reminder sweep done");
        Ok(())
    }

    /// Daily follow-up sweep: nudge the parties of yesterday's completed jobs
    /// that still lack a rating or an invoice.
    async fn followup_sweep(&self, now: DateTime<Utc>) -> Result<(), TradieError> {
        let yesterday = now.date_naive() - Duration::days(1);
        let jobs = self.storage.jobs_completed_on(yesterday).await?;
        let mut nudged = 0;
        for job in &jobs {
            if job.rating.is_some() && job.invoice_sent {
                continue;
            }
            // A pending one-shot follow-up will handle this job.
            if self.timers.fire_time(job.id, TimerPurpose::FollowUp).is_some() {
                continue;
            }
            self.send_followup(job).await;
            nudged += 1;
        }
        info!(completed = jobs.len(), nudged, "follow-up sweep done");
        Ok(())
    }

    /// Daily cleanup sweep: purge expired dashboard sessions and blank the
    /// context of conversations sitting idle past the configured horizon.
    async fn cleanup_sweep(&self, now: DateTime<Utc>) -> Result<(), TradieError> {
        let purged = self.storage.purge_expired_dashboard_sessions(now).await?;

        let cutoff = now - Duration::days(self.config.idle_reset_days);
        let stale = self.storage.idle_conversations_since(cutoff).await?;
        let reset = stale.len();
        for mut conversation in stale {
            conversation.context = IDLE_CONTEXT.to_string();
            conversation.job_id = None;
            self.storage.update_conversation(&conversation).await?;
        }

        info!(purged, reset, "cleanup sweep done");
        Ok(())
    }

    /// Both parties of a job, or `None` (logged) when a link is missing.
    async fn job_parties(&self, job: &Job) -> Option<(Contractor, Customer)> {
        let contractor = match job.contractor_id {
            Some(id) => self.storage.contractor_by_id(id).await.ok().flatten(),
            None => None,
        };
        let Some(contractor) = contractor else {
            warn!(job_id = job.id, "contractor missing, notification skipped");
            return None;
        };
        let customer = self.storage.customer_by_id(job.customer_id).await.ok().flatten();
        let Some(customer) = customer else {
            warn!(job_id = job.id, "customer missing, notification skipped");
            return None;
        };
        Some((contractor, customer))
    }

    async fn notify(&self, to_phone: &str, body: &str) {
        if let Err(err) = self.notifier.send(to_phone, body).await {
            warn!(to = to_phone, %err, "notification failed");
        }
    }
}

impl Sweep {
    fn parse(kind: SweepKind, expr: &str, now: DateTime<Utc>) -> Result<Self, TradieError> {
        let cron: Cron = expr
            .parse()
            .map_err(|err| TradieError::Config(format!("invalid cron '{expr}': {err}")))?;
        let next_run = next_occurrence(&cron, now)?;
        Ok(Self { kind, cron, next_run })
    }
}

fn next_occurrence(cron: &Cron, after: DateTime<Utc>) -> Result<DateTime<Utc>, TradieError> {
    cron.find_next_occurrence(&after, false)
        .map_err(|err| TradieError::Internal(format!("no next cron occurrence: {err}")))
}

fn fmt_time(time: Option<NaiveTime>) -> String {
    match time {
        Some(t) => t.format("%H:%M").to_string(),
        None => "08:00".to_string(),
    }
}
