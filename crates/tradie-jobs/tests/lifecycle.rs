// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle transitions end to end: real SQLite store, recording notifier,
//! manual clock.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tempfile::TempDir;

use tradie_config::model::{SchedulerConfig, StorageConfig};
use tradie_core::types::Job;
use tradie_core::{JobStatus, Storage, TradieError};
use tradie_jobs::JobLifecycle;
use tradie_quote::QuoteStrategy;
use tradie_scheduler::{Scheduler, TimerPurpose};
use tradie_storage::SqliteStorage;
use tradie_test_utils::{contractor_fixture, job_fixture, ManualClock, MockCalendar, MockNotifier};

const CONTRACTOR_PHONE: &str = "+15550001111";
const CUSTOMER_PHONE: &str = "+15552223333";

struct Harness {
    _dir: TempDir,
    storage: Arc<SqliteStorage>,
    notifier: Arc<MockNotifier>,
    calendar: Arc<MockCalendar>,
    scheduler: Arc<Scheduler>,
    lifecycle: JobLifecycle,
}

async fn harness() -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig {
        database_path: dir.path().join("test.db").to_str().unwrap().to_string(),
        wal_mode: false,
    };
    let storage = Arc::new(SqliteStorage::open(&config).await.unwrap());
    let notifier = Arc::new(MockNotifier::new());
    let calendar = Arc::new(MockCalendar::with_event_ref("evt-1"));
    let clock = Arc::new(ManualClock::at(2026, 9, 1, 12, 0));
    let scheduler = Arc::new(
        Scheduler::new(
            storage.clone(),
            notifier.clone(),
            clock.clone(),
            SchedulerConfig::default(),
        )
        .unwrap(),
    );
    let lifecycle = JobLifecycle::new(
        storage.clone(),
        notifier.clone(),
        calendar.clone(),
        scheduler.clone(),
        clock,
        QuoteStrategy::Detailed,
    );
    Harness {
        _dir: dir,
        storage,
        notifier,
        calendar,
        scheduler,
        lifecycle,
    }
}

async fn quoted_job(h: &Harness) -> Job {
    let contractor = h
        .storage
        .create_contractor(&contractor_fixture(CONTRACTOR_PHONE, "Ace Plumbing"))
        .await
        .unwrap();
    let customer = h.storage.get_or_create_customer(CUSTOMER_PHONE).await.unwrap();
    let mut job = h.storage.create_job(&job_fixture(customer.id)).await.unwrap();
    h.lifecycle.send_quote(&mut job, &contractor).await.unwrap();
    job
}

#[tokio::test]
async fn send_quote_assigns_contractor_and_sends_legend() {
    let h = harness().await;
    let job = quoted_job(&h).await;

    assert_eq!(job.status, JobStatus::Quoted);
    let msgs = h.notifier.sent_to(CONTRACTOR_PHONE);
    assert_eq!(msgs.len(), 1);
    assert!(msgs[0].contains("Reply A to accept"));
    assert!(msgs[0].contains("90210"));
}

#[tokio::test]
async fn approve_notifies_customer_once_with_business_name() {
    let h = harness().await;
    let mut job = quoted_job(&h).await;
    h.notifier.clear();

    h.lifecycle.approve(&mut job, None).await.unwrap();

    assert_eq!(job.status, JobStatus::Approved);
    let msgs = h.notifier.sent_to(CUSTOMER_PHONE);
    assert_eq!(msgs.len(), 1);
    assert!(msgs[0].contains("Ace Plumbing"));
}

#[tokio::test]
async fn approve_with_schedule_lands_on_scheduled_with_reminders_and_calendar() {
    let h = harness().await;
    let mut job = quoted_job(&h).await;

    let date = NaiveDate::from_ymd_opt(2026, 9, 2).unwrap();
    let time = NaiveTime::from_hms_opt(9, 0, 0);
    h.lifecycle.approve(&mut job, Some((date, time))).await.unwrap();

    assert_eq!(job.status, JobStatus::Scheduled);
    let stored = h.storage.job_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(stored.scheduled_date, Some(date));
    assert_eq!(h.calendar.calls(), vec![job.id]);
    assert!(h
        .scheduler
        .timers()
        .fire_time(job.id, TimerPurpose::DayBefore)
        .is_some());
    assert!(h
        .scheduler
        .timers()
        .fire_time(job.id, TimerPurpose::DayOf)
        .is_some());
}

#[tokio::test]
async fn invalid_transition_is_rejected_without_mutation() {
    let h = harness().await;
    let mut job = quoted_job(&h).await;

    let err = h.lifecycle.start_work(&mut job).await.unwrap_err();
    assert!(matches!(err, TradieError::InvalidTransition { .. }));
    assert_eq!(job.status, JobStatus::Quoted);
    assert_eq!(
        h.storage.job_by_id(job.id).await.unwrap().unwrap().status,
        JobStatus::Quoted
    );
}

#[tokio::test]
async fn cancel_removes_pending_timers_and_notifies_customer() {
    let h = harness().await;
    let mut job = quoted_job(&h).await;
    let date = NaiveDate::from_ymd_opt(2026, 9, 2).unwrap();
    h.lifecycle
        .approve(&mut job, Some((date, NaiveTime::from_hms_opt(9, 0, 0))))
        .await
        .unwrap();
    assert_eq!(h.scheduler.timers().len(), 2);
    h.notifier.clear();

    h.lifecycle.cancel(&mut job).await.unwrap();

    assert_eq!(job.status, JobStatus::Cancelled);
    assert!(h.scheduler.timers().is_empty());
    let msgs = h.notifier.sent_to(CUSTOMER_PHONE);
    assert_eq!(msgs.len(), 1);
    assert!(msgs[0].contains("cancelled"));
}

#[tokio::test]
async fn complete_stamps_time_and_registers_followup() {
    let h = harness().await;
    let mut job = quoted_job(&h).await;
    let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
    h.lifecycle
        .approve(&mut job, Some((date, NaiveTime::from_hms_opt(15, 0, 0))))
        .await
        .unwrap();
    h.lifecycle.start_work(&mut job).await.unwrap();
    h.notifier.clear();

    h.lifecycle.complete(&mut job).await.unwrap();

    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.completed_at.is_some());
    assert!(h.notifier.sent_to(CONTRACTOR_PHONE)[0].contains("INVOICE"));
    // Reminders gone, follow-up pending.
    assert!(h
        .scheduler
        .timers()
        .fire_time(job.id, TimerPurpose::FollowUp)
        .is_some());
    assert_eq!(h.scheduler.timers().len(), 1);
}

#[tokio::test]
async fn notification_failure_never_blocks_a_transition() {
    let h = harness().await;
    let mut job = quoted_job(&h).await;
    h.notifier.set_failing(true);

    h.lifecycle.approve(&mut job, None).await.unwrap();

    assert_eq!(
        h.storage.job_by_id(job.id).await.unwrap().unwrap().status,
        JobStatus::Approved
    );
}

#[tokio::test]
async fn pass_with_no_alternates_exhausts_with_one_customer_message() {
    let h = harness().await;
    let mut job = quoted_job(&h).await;
    let passed = h
        .storage
        .contractor_by_phone(CONTRACTOR_PHONE)
        .await
        .unwrap()
        .unwrap();
    h.notifier.clear();

    h.lifecycle.pass(&mut job, &passed).await.unwrap();

    assert_eq!(job.status, JobStatus::NoContractorsAvailable);
    let msgs = h.notifier.sent_to(CUSTOMER_PHONE);
    assert_eq!(msgs.len(), 1);
    assert!(msgs[0].contains("no other contractors"));
}

#[tokio::test]
async fn pass_with_alternate_reassigns_and_requotes() {
    let h = harness().await;
    let mut job = quoted_job(&h).await;
    let passed = h
        .storage
        .contractor_by_phone(CONTRACTOR_PHONE)
        .await
        .unwrap()
        .unwrap();
    let alternate = h
        .storage
        .create_contractor(&contractor_fixture("+15559998888", "Best Drains"))
        .await
        .unwrap();
    let old_estimates = (job.estimate_min, job.estimate_max);
    h.notifier.clear();

    h.lifecycle.pass(&mut job, &passed).await.unwrap();

    assert_eq!(job.status, JobStatus::Quoted);
    assert_eq!(job.contractor_id, Some(alternate.id));
    // Estimates are recomputed for the new contractor, not carried over.
    assert_ne!((job.estimate_min, job.estimate_max), old_estimates);
    let contractor_msgs = h.notifier.sent_to("+15559998888");
    assert_eq!(contractor_msgs.len(), 1);
    assert!(contractor_msgs[0].contains("Reply A to accept"));
    assert_eq!(h.notifier.sent_to(CUSTOMER_PHONE).len(), 1);
}

#[tokio::test]
async fn invoice_requires_completed_status() {
    let h = harness().await;
    let mut job = quoted_job(&h).await;

    let err = h
        .lifecycle
        .send_invoice(&mut job, 250.0, None)
        .await
        .unwrap_err();
    assert!(matches!(err, TradieError::InvalidTransition { .. }));

    h.lifecycle.approve(&mut job, None).await.unwrap();
    let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
    h.lifecycle
        .schedule(&mut job, date, NaiveTime::from_hms_opt(15, 0, 0))
        .await
        .unwrap();
    h.lifecycle.start_work(&mut job).await.unwrap();
    h.lifecycle.complete(&mut job).await.unwrap();
    h.notifier.clear();

    h.lifecycle
        .send_invoice(&mut job, 250.0, Some("replaced shutoff valve"))
        .await
        .unwrap();
    let stored = h.storage.job_by_id(job.id).await.unwrap().unwrap();
    assert!(stored.invoice_sent);
    assert_eq!(stored.final_quote, Some(250.0));
    assert_eq!(stored.notes.as_deref(), Some("replaced shutoff valve"));
    assert!(h.notifier.sent_to(CUSTOMER_PHONE)[0].contains("$250.00"));
}

#[tokio::test]
async fn force_status_bypasses_the_graph() {
    let h = harness().await;
    let mut job = quoted_job(&h).await;

    h.lifecycle
        .force_status(&mut job, JobStatus::Completed)
        .await
        .unwrap();
    assert_eq!(
        h.storage.job_by_id(job.id).await.unwrap().unwrap().status,
        JobStatus::Completed
    );
}

#[tokio::test]
async fn rating_is_bounded_one_to_five() {
    let h = harness().await;
    let mut job = quoted_job(&h).await;

    assert!(h.lifecycle.record_rating(&mut job, 0, None).await.is_err());
    assert!(h.lifecycle.record_rating(&mut job, 6, None).await.is_err());
    h.lifecycle
        .record_rating(&mut job, 5, Some("fast and tidy"))
        .await
        .unwrap();
    let stored = h.storage.job_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(stored.rating, Some(5));
    assert_eq!(stored.feedback.as_deref(), Some("fast and tidy"));
}
