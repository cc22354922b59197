// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end scheduler behavior against a real SQLite store, a manual
//! clock, and a recording notifier.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use tempfile::TempDir;

use tradie_config::model::{SchedulerConfig, StorageConfig};
use tradie_core::types::{Job, JobStatus};
use tradie_core::Storage;
use tradie_scheduler::{Scheduler, TimerPurpose};
use tradie_storage::SqliteStorage;
use tradie_test_utils::{contractor_fixture, job_fixture, ManualClock, MockNotifier};

struct Harness {
    _dir: TempDir,
    storage: Arc<SqliteStorage>,
    notifier: Arc<MockNotifier>,
    clock: Arc<ManualClock>,
    scheduler: Scheduler,
}

/// Clock fixed at 2026-09-01 12:00 UTC.
async fn harness() -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig {
        database_path: dir.path().join("test.db").to_str().unwrap().to_string(),
        wal_mode: false,
    };
    let storage = Arc::new(SqliteStorage::open(&config).await.unwrap());
    let notifier = Arc::new(MockNotifier::new());
    let clock = Arc::new(ManualClock::at(2026, 9, 1, 12, 0));
    let scheduler = Scheduler::new(
        storage.clone(),
        notifier.clone(),
        clock.clone(),
        SchedulerConfig::default(),
    )
    .unwrap();
    Harness {
        _dir: dir,
        storage,
        notifier,
        clock,
        scheduler,
    }
}

/// A job assigned to a fresh contractor, scheduled for tomorrow at 09:00.
async fn scheduled_job(h: &Harness) -> Job {
    let contractor = h
        .storage
        .create_contractor(&contractor_fixture("+15550001111", "Ace Plumbing"))
        .await
        .unwrap();
    let customer = h.storage.get_or_create_customer("+15552223333").await.unwrap();
    let mut job = h.storage.create_job(&job_fixture(customer.id)).await.unwrap();
    job.contractor_id = Some(contractor.id);
    job.status = JobStatus::Scheduled;
    job.scheduled_date = NaiveDate::from_ymd_opt(2026, 9, 2);
    job.scheduled_time = NaiveTime::from_hms_opt(9, 0, 0);
    h.storage.update_job(&job).await.unwrap();
    job
}

#[tokio::test]
async fn tomorrow_job_registers_both_reminders_at_contract_times() {
    let h = harness().await;
    let job = scheduled_job(&h).await;

    assert_eq!(h.scheduler.schedule_job_reminders(&job), 2);
    assert_eq!(
        h.scheduler.timers().fire_time(job.id, TimerPurpose::DayBefore),
        Some(Utc.with_ymd_and_hms(2026, 9, 1, 18, 0, 0).unwrap())
    );
    assert_eq!(
        h.scheduler.timers().fire_time(job.id, TimerPurpose::DayOf),
        Some(Utc.with_ymd_and_hms(2026, 9, 2, 7, 0, 0).unwrap())
    );

    // Cancelling the job removes both.
    assert_eq!(h.scheduler.cancel_job_timers(job.id), 2);
    assert!(h.scheduler.timers().is_empty());
}

#[tokio::test]
async fn past_fire_times_are_never_registered() {
    let h = harness().await;
    let mut job = scheduled_job(&h).await;
    // Scheduled earlier today: the day-before slot (yesterday 18:00) is gone,
    // and 2h-before (10:00) is already past a 12:00 clock.
    job.scheduled_date = NaiveDate::from_ymd_opt(2026, 9, 1);
    job.scheduled_time = NaiveTime::from_hms_opt(12, 0, 0);
    h.storage.update_job(&job).await.unwrap();

    assert_eq!(h.scheduler.schedule_job_reminders(&job), 0);
    assert!(h.scheduler.timers().is_empty());
}

#[tokio::test]
async fn rescheduling_replaces_reminder_timers() {
    let h = harness().await;
    let mut job = scheduled_job(&h).await;
    h.scheduler.schedule_job_reminders(&job);

    job.scheduled_date = NaiveDate::from_ymd_opt(2026, 9, 5);
    job.scheduled_time = NaiveTime::from_hms_opt(14, 0, 0);
    h.storage.update_job(&job).await.unwrap();
    h.scheduler.schedule_job_reminders(&job);

    assert_eq!(h.scheduler.timers().len(), 2);
    assert_eq!(
        h.scheduler.timers().fire_time(job.id, TimerPurpose::DayBefore),
        Some(Utc.with_ymd_and_hms(2026, 9, 4, 18, 0, 0).unwrap())
    );
    assert_eq!(
        h.scheduler.timers().fire_time(job.id, TimerPurpose::DayOf),
        Some(Utc.with_ymd_and_hms(2026, 9, 5, 12, 0, 0).unwrap())
    );
}

#[tokio::test]
async fn day_before_reminder_notifies_both_parties_once() {
    let h = harness().await;
    let job = scheduled_job(&h).await;
    h.scheduler.schedule_job_reminders(&job);

    h.clock.advance(Duration::hours(6)); // 18:00
    h.scheduler.tick().await.unwrap();

    let customer_msgs = h.notifier.sent_to("+15552223333");
    assert_eq!(customer_msgs.len(), 1);
    assert!(customer_msgs[0].contains("Ace Plumbing"));
    assert_eq!(h.notifier.sent_to("+15550001111").len(), 1);

    // Fired timers leave the pending set; a second tick sends nothing.
    h.scheduler.tick().await.unwrap();
    assert_eq!(h.notifier.count(), 2);
    assert!(h.scheduler.timers().fire_time(job.id, TimerPurpose::DayOf).is_some());
}

#[tokio::test]
async fn reminder_for_cancelled_job_is_skipped() {
    let h = harness().await;
    let mut job = scheduled_job(&h).await;
    h.scheduler.schedule_job_reminders(&job);

    // Cancelled after registration; the fire-time read sees fresh status.
    job.status = JobStatus::Cancelled;
    h.storage.update_job(&job).await.unwrap();

    h.clock.advance(Duration::hours(6));
    h.scheduler.tick().await.unwrap();
    assert_eq!(h.notifier.count(), 0);
}

#[tokio::test]
async fn followup_prompts_rating_and_invoice() {
    let h = harness().await;
    let mut job = scheduled_job(&h).await;
    job.status = JobStatus::Completed;
    job.completed_at = Some(h.clock.now());
    h.storage.update_job(&job).await.unwrap();

    h.scheduler.schedule_followup(&job);
    assert_eq!(
        h.scheduler.timers().fire_time(job.id, TimerPurpose::FollowUp),
        Some(Utc.with_ymd_and_hms(2026, 9, 2, 18, 0, 0).unwrap())
    );

    h.clock.set(Utc.with_ymd_and_hms(2026, 9, 2, 18, 0, 0).unwrap());
    h.scheduler.tick().await.unwrap();

    let customer_msgs = h.notifier.sent_to("+15552223333");
    assert_eq!(customer_msgs.len(), 1);
    assert!(customer_msgs[0].contains("rating"));
    let contractor_msgs = h.notifier.sent_to("+15550001111");
    assert_eq!(contractor_msgs.len(), 1);
    assert!(contractor_msgs[0].contains("INVOICE"));
}

#[tokio::test]
async fn reminder_sweep_restores_lost_timers() {
    let h = harness().await;
    let job = scheduled_job(&h).await;
    // Nothing registered, as after a process restart.
    assert!(h.scheduler.timers().is_empty());

    // Default reminder sweep is 09:00 daily; the next occurrence after the
    // 12:00 start is tomorrow 09:00, which is after the day-before slot, so
    // only the day-of timer is still registrable.
    h.clock.set(Utc.with_ymd_and_hms(2026, 9, 2, 9, 0, 0).unwrap());
    h.scheduler.tick().await.unwrap();

    assert!(h.scheduler.timers().fire_time(job.id, TimerPurpose::DayBefore).is_none());
    assert!(h.scheduler.timers().fire_time(job.id, TimerPurpose::DayOf).is_none());
    // 07:00 day-of already past at 09:00 — nothing to restore for this job.

    // A job scheduled for the day after is fully restored.
    let customer = h.storage.get_or_create_customer("+15556667777").await.unwrap();
    let mut later = h.storage.create_job(&job_fixture(customer.id)).await.unwrap();
    later.contractor_id = job.contractor_id;
    later.status = JobStatus::Scheduled;
    later.scheduled_date = NaiveDate::from_ymd_opt(2026, 9, 3);
    later.scheduled_time = NaiveTime::from_hms_opt(15, 0, 0);
    h.storage.update_job(&later).await.unwrap();

    h.clock.set(Utc.with_ymd_and_hms(2026, 9, 3, 9, 0, 0).unwrap());
    h.scheduler.tick().await.unwrap();
    assert!(h.scheduler.timers().fire_time(later.id, TimerPurpose::DayOf).is_some());
}

#[tokio::test]
async fn cleanup_sweep_purges_sessions_and_resets_stale_idle_conversations() {
    let h = harness().await;
    let contractor = h
        .storage
        .create_contractor(&contractor_fixture("+15550001111", "Ace Plumbing"))
        .await
        .unwrap();
    let now = h.clock.now();
    h.storage
        .create_dashboard_session(contractor.id, "stale", now - Duration::hours(1))
        .await
        .unwrap();

    // An idle conversation with leftover context, older than the 7-day horizon.
    let mut convo = h.storage.get_or_create_conversation("+15559990000").await.unwrap();
    convo.context = r#"{"state":"idle","leftover":true}"#.to_string();
    convo.updated_at = now - Duration::days(10);
    h.storage.update_conversation(&convo).await.unwrap();

    // Default cleanup sweep is 03:00 daily.
    h.clock.set(Utc.with_ymd_and_hms(2026, 9, 2, 3, 0, 0).unwrap());
    h.scheduler.tick().await.unwrap();

    let reloaded = h.storage.get_or_create_conversation("+15559990000").await.unwrap();
    assert_eq!(reloaded.context, r#"{"state":"idle"}"#);
    assert_eq!(
        h.storage.purge_expired_dashboard_sessions(h.clock.now()).await.unwrap(),
        0
    );
}
