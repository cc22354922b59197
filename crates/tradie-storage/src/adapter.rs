// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the `Storage` gateway trait.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tradie_config::model::StorageConfig;
use tradie_core::types::{
    Contractor, Conversation, Customer, Job, JobStatus, MessageRecord, NewContractor, NewJob,
    NewMessage,
};
use tradie_core::{Storage, TradieError};
use tracing::debug;
use uuid::Uuid;

use crate::database::Database;
use crate::queries;

/// SQLite-backed persistence gateway.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules.
pub struct SqliteStorage {
    db: Database,
}

impl SqliteStorage {
    /// Open the database at the configured path, running migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, TradieError> {
        let db = Database::open(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "SQLite storage initialized");
        Ok(Self { db })
    }

    /// Checkpoint and release the database.
    pub async fn close(&self) -> Result<(), TradieError> {
        self.db.close().await
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    // --- Contractors ---

    async fn create_contractor(&self, new: &NewContractor) -> Result<Contractor, TradieError> {
        queries::contractors::create_contractor(&self.db, new).await
    }

    async fn contractor_by_phone(&self, phone: &str) -> Result<Option<Contractor>, TradieError> {
        queries::contractors::contractor_by_phone(&self.db, phone).await
    }

    async fn contractor_by_id(&self, id: i64) -> Result<Option<Contractor>, TradieError> {
        queries::contractors::contractor_by_id(&self.db, id).await
    }

    async fn update_contractor(&self, contractor: &Contractor) -> Result<(), TradieError> {
        queries::contractors::update_contractor(&self.db, contractor).await
    }

    async fn active_contractors(&self) -> Result<Vec<Contractor>, TradieError> {
        queries::contractors::active_contractors(&self.db).await
    }

    async fn active_contractors_in_zip(&self, zip: &str) -> Result<Vec<Contractor>, TradieError> {
        queries::contractors::active_contractors_in_zip(&self.db, zip).await
    }

    // --- Customers ---

    async fn get_or_create_customer(&self, phone: &str) -> Result<Customer, TradieError> {
        queries::customers::get_or_create_customer(&self.db, phone).await
    }

    async fn customer_by_id(&self, id: i64) -> Result<Option<Customer>, TradieError> {
        queries::customers::customer_by_id(&self.db, id).await
    }

    async fn update_customer(&self, customer: &Customer) -> Result<(), TradieError> {
        queries::customers::update_customer(&self.db, customer).await
    }

    // --- Jobs ---

    async fn create_job(&self, new: &NewJob) -> Result<Job, TradieError> {
        queries::jobs::create_job(&self.db, new).await
    }

    async fn job_by_id(&self, id: i64) -> Result<Option<Job>, TradieError> {
        queries::jobs::job_by_id(&self.db, id).await
    }

    async fn job_by_uuid(&self, uuid: Uuid) -> Result<Option<Job>, TradieError> {
        queries::jobs::job_by_uuid(&self.db, uuid).await
    }

    async fn update_job(&self, job: &Job) -> Result<(), TradieError> {
        queries::jobs::update_job(&self.db, job).await
    }

    async fn jobs_with_status(&self, status: JobStatus) -> Result<Vec<Job>, TradieError> {
        queries::jobs::jobs_with_status(&self.db, status).await
    }

    async fn jobs_scheduled_on(&self, date: NaiveDate) -> Result<Vec<Job>, TradieError> {
        queries::jobs::jobs_scheduled_on(&self.db, date).await
    }

    async fn jobs_completed_on(&self, date: NaiveDate) -> Result<Vec<Job>, TradieError> {
        queries::jobs::jobs_completed_on(&self.db, date).await
    }

    async fn latest_job_for_contractor(
        &self,
        contractor_id: i64,
        statuses: &[JobStatus],
    ) -> Result<Option<Job>, TradieError> {
        queries::jobs::latest_job_for_contractor(&self.db, contractor_id, statuses).await
    }

    async fn latest_job_for_customer(
        &self,
        customer_id: i64,
        statuses: &[JobStatus],
    ) -> Result<Option<Job>, TradieError> {
        queries::jobs::latest_job_for_customer(&self.db, customer_id, statuses).await
    }

    // --- Conversations ---

    async fn get_or_create_conversation(
        &self,
        phone: &str,
    ) -> Result<Conversation, TradieError> {
        queries::conversations::get_or_create_conversation(&self.db, phone).await
    }

    async fn update_conversation(&self, conversation: &Conversation) -> Result<(), TradieError> {
        queries::conversations::update_conversation(&self.db, conversation).await
    }

    async fn idle_conversations_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Conversation>, TradieError> {
        queries::conversations::idle_conversations_since(&self.db, cutoff).await
    }

    // --- Messages ---

    async fn insert_message(&self, message: &NewMessage) -> Result<i64, TradieError> {
        queries::messages::insert_message(&self.db, message).await
    }

    async fn messages_for_conversation(
        &self,
        conversation_id: i64,
        limit: Option<i64>,
    ) -> Result<Vec<MessageRecord>, TradieError> {
        queries::messages::messages_for_conversation(&self.db, conversation_id, limit).await
    }

    // --- Dashboard sessions ---

    async fn create_dashboard_session(
        &self,
        contractor_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), TradieError> {
        queries::dashboard::create_dashboard_session(&self.db, contractor_id, token, expires_at)
            .await
    }

    async fn purge_expired_dashboard_sessions(
        &self,
        now: DateTime<Utc>,
    ) -> Result<u64, TradieError> {
        queries::dashboard::purge_expired_dashboard_sessions(&self.db, now).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::BTreeMap;
    use tempfile::tempdir;
    use tradie_core::types::{Direction, Urgency};

    async fn open_storage(dir: &tempfile::TempDir, name: &str) -> SqliteStorage {
        let path = dir.path().join(name);
        let config = StorageConfig {
            database_path: path.to_str().unwrap().to_string(),
            wal_mode: true,
        };
        SqliteStorage::open(&config).await.unwrap()
    }

    fn ace_plumbing() -> NewContractor {
        NewContractor {
            phone: "+15550001111".into(),
            business_name: "Ace Plumbing".into(),
            trade: "plumber".into(),
            zip_code: "90210".into(),
            service_radius_miles: 25.0,
            services: vec!["drain cleaning".into(), "water heaters".into()],
            base_fee: 75.0,
            hourly_rate: 100.0,
            emergency_markup: 0.25,
            availability: BTreeMap::from([("mon".to_string(), "8-17".to_string())]),
        }
    }

    #[tokio::test]
    async fn contractor_round_trip() {
        let dir = tempdir().unwrap();
        let storage = open_storage(&dir, "contractors.db").await;

        let created = storage.create_contractor(&ace_plumbing()).await.unwrap();
        assert!(created.active);
        assert_eq!(created.services.len(), 2);

        let by_phone = storage
            .contractor_by_phone("+15550001111")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_phone.id, created.id);
        assert_eq!(by_phone.business_name, "Ace Plumbing");
        assert_eq!(by_phone.base_fee, 75.0);
        assert_eq!(by_phone.emergency_markup, 0.25);

        assert!(storage
            .contractor_by_phone("+15559999999")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn deactivated_contractor_drops_out_of_scans() {
        let dir = tempdir().unwrap();
        let storage = open_storage(&dir, "scans.db").await;

        let mut contractor = storage.create_contractor(&ace_plumbing()).await.unwrap();
        assert_eq!(storage.active_contractors_in_zip("90210").await.unwrap().len(), 1);

        contractor.active = false;
        storage.update_contractor(&contractor).await.unwrap();
        assert!(storage.active_contractors_in_zip("90210").await.unwrap().is_empty());
        // Row survives deactivation.
        assert!(storage.contractor_by_id(contractor.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn customer_is_created_lazily_and_once() {
        let dir = tempdir().unwrap();
        let storage = open_storage(&dir, "customers.db").await;

        let first = storage.get_or_create_customer("+15552223333").await.unwrap();
        let second = storage.get_or_create_customer("+15552223333").await.unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn job_lifecycle_fields_round_trip() {
        let dir = tempdir().unwrap();
        let storage = open_storage(&dir, "jobs.db").await;

        let customer = storage.get_or_create_customer("+15552223333").await.unwrap();
        let job = storage
            .create_job(&NewJob {
                customer_id: customer.id,
                contractor_id: None,
                description: "kitchen drain is clogged".into(),
                category: "plumbing".into(),
                urgency: Urgency::High,
                address: None,
                zip_code: "90210".into(),
                estimate_min: 150.0,
                estimate_max: 300.0,
            })
            .await
            .unwrap();
        assert_eq!(job.status, JobStatus::Pending);
        assert!(!job.invoice_sent);

        let mut job = job;
        job.status = JobStatus::Scheduled;
        job.scheduled_date = NaiveDate::from_ymd_opt(2026, 9, 1);
        job.scheduled_time = chrono::NaiveTime::from_hms_opt(9, 0, 0);
        storage.update_job(&job).await.unwrap();

        let reloaded = storage.job_by_id(job.id).await.unwrap().unwrap();
        assert_eq!(reloaded.status, JobStatus::Scheduled);
        assert_eq!(reloaded.scheduled_date, NaiveDate::from_ymd_opt(2026, 9, 1));
        assert_eq!(
            reloaded.scheduled_time,
            chrono::NaiveTime::from_hms_opt(9, 0, 0)
        );
        assert_eq!(reloaded.uuid, job.uuid);

        let by_uuid = storage.job_by_uuid(job.uuid).await.unwrap().unwrap();
        assert_eq!(by_uuid.id, job.id);

        let scheduled = storage
            .jobs_scheduled_on(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap())
            .await
            .unwrap();
        assert_eq!(scheduled.len(), 1);
    }

    #[tokio::test]
    async fn latest_job_scans_prefer_newest_in_status_set() {
        let dir = tempdir().unwrap();
        let storage = open_storage(&dir, "latest.db").await;

        let customer = storage.get_or_create_customer("+15552223333").await.unwrap();
        let contractor = storage.create_contractor(&ace_plumbing()).await.unwrap();
        let new_job = |desc: &str| NewJob {
            customer_id: customer.id,
            contractor_id: Some(contractor.id),
            description: desc.into(),
            category: "plumbing".into(),
            urgency: Urgency::Medium,
            address: None,
            zip_code: "90210".into(),
            estimate_min: 100.0,
            estimate_max: 200.0,
        };

        let mut a = storage.create_job(&new_job("first")).await.unwrap();
        a.status = JobStatus::Quoted;
        storage.update_job(&a).await.unwrap();
        let mut b = storage.create_job(&new_job("second")).await.unwrap();
        b.status = JobStatus::Quoted;
        storage.update_job(&b).await.unwrap();

        let latest = storage
            .latest_job_for_contractor(contractor.id, &[JobStatus::Quoted])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.description, "second");

        assert!(storage
            .latest_job_for_contractor(contractor.id, &[JobStatus::Completed])
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn conversation_and_messages_round_trip() {
        let dir = tempdir().unwrap();
        let storage = open_storage(&dir, "convo.db").await;

        let convo = storage
            .get_or_create_conversation("+15554445555")
            .await
            .unwrap();
        assert_eq!(convo.state, tradie_core::ConversationState::Idle);
        assert_eq!(convo.context, r#"{"state":"idle"}"#);

        storage
            .insert_message(&NewMessage {
                conversation_id: convo.id,
                from_phone: "+15554445555".into(),
                to_phone: "+15550000000".into(),
                body: "SETUP".into(),
                direction: Direction::Inbound,
                transport_message_id: Some("SM123".into()),
            })
            .await
            .unwrap();
        let messages = storage
            .messages_for_conversation(convo.id, None)
            .await
            .unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].body, "SETUP");
        assert_eq!(messages[0].direction, Direction::Inbound);
    }

    #[tokio::test]
    async fn expired_dashboard_sessions_are_purged() {
        let dir = tempdir().unwrap();
        let storage = open_storage(&dir, "dash.db").await;

        let contractor = storage.create_contractor(&ace_plumbing()).await.unwrap();
        let now = Utc::now();
        storage
            .create_dashboard_session(contractor.id, "expired-token", now - Duration::minutes(5))
            .await
            .unwrap();
        storage
            .create_dashboard_session(contractor.id, "live-token", now + Duration::minutes(30))
            .await
            .unwrap();

        let purged = storage.purge_expired_dashboard_sessions(now).await.unwrap();
        assert_eq!(purged, 1);
        // Second run is a no-op.
        assert_eq!(storage.purge_expired_dashboard_sessions(now).await.unwrap(), 0);
    }
}
