// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence gateway: row-level get/create/update plus the filtered scans
//! the core needs. No joins, no cross-entity transactions.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::TradieError;
use crate::types::{
    Contractor, Conversation, Customer, Job, JobStatus, MessageRecord, NewContractor, NewJob,
    NewMessage,
};

/// Durable store for contractors, customers, jobs, conversations, and the
/// message audit log. Implementations serialize writes per row themselves;
/// each call is individually atomic and nothing here spans entities.
#[async_trait]
pub trait Storage: Send + Sync {
    // --- Contractors ---

    async fn create_contractor(&self, new: &NewContractor) -> Result<Contractor, TradieError>;
    async fn contractor_by_phone(&self, phone: &str) -> Result<Option<Contractor>, TradieError>;
    async fn contractor_by_id(&self, id: i64) -> Result<Option<Contractor>, TradieError>;
    async fn update_contractor(&self, contractor: &Contractor) -> Result<(), TradieError>;
    /// All active contractors, in creation order.
    async fn active_contractors(&self) -> Result<Vec<Contractor>, TradieError>;
    /// Active contractors serving the given postal code, in creation order.
    async fn active_contractors_in_zip(&self, zip: &str) -> Result<Vec<Contractor>, TradieError>;

    // --- Customers ---

    async fn get_or_create_customer(&self, phone: &str) -> Result<Customer, TradieError>;
    async fn customer_by_id(&self, id: i64) -> Result<Option<Customer>, TradieError>;
    async fn update_customer(&self, customer: &Customer) -> Result<(), TradieError>;

    // --- Jobs ---

    async fn create_job(&self, new: &NewJob) -> Result<Job, TradieError>;
    async fn job_by_id(&self, id: i64) -> Result<Option<Job>, TradieError>;
    async fn job_by_uuid(&self, uuid: Uuid) -> Result<Option<Job>, TradieError>;
    async fn update_job(&self, job: &Job) -> Result<(), TradieError>;
    async fn jobs_with_status(&self, status: JobStatus) -> Result<Vec<Job>, TradieError>;
    /// Jobs with a scheduled date equal to `date`, any status.
    async fn jobs_scheduled_on(&self, date: NaiveDate) -> Result<Vec<Job>, TradieError>;
    /// Jobs completed on the given calendar day (UTC).
    async fn jobs_completed_on(&self, date: NaiveDate) -> Result<Vec<Job>, TradieError>;
    /// The contractor's most recent job whose status is in `statuses`.
    async fn latest_job_for_contractor(
        &self,
        contractor_id: i64,
        statuses: &[JobStatus],
    ) -> Result<Option<Job>, TradieError>;
    /// The customer's most recent job whose status is in `statuses`.
    async fn latest_job_for_customer(
        &self,
        customer_id: i64,
        statuses: &[JobStatus],
    ) -> Result<Option<Job>, TradieError>;

    // --- Conversations ---

    async fn get_or_create_conversation(&self, phone: &str)
        -> Result<Conversation, TradieError>;
    /// Writes back all mutable fields, `updated_at` included, as given.
    async fn update_conversation(&self, conversation: &Conversation) -> Result<(), TradieError>;
    /// Conversations sitting in `Idle` whose last update is older than `cutoff`.
    async fn idle_conversations_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Conversation>, TradieError>;

    // --- Messages ---

    async fn insert_message(&self, message: &NewMessage) -> Result<i64, TradieError>;
    /// The most recent `limit` messages, oldest first. `None` returns all.
    async fn messages_for_conversation(
        &self,
        conversation_id: i64,
        limit: Option<i64>,
    ) -> Result<Vec<MessageRecord>, TradieError>;

    // --- Dashboard sessions ---

    async fn create_dashboard_session(
        &self,
        contractor_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), TradieError>;
    /// Delete sessions past their expiry; returns how many were purged.
    async fn purge_expired_dashboard_sessions(
        &self,
        now: DateTime<Utc>,
    ) -> Result<u64, TradieError>;
}
