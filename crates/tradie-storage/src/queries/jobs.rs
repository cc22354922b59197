// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Job CRUD and the filtered scans used by the scheduler and the
//! conversation engine.

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Row};
use tradie_core::types::{Job, JobStatus, NewJob, Urgency};
use tradie_core::TradieError;
use uuid::Uuid;

use crate::codec;
use crate::database::{column_decode_err, map_tr_err, Database};

const COLUMNS: &str = "id, uuid, customer_id, contractor_id, description, category, urgency, \
     address, zip_code, estimate_min, estimate_max, final_quote, status, scheduled_date, \
     scheduled_time, completed_at, rating, feedback, notes, invoice_sent, created_at, updated_at";

fn map_row(row: &Row<'_>) -> Result<Job, rusqlite::Error> {
    let uuid: String = row.get(1)?;
    let urgency: String = row.get(6)?;
    let status: String = row.get(12)?;
    let scheduled_date: Option<String> = row.get(13)?;
    let scheduled_time: Option<String> = row.get(14)?;
    let completed_at: Option<String> = row.get(15)?;
    let created_at: String = row.get(20)?;
    let updated_at: String = row.get(21)?;
    Ok(Job {
        id: row.get(0)?,
        uuid: uuid.parse::<Uuid>().map_err(|e| column_decode_err(1, e))?,
        customer_id: row.get(2)?,
        contractor_id: row.get(3)?,
        description: row.get(4)?,
        category: row.get(5)?,
        // Unknown urgency text in the column normalizes to medium.
        urgency: Urgency::parse_lossy(&urgency),
        address: row.get(7)?,
        zip_code: row.get(8)?,
        estimate_min: row.get(9)?,
        estimate_max: row.get(10)?,
        final_quote: row.get(11)?,
        status: codec::enum_from_string::<JobStatus>(12, &status)?,
        scheduled_date: scheduled_date
            .map(|s| codec::date_from_string(13, &s))
            .transpose()?,
        scheduled_time: scheduled_time
            .map(|s| codec::time_from_string(14, &s))
            .transpose()?,
        completed_at: completed_at
            .map(|s| codec::ts_from_string(15, &s))
            .transpose()?,
        rating: row.get(16)?,
        feedback: row.get(17)?,
        notes: row.get(18)?,
        invoice_sent: row.get(19)?,
        created_at: codec::ts_from_string(20, &created_at)?,
        updated_at: codec::ts_from_string(21, &updated_at)?,
    })
}

pub async fn create_job(db: &Database, new: &NewJob) -> Result<Job, TradieError> {
    let new = new.clone();
    let uuid = Uuid::new_v4().to_string();
    let urgency = new.urgency.to_string();
    let now = codec::ts_to_string(Utc::now());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO jobs (uuid, customer_id, contractor_id, description, category, \
                 urgency, address, zip_code, estimate_min, estimate_max, status, invoice_sent, \
                 created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 'pending', 0, ?11, ?11)",
                params![
                    uuid,
                    new.customer_id,
                    new.contractor_id,
                    new.description,
                    new.category,
                    urgency,
                    new.address,
                    new.zip_code,
                    new.estimate_min,
                    new.estimate_max,
                    now,
                ],
            )?;
            let id = conn.last_insert_rowid();
            let job = conn.query_row(
                &format!("SELECT {COLUMNS} FROM jobs WHERE id = ?1"),
                params![id],
                map_row,
            )?;
            Ok(job)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn job_by_id(db: &Database, id: i64) -> Result<Option<Job>, TradieError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM jobs WHERE id = ?1"))?;
            let result = stmt.query_row(params![id], map_row);
            match result {
                Ok(job) => Ok(Some(job)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

pub async fn job_by_uuid(db: &Database, uuid: Uuid) -> Result<Option<Job>, TradieError> {
    let uuid = uuid.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {COLUMNS} FROM jobs WHERE uuid = ?1"))?;
            let result = stmt.query_row(params![uuid], map_row);
            match result {
                Ok(job) => Ok(Some(job)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

pub async fn update_job(db: &Database, job: &Job) -> Result<(), TradieError> {
    let j = job.clone();
    let urgency = j.urgency.to_string();
    let status = j.status.to_string();
    let scheduled_date = j.scheduled_date.map(codec::date_to_string);
    let scheduled_time = j.scheduled_time.map(codec::time_to_string);
    let completed_at = j.completed_at.map(codec::ts_to_string);
    let now = codec::ts_to_string(Utc::now());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE jobs SET contractor_id = ?1, description = ?2, category = ?3, \
                 urgency = ?4, address = ?5, zip_code = ?6, estimate_min = ?7, \
                 estimate_max = ?8, final_quote = ?9, status = ?10, scheduled_date = ?11, \
                 scheduled_time = ?12, completed_at = ?13, rating = ?14, feedback = ?15, \
                 notes = ?16, invoice_sent = ?17, updated_at = ?18
                 WHERE id = ?19",
                params![
                    j.contractor_id,
                    j.description,
                    j.category,
                    urgency,
                    j.address,
                    j.zip_code,
                    j.estimate_min,
                    j.estimate_max,
                    j.final_quote,
                    status,
                    scheduled_date,
                    scheduled_time,
                    completed_at,
                    j.rating,
                    j.feedback,
                    j.notes,
                    j.invoice_sent,
                    now,
                    j.id,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn jobs_with_status(db: &Database, status: JobStatus) -> Result<Vec<Job>, TradieError> {
    let status = status.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM jobs WHERE status = ?1 ORDER BY id"
            ))?;
            let rows = stmt.query_map(params![status], map_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn jobs_scheduled_on(db: &Database, date: NaiveDate) -> Result<Vec<Job>, TradieError> {
    let date = codec::date_to_string(date);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM jobs WHERE scheduled_date = ?1 ORDER BY id"
            ))?;
            let rows = stmt.query_map(params![date], map_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn jobs_completed_on(db: &Database, date: NaiveDate) -> Result<Vec<Job>, TradieError> {
    let prefix = codec::date_to_string(date);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM jobs \
                 WHERE completed_at IS NOT NULL AND substr(completed_at, 1, 10) = ?1 \
                 ORDER BY id"
            ))?;
            let rows = stmt.query_map(params![prefix], map_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await
        .map_err(map_tr_err)
}

/// The most recent job for `contractor_id` whose status is in `statuses`.
pub async fn latest_job_for_contractor(
    db: &Database,
    contractor_id: i64,
    statuses: &[JobStatus],
) -> Result<Option<Job>, TradieError> {
    latest_job_matching(db, "contractor_id", contractor_id, statuses).await
}

/// The most recent job for `customer_id` whose status is in `statuses`.
pub async fn latest_job_for_customer(
    db: &Database,
    customer_id: i64,
    statuses: &[JobStatus],
) -> Result<Option<Job>, TradieError> {
    latest_job_matching(db, "customer_id", customer_id, statuses).await
}

async fn latest_job_matching(
    db: &Database,
    owner_column: &'static str,
    owner_id: i64,
    statuses: &[JobStatus],
) -> Result<Option<Job>, TradieError> {
    if statuses.is_empty() {
        return Ok(None);
    }
    let status_strings: Vec<String> = statuses.iter().map(|s| s.to_string()).collect();
    db.connection()
        .call(move |conn| {
            let placeholders: Vec<String> = (0..status_strings.len())
                .map(|i| format!("?{}", i + 2))
                .collect();
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM jobs \
                 WHERE {owner_column} = ?1 AND status IN ({}) \
                 ORDER BY id DESC LIMIT 1",
                placeholders.join(", ")
            ))?;
            let mut values: Vec<&dyn rusqlite::types::ToSql> = vec![&owner_id];
            for s in &status_strings {
                values.push(s);
            }
            let result = stmt.query_row(values.as_slice(), map_row);
            match result {
                Ok(job) => Ok(Some(job)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}
