// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation row access. One row per phone number, created lazily.

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use tradie_core::types::{Conversation, ConversationState};
use tradie_core::TradieError;

use crate::codec;
use crate::database::{map_tr_err, Database};

const COLUMNS: &str =
    "id, phone, state, context, job_id, contractor_id, customer_id, updated_at";

fn map_row(row: &Row<'_>) -> Result<Conversation, rusqlite::Error> {
    let state: String = row.get(2)?;
    let updated_at: String = row.get(7)?;
    Ok(Conversation {
        id: row.get(0)?,
        phone: row.get(1)?,
        state: codec::enum_from_string::<ConversationState>(2, &state)?,
        context: row.get(3)?,
        job_id: row.get(4)?,
        contractor_id: row.get(5)?,
        customer_id: row.get(6)?,
        updated_at: codec::ts_from_string(7, &updated_at)?,
    })
}

pub async fn get_or_create_conversation(
    db: &Database,
    phone: &str,
) -> Result<Conversation, TradieError> {
    let phone = phone.to_string();
    let now = codec::ts_to_string(Utc::now());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO conversations (phone, updated_at) VALUES (?1, ?2)",
                params![phone, now],
            )?;
            let conversation = conn.query_row(
                &format!("SELECT {COLUMNS} FROM conversations WHERE phone = ?1"),
                params![phone],
                map_row,
            )?;
            Ok(conversation)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn update_conversation(
    db: &Database,
    conversation: &Conversation,
) -> Result<(), TradieError> {
    let c = conversation.clone();
    let state = c.state.to_string();
    let updated_at = codec::ts_to_string(c.updated_at);
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE conversations SET state = ?1, context = ?2, job_id = ?3, \
                 contractor_id = ?4, customer_id = ?5, updated_at = ?6 WHERE id = ?7",
                params![
                    state,
                    c.context,
                    c.job_id,
                    c.contractor_id,
                    c.customer_id,
                    updated_at,
                    c.id
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Conversations sitting in `idle` whose last update is older than `cutoff`.
pub async fn idle_conversations_since(
    db: &Database,
    cutoff: DateTime<Utc>,
) -> Result<Vec<Conversation>, TradieError> {
    let cutoff = codec::ts_to_string(cutoff);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM conversations \
                 WHERE state = 'idle' AND updated_at < ?1 ORDER BY id"
            ))?;
            let rows = stmt.query_map(params![cutoff], map_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await
        .map_err(map_tr_err)
}
