// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only message audit log.

use chrono::Utc;
use rusqlite::{params, Row};
use tradie_core::types::{Direction, MessageRecord, NewMessage};
use tradie_core::TradieError;

use crate::codec;
use crate::database::{map_tr_err, Database};

const COLUMNS: &str = "id, conversation_id, from_phone, to_phone, body, direction, \
     transport_message_id, created_at";

fn map_row(row: &Row<'_>) -> Result<MessageRecord, rusqlite::Error> {
    let direction: String = row.get(5)?;
    let created_at: String = row.get(7)?;
    Ok(MessageRecord {
        id: row.get(0)?,
        conversation_id: row.get(1)?,
        from_phone: row.get(2)?,
        to_phone: row.get(3)?,
        body: row.get(4)?,
        direction: codec::enum_from_string::<Direction>(5, &direction)?,
        transport_message_id: row.get(6)?,
        created_at: codec::ts_from_string(7, &created_at)?,
    })
}

pub async fn insert_message(db: &Database, message: &NewMessage) -> Result<i64, TradieError> {
    let m = message.clone();
    let direction = m.direction.to_string();
    let now = codec::ts_to_string(Utc::now());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO messages (conversation_id, from_phone, to_phone, body, \
                 direction, transport_message_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    m.conversation_id,
                    m.from_phone,
                    m.to_phone,
                    m.body,
                    direction,
                    m.transport_message_id,
                    now,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn messages_for_conversation(
    db: &Database,
    conversation_id: i64,
    limit: Option<i64>,
) -> Result<Vec<MessageRecord>, TradieError> {
    db.connection()
        .call(move |conn| {
            let limit = limit.unwrap_or(i64::MAX);
            // Most recent `limit` messages, returned oldest first.
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM (SELECT {COLUMNS} FROM messages \
                 WHERE conversation_id = ?1 ORDER BY id DESC LIMIT ?2) \
                 ORDER BY id"
            ))?;
            let rows = stmt.query_map(params![conversation_id, limit], map_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await
        .map_err(map_tr_err)
}
