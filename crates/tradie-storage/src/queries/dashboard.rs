// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dashboard login sessions: created by the `DASHBOARD` command, purged by
//! the cleanup sweep.

use chrono::{DateTime, Utc};
use rusqlite::params;
use tradie_core::TradieError;

use crate::codec;
use crate::database::{map_tr_err, Database};

pub async fn create_dashboard_session(
    db: &Database,
    contractor_id: i64,
    token: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), TradieError> {
    let token = token.to_string();
    let expires_at = codec::ts_to_string(expires_at);
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO dashboard_sessions (token, contractor_id, expires_at) \
                 VALUES (?1, ?2, ?3)",
                params![token, contractor_id, expires_at],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn purge_expired_dashboard_sessions(
    db: &Database,
    now: DateTime<Utc>,
) -> Result<u64, TradieError> {
    let now = codec::ts_to_string(now);
    db.connection()
        .call(move |conn| {
            let purged =
                conn.execute("DELETE FROM dashboard_sessions WHERE expires_at < ?1", params![now])?;
            Ok(purged as u64)
        })
        .await
        .map_err(map_tr_err)
}
