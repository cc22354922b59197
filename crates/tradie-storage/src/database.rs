// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use tokio_rusqlite::Connection;
use tracing::debug;
use tradie_core::TradieError;

use crate::migrations;

/// Handle to the SQLite database, shared by all query modules.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run all
    /// pending migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, TradieError> {
        let connection = Connection::open(path).await.map_err(map_tr_err)?;

        connection
            .call(move |conn| {
                conn.execute_batch("PRAGMA foreign_keys = ON;")?;
                if wal_mode {
                    conn.pragma_update(None, "journal_mode", "WAL")?;
                }
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        connection
            .call(|conn| {
                migrations::run_migrations(conn)?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { connection })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Checkpoint the WAL before shutdown.
    pub async fn close(&self) -> Result<(), TradieError> {
        self.connection
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Map a tokio-rusqlite error into the workspace error type.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error) -> TradieError {
    TradieError::Storage {
        source: Box::new(e),
    }
}

/// Wrap a serialization/parse failure encountered while mapping a row, so it
/// surfaces through rusqlite's error channel with the offending column.
pub(crate) fn column_decode_err<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(err))
}
