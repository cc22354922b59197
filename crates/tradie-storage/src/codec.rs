// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Column encoding helpers shared by the query modules.
//!
//! Timestamps are RFC 3339 UTC strings, dates `YYYY-MM-DD`, times `HH:MM`.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::database::column_decode_err;

pub fn ts_to_string(t: DateTime<Utc>) -> String {
    t.to_rfc3339()
}

pub fn ts_from_string(column: usize, s: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| column_decode_err(column, e))
}

pub fn date_to_string(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

pub fn date_from_string(column: usize, s: &str) -> Result<NaiveDate, rusqlite::Error> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| column_decode_err(column, e))
}

pub fn time_to_string(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

pub fn time_from_string(column: usize, s: &str) -> Result<NaiveTime, rusqlite::Error> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|e| column_decode_err(column, e))
}

pub fn json_to_string<T: serde::Serialize>(
    value: &T,
) -> Result<String, tradie_core::TradieError> {
    serde_json::to_string(value).map_err(tradie_core::TradieError::storage)
}

pub fn json_from_string<T: serde::de::DeserializeOwned>(
    column: usize,
    s: &str,
) -> Result<T, rusqlite::Error> {
    serde_json::from_str(s).map_err(|e| column_decode_err(column, e))
}

/// Parse a closed string-mapped enum column (job status, urgency, state).
pub fn enum_from_string<T: std::str::FromStr>(
    column: usize,
    s: &str,
) -> Result<T, rusqlite::Error>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    s.parse::<T>().map_err(|e| column_decode_err(column, e))
}
