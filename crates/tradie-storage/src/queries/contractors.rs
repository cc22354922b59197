// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contractor CRUD and scans.

use chrono::Utc;
use rusqlite::{params, Row};
use tradie_core::types::{Contractor, NewContractor};
use tradie_core::TradieError;

use crate::codec;
use crate::database::{map_tr_err, Database};

const COLUMNS: &str = "id, phone, business_name, trade, zip_code, service_radius_miles, \
     services, base_fee, hourly_rate, emergency_markup, availability, active, \
     created_at, updated_at";

fn map_row(row: &Row<'_>) -> Result<Contractor, rusqlite::Error> {
    let services: String = row.get(6)?;
    let availability: String = row.get(10)?;
    let created_at: String = row.get(12)?;
    let updated_at: String = row.get(13)?;
    Ok(Contractor {
        id: row.get(0)?,
        phone: row.get(1)?,
        business_name: row.get(2)?,
        trade: row.get(3)?,
        zip_code: row.get(4)?,
        service_radius_miles: row.get(5)?,
        services: codec::json_from_string(6, &services)?,
        base_fee: row.get(7)?,
        hourly_rate: row.get(8)?,
        emergency_markup: row.get(9)?,
        availability: codec::json_from_string(10, &availability)?,
        active: row.get(11)?,
        created_at: codec::ts_from_string(12, &created_at)?,
        updated_at: codec::ts_from_string(13, &updated_at)?,
    })
}

pub async fn create_contractor(
    db: &Database,
    new: &NewContractor,
) -> Result<Contractor, TradieError> {
    let new = new.clone();
    let services = codec::json_to_string(&new.services)?;
    let availability = codec::json_to_string(&new.availability)?;
    let now = codec::ts_to_string(Utc::now());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO contractors (phone, business_name, trade, zip_code, \
                 service_radius_miles, services, base_fee, hourly_rate, \
                 emergency_markup, availability, active, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 1, ?11, ?11)",
                params![
                    new.phone,
                    new.business_name,
                    new.trade,
                    new.zip_code,
                    new.service_radius_miles,
                    services,
                    new.base_fee,
                    new.hourly_rate,
                    new.emergency_markup,
                    availability,
                    now,
                ],
            )?;
            let id = conn.last_insert_rowid();
            let contractor = conn.query_row(
                &format!("SELECT {COLUMNS} FROM contractors WHERE id = ?1"),
                params![id],
                map_row,
            )?;
            Ok(contractor)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn contractor_by_phone(
    db: &Database,
    phone: &str,
) -> Result<Option<Contractor>, TradieError> {
    let phone = phone.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn
                .prepare(&format!("SELECT {COLUMNS} FROM contractors WHERE phone = ?1"))?;
            let result = stmt.query_row(params![phone], map_row);
            match result {
                Ok(contractor) => Ok(Some(contractor)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

pub async fn contractor_by_id(db: &Database, id: i64) -> Result<Option<Contractor>, TradieError> {
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {COLUMNS} FROM contractors WHERE id = ?1"))?;
            let result = stmt.query_row(params![id], map_row);
            match result {
                Ok(contractor) => Ok(Some(contractor)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

pub async fn update_contractor(db: &Database, contractor: &Contractor) -> Result<(), TradieError> {
    let c = contractor.clone();
    let services = codec::json_to_string(&c.services)?;
    let availability = codec::json_to_string(&c.availability)?;
    let now = codec::ts_to_string(Utc::now());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE contractors SET business_name = ?1, trade = ?2, zip_code = ?3, \
                 service_radius_miles = ?4, services = ?5, base_fee = ?6, hourly_rate = ?7, \
                 emergency_markup = ?8, availability = ?9, active = ?10, updated_at = ?11 \
                 WHERE id = ?12",
                params![
                    c.business_name,
                    c.trade,
                    c.zip_code,
                    c.service_radius_miles,
                    services,
                    c.base_fee,
                    c.hourly_rate,
                    c.emergency_markup,
                    availability,
                    c.active,
                    now,
                    c.id,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn active_contractors(db: &Database) -> Result<Vec<Contractor>, TradieError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM contractors WHERE active = 1 ORDER BY id"
            ))?;
            let rows = stmt.query_map([], map_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn active_contractors_in_zip(
    db: &Database,
    zip: &str,
) -> Result<Vec<Contractor>, TradieError> {
    let zip = zip.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM contractors WHERE active = 1 AND zip_code = ?1 ORDER BY id"
            ))?;
            let rows = stmt.query_map(params![zip], map_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await
        .map_err(map_tr_err)
}
