// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Customer CRUD. Customers are created lazily on first inbound contact.

use chrono::Utc;
use rusqlite::{params, Row};
use tradie_core::types::Customer;
use tradie_core::TradieError;

use crate::codec;
use crate::database::{map_tr_err, Database};

const COLUMNS: &str = "id, phone, name, address, zip_code, created_at";

fn map_row(row: &Row<'_>) -> Result<Customer, rusqlite::Error> {
    let created_at: String = row.get(5)?;
    Ok(Customer {
        id: row.get(0)?,
        phone: row.get(1)?,
        name: row.get(2)?,
        address: row.get(3)?,
        zip_code: row.get(4)?,
        created_at: codec::ts_from_string(5, &created_at)?,
    })
}

pub async fn get_or_create_customer(db: &Database, phone: &str) -> Result<Customer, TradieError> {
    let phone = phone.to_string();
    let now = codec::ts_to_string(Utc::now());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO customers (phone, created_at) VALUES (?1, ?2)",
                params![phone, now],
            )?;
            let customer = conn.query_row(
                &format!("SELECT {COLUMNS} FROM customers WHERE phone = ?1"),
                params![phone],
                map_row,
            )?;
            Ok(customer)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn customer_by_id(db: &Database, id: i64) -> Result<Option<Customer>, TradieError> {
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {COLUMNS} FROM customers WHERE id = ?1"))?;
            let result = stmt.query_row(params![id], map_row);
            match result {
                Ok(customer) => Ok(Some(customer)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

pub async fn update_customer(db: &Database, customer: &Customer) -> Result<(), TradieError> {
    let c = customer.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE customers SET name = ?1, address = ?2, zip_code = ?3 WHERE id = ?4",
                params![c.name, c.address, c.zip_code, c.id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
