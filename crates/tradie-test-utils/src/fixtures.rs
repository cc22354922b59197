// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entity fixtures shared across component tests.

use std::collections::BTreeMap;

use tradie_core::types::{NewContractor, NewJob, Urgency};

/// A plumbing contractor in zip 90210 with the standard test rates
/// (base 75, hourly 100, emergency markup 0.25).
pub fn contractor_fixture(phone: &str, business_name: &str) -> NewContractor {
    NewContractor {
        phone: phone.to_string(),
        business_name: business_name.to_string(),
        trade: "plumber".to_string(),
        zip_code: "90210".to_string(),
        service_radius_miles: 25.0,
        services: vec!["drain cleaning".to_string(), "water heaters".to_string()],
        base_fee: 75.0,
        hourly_rate: 100.0,
        emergency_markup: 0.25,
        availability: BTreeMap::from([
            ("mon".to_string(), "8-17".to_string()),
            ("tue".to_string(), "8-17".to_string()),
            ("wed".to_string(), "8-17".to_string()),
            ("thu".to_string(), "8-17".to_string()),
            ("fri".to_string(), "8-17".to_string()),
        ]),
    }
}

/// A medium-urgency plumbing job in zip 90210.
pub fn job_fixture(customer_id: i64) -> NewJob {
    NewJob {
        customer_id,
        contractor_id: None,
        description: "kitchen sink is draining slowly".to_string(),
        category: "plumbing".to_string(),
        urgency: Urgency::Medium,
        address: Some("12 Palm Dr".to_string()),
        zip_code: "90210".to_string(),
        estimate_min: 150.0,
        estimate_max: 300.0,
    }
}
