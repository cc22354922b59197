// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Quoting engine for the Tradie dispatch system.
//!
//! This crate is deliberately pure: a quote is a deterministic function of
//! (job description, contractor profile, optional scheduled time). Two cost
//! models exist as explicit strategies; the choice is made once from config,
//! never ad hoc at a call site.

pub mod complexity;
pub mod pricing;
pub mod ranking;

use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tradie_core::types::{Contractor, Urgency};

pub use complexity::Complexity;
pub use ranking::{find_best_contractor, rank_contractors, RankedContractor};

/// Which cost model to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStrategy {
    /// Flat 1-3 hour band times an urgency multiplier.
    Simple,
    /// Complexity-classified hours with the full multiplier stack and floors.
    Detailed,
}

impl FromStr for QuoteStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(QuoteStrategy::Simple),
            "detailed" => Ok(QuoteStrategy::Detailed),
            other => Err(format!("unknown quote strategy `{other}`")),
        }
    }
}

/// Inputs to a quote: what the customer described, when the work would
/// happen. Everything else comes from the contractor profile.
#[derive(Debug, Clone, Copy)]
pub struct QuoteRequest<'a> {
    pub description: &'a str,
    pub category: &'a str,
    pub urgency: Urgency,
    /// Scheduled date/time if known; drives the time-of-day multiplier.
    pub scheduled: Option<NaiveDateTime>,
}

/// Factor-by-factor explanation of how a quote was computed.
#[derive(Debug, Clone)]
pub struct QuoteBreakdown {
    pub hours: f64,
    pub complexity: Option<Complexity>,
    pub complexity_multiplier: f64,
    pub urgency_multiplier: f64,
    pub emergency_multiplier: f64,
    pub time_multiplier: f64,
    pub summary: String,
}

/// A bounded price estimate.
#[derive(Debug, Clone)]
pub struct Quote {
    pub min: f64,
    pub max: f64,
    pub strategy: QuoteStrategy,
    pub breakdown: QuoteBreakdown,
}

/// Compute a quote with the given strategy.
pub fn estimate(
    strategy: QuoteStrategy,
    request: &QuoteRequest<'_>,
    contractor: &Contractor,
) -> Quote {
    match strategy {
        QuoteStrategy::Simple => pricing::estimate_simple(request, contractor),
        QuoteStrategy::Detailed => pricing::estimate_detailed(request, contractor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn contractor(base: f64, hourly: f64, markup: f64) -> Contractor {
        Contractor {
            id: 1,
            phone: "+15550001111".into(),
            business_name: "Ace Plumbing".into(),
            trade: "plumber".into(),
            zip_code: "90210".into(),
            service_radius_miles: 25.0,
            services: vec!["drain cleaning".into()],
            base_fee: base,
            hourly_rate: hourly,
            emergency_markup: markup,
            availability: BTreeMap::new(),
            active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn strategy_from_str() {
        assert_eq!(QuoteStrategy::from_str("simple").unwrap(), QuoteStrategy::Simple);
        assert_eq!(QuoteStrategy::from_str("Detailed").unwrap(), QuoteStrategy::Detailed);
        assert!(QuoteStrategy::from_str("cheapest").is_err());
    }

    #[test]
    fn estimate_is_deterministic() {
        let c = contractor(75.0, 100.0, 0.25);
        let request = QuoteRequest {
            description: "water heater leaking from the bottom",
            category: "plumbing",
            urgency: Urgency::High,
            scheduled: None,
        };
        let a = estimate(QuoteStrategy::Detailed, &request, &c);
        let b = estimate(QuoteStrategy::Detailed, &request, &c);
        assert_eq!(a.min, b.min);
        assert_eq!(a.max, b.max);
        assert_eq!(a.breakdown.hours, b.breakdown.hours);
    }

    proptest! {
        /// Detailed-model invariants hold for any sane contractor profile
        /// and description text.
        #[test]
        fn detailed_range_invariants(
            base in 10.0f64..500.0,
            hourly in 20.0f64..400.0,
            markup in 0.0f64..1.0,
            description in ".{0,80}",
            urgency_idx in 0usize..4,
        ) {
            let urgency = [Urgency::Low, Urgency::Medium, Urgency::High, Urgency::Emergency][urgency_idx];
            let c = contractor(base, hourly, markup);
            let request = QuoteRequest {
                description: &description,
                category: "plumbing",
                urgency,
                scheduled: None,
            };
            let q = estimate(QuoteStrategy::Detailed, &request, &c);
            prop_assert!(q.min <= q.max);
            // Floors hold up to cent rounding.
            prop_assert!(q.min >= base + 0.5 * hourly - 0.01);
            prop_assert!(q.max >= q.min + 50.0 - 0.01);
        }

        /// Emergency urgency never yields a lower estimate than low urgency.
        #[test]
        fn emergency_dominates_low(
            base in 10.0f64..500.0,
            hourly in 20.0f64..400.0,
            markup in 0.0f64..1.0,
            description in ".{0,80}",
        ) {
            let c = contractor(base, hourly, markup);
            let mut request = QuoteRequest {
                description: &description,
                category: "plumbing",
                urgency: Urgency::Low,
                scheduled: None,
            };
            let low = estimate(QuoteStrategy::Detailed, &request, &c);
            request.urgency = Urgency::Emergency;
            let emergency = estimate(QuoteStrategy::Detailed, &request, &c);
            prop_assert!(emergency.min >= low.min);
            prop_assert!(emergency.max >= low.max);

            request.urgency = Urgency::Low;
            let low = estimate(QuoteStrategy::Simple, &request, &c);
            request.urgency = Urgency::Emergency;
            let emergency = estimate(QuoteStrategy::Simple, &request, &c);
            prop_assert!(emergency.min >= low.min);
            prop_assert!(emergency.max >= low.max);
        }
    }
}
