// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The two cost models and their multiplier tables.
//!
//! Both models are pure functions of (request, contractor profile). The
//! simple model reproduces the flat 1-3 hour band; the detailed model layers
//! complexity, urgency, emergency, and time-of-day multipliers over a
//! classified hour estimate and then clamps the range to sane floors.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use tradie_core::types::{Contractor, Urgency};

use crate::complexity::{self, Complexity};
use crate::{Quote, QuoteBreakdown, QuoteRequest, QuoteStrategy};

/// Hour band used by the simple model.
const SIMPLE_HOURS_MIN: f64 = 1.0;
const SIMPLE_HOURS_MAX: f64 = 3.0;

/// Spread applied around the detailed model's point estimate.
const RANGE_LOW: f64 = 0.85;
const RANGE_HIGH: f64 = 1.15;

/// The detailed range maximum is never less than minimum + this.
const MIN_RANGE_WIDTH: f64 = 50.0;

/// Urgency multiplier for the simple model. Emergency folds the contractor's
/// markup directly into the single multiplier.
fn simple_urgency_multiplier(urgency: Urgency, contractor: &Contractor) -> f64 {
    match urgency {
        Urgency::Low => 1.0,
        Urgency::Medium => 1.2,
        Urgency::High => 1.4,
        Urgency::Emergency => 1.0 + contractor.emergency_markup,
    }
}

/// Urgency multiplier for the detailed model. Emergency urgency caps at the
/// high-urgency factor here; the contractor's emergency markup is applied as
/// a separate factor so the two are visible independently in the breakdown.
fn detailed_urgency_multiplier(urgency: Urgency) -> f64 {
    match urgency {
        Urgency::Low => 1.0,
        Urgency::Medium => 1.2,
        Urgency::High => 1.4,
        Urgency::Emergency => 1.4,
    }
}

/// Time-of-day multiplier, applied only when a scheduled time is known.
///
/// Late night (22:00-08:00) takes precedence on any day; otherwise weekends
/// and evenings carry their own buckets.
pub fn time_of_day_multiplier(scheduled: Option<NaiveDateTime>) -> f64 {
    let Some(at) = scheduled else {
        return 1.0;
    };
    let hour = at.hour();
    if !(8..22).contains(&hour) {
        return 1.5;
    }
    let weekend = matches!(at.weekday(), Weekday::Sat | Weekday::Sun);
    let evening = (17..22).contains(&hour);
    match (weekend, evening) {
        (false, false) => 1.0,
        (false, true) => 1.2,
        (true, false) => 1.15,
        (true, true) => 1.3,
    }
}

/// Simple model: `(baseFee + hourlyRate x hours) x urgency` evaluated at the
/// 1-hour and 3-hour bounds. No floors, no breakdown factors.
pub fn estimate_simple(request: &QuoteRequest<'_>, contractor: &Contractor) -> Quote {
    let urgency_multiplier = simple_urgency_multiplier(request.urgency, contractor);
    let at_hours =
        |h: f64| (contractor.base_fee + contractor.hourly_rate * h) * urgency_multiplier;
    Quote {
        min: round_cents(at_hours(SIMPLE_HOURS_MIN)),
        max: round_cents(at_hours(SIMPLE_HOURS_MAX)),
        strategy: QuoteStrategy::Simple,
        breakdown: QuoteBreakdown {
            hours: SIMPLE_HOURS_MAX,
            complexity: None,
            complexity_multiplier: 1.0,
            urgency_multiplier,
            emergency_multiplier: 1.0,
            time_multiplier: 1.0,
            summary: "flat hour-band estimate".to_string(),
        },
    }
}

/// Detailed model: classified complexity, multiplier stack, clamped range.
pub fn estimate_detailed(request: &QuoteRequest<'_>, contractor: &Contractor) -> Quote {
    let complexity = complexity::classify(request.description, request.category);
    let profile = complexity::profile(request.category, complexity);

    let urgency_multiplier = detailed_urgency_multiplier(request.urgency);
    let emergency_multiplier = if request.urgency == Urgency::Emergency {
        1.0 + contractor.emergency_markup
    } else {
        1.0
    };
    let time_multiplier = time_of_day_multiplier(request.scheduled);

    let total = (contractor.base_fee + contractor.hourly_rate * profile.hours)
        * profile.multiplier
        * urgency_multiplier
        * emergency_multiplier
        * time_multiplier;

    // Floors: the minimum never undercuts a half-hour call-out, and the
    // range never collapses below a useful width.
    let floor = contractor.base_fee + 0.5 * contractor.hourly_rate;
    let min = (total * RANGE_LOW).max(floor);
    let max = (total * RANGE_HIGH).max(min + MIN_RANGE_WIDTH);

    Quote {
        min: round_cents(min),
        max: round_cents(max),
        strategy: QuoteStrategy::Detailed,
        breakdown: QuoteBreakdown {
            hours: profile.hours,
            complexity: Some(complexity),
            complexity_multiplier: profile.multiplier,
            urgency_multiplier,
            emergency_multiplier,
            time_multiplier,
            summary: profile.description.to_string(),
        },
    }
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
