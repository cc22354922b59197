// SPDX-FileCopyrightText: 2026 Tradie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic job complexity classification.
//!
//! Classifies a problem description into Simple/Moderate/Complex per service
//! category using keyword matching. Zero cost, zero latency, no network.
//! Complex keywords are checked before moderate before simple; a description
//! matching nothing defaults to Moderate.

use strum::Display;

/// Job complexity tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
}

/// Keyword table for one service category.
struct CategoryKeywords {
    category: &'static str,
    complex: &'static [&'static str],
    moderate: &'static [&'static str],
    simple: &'static [&'static str],
}

const CATEGORY_KEYWORDS: &[CategoryKeywords] = &[
    CategoryKeywords {
        category: "plumbing",
        complex: &[
            "repipe", "sewer", "main line", "slab leak", "water heater replace",
            "burst", "flooding", "excavat",
        ],
        moderate: &[
            "water heater", "leak", "replace faucet", "garbage disposal",
            "toilet replace", "pipe", "low pressure",
        ],
        simple: &[
            "drip", "clog", "unclog", "drain", "running toilet", "washer",
            "aerator",
        ],
    },
    CategoryKeywords {
        category: "electrical",
        complex: &[
            "panel", "rewire", "service upgrade", "breaker box", "generator",
            "ev charger", "220", "240v",
        ],
        moderate: &[
            "ceiling fan", "new outlet", "new circuit", "gfci", "light fixture",
            "dimmer", "flickering",
        ],
        simple: &["switch", "outlet", "bulb", "doorbell", "reset breaker"],
    },
    CategoryKeywords {
        category: "hvac",
        complex: &[
            "replace unit", "new system", "ductwork", "compressor", "furnace replace",
            "heat pump install",
        ],
        moderate: &[
            "not cooling", "not heating", "refrigerant", "blower", "condenser",
            "strange noise",
        ],
        simple: &["filter", "thermostat", "tune-up", "tune up", "maintenance"],
    },
    CategoryKeywords {
        category: "general",
        complex: &["remodel", "structural", "foundation", "addition", "full replace"],
        moderate: &["install", "repair", "replace", "patch", "assemble"],
        simple: &["hang", "mount", "caulk", "touch up", "adjust"],
    },
];

/// Classify a problem description's complexity for a service category.
///
/// Unknown categories use the `general` keyword table. Matching is
/// case-insensitive substring containment.
pub fn classify(description: &str, category: &str) -> Complexity {
    let lower = description.to_lowercase();
    let cat = category.trim().to_lowercase();

    let table = CATEGORY_KEYWORDS
        .iter()
        .find(|t| t.category == cat)
        .unwrap_or_else(|| {
            // Last entry is the general fallback table.
            &CATEGORY_KEYWORDS[CATEGORY_KEYWORDS.len() - 1]
        });

    // Order matters: complex wins over moderate wins over simple.
    if table.complex.iter().any(|k| lower.contains(k)) {
        return Complexity::Complex;
    }
    if table.moderate.iter().any(|k| lower.contains(k)) {
        return Complexity::Moderate;
    }
    if table.simple.iter().any(|k| lower.contains(k)) {
        return Complexity::Simple;
    }
    Complexity::Moderate
}

/// Estimate parameters for a (category, complexity) pair.
#[derive(Debug, Clone, Copy)]
pub struct ComplexityProfile {
    /// Estimated labor hours.
    pub hours: f64,
    /// Multiplier applied on top of base + hourly cost.
    pub multiplier: f64,
    /// Human-readable summary used in quote copy.
    pub description: &'static str,
}

/// Look up the estimate profile for a category and complexity.
pub fn profile(category: &str, complexity: Complexity) -> ComplexityProfile {
    let cat = category.trim().to_lowercase();
    match (cat.as_str(), complexity) {
        ("plumbing", Complexity::Simple) => ComplexityProfile {
            hours: 1.0,
            multiplier: 1.0,
            description: "minor plumbing fix",
        },
        ("plumbing", Complexity::Moderate) => ComplexityProfile {
            hours: 2.5,
            multiplier: 1.1,
            description: "standard plumbing repair",
        },
        ("plumbing", Complexity::Complex) => ComplexityProfile {
            hours: 5.0,
            multiplier: 1.3,
            description: "major plumbing work",
        },
        ("electrical", Complexity::Simple) => ComplexityProfile {
            hours: 1.0,
            multiplier: 1.0,
            description: "minor electrical fix",
        },
        ("electrical", Complexity::Moderate) => ComplexityProfile {
            hours: 2.0,
            multiplier: 1.15,
            description: "standard electrical work",
        },
        ("electrical", Complexity::Complex) => ComplexityProfile {
            hours: 6.0,
            multiplier: 1.35,
            description: "major electrical work",
        },
        ("hvac", Complexity::Simple) => ComplexityProfile {
            hours: 1.0,
            multiplier: 1.0,
            description: "HVAC maintenance",
        },
        ("hvac", Complexity::Moderate) => ComplexityProfile {
            hours: 3.0,
            multiplier: 1.2,
            description: "HVAC repair",
        },
        ("hvac", Complexity::Complex) => ComplexityProfile {
            hours: 8.0,
            multiplier: 1.4,
            description: "HVAC system replacement",
        },
        (_, Complexity::Simple) => ComplexityProfile {
            hours: 1.0,
            multiplier: 1.0,
            description: "small job",
        },
        (_, Complexity::Moderate) => ComplexityProfile {
            hours: 2.0,
            multiplier: 1.1,
            description: "standard job",
        },
        (_, Complexity::Complex) => ComplexityProfile {
            hours: 5.0,
            multiplier: 1.3,
            description: "large job",
        },
    }
}
