use super::types::{
    AssetAllocation, FinancialProfile, RiskProfile, RiskProfileDescription, RiskTolerance,
};

const SCORE_BREAKPOINTS: [f64; 4] = [1.5, 2.5, 3.5, 4.5];

const ALLOCATIONS: [AssetAllocation; 5] = [
    AssetAllocation {
        stocks: 20,
        bonds: 60,
        cash: 20,
    },
    AssetAllocation {
        stocks: 40,
        bonds: 50,
        cash: 10,
    },
    AssetAllocation {
        stocks: 60,
        bonds: 30,
        cash: 10,
    },
    AssetAllocation {
        stocks: 80,
        bonds: 15,
        cash: 5,
    },
    AssetAllocation {
        stocks: 90,
        bonds: 5,
        cash: 5,
    },
];

const ANALYSES: [&str; 5] = [
    "Conservative investor focused on capital preservation",
    "Moderate conservative investor seeking stable growth",
    "Balanced investor looking for growth and stability",
    "Growth-oriented investor comfortable with market volatility",
    "Aggressive investor seeking maximum growth potential",
];

const RISK_PROFILE_DESCRIPTIONS: [RiskProfileDescription; 5] = [
    RiskProfileDescription {
        level: 1,
        name: "Conservative",
        description: "Focus on preserving capital with minimal risk tolerance.",
        suitable_for: "Retirees or those near retirement, very risk-averse investors.",
    },
    RiskProfileDescription {
        level: 2,
        name: "Moderately Conservative",
        description: "Emphasis on stability with some growth potential.",
        suitable_for: "Pre-retirees, conservative investors seeking some growth.",
    },
    RiskProfileDescription {
        level: 3,
        name: "Moderate",
        description: "Balance between stability and growth.",
        suitable_for: "Mid-career professionals, balanced investors.",
    },
    RiskProfileDescription {
        level: 4,
        name: "Moderately Aggressive",
        description: "Focus on growth with acceptance of market volatility.",
        suitable_for: "Young professionals, growth-oriented investors.",
    },
    RiskProfileDescription {
        level: 5,
        name: "Aggressive",
        description: "Maximum growth potential with high risk tolerance.",
        suitable_for: "Young investors with long time horizons, very risk-tolerant individuals.",
    },
];

fn raw_risk_score(risk_tolerance: RiskTolerance, age: u32, horizon_years: u32) -> f64 {
    let base = f64::from(risk_tolerance.ordinal());
    let age_factor = (100.0 - f64::from(age)) / 100.0;
    let horizon_factor = f64::from(horizon_years) / 30.0;
    (base + age_factor + horizon_factor) / 3.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// Index of the bucket for `score`; each breakpoint is the exclusive upper
// bound of the bucket below it.
fn bucket_index(score: f64) -> usize {
    SCORE_BREAKPOINTS
        .iter()
        .position(|&threshold| score < threshold)
        .unwrap_or(SCORE_BREAKPOINTS.len())
}

/// Mean of the ordinal tolerance, `(100 - age) / 100` and `horizon / 30`,
/// rounded to two decimals.
pub fn compute_risk_score(risk_tolerance: RiskTolerance, age: u32, horizon_years: u32) -> f64 {
    round2(raw_risk_score(risk_tolerance, age, horizon_years))
}

pub fn allocation_for_score(score: f64) -> AssetAllocation {
    ALLOCATIONS[bucket_index(score)]
}

pub fn analysis_for_score(score: f64) -> &'static str {
    ANALYSES[bucket_index(score)]
}

/// Builds the risk profile for a validated profile. The reported score is
/// rounded; allocation and analysis are picked from the unrounded score.
pub fn assess_risk(profile: &FinancialProfile) -> RiskProfile {
    let raw = raw_risk_score(
        profile.risk_tolerance,
        profile.age,
        profile.investment_horizon_years,
    );
    RiskProfile {
        score: round2(raw),
        allocation: allocation_for_score(raw),
        analysis: analysis_for_score(raw).to_string(),
    }
}

/// Describes a 1-5 risk level; anything outside that range falls back to the
/// moderate profile.
pub fn risk_profile_description(level: u8) -> RiskProfileDescription {
    let index = match level {
        1..=5 => usize::from(level) - 1,
        _ => 2,
    };
    RISK_PROFILE_DESCRIPTIONS[index].clone()
}

pub fn risk_profile_catalogue() -> Vec<RiskProfileDescription> {
    RISK_PROFILE_DESCRIPTIONS.to_vec()
}
