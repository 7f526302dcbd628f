use super::types::{InvestmentRecommendation, RiskTolerance};

/// Share of monthly income suggested for investing. The same for every risk
/// level; see DESIGN.md.
pub const MONTHLY_INVESTMENT_RATIO: f64 = 0.2;

struct PortfolioTemplate {
    label: &'static str,
    investments: [&'static str; 4],
    expected_return: &'static str,
}

const CONSERVATIVE: PortfolioTemplate = PortfolioTemplate {
    label: "Conservative Portfolio",
    investments: [
        "High-yield savings accounts",
        "Government bonds",
        "Certificate of Deposits (CDs)",
        "Blue-chip dividend stocks (10-20%)",
    ],
    expected_return: "3-5% annually",
};

const MODERATE_CONSERVATIVE: PortfolioTemplate = PortfolioTemplate {
    label: "Moderate Conservative Portfolio",
    investments: [
        "Government and corporate bonds (40-50%)",
        "Large-cap stocks (30-40%)",
        "Real Estate Investment Trusts (10-20%)",
        "Cash and equivalents (10%)",
    ],
    expected_return: "5-7% annually",
};

const BALANCED: PortfolioTemplate = PortfolioTemplate {
    label: "Balanced Portfolio",
    investments: [
        "US stocks (40%)",
        "International stocks (20%)",
        "Bonds (30%)",
        "Real Estate and alternatives (10%)",
    ],
    expected_return: "7-9% annually",
};

const GROWTH: PortfolioTemplate = PortfolioTemplate {
    label: "Growth Portfolio",
    investments: [
        "US stocks (50%)",
        "International stocks (30%)",
        "Bonds (15%)",
        "Growth stocks and alternatives (5%)",
    ],
    expected_return: "9-11% annually",
};

const AGGRESSIVE: PortfolioTemplate = PortfolioTemplate {
    label: "Aggressive Portfolio",
    investments: [
        "US stocks (60%)",
        "International stocks (25%)",
        "Emerging markets (10%)",
        "Crypto and alternatives (5%)",
    ],
    expected_return: "11-13% annually",
};

fn template_for(risk_tolerance: RiskTolerance) -> &'static PortfolioTemplate {
    match risk_tolerance {
        RiskTolerance::VeryLow => &CONSERVATIVE,
        RiskTolerance::Low => &MODERATE_CONSERVATIVE,
        RiskTolerance::Medium => &BALANCED,
        RiskTolerance::High => &GROWTH,
        RiskTolerance::VeryHigh => &AGGRESSIVE,
    }
}

pub fn recommendations_for(
    risk_tolerance: RiskTolerance,
    monthly_income: f64,
) -> InvestmentRecommendation {
    let template = template_for(risk_tolerance);
    InvestmentRecommendation {
        label: template.label.to_string(),
        suggested_investments: template.investments.iter().map(|s| s.to_string()).collect(),
        monthly_investment: monthly_income * MONTHLY_INVESTMENT_RATIO,
        expected_return_range: template.expected_return.to_string(),
    }
}
