use super::types::{
    BudgetAllocation, BudgetOverview, FinancialProfile, InvestmentRecommendation, Report,
    ReportSummary, RiskProfile, TaxStrategySet,
};
use super::{advisor, budget, scoring, tax};

const ACTION_ITEMS: [&str; 5] = [
    "Set up emergency fund with 3-6 months of expenses",
    "Optimize current tax situation using recommended strategies",
    "Begin investment plan based on risk profile",
    "Review and adjust budget allocations quarterly",
    "Consider consulting with a financial advisor for detailed planning",
];

const NEXT_STEPS: [&str; 5] = [
    "Review and implement suggested budget allocations",
    "Open recommended investment accounts",
    "Set up automatic contributions to investment accounts",
    "Schedule quarterly financial review",
    "Update beneficiary information on all accounts",
];

/// Combines the component outputs into one report. Action items and next
/// steps are the same for every profile.
pub fn generate(
    budget: BudgetAllocation,
    risk: RiskProfile,
    investments: InvestmentRecommendation,
    tax: TaxStrategySet,
) -> Report {
    Report {
        summary: ReportSummary {
            budget_overview: BudgetOverview {
                total_allocated: budget.total(),
                allocation: budget,
            },
            risk_assessment: risk,
            investment_strategy: investments,
            tax_optimization: tax,
        },
        action_items: ACTION_ITEMS.iter().map(|s| s.to_string()).collect(),
        next_steps: NEXT_STEPS.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn build_report(profile: &FinancialProfile) -> Report {
    generate(
        budget::analyze(profile.monthly_income),
        scoring::assess_risk(profile),
        advisor::recommendations_for(profile.risk_tolerance, profile.monthly_income),
        tax::strategies_for(profile.monthly_income),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{FinancialGoal, RiskTolerance};

    fn sample_profile() -> FinancialProfile {
        FinancialProfile {
            monthly_income: 5_000.0,
            age: 30,
            risk_tolerance: RiskTolerance::Medium,
            investment_horizon_years: 10,
            goals: vec![FinancialGoal::RetirementPlanning, FinancialGoal::EmergencyFund],
        }
    }

    #[test]
    fn report_total_allocated_matches_income() {
        let report = build_report(&sample_profile());
        let overview = &report.summary.budget_overview;
        assert!((overview.total_allocated - 5_000.0).abs() < 1e-9);
        assert_eq!(overview.allocation.lines.len(), 3);
    }

    #[test]
    fn report_carries_component_outputs() {
        let report = build_report(&sample_profile());
        assert_eq!(report.summary.investment_strategy.label, "Balanced Portfolio");
        assert!((report.summary.risk_assessment.score - 1.34).abs() < 1e-9);
        assert_eq!(
            report.summary.tax_optimization.estimated_savings_range,
            "$3,000.00 - $4,500.00 potential annual tax savings"
        );
        assert_eq!(report.action_items.len(), 5);
        assert_eq!(report.next_steps.len(), 5);
    }

    #[test]
    fn report_is_deterministic() {
        let profile = sample_profile();
        assert_eq!(build_report(&profile), build_report(&profile));
        let first = serde_json::to_string(&build_report(&profile)).expect("json");
        let second = serde_json::to_string(&build_report(&profile)).expect("json");
        assert_eq!(first, second);
    }

    #[test]
    fn advisory_lists_ignore_profile() {
        let mut other = sample_profile();
        other.monthly_income = 12_000.0;
        other.risk_tolerance = RiskTolerance::VeryHigh;
        let a = build_report(&sample_profile());
        let b = build_report(&other);
        assert_eq!(a.action_items, b.action_items);
        assert_eq!(a.next_steps, b.next_steps);
        assert_ne!(a.summary, b.summary);
    }

    #[test]
    fn report_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(build_report(&sample_profile())).expect("json");
        assert!(json["summary"]["budgetOverview"]["totalAllocated"].is_number());
        assert_eq!(
            json["summary"]["budgetOverview"]["allocation"][0]["category"],
            "Essential Expenses (50%)"
        );
        assert_eq!(json["summary"]["riskAssessment"]["allocation"]["stocks"], 20);
        assert!(json["actionItems"].is_array());
        assert!(json["nextSteps"].is_array());
    }
}
