use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AdvisorError;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum RiskTolerance {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskTolerance {
    pub const ALL: [RiskTolerance; 5] = [
        RiskTolerance::VeryLow,
        RiskTolerance::Low,
        RiskTolerance::Medium,
        RiskTolerance::High,
        RiskTolerance::VeryHigh,
    ];

    /// Ordinal base score, 1 for `VeryLow` up to 5 for `VeryHigh`.
    pub fn ordinal(self) -> u8 {
        match self {
            RiskTolerance::VeryLow => 1,
            RiskTolerance::Low => 2,
            RiskTolerance::Medium => 3,
            RiskTolerance::High => 4,
            RiskTolerance::VeryHigh => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskTolerance::VeryLow => "Very Low",
            RiskTolerance::Low => "Low",
            RiskTolerance::Medium => "Medium",
            RiskTolerance::High => "High",
            RiskTolerance::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RiskTolerance {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "verylow" => Ok(RiskTolerance::VeryLow),
            "low" => Ok(RiskTolerance::Low),
            "medium" => Ok(RiskTolerance::Medium),
            "high" => Ok(RiskTolerance::High),
            "veryhigh" => Ok(RiskTolerance::VeryHigh),
            _ => Err(AdvisorError::invalid(
                "risk_tolerance",
                format!(
                    "unknown risk tolerance {s:?}; expected one of Very Low, Low, Medium, High, Very High"
                ),
            )),
        }
    }
}

impl TryFrom<String> for RiskTolerance {
    type Error = AdvisorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum FinancialGoal {
    RetirementPlanning,
    EmergencyFund,
    BuyAHouse,
    ChildrensEducation,
    StartABusiness,
}

impl FinancialGoal {
    pub fn label(self) -> &'static str {
        match self {
            FinancialGoal::RetirementPlanning => "Retirement Planning",
            FinancialGoal::EmergencyFund => "Emergency Fund",
            FinancialGoal::BuyAHouse => "Buy a House",
            FinancialGoal::ChildrensEducation => "Children's Education",
            FinancialGoal::StartABusiness => "Start a Business",
        }
    }
}

impl fmt::Display for FinancialGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FinancialGoal {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "retirementplanning" | "retirement" => Ok(FinancialGoal::RetirementPlanning),
            "emergencyfund" => Ok(FinancialGoal::EmergencyFund),
            "buyahouse" | "house" => Ok(FinancialGoal::BuyAHouse),
            "childrenseducation" | "education" => Ok(FinancialGoal::ChildrensEducation),
            "startabusiness" | "business" => Ok(FinancialGoal::StartABusiness),
            _ => Err(AdvisorError::invalid(
                "goals",
                format!("unknown financial goal {s:?}"),
            )),
        }
    }
}

impl TryFrom<String> for FinancialGoal {
    type Error = AdvisorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// Lowercase with separators and apostrophes removed: "Very Low", "very-low"
// and "veryLow" all normalize to "verylow".
fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_' | '\''))
        .flat_map(char::to_lowercase)
        .collect()
}

/// A validated snapshot of the user's inputs. Built at the CLI/HTTP boundary,
/// so every field is already within its documented range.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialProfile {
    pub monthly_income: f64,
    pub age: u32,
    pub risk_tolerance: RiskTolerance,
    pub investment_horizon_years: u32,
    pub goals: Vec<FinancialGoal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLine {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BudgetAllocation {
    pub lines: Vec<BudgetLine>,
}

impl BudgetAllocation {
    pub fn total(&self) -> f64 {
        self.lines.iter().map(|line| line.amount).sum()
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub struct AssetAllocation {
    pub stocks: u8,
    pub bonds: u8,
    pub cash: u8,
}

impl AssetAllocation {
    pub fn total(self) -> u32 {
        u32::from(self.stocks) + u32::from(self.bonds) + u32::from(self.cash)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfile {
    pub score: f64,
    pub allocation: AssetAllocation,
    pub analysis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfileDescription {
    pub level: u8,
    pub name: &'static str,
    pub description: &'static str,
    pub suitable_for: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentRecommendation {
    pub label: String,
    pub suggested_investments: Vec<String>,
    pub monthly_investment: f64,
    pub expected_return_range: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxStrategySet {
    pub accounts: Vec<String>,
    pub deductions: Vec<String>,
    pub credits: Vec<String>,
    pub estimated_savings_low: f64,
    pub estimated_savings_high: f64,
    pub estimated_savings_range: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct SavingsProjectionPoint {
    pub year: u32,
    pub value: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtPayoffStep {
    pub month: u32,
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    pub remaining_balance: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementNeed {
    pub years_until_retirement: u32,
    pub retirement_years: u32,
    pub future_annual_need: f64,
    pub total_needed: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementAssumptions {
    pub income_replacement_ratio: f64,
    pub inflation_rate: f64,
    pub expected_return: f64,
}

impl Default for RetirementAssumptions {
    fn default() -> Self {
        Self {
            income_replacement_ratio: 0.8,
            inflation_rate: 0.03,
            expected_return: 0.07,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetOverview {
    pub total_allocated: f64,
    pub allocation: BudgetAllocation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub budget_overview: BudgetOverview,
    pub risk_assessment: RiskProfile,
    pub investment_strategy: InvestmentRecommendation,
    pub tax_optimization: TaxStrategySet,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub summary: ReportSummary,
    pub action_items: Vec<String>,
    pub next_steps: Vec<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioMetrics {
    pub total_value: f64,
    pub total_return: f64,
    pub annual_return: Option<f64>,
    pub volatility: Option<f64>,
}
