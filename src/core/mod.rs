pub mod advisor;
pub mod budget;
pub mod format;
pub mod metrics;
pub mod projection;
pub mod report;
pub mod scoring;
pub mod tax;
mod types;

pub use types::{
    AssetAllocation, BudgetAllocation, BudgetLine, BudgetOverview, DebtPayoffStep,
    FinancialGoal, FinancialProfile, InvestmentRecommendation, PortfolioMetrics, PriceBar,
    Report, ReportSummary, RetirementAssumptions, RetirementNeed, RiskProfile,
    RiskProfileDescription, RiskTolerance, SavingsProjectionPoint, TaxStrategySet,
};
