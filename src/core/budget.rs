use super::types::{BudgetAllocation, BudgetLine};

const BUCKETS: [(&str, f64); 3] = [
    ("Essential Expenses (50%)", 0.5),
    ("Wants (30%)", 0.3),
    ("Savings & Debt (20%)", 0.2),
];

/// Splits monthly income with the 50/30/20 rule, in that order.
pub fn analyze(monthly_income: f64) -> BudgetAllocation {
    BudgetAllocation {
        lines: BUCKETS
            .iter()
            .map(|&(category, ratio)| BudgetLine {
                category: category.to_string(),
                amount: monthly_income * ratio,
            })
            .collect(),
    }
}
