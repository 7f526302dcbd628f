use super::format::format_currency;
use super::types::TaxStrategySet;

const SAVINGS_RATE: f64 = 0.05;
const SAVINGS_CAP: f64 = 5_000.0;
const UPPER_BOUND_MULTIPLIER: f64 = 1.5;

const ACCOUNTS: [&str; 3] = [
    "Maximize 401(k) contributions",
    "Consider Traditional or Roth IRA",
    "Health Savings Account (HSA) if eligible",
];

const DEDUCTIONS: [&str; 3] = [
    "Student loan interest deduction",
    "Home mortgage interest deduction",
    "Charitable contributions",
];

const CREDITS: [&str; 3] = [
    "Child tax credit",
    "Education credits",
    "Energy-efficient home improvement credits",
];

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn strategies_for(monthly_income: f64) -> TaxStrategySet {
    let annual_income = monthly_income * 12.0;
    let low = (annual_income * SAVINGS_RATE).min(SAVINGS_CAP);
    let high = low * UPPER_BOUND_MULTIPLIER;

    TaxStrategySet {
        accounts: to_strings(&ACCOUNTS),
        deductions: to_strings(&DEDUCTIONS),
        credits: to_strings(&CREDITS),
        estimated_savings_low: low,
        estimated_savings_high: high,
        estimated_savings_range: format!(
            "{} - {} potential annual tax savings",
            format_currency(low),
            format_currency(high)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn savings_estimate_is_five_percent_of_annual_income() {
        // 5000 * 12 * 0.05 = 3000
        let tax = strategies_for(5_000.0);
        assert!((tax.estimated_savings_low - 3_000.0).abs() < 1e-9);
        assert!((tax.estimated_savings_high - 4_500.0).abs() < 1e-9);
        assert_eq!(
            tax.estimated_savings_range,
            "$3,000.00 - $4,500.00 potential annual tax savings"
        );
    }

    #[test]
    fn savings_estimate_caps_at_five_thousand() {
        let tax = strategies_for(20_000.0);
        assert_eq!(
            tax.estimated_savings_range,
            "$5,000.00 - $7,500.00 potential annual tax savings"
        );
    }

    #[test]
    fn zero_income_still_returns_advice_lists() {
        let tax = strategies_for(0.0);
        assert_eq!(tax.accounts.len(), 3);
        assert_eq!(tax.deductions.len(), 3);
        assert_eq!(tax.credits.len(), 3);
        assert_eq!(
            tax.estimated_savings_range,
            "$0.00 - $0.00 potential annual tax savings"
        );
    }
}
