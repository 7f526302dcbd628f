use super::types::{DebtPayoffStep, RetirementAssumptions, RetirementNeed, SavingsProjectionPoint};
use crate::error::{AdvisorError, Result};


const RATE_EPSILON: f64 = 1e-12;

/// Value after `month` contributions of `monthly_savings` compounding at
/// `monthly_rate`.
fn annuity_future_value(monthly_savings: f64, monthly_rate: f64, month: u32) -> f64 {
    if monthly_rate == 0.0 {
        return monthly_savings * f64::from(month);
    }
    monthly_savings * ((1.0 + monthly_rate).powf(f64::from(month)) - 1.0) / monthly_rate
}

/// Year-by-year value of a monthly savings plan, years `0..=years`.
///
/// `expected_return_pct` is annual, in percent. A zero rate grows linearly.
pub fn savings_projection(
    monthly_savings: f64,
    years: u32,
    expected_return_pct: f64,
) -> Vec<SavingsProjectionPoint> {
    let monthly_rate = expected_return_pct / 12.0 / 100.0;
    (0..=years)
        .map(|year| SavingsProjectionPoint {
            year,
            value: annuity_future_value(monthly_savings, monthly_rate, year * 12),
        })
        .collect()
}

/// Amortizes `debt_amount` at `annual_interest_rate_pct` with a fixed monthly
/// payment until the balance reaches exactly zero.
///
/// Fails with [`AdvisorError::InsufficientPayment`] when the payment does not
/// exceed the first month's interest, and with [`AdvisorError::PayoffStalled`]
/// when a payment is too small to change the balance in floating point.
pub fn debt_payoff_schedule(
    debt_amount: f64,
    annual_interest_rate_pct: f64,
    monthly_payment: f64,
) -> Result<Vec<DebtPayoffStep>> {
    amortize(debt_amount, annual_interest_rate_pct, monthly_payment, None)
}

/// Same as [`debt_payoff_schedule`], but gives up with
/// [`AdvisorError::PayoffHorizonExceeded`] once the schedule would run past
/// `max_months`.
pub fn debt_payoff_schedule_within(
    debt_amount: f64,
    annual_interest_rate_pct: f64,
    monthly_payment: f64,
    max_months: u32,
) -> Result<Vec<DebtPayoffStep>> {
    amortize(
        debt_amount,
        annual_interest_rate_pct,
        monthly_payment,
        Some(max_months),
    )
}

fn amortize(
    debt_amount: f64,
    annual_interest_rate_pct: f64,
    monthly_payment: f64,
    max_months: Option<u32>,
) -> Result<Vec<DebtPayoffStep>> {
    for (field, value) in [
        ("debt_amount", debt_amount),
        ("interest_rate", annual_interest_rate_pct),
        ("monthly_payment", monthly_payment),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(AdvisorError::invalid(field, "must be a finite value >= 0"));
        }
    }

    let interest_only = debt_amount * annual_interest_rate_pct / 1200.0;
    if debt_amount > 0.0 && monthly_payment <= interest_only {
        return Err(AdvisorError::InsufficientPayment {
            monthly_payment,
            interest_only,
        });
    }

    let mut schedule = Vec::new();
    let mut remaining_balance = debt_amount;
    let mut month = 0u32;

    while remaining_balance > 0.0 {
        if let Some(max_months) = max_months.filter(|&max| month >= max) {
            return Err(AdvisorError::PayoffHorizonExceeded { months: max_months });
        }

        let interest = remaining_balance * annual_interest_rate_pct / 1200.0;
        let principal = (monthly_payment - interest).min(remaining_balance);
        let next_balance = remaining_balance - principal;
        if next_balance >= remaining_balance {
            return Err(AdvisorError::PayoffStalled {
                month: month + 1,
                remaining_balance,
            });
        }
        remaining_balance = next_balance;
        month += 1;

        schedule.push(DebtPayoffStep {
            month,
            payment: monthly_payment,
            principal,
            interest,
            remaining_balance,
        });
    }

    Ok(schedule)
}

/// Annual income needed in retirement and the pot required to fund it.
///
/// When the expected return equals inflation the pot is the future annual
/// need times the number of retirement years.
pub fn retirement_need(
    current_age: u32,
    retirement_age: u32,
    life_expectancy: u32,
    current_income: f64,
    assumptions: RetirementAssumptions,
) -> Result<RetirementNeed> {
    if retirement_age < current_age {
        return Err(AdvisorError::invalid(
            "retirement_age",
            "must be >= current_age",
        ));
    }
    if life_expectancy < retirement_age {
        return Err(AdvisorError::invalid(
            "life_expectancy",
            "must be >= retirement_age",
        ));
    }
    if !current_income.is_finite() || current_income < 0.0 {
        return Err(AdvisorError::invalid(
            "current_income",
            "must be a finite value >= 0",
        ));
    }

    if !assumptions.income_replacement_ratio.is_finite()
        || assumptions.income_replacement_ratio < 0.0
    {
        return Err(AdvisorError::invalid(
            "income_replacement_ratio",
            "must be a finite value >= 0",
        ));
    }
    for (field, rate) in [
        ("inflation_rate", assumptions.inflation_rate),
        ("expected_return", assumptions.expected_return),
    ] {
        if !rate.is_finite() || rate <= -1.0 {
            return Err(AdvisorError::invalid(field, "must be a finite rate > -1"));
        }
    }

    let RetirementAssumptions {
        income_replacement_ratio,
        inflation_rate,
        expected_return,
    } = assumptions;

    let years_until_retirement = retirement_age - current_age;
    let retirement_years = life_expectancy - retirement_age;

    let future_annual_need = current_income
        * income_replacement_ratio
        * (1.0 + inflation_rate).powf(f64::from(years_until_retirement));

    let rate_gap = expected_return - inflation_rate;
    let total_needed = if rate_gap.abs() < RATE_EPSILON {
        future_annual_need * f64::from(retirement_years)
    } else {
        future_annual_need * (1.0 - (1.0 - rate_gap).powf(f64::from(retirement_years)))
            / rate_gap
    };

    Ok(RetirementNeed {
        years_until_retirement,
        retirement_years,
        future_annual_need,
        total_needed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    #[test]
    fn savings_projection_zero_rate_is_linear() {
        let points = savings_projection(100.0, 10, 0.0);
        assert_eq!(points.len(), 11);
        assert_eq!(points[0].year, 0);
        assert_approx(points[0].value, 0.0);
        assert_approx(points[5].value, 6_000.0);
        assert_eq!(points[10].year, 10);
        assert_approx(points[10].value, 12_000.0);
    }

    #[test]
    fn savings_projection_compounds_monthly() {
        let points = savings_projection(100.0, 1, 12.0);
        // 100 * (1.01^12 - 1) / 0.01
        assert_approx_tol(points[1].value, 1_268.250_301_319_7, 1e-6);
        assert_approx(points[0].value, 0.0);
    }

    #[test]
    fn savings_projection_zero_years_has_single_point() {
        let points = savings_projection(250.0, 0, 7.0);
        assert_eq!(points, vec![SavingsProjectionPoint { year: 0, value: 0.0 }]);
    }

    #[test]
    fn debt_payoff_reaches_zero_with_decreasing_balance() {
        let schedule = debt_payoff_schedule(1_000.0, 12.0, 50.0).expect("payment covers interest");
        assert!(!schedule.is_empty());
        assert_eq!(schedule.last().map(|s| s.remaining_balance), Some(0.0));

        let mut previous = 1_000.0;
        for (idx, step) in schedule.iter().enumerate() {
            assert_eq!(step.month as usize, idx + 1);
            assert!(step.remaining_balance < previous);
            assert_approx(step.principal + step.remaining_balance, previous);
            previous = step.remaining_balance;
        }
        assert_approx(schedule[0].interest, 10.0);
        assert_approx(schedule[0].principal, 40.0);
        // ln(1.25) / ln(1.01) = 22.4 months, so the 23rd payment is partial.
        assert_eq!(schedule.len(), 23);
        let last = schedule.last().expect("non-empty");
        assert!(last.principal + last.interest <= 50.0 + EPS);
    }

    #[test]
    fn debt_payoff_rejects_payment_below_interest() {
        let err = debt_payoff_schedule(1_000.0, 12.0, 9.0).expect_err("must reject");
        match err {
            AdvisorError::InsufficientPayment {
                monthly_payment,
                interest_only,
            } => {
                assert_approx(monthly_payment, 9.0);
                assert_approx(interest_only, 10.0);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn debt_payoff_rejects_payment_equal_to_interest() {
        let err = debt_payoff_schedule(1_000.0, 12.0, 10.0).expect_err("must reject");
        assert!(matches!(err, AdvisorError::InsufficientPayment { .. }));
    }

    #[test]
    fn debt_payoff_just_above_interest_still_terminates() {
        let schedule = debt_payoff_schedule(1_000.0, 12.0, 10.5).expect("must terminate");
        assert_eq!(schedule.last().map(|s| s.remaining_balance), Some(0.0));
    }

    #[test]
    fn debt_payoff_runs_past_a_century_when_payment_barely_covers_interest() {
        // ln(10.00001 / 0.00001) / ln(1.01) is roughly 1389 months.
        let schedule = debt_payoff_schedule(1_000.0, 12.0, 10.000_01).expect("must pay off");
        assert!(schedule.len() > 1_200, "got {} months", schedule.len());
        assert_eq!(schedule.last().map(|s| s.remaining_balance), Some(0.0));
        for pair in schedule.windows(2) {
            assert!(pair[1].remaining_balance < pair[0].remaining_balance);
        }

        let schedule = debt_payoff_schedule(200_000.0, 6.0, 1_000.5).expect("must pay off");
        assert!(schedule.len() > 1_200);
        assert_eq!(schedule.last().map(|s| s.remaining_balance), Some(0.0));
    }

    #[test]
    fn debt_payoff_rejects_payment_lost_to_rounding() {
        let err = debt_payoff_schedule(1e20, 0.0, 1.0).expect_err("must stall");
        match err {
            AdvisorError::PayoffStalled {
                month,
                remaining_balance,
            } => {
                assert_eq!(month, 1);
                assert_eq!(remaining_balance, 1e20);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn debt_payoff_within_limit_caps_schedule_length() {
        let err = debt_payoff_schedule_within(1_000_000.0, 0.0, 0.01, 1_200).expect_err("must cap");
        assert!(matches!(
            err,
            AdvisorError::PayoffHorizonExceeded { months: 1_200 }
        ));

        let schedule = debt_payoff_schedule_within(1_000.0, 12.0, 50.0, 23).expect("fits");
        assert_eq!(schedule.len(), 23);
    }

    #[test]
    fn debt_payoff_zero_debt_is_empty() {
        let schedule = debt_payoff_schedule(0.0, 12.0, 0.0).expect("nothing to pay");
        assert!(schedule.is_empty());
    }

    #[test]
    fn debt_payoff_rejects_negative_inputs() {
        let err = debt_payoff_schedule(-5.0, 12.0, 50.0).expect_err("must reject");
        assert!(err.to_string().contains("debt_amount"));
        let err = debt_payoff_schedule(1_000.0, f64::NAN, 50.0).expect_err("must reject");
        assert!(err.to_string().contains("interest_rate"));
    }

    #[test]
    fn retirement_need_with_default_assumptions() {
        let need = retirement_need(30, 65, 90, 60_000.0, RetirementAssumptions::default())
            .expect("valid ages");
        assert_eq!(need.years_until_retirement, 35);
        assert_eq!(need.retirement_years, 25);
        assert!(need.future_annual_need > 0.0);
        assert!(need.total_needed > 0.0);
        // 60000 * 0.8 * 1.03^35
        assert_approx_tol(need.future_annual_need, 48_000.0 * 1.03f64.powi(35), 1e-6);
        let factor = (1.0 - 0.96f64.powi(25)) / 0.04;
        assert_approx_tol(need.total_needed, need.future_annual_need * factor, 1e-4);
    }

    #[test]
    fn retirement_need_equal_rates_falls_back_to_linear() {
        let assumptions = RetirementAssumptions {
            income_replacement_ratio: 0.8,
            inflation_rate: 0.05,
            expected_return: 0.05,
        };
        let need = retirement_need(40, 60, 85, 50_000.0, assumptions).expect("valid ages");
        assert!(need.total_needed.is_finite());
        assert_approx_tol(need.total_needed, need.future_annual_need * 25.0, 1e-6);
    }

    #[test]
    fn retirement_need_rejects_invalid_assumptions() {
        let nan_ratio = RetirementAssumptions {
            income_replacement_ratio: f64::NAN,
            ..RetirementAssumptions::default()
        };
        let err = retirement_need(30, 65, 90, 60_000.0, nan_ratio).expect_err("must reject");
        assert!(err.to_string().contains("income_replacement_ratio"));

        let collapsing_inflation = RetirementAssumptions {
            inflation_rate: -1.0,
            ..RetirementAssumptions::default()
        };
        let err =
            retirement_need(30, 65, 90, 60_000.0, collapsing_inflation).expect_err("must reject");
        assert!(err.to_string().contains("inflation_rate"));

        let infinite_return = RetirementAssumptions {
            expected_return: f64::INFINITY,
            ..RetirementAssumptions::default()
        };
        let err = retirement_need(30, 65, 90, 60_000.0, infinite_return).expect_err("must reject");
        assert!(err.to_string().contains("expected_return"));
    }

    #[test]
    fn retirement_need_rejects_inverted_ages() {
        let err = retirement_need(70, 65, 90, 60_000.0, RetirementAssumptions::default())
            .expect_err("must reject");
        assert!(err.to_string().contains("retirement_age"));
        let err = retirement_need(30, 65, 60, 60_000.0, RetirementAssumptions::default())
            .expect_err("must reject");
        assert!(err.to_string().contains("life_expectancy"));
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_debt_schedule_terminates_at_zero(
            debt in 1u32..500_000,
            rate_bp in 0u32..3_000,
            headroom_bp in 1u32..50_000,
        ) {
            let debt = f64::from(debt);
            let rate = f64::from(rate_bp) / 100.0;
            let interest_only = debt * rate / 1200.0;
            // Payment pays at least 1/1000 of the debt above interest.
            let payment = interest_only + debt / 1000.0 * (1.0 + f64::from(headroom_bp) / 100.0);
            let schedule = debt_payoff_schedule(debt, rate, payment);
            let schedule = schedule.expect("payment covers interest");
            prop_assert_eq!(schedule.last().map(|s| s.remaining_balance), Some(0.0));
            for pair in schedule.windows(2) {
                prop_assert!(pair[1].remaining_balance < pair[0].remaining_balance);
            }
        }

        #[test]
        fn prop_savings_projection_is_non_decreasing(
            monthly in 0u32..10_000,
            years in 0u32..40,
            return_bp in 0u32..2_000,
        ) {
            let points = savings_projection(f64::from(monthly), years, f64::from(return_bp) / 100.0);
            prop_assert_eq!(points.len() as u32, years + 1);
            for pair in points.windows(2) {
                prop_assert!(pair[1].value >= pair[0].value);
            }
        }
    }
}
