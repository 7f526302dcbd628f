use super::types::PortfolioMetrics;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Simple period-over-period returns of a close-price series. The first
/// close has no predecessor and produces no return.
pub fn period_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .map(|pair| pair[1] / pair[0] - 1.0)
        .collect()
}

fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}

/// Summarizes holdings `values` and their daily `returns`.
///
/// The annualized return compounds the summed return over `252 / n` periods;
/// volatility is the sample standard deviation scaled by `sqrt(252)`.
pub fn portfolio_metrics(values: &[f64], returns: &[f64]) -> PortfolioMetrics {
    let total_value = values.iter().sum();
    let total_return: f64 = returns.iter().sum();

    let annual_return = (!returns.is_empty()).then(|| {
        (1.0 + total_return).powf(TRADING_DAYS_PER_YEAR / returns.len() as f64) - 1.0
    });
    let volatility = sample_std_dev(returns).map(|sd| sd * TRADING_DAYS_PER_YEAR.sqrt());

    PortfolioMetrics {
        total_value,
        total_return,
        annual_return,
        volatility,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn period_returns_drops_leading_value() {
        let returns = period_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(returns.len(), 2);
        assert_approx(returns[0], 0.1);
        assert_approx(returns[1], -0.1);
        assert!(period_returns(&[100.0]).is_empty());
        assert!(period_returns(&[]).is_empty());
    }

    #[test]
    fn metrics_without_returns_have_no_rates() {
        let metrics = portfolio_metrics(&[1_000.0, 2_500.0], &[]);
        assert_approx(metrics.total_value, 3_500.0);
        assert_approx(metrics.total_return, 0.0);
        assert_eq!(metrics.annual_return, None);
        assert_eq!(metrics.volatility, None);
    }

    #[test]
    fn single_return_has_annual_rate_but_no_volatility() {
        let metrics = portfolio_metrics(&[100.0], &[0.01]);
        let annual = metrics.annual_return.expect("one return is enough");
        assert_approx(annual, 1.01f64.powf(252.0) - 1.0);
        assert_eq!(metrics.volatility, None);
    }

    #[test]
    fn volatility_uses_sample_standard_deviation() {
        let returns = [0.01, -0.01, 0.01, -0.01];
        let metrics = portfolio_metrics(&[], &returns);
        // mean 0, sum of squares 4e-4, / (n - 1) = 1.333e-4
        let expected = (4e-4f64 / 3.0).sqrt() * 252f64.sqrt();
        assert_approx(metrics.volatility.expect("four returns"), expected);
        assert_approx(metrics.annual_return.expect("four returns"), 0.0);
    }
}
