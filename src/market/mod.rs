//! Daily price history lookup.
//!
//! The advisory core never depends on this module; it backs the market
//! endpoint and CLI command only. Failures are logged and surface as `None`.

use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::core::PriceBar;
use crate::error::{AdvisorError, Result};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum MarketPeriod {
    OneDay,
    FiveDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    #[default]
    OneYear,
    TwoYears,
    FiveYears,
    TenYears,
    YearToDate,
    Max,
}

impl MarketPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            MarketPeriod::OneDay => "1d",
            MarketPeriod::FiveDays => "5d",
            MarketPeriod::OneMonth => "1mo",
            MarketPeriod::ThreeMonths => "3mo",
            MarketPeriod::SixMonths => "6mo",
            MarketPeriod::OneYear => "1y",
            MarketPeriod::TwoYears => "2y",
            MarketPeriod::FiveYears => "5y",
            MarketPeriod::TenYears => "10y",
            MarketPeriod::YearToDate => "ytd",
            MarketPeriod::Max => "max",
        }
    }
}

impl fmt::Display for MarketPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketPeriod {
    type Err = AdvisorError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1d" => Ok(MarketPeriod::OneDay),
            "5d" => Ok(MarketPeriod::FiveDays),
            "1mo" => Ok(MarketPeriod::OneMonth),
            "3mo" => Ok(MarketPeriod::ThreeMonths),
            "6mo" => Ok(MarketPeriod::SixMonths),
            "1y" => Ok(MarketPeriod::OneYear),
            "2y" => Ok(MarketPeriod::TwoYears),
            "5y" => Ok(MarketPeriod::FiveYears),
            "10y" => Ok(MarketPeriod::TenYears),
            "ytd" => Ok(MarketPeriod::YearToDate),
            "max" => Ok(MarketPeriod::Max),
            other => Err(AdvisorError::invalid(
                "period",
                format!("unsupported period {other:?}"),
            )),
        }
    }
}

const MAX_SYMBOL_LEN: usize = 15;

/// Accepts ticker symbols such as `AAPL`, `BRK.B`, `^GSPC` or `EURUSD=X`.
pub fn validate_symbol(symbol: &str) -> Result<&str> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '^' | '=' | '-');
    if symbol.is_empty() || symbol.len() > MAX_SYMBOL_LEN || !symbol.chars().all(allowed) {
        return Err(AdvisorError::invalid(
            "symbol",
            format!(
                "{symbol:?} must be 1-{MAX_SYMBOL_LEN} letters, digits or one of . ^ = -"
            ),
        ));
    }
    if symbol.starts_with('.') {
        return Err(AdvisorError::invalid("symbol", "must not start with '.'"));
    }
    Ok(symbol)
}

#[async_trait::async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn history(&self, symbol: &str, period: MarketPeriod) -> Result<Vec<PriceBar>>;
}

/// Client for the Yahoo-style `v8/finance/chart` endpoint.
#[derive(Clone)]
pub struct YahooChartClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl YahooChartClient {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.market_data_timeout)
            .pool_max_idle_per_host(8)
            .user_agent(concat!("finadvisor/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.market_data_base_url.clone(),
            api_key: config.market_data_api_key.clone(),
        })
    }

    fn chart_url(&self, symbol: &str) -> Result<Url> {
        let symbol = validate_symbol(symbol)?;
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            AdvisorError::ExternalDataUnavailable(format!(
                "invalid market data base URL {:?}: {e}",
                self.base_url
            ))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                AdvisorError::ExternalDataUnavailable(format!(
                    "market data base URL {:?} cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl MarketDataSource for YahooChartClient {
    async fn history(&self, symbol: &str, period: MarketPeriod) -> Result<Vec<PriceBar>> {
        let url = self.chart_url(symbol)?;
        debug!(%symbol, %period, "requesting price history");

        let mut request = self
            .client
            .get(url)
            .query(&[("range", period.as_str()), ("interval", "1d")]);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AdvisorError::ExternalDataUnavailable(format!(
                "provider returned {status} for {symbol}"
            )));
        }

        let body: Value = response.json().await?;
        parse_chart_response(&body)
    }
}

/// Extracts daily bars from a chart payload. Rows missing any field are
/// skipped.
pub fn parse_chart_response(body: &Value) -> Result<Vec<PriceBar>> {
    let chart = &body["chart"];
    if let Some(description) = chart["error"]["description"].as_str() {
        return Err(AdvisorError::ExternalDataUnavailable(description.to_string()));
    }

    let result = &chart["result"][0];
    let timestamps = result["timestamp"].as_array().ok_or_else(|| {
        AdvisorError::ExternalDataUnavailable("chart payload has no timestamps".to_string())
    })?;
    let quote = &result["indicators"]["quote"][0];

    let series = |name: &str| quote[name].as_array().cloned().unwrap_or_default();
    let (open, high, low, close, volume) = (
        series("open"),
        series("high"),
        series("low"),
        series("close"),
        series("volume"),
    );

    let bars: Vec<PriceBar> = timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            let date = DateTime::from_timestamp(ts.as_i64()?, 0)?.date_naive();
            Some(PriceBar {
                date,
                open: open.get(i)?.as_f64()?,
                high: high.get(i)?.as_f64()?,
                low: low.get(i)?.as_f64()?,
                close: close.get(i)?.as_f64()?,
                volume: volume.get(i)?.as_u64()?,
            })
        })
        .collect();

    if bars.is_empty() {
        return Err(AdvisorError::ExternalDataUnavailable(
            "chart payload has no complete rows".to_string(),
        ));
    }
    Ok(bars)
}

/// Fetches price history, logging and swallowing any failure.
pub async fn fetch_stock_data<S>(
    source: &S,
    symbol: &str,
    period: MarketPeriod,
) -> Option<Vec<PriceBar>>
where
    S: MarketDataSource + ?Sized,
{
    match source.history(symbol, period).await {
        Ok(bars) => Some(bars),
        Err(err) => {
            warn!(%symbol, %period, error = %err, "error fetching market data");
            None
        }
    }
}
