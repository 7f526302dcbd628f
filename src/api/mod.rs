use axum::{
    Router,
    extract::{
        Json, Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::core::{
    DebtPayoffStep, FinancialGoal, FinancialProfile, PortfolioMetrics, PriceBar, Report,
    RetirementAssumptions, RetirementNeed, RiskProfileDescription, RiskTolerance,
    SavingsProjectionPoint, metrics, projection, report, scoring,
};
use crate::error::{AdvisorError, Result};
use crate::market::{
    MarketDataSource, MarketPeriod, YahooChartClient, fetch_stock_data, validate_symbol,
};

const MIN_AGE: u32 = 18;
const MAX_AGE: u32 = 100;
const MAX_HORIZON_YEARS: u32 = 30;
const MAX_PROJECTION_YEARS: u32 = 100;
/// Longest payoff schedule the CLI and HTTP API will build (1000 years).
const MAX_SCHEDULE_MONTHS: u32 = 12_000;

#[derive(Parser, Debug)]
#[command(
    name = "finadvisor",
    about = "Personal finance advisor: budget, risk profile, investments, tax and projections"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Full advisory report for one financial profile
    Report(ProfileArgs),
    /// Year-by-year growth of a monthly savings plan
    Savings(SavingsArgs),
    /// Month-by-month debt payoff schedule
    Debt(DebtArgs),
    /// Income and savings needed for retirement
    Retirement(RetirementArgs),
    /// The five risk profile descriptions
    RiskProfiles,
    /// Daily price history, returns and metrics for one symbol
    Market(MarketArgs),
    /// Start the HTTP API
    Serve {
        #[arg(long, help = "Port to listen on; defaults to FINADVISOR_PORT or PORT")]
        port: Option<u16>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    #[arg(long, default_value_t = 5000.0, help = "Monthly income in dollars")]
    monthly_income: f64,
    #[arg(long, default_value_t = 30, help = "Age in years (18-100)")]
    age: u32,
    #[arg(
        long,
        default_value = "medium",
        value_parser = clap::value_parser!(RiskTolerance),
        help = "Risk tolerance: very-low, low, medium, high or very-high"
    )]
    risk_tolerance: RiskTolerance,
    #[arg(long, default_value_t = 10, help = "Investment horizon in years (1-30)")]
    investment_horizon: u32,
    #[arg(
        long = "goal",
        default_values = ["retirement-planning", "emergency-fund"],
        value_parser = clap::value_parser!(FinancialGoal),
        help = "Financial goal; repeat for several"
    )]
    goals: Vec<FinancialGoal>,
}

#[derive(Args, Debug, Clone)]
pub struct SavingsArgs {
    #[arg(long, default_value_t = 1000.0)]
    monthly_savings: f64,
    #[arg(long, default_value_t = 10)]
    years: u32,
    #[arg(
        long,
        default_value_t = 7.0,
        help = "Expected annual return in percent, e.g. 7"
    )]
    expected_return: f64,
}

#[derive(Args, Debug, Clone)]
pub struct DebtArgs {
    #[arg(long)]
    debt_amount: f64,
    #[arg(long, help = "Annual interest rate in percent, e.g. 18")]
    interest_rate: f64,
    #[arg(long)]
    monthly_payment: f64,
}

#[derive(Args, Debug, Clone)]
pub struct RetirementArgs {
    #[arg(long, default_value_t = 30)]
    current_age: u32,
    #[arg(long, default_value_t = 65)]
    retirement_age: u32,
    #[arg(long, default_value_t = 90)]
    life_expectancy: u32,
    #[arg(long, default_value_t = 60000.0, help = "Current annual income")]
    current_income: f64,
    #[arg(
        long,
        default_value_t = 80.0,
        help = "Retirement income as percent of current income"
    )]
    replacement_ratio: f64,
    #[arg(long, default_value_t = 3.0, help = "Annual inflation in percent")]
    inflation_rate: f64,
    #[arg(
        long,
        default_value_t = 7.0,
        help = "Expected annual return in retirement in percent"
    )]
    expected_return: f64,
}

#[derive(Args, Debug, Clone)]
pub struct MarketArgs {
    symbol: String,
    #[arg(
        long,
        default_value = "1y",
        help = "1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd or max"
    )]
    period: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GoalsField {
    List(Vec<String>),
    Csv(String),
}

impl GoalsField {
    fn into_labels(self) -> Vec<String> {
        match self {
            GoalsField::List(labels) => labels,
            GoalsField::Csv(csv) => csv
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ReportPayload {
    monthly_income: Option<f64>,
    age: Option<u32>,
    risk_tolerance: Option<String>,
    #[serde(alias = "investmentHorizonYears")]
    investment_horizon: Option<u32>,
    goals: Option<GoalsField>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SavingsPayload {
    monthly_savings: Option<f64>,
    years: Option<u32>,
    expected_return: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct DebtPayload {
    debt_amount: Option<f64>,
    interest_rate: Option<f64>,
    monthly_payment: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RetirementPayload {
    current_age: Option<u32>,
    retirement_age: Option<u32>,
    life_expectancy: Option<u32>,
    current_income: Option<f64>,
    replacement_ratio: Option<f64>,
    inflation_rate: Option<f64>,
    expected_return: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PortfolioPayload {
    values: Vec<f64>,
    returns: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MarketQuery {
    period: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportResponse {
    profile: FinancialProfile,
    report: Report,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SavingsResponse {
    monthly_savings: f64,
    years: u32,
    expected_return: f64,
    total_contributed: f64,
    final_value: f64,
    points: Vec<SavingsProjectionPoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DebtResponse {
    months: usize,
    total_paid: f64,
    total_interest: f64,
    schedule: Vec<DebtPayoffStep>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RetirementResponse {
    assumptions: RetirementAssumptions,
    #[serde(flatten)]
    need: RetirementNeed,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MarketResponse {
    symbol: String,
    period: String,
    bars: Vec<PriceBar>,
    returns: Vec<f64>,
    metrics: PortfolioMetrics,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn ensure_finite_non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AdvisorError::invalid(field, "must be a finite value >= 0"));
    }
    Ok(())
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| AdvisorError::invalid(field, "is required"))
}

fn build_profile(args: ProfileArgs) -> Result<FinancialProfile> {
    ensure_finite_non_negative("monthly_income", args.monthly_income)?;

    if !(MIN_AGE..=MAX_AGE).contains(&args.age) {
        return Err(AdvisorError::invalid(
            "age",
            format!("must be between {MIN_AGE} and {MAX_AGE}"),
        ));
    }

    if !(1..=MAX_HORIZON_YEARS).contains(&args.investment_horizon) {
        return Err(AdvisorError::invalid(
            "investment_horizon",
            format!("must be between 1 and {MAX_HORIZON_YEARS} years"),
        ));
    }

    let mut goals = Vec::with_capacity(args.goals.len());
    for goal in args.goals {
        if !goals.contains(&goal) {
            goals.push(goal);
        }
    }

    Ok(FinancialProfile {
        monthly_income: args.monthly_income,
        age: args.age,
        risk_tolerance: args.risk_tolerance,
        investment_horizon_years: args.investment_horizon,
        goals,
    })
}

fn default_profile_args() -> ProfileArgs {
    ProfileArgs {
        monthly_income: 5000.0,
        age: 30,
        risk_tolerance: RiskTolerance::Medium,
        investment_horizon: 10,
        goals: vec![FinancialGoal::RetirementPlanning, FinancialGoal::EmergencyFund],
    }
}

fn default_savings_args() -> SavingsArgs {
    SavingsArgs {
        monthly_savings: 1000.0,
        years: 10,
        expected_return: 7.0,
    }
}

fn default_retirement_args() -> RetirementArgs {
    RetirementArgs {
        current_age: 30,
        retirement_age: 65,
        life_expectancy: 90,
        current_income: 60000.0,
        replacement_ratio: 80.0,
        inflation_rate: 3.0,
        expected_return: 7.0,
    }
}

fn profile_args_from_payload(payload: ReportPayload) -> Result<ProfileArgs> {
    let mut args = default_profile_args();
    if let Some(v) = payload.monthly_income {
        args.monthly_income = v;
    }
    if let Some(v) = payload.age {
        args.age = v;
    }
    if let Some(v) = payload.risk_tolerance {
        args.risk_tolerance = v.parse()?;
    }
    if let Some(v) = payload.investment_horizon {
        args.investment_horizon = v;
    }
    if let Some(v) = payload.goals {
        args.goals = v
            .into_labels()
            .iter()
            .map(|label| label.parse::<FinancialGoal>())
            .collect::<Result<_>>()?;
    }
    Ok(args)
}

fn savings_args_from_payload(payload: SavingsPayload) -> SavingsArgs {
    let mut args = default_savings_args();
    if let Some(v) = payload.monthly_savings {
        args.monthly_savings = v;
    }
    if let Some(v) = payload.years {
        args.years = v;
    }
    if let Some(v) = payload.expected_return {
        args.expected_return = v;
    }
    args
}

fn debt_args_from_payload(payload: DebtPayload) -> Result<DebtArgs> {
    Ok(DebtArgs {
        debt_amount: required(payload.debt_amount, "debtAmount")?,
        interest_rate: required(payload.interest_rate, "interestRate")?,
        monthly_payment: required(payload.monthly_payment, "monthlyPayment")?,
    })
}

fn retirement_args_from_payload(payload: RetirementPayload) -> RetirementArgs {
    let mut args = default_retirement_args();
    if let Some(v) = payload.current_age {
        args.current_age = v;
    }
    if let Some(v) = payload.retirement_age {
        args.retirement_age = v;
    }
    if let Some(v) = payload.life_expectancy {
        args.life_expectancy = v;
    }
    if let Some(v) = payload.current_income {
        args.current_income = v;
    }
    if let Some(v) = payload.replacement_ratio {
        args.replacement_ratio = v;
    }
    if let Some(v) = payload.inflation_rate {
        args.inflation_rate = v;
    }
    if let Some(v) = payload.expected_return {
        args.expected_return = v;
    }
    args
}

fn build_report_response(args: ProfileArgs) -> Result<ReportResponse> {
    let profile = build_profile(args)?;
    let report = report::build_report(&profile);
    Ok(ReportResponse { profile, report })
}

fn build_savings_response(args: SavingsArgs) -> Result<SavingsResponse> {
    ensure_finite_non_negative("monthly_savings", args.monthly_savings)?;
    if args.years > MAX_PROJECTION_YEARS {
        return Err(AdvisorError::invalid(
            "years",
            format!("must be <= {MAX_PROJECTION_YEARS}"),
        ));
    }
    if !args.expected_return.is_finite() || args.expected_return <= -100.0 {
        return Err(AdvisorError::invalid("expected_return", "must be > -100"));
    }

    let points =
        projection::savings_projection(args.monthly_savings, args.years, args.expected_return);
    let final_value = points.last().map(|p| p.value).unwrap_or(0.0);
    Ok(SavingsResponse {
        monthly_savings: args.monthly_savings,
        years: args.years,
        expected_return: args.expected_return,
        total_contributed: args.monthly_savings * f64::from(args.years * 12),
        final_value,
        points,
    })
}

fn build_debt_response(args: DebtArgs) -> Result<DebtResponse> {
    let schedule = projection::debt_payoff_schedule_within(
        args.debt_amount,
        args.interest_rate,
        args.monthly_payment,
        MAX_SCHEDULE_MONTHS,
    )?;
    let total_interest = schedule.iter().map(|s| s.interest).sum();
    let total_paid = schedule.iter().map(|s| s.principal + s.interest).sum();
    Ok(DebtResponse {
        months: schedule.len(),
        total_paid,
        total_interest,
        schedule,
    })
}

fn build_retirement_response(args: RetirementArgs) -> Result<RetirementResponse> {
    let assumptions = RetirementAssumptions {
        income_replacement_ratio: args.replacement_ratio / 100.0,
        inflation_rate: args.inflation_rate / 100.0,
        expected_return: args.expected_return / 100.0,
    };
    let need = projection::retirement_need(
        args.current_age,
        args.retirement_age,
        args.life_expectancy,
        args.current_income,
        assumptions,
    )?;
    Ok(RetirementResponse { assumptions, need })
}

fn build_portfolio_metrics(payload: PortfolioPayload) -> Result<PortfolioMetrics> {
    if payload.values.iter().chain(&payload.returns).any(|v| !v.is_finite()) {
        return Err(AdvisorError::invalid("values", "all numbers must be finite"));
    }
    Ok(metrics::portfolio_metrics(&payload.values, &payload.returns))
}

fn build_market_response(
    symbol: &str,
    period: MarketPeriod,
    bars: Vec<PriceBar>,
) -> MarketResponse {
    let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();
    let returns = metrics::period_returns(&closes);
    let latest_close: Vec<f64> = closes.last().copied().into_iter().collect();
    let metrics = metrics::portfolio_metrics(&latest_close, &returns);
    MarketResponse {
        symbol: symbol.to_string(),
        period: period.to_string(),
        bars,
        returns,
        metrics,
    }
}

async fn load_market_response<S>(
    source: &S,
    symbol: &str,
    period: MarketPeriod,
) -> Result<MarketResponse>
where
    S: MarketDataSource + ?Sized,
{
    let symbol = validate_symbol(symbol)?;
    match fetch_stock_data(source, symbol, period).await {
        Some(bars) => Ok(build_market_response(symbol, period, bars)),
        None => Err(AdvisorError::ExternalDataUnavailable(format!(
            "no price history for {symbol} over {period}"
        ))),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Executes one CLI command, printing its result as JSON.
pub async fn run(cli: Cli, mut config: AppConfig) -> Result<()> {
    match cli.command {
        Command::Report(args) => print_json(&build_report_response(args)?),
        Command::Savings(args) => print_json(&build_savings_response(args)?),
        Command::Debt(args) => print_json(&build_debt_response(args)?),
        Command::Retirement(args) => print_json(&build_retirement_response(args)?),
        Command::RiskProfiles => print_json(&scoring::risk_profile_catalogue()),
        Command::Market(args) => {
            let period: MarketPeriod = args.period.parse()?;
            let client = YahooChartClient::from_config(&config)?;
            let response = load_market_response(&client, &args.symbol, period).await?;
            print_json(&response)
        }
        Command::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            run_http_server(&config).await
        }
    }
}

#[derive(Clone)]
struct AppState {
    market: Arc<dyn MarketDataSource>,
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/report",
            get(report_get_handler).post(report_post_handler),
        )
        .route("/api/projection/savings", post(savings_handler))
        .route("/api/projection/debt", post(debt_handler))
        .route("/api/projection/retirement", post(retirement_handler))
        .route("/api/portfolio/metrics", post(portfolio_metrics_handler))
        .route("/api/risk-profiles", get(risk_profiles_handler))
        .route("/api/market/:symbol", get(market_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(config: &AppConfig) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let market = YahooChartClient::from_config(config)?;
    let app = router(AppState {
        market: Arc::new(market),
    });

    let listener = TcpListener::bind(addr).await?;
    info!("finadvisor HTTP API listening on http://{addr}");
    info!("Local access: http://127.0.0.1:{}/health", config.port);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, serde_json::json!({ "status": "ok" }))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn report_get_handler(
    query: std::result::Result<Query<ReportPayload>, QueryRejection>,
) -> Response {
    match query {
        Ok(Query(payload)) => report_handler_impl(payload),
        Err(rejection) => rejection_response(rejection.body_text()),
    }
}

async fn report_post_handler(
    body: std::result::Result<Json<ReportPayload>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(payload)) => report_handler_impl(payload),
        Err(rejection) => rejection_response(rejection.body_text()),
    }
}

fn report_handler_impl(payload: ReportPayload) -> Response {
    debug!(?payload, "report request");
    result_response(profile_args_from_payload(payload).and_then(build_report_response))
}

async fn savings_handler(
    body: std::result::Result<Json<SavingsPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match body {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection.body_text()),
    };
    debug!(?payload, "savings projection request");
    result_response(build_savings_response(savings_args_from_payload(payload)))
}

async fn debt_handler(body: std::result::Result<Json<DebtPayload>, JsonRejection>) -> Response {
    let Json(payload) = match body {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection.body_text()),
    };
    debug!(?payload, "debt payoff request");
    result_response(debt_args_from_payload(payload).and_then(build_debt_response))
}

async fn retirement_handler(
    body: std::result::Result<Json<RetirementPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match body {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection.body_text()),
    };
    debug!(?payload, "retirement need request");
    result_response(build_retirement_response(retirement_args_from_payload(
        payload,
    )))
}

async fn portfolio_metrics_handler(
    body: std::result::Result<Json<PortfolioPayload>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(payload)) => result_response(build_portfolio_metrics(payload)),
        Err(rejection) => rejection_response(rejection.body_text()),
    }
}

async fn risk_profiles_handler() -> Response {
    let catalogue: Vec<RiskProfileDescription> = scoring::risk_profile_catalogue();
    json_response(StatusCode::OK, catalogue)
}

async fn market_handler(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    query: std::result::Result<Query<MarketQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return rejection_response(rejection.body_text()),
    };
    let period = match query.period.as_deref().map(str::parse::<MarketPeriod>) {
        None => MarketPeriod::default(),
        Some(Ok(period)) => period,
        Some(Err(err)) => return advisor_error_response(&err),
    };
    result_response(load_market_response(state.market.as_ref(), &symbol, period).await)
}

fn status_for(err: &AdvisorError) -> StatusCode {
    match err {
        AdvisorError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
        AdvisorError::InsufficientPayment { .. }
        | AdvisorError::PayoffHorizonExceeded { .. }
        | AdvisorError::PayoffStalled { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AdvisorError::ExternalDataUnavailable(_) | AdvisorError::Http(_) => StatusCode::BAD_GATEWAY,
        AdvisorError::Serialization(_) | AdvisorError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn result_response<T: Serialize>(result: Result<T>) -> Response {
    match result {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(err) => advisor_error_response(&err),
    }
}

fn advisor_error_response(err: &AdvisorError) -> Response {
    let status = status_for(err);
    debug!(%status, error = %err, "request rejected");
    error_response(status, &err.to_string())
}

fn rejection_response(message: String) -> Response {
    debug!(%message, "request body or query rejected");
    error_response(StatusCode::BAD_REQUEST, &message)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn report_payload_from_json(json: &str) -> Result<ReportPayload> {
    Ok(serde_json::from_str::<ReportPayload>(json)?)
}
