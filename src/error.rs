use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("Invalid input: {field} ({reason})")]
    InvalidInput { field: String, reason: String },

    #[error(
        "Monthly payment {monthly_payment:.2} does not cover the interest-only amount {interest_only:.2}"
    )]
    InsufficientPayment {
        monthly_payment: f64,
        interest_only: f64,
    },

    #[error("Debt is not paid off within {months} months")]
    PayoffHorizonExceeded { months: u32 },

    #[error(
        "Payment no longer reduces the balance {remaining_balance:.2} at month {month}"
    )]
    PayoffStalled { month: u32, remaining_balance: f64 },

    #[error("Market data unavailable: {0}")]
    ExternalDataUnavailable(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AdvisorError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AdvisorError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
