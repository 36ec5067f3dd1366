//! Единый тип ошибок публичного API.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AqsatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    /// План с нулевым сроком дошёл до калькулятора в обход PlanBuilder.
    #[error("invalid plan: months must be >= 1, got {months}")]
    InvalidPlan { months: u32 },

    #[error("invalid price: {0} is negative")]
    InvalidPrice(Decimal),

    /// Промежуточная сумма вышла за диапазон Decimal.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),
}

pub type Result<T> = std::result::Result<T, AqsatError>;
