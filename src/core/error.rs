//! Error types for the reference data store and the calculation engine.

use crate::core::reference::Year;
use thiserror::Error;

/// Raised when a dataset fails validation while building the reference store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DatasetError {
    #[error("Exchange rate for {year} must be a positive number, got {rate}")]
    InvalidRate { year: Year, rate: f64 },

    #[error("Current exchange rate must be a positive number, got {0}")]
    InvalidCurrentRate(f64),

    #[error("Price of {symbol} in {year} must be a positive number, got {price}")]
    InvalidPrice { symbol: String, year: Year, price: f64 },

    #[error("Instrument symbol must not be empty")]
    EmptySymbol,

    #[error("Instrument '{0}' is listed more than once")]
    DuplicateSymbol(String),

    #[error("Instrument '{symbol}' has no price on or before {current_year}")]
    NoCurrentPrice { symbol: String, current_year: Year },

    #[error("As-of date {as_of} is outside the current year {current_year}")]
    AsOfOutsideCurrentYear {
        as_of: chrono::NaiveDate,
        current_year: Year,
    },

    #[error("Failed to parse dataset: {0}")]
    Parse(String),
}

/// Reasons a query is rejected before any calculation happens.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidQuery {
    #[error("Investment amount must be a positive number, got {0}")]
    NonPositiveAmount(f64),

    #[error("Unknown instrument '{0}'")]
    UnknownInstrument(String),

    #[error("Start year {year} must be before the current year {current_year}")]
    NotBeforeCurrentYear { year: Year, current_year: Year },

    #[error("No exchange rate available for {0}")]
    MissingExchangeRate(Year),

    #[error("No price for {symbol} in {year}")]
    MissingPrice { symbol: String, year: Year },
}

/// A derived quantity could not be expressed as a real number.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputationError {
    #[error("Annualized return is undefined over a zero-year horizon")]
    ZeroHorizon,

    #[error("Annualized return needs positive start and end values, got {start} and {end}")]
    NonPositiveValue { start: f64, end: f64 },

    #[error("Growth ratio {0} is outside the range the annualized return supports")]
    RatioOutOfRange(f64),

    #[error("Derived value '{0}' is not a finite number")]
    NonFinite(&'static str),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] InvalidQuery),

    #[error("Computation failed: {0}")]
    Computation(#[from] ComputationError),
}
