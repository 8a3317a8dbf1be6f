//! Projects a single past investment forward to the current year.
//!
//! Everything here is a pure function of the query and the reference store,
//! so calculations can run concurrently against one shared store.
use crate::core::error::{CalcError, ComputationError, InvalidQuery};
use crate::core::reference::{PricePoint, ReferenceData, Year};
use rust_decimal::{Decimal, prelude::*};
use rust_finprim::rate::cagr;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Currency the investment amount is given in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputCurrency {
    Primary,
    #[default]
    Secondary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub symbol: String,
    pub start_year: Year,
    pub amount: f64,
    pub currency: InputCurrency,
}

/// Value of the holding in the secondary currency at the given year,
/// rounded to whole units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValuePoint {
    pub year: Year,
    pub value: f64,
}

/// Everything derived from one query. Monetary fields keep full precision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub symbol: String,
    pub name: String,
    pub start_year: Year,
    pub input_currency: InputCurrency,
    pub initial_primary: f64,
    pub initial_secondary: f64,
    pub current_primary: f64,
    pub current_secondary: f64,
    pub total_return_percent: f64,
    pub total_gain_secondary: f64,
    pub annual_return_percent: f64,
    /// Return in the primary currency, i.e. without the exchange-rate effect.
    pub price_return_percent: f64,
    pub exchange_change_percent: f64,
    pub shares: f64,
    pub initial_price: f64,
    pub current_price: PricePoint,
    pub initial_rate: f64,
    pub current_rate: f64,
    pub years_elapsed: Year,
    pub series: Vec<ValuePoint>,
}

/// Runs the full projection for `query`.
///
/// The amount is converted with the start-year exchange rate, bought as
/// fractional shares at the start-year price, and valued at the current
/// price and current exchange rate.
pub fn calculate(store: &ReferenceData, query: &Query) -> Result<Outcome, CalcError> {
    if !(query.amount.is_finite() && query.amount > 0.0) {
        return Err(InvalidQuery::NonPositiveAmount(query.amount).into());
    }
    let instrument = store
        .instrument(&query.symbol)
        .ok_or_else(|| InvalidQuery::UnknownInstrument(query.symbol.clone()))?;
    let current_year = store.current_year();
    if query.start_year >= current_year {
        return Err(InvalidQuery::NotBeforeCurrentYear {
            year: query.start_year,
            current_year,
        }
        .into());
    }
    let initial_rate = store
        .exchange_rate(query.start_year)
        .ok_or(InvalidQuery::MissingExchangeRate(query.start_year))?;
    let initial_price =
        instrument
            .prices
            .get(query.start_year)
            .ok_or_else(|| InvalidQuery::MissingPrice {
                symbol: query.symbol.clone(),
                year: query.start_year,
            })?;
    let current_price = store
        .current_price(&query.symbol)
        .ok_or_else(|| InvalidQuery::MissingPrice {
            symbol: query.symbol.clone(),
            year: current_year,
        })?;
    let current_rate = store.current_rate();

    let (initial_primary, initial_secondary) = match query.currency {
        InputCurrency::Primary => (query.amount, query.amount * initial_rate),
        InputCurrency::Secondary => (query.amount / initial_rate, query.amount),
    };

    let shares = finite(initial_primary / initial_price, "shares")?;
    let current_primary = finite(shares * current_price.price, "current value")?;
    let current_secondary = finite(current_primary * current_rate, "current value")?;
    let total_gain_secondary = current_secondary - initial_secondary;
    let total_return_percent = finite(
        percent_change(initial_secondary, current_secondary),
        "total return",
    )?;
    let years_elapsed = current_year - query.start_year;
    let annual_return_percent =
        annualized_return_percent(initial_secondary, current_secondary, years_elapsed)?;
    let exchange_change_percent = percent_change(initial_rate, current_rate);
    let price_return_percent = percent_change(initial_price, current_price.price);

    debug!(
        "{} from {}: {shares} shares, {initial_secondary} -> {current_secondary} ({total_return_percent:.2}%)",
        query.symbol, query.start_year
    );
    if current_price.year != current_year {
        debug!(
            "No {current_year} price for {}, using {}",
            query.symbol, current_price.year
        );
    }

    let series = value_series(store, &query.symbol, query.start_year, shares);

    Ok(Outcome {
        symbol: instrument.symbol.clone(),
        name: instrument.name.clone(),
        start_year: query.start_year,
        input_currency: query.currency,
        initial_primary,
        initial_secondary,
        current_primary,
        current_secondary,
        total_return_percent,
        total_gain_secondary,
        annual_return_percent,
        price_return_percent,
        exchange_change_percent,
        shares,
        initial_price,
        current_price,
        initial_rate,
        current_rate,
        years_elapsed,
        series,
    })
}

/// Compound annual growth rate between two values, in percent.
pub fn annualized_return_percent(
    start: f64,
    end: f64,
    years: Year,
) -> Result<f64, ComputationError> {
    if years <= 0 {
        return Err(ComputationError::ZeroHorizon);
    }
    if !(start > 0.0 && end > 0.0) {
        return Err(ComputationError::NonPositiveValue { start, end });
    }
    // CAGR depends only on end / start; the amounts alone may not fit a Decimal.
    let ratio = finite(end / start, "growth ratio")?;
    let end_bal = Decimal::from_f64(ratio)
        .filter(|d| !d.is_zero())
        .ok_or(ComputationError::RatioOutOfRange(ratio))?;
    let rate = cagr(Decimal::ONE, end_bal, Decimal::from(years));
    let percentage = (rate * Decimal::from(100))
        .to_f64()
        .ok_or(ComputationError::NonFinite("annualized return"))?;
    finite(percentage, "annualized return")
}

/// Value of `shares` in each year from `start_year` through the current year.
///
/// Years missing from either the price series or the exchange-rate table are
/// left out rather than failing the whole series.
pub fn value_series(
    store: &ReferenceData,
    symbol: &str,
    start_year: Year,
    shares: f64,
) -> Vec<ValuePoint> {
    let Some(instrument) = store.instrument(symbol) else {
        return Vec::new();
    };
    (start_year..=store.current_year())
        .filter_map(|year| {
            let price = instrument.prices.get(year)?;
            let rate = store.exchange_rate(year)?;
            Some(ValuePoint {
                year,
                value: (shares * price * rate).round(),
            })
        })
        .collect()
}

fn percent_change(from: f64, to: f64) -> f64 {
    (to - from) / from * 100.0
}

fn finite(value: f64, name: &'static str) -> Result<f64, ComputationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ComputationError::NonFinite(name))
    }
}
