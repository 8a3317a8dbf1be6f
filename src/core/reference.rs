//! Immutable reference tables: yearly exchange rates, instrument prices and
//! the store constants (current year and current exchange rate).

use crate::core::error::DatasetError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

pub type Year = i32;

/// Yearly unit prices of one instrument, denominated in the primary currency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceSeries(BTreeMap<Year, f64>);

/// A price together with the year it was observed in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub year: Year,
    pub price: f64,
}

impl PriceSeries {
    pub fn get(&self, year: Year) -> Option<f64> {
        self.0.get(&year).copied()
    }

    pub fn contains(&self, year: Year) -> bool {
        self.0.contains_key(&year)
    }

    /// Years with a price, ascending.
    pub fn years(&self) -> impl DoubleEndedIterator<Item = Year> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (Year, f64)> + '_ {
        self.0.iter().map(|(y, p)| (*y, *p))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the price at `year`, or failing that the most recent earlier
    /// year that has one.
    pub fn latest_on_or_before(&self, year: Year) -> Option<PricePoint> {
        self.0
            .range(..=year)
            .next_back()
            .map(|(y, p)| PricePoint {
                year: *y,
                price: *p,
            })
    }
}

impl FromIterator<(Year, f64)> for PriceSeries {
    fn from_iter<I: IntoIterator<Item = (Year, f64)>>(iter: I) -> Self {
        PriceSeries(iter.into_iter().collect())
    }
}

/// Units of secondary currency per one unit of primary currency, by year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExchangeRateTable(BTreeMap<Year, f64>);

impl ExchangeRateTable {
    pub fn get(&self, year: Year) -> Option<f64> {
        self.0.get(&year).copied()
    }

    pub fn contains(&self, year: Year) -> bool {
        self.0.contains_key(&year)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (Year, f64)> + '_ {
        self.0.iter().map(|(y, r)| (*y, *r))
    }
}

impl FromIterator<(Year, f64)> for ExchangeRateTable {
    fn from_iter<I: IntoIterator<Item = (Year, f64)>>(iter: I) -> Self {
        ExchangeRateTable(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: String,
    pub name: String,
    pub description: String,
    pub sector: String,
    /// Free-text note on the split adjustment baked into `prices`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjustment_note: Option<String>,
    pub prices: PriceSeries,
}

/// Raw dataset as stored on disk, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub as_of: NaiveDate,
    pub current_year: Year,
    pub current_rate: f64,
    pub primary_currency: String,
    pub secondary_currency: String,
    pub exchange_rates: ExchangeRateTable,
    pub instruments: Vec<Instrument>,
}

impl Dataset {
    pub fn from_yaml(content: &str) -> Result<Self, DatasetError> {
        serde_yaml::from_str(content).map_err(|e| DatasetError::Parse(e.to_string()))
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Validated, read-only lookup tables shared by the engine and the renderers.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    as_of: NaiveDate,
    current_year: Year,
    current_rate: f64,
    primary_currency: String,
    secondary_currency: String,
    exchange_rates: ExchangeRateTable,
    instruments: Vec<Instrument>,
    index: HashMap<String, usize>,
}

impl ReferenceData {
    pub fn new(dataset: Dataset) -> Result<Self, DatasetError> {
        if !is_positive(dataset.current_rate) {
            return Err(DatasetError::InvalidCurrentRate(dataset.current_rate));
        }
        if dataset.as_of.year() != dataset.current_year {
            return Err(DatasetError::AsOfOutsideCurrentYear {
                as_of: dataset.as_of,
                current_year: dataset.current_year,
            });
        }
        if let Some((year, rate)) = dataset
            .exchange_rates
            .iter()
            .find(|(_, rate)| !is_positive(*rate))
        {
            return Err(DatasetError::InvalidRate { year, rate });
        }

        let mut seen = HashSet::new();
        let mut index = HashMap::new();
        for (i, instrument) in dataset.instruments.iter().enumerate() {
            if instrument.symbol.trim().is_empty() {
                return Err(DatasetError::EmptySymbol);
            }
            if !seen.insert(instrument.symbol.as_str()) {
                return Err(DatasetError::DuplicateSymbol(instrument.symbol.clone()));
            }
            if let Some((year, price)) = instrument.prices.iter().find(|(_, p)| !is_positive(*p))
            {
                return Err(DatasetError::InvalidPrice {
                    symbol: instrument.symbol.clone(),
                    year,
                    price,
                });
            }
            if instrument
                .prices
                .latest_on_or_before(dataset.current_year)
                .is_none()
            {
                return Err(DatasetError::NoCurrentPrice {
                    symbol: instrument.symbol.clone(),
                    current_year: dataset.current_year,
                });
            }
            index.insert(instrument.symbol.clone(), i);
        }

        debug!(
            "Loaded reference data: {} instruments, current year {}, rate {}",
            dataset.instruments.len(),
            dataset.current_year,
            dataset.current_rate
        );

        Ok(Self {
            as_of: dataset.as_of,
            current_year: dataset.current_year,
            current_rate: dataset.current_rate,
            primary_currency: dataset.primary_currency,
            secondary_currency: dataset.secondary_currency,
            exchange_rates: dataset.exchange_rates,
            instruments: dataset.instruments,
            index,
        })
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub fn current_year(&self) -> Year {
        self.current_year
    }

    pub fn current_rate(&self) -> f64 {
        self.current_rate
    }

    pub fn primary_currency(&self) -> &str {
        &self.primary_currency
    }

    pub fn secondary_currency(&self) -> &str {
        &self.secondary_currency
    }

    pub fn exchange_rates(&self) -> &ExchangeRateTable {
        &self.exchange_rates
    }

    /// Instruments in dataset order.
    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn exchange_rate(&self, year: Year) -> Option<f64> {
        self.exchange_rates.get(year)
    }

    pub fn instrument(&self, symbol: &str) -> Option<&Instrument> {
        self.index.get(symbol).map(|i| &self.instruments[*i])
    }

    pub fn price(&self, symbol: &str, year: Year) -> Option<f64> {
        self.instrument(symbol)?.prices.get(year)
    }

    /// Price used as "today's" price: the current year's, falling back to the
    /// latest earlier year when the instrument has no entry for it.
    pub fn current_price(&self, symbol: &str) -> Option<PricePoint> {
        self.instrument(symbol)?
            .prices
            .latest_on_or_before(self.current_year)
    }

    /// Selectable start years for `symbol`, newest first.
    ///
    /// A year qualifies only if the instrument has a price for it, the
    /// exchange-rate table covers it, and it is strictly before the current
    /// year. Returns `None` for an unknown symbol.
    pub fn available_years(&self, symbol: &str) -> Option<Vec<Year>> {
        let instrument = self.instrument(symbol)?;
        Some(
            instrument
                .prices
                .years()
                .rev()
                .filter(|y| *y < self.current_year && self.exchange_rates.contains(*y))
                .collect(),
        )
    }
}

#[cfg(test)]
pub(crate) fn sample_dataset() -> Dataset {
    Dataset {
        as_of: NaiveDate::from_ymd_opt(2025, 12, 30).unwrap(),
        current_year: 2025,
        current_rate: 1439.01,
        primary_currency: "USD".to_string(),
        secondary_currency: "KRW".to_string(),
        exchange_rates: [
            (1999, 1188.82),
            (2000, 1130.96),
            (2002, 1251.09),
            (2024, 1420.76),
            (2025, 1439.01),
        ]
        .into_iter()
        .collect(),
        instruments: vec![
            Instrument {
                symbol: "AAPL".to_string(),
                name: "Apple Inc.".to_string(),
                description: "Consumer electronics and software company".to_string(),
                sector: "Technology".to_string(),
                adjustment_note: None,
                prices: [(1999, 2.94), (2000, 3.71), (2024, 225.0), (2025, 254.27)]
                    .into_iter()
                    .collect(),
            },
            Instrument {
                symbol: "GAP".to_string(),
                name: "Gappy Index ETF".to_string(),
                description: "Has years without exchange-rate coverage".to_string(),
                sector: "ETF".to_string(),
                adjustment_note: Some("2:1 split (March 2010)".to_string()),
                prices: [
                    (1998, 40.0),
                    (1999, 50.0),
                    (2000, 55.0),
                    (2001, 60.0),
                    (2002, 45.0),
                    (2024, 100.0),
                ]
                .into_iter()
                .collect(),
            },
        ],
    }
}
