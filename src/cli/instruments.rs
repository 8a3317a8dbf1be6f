use super::ui;
use crate::core::{Instrument, ReferenceData, Year};
use anyhow::{Result, anyhow};
use comfy_table::Cell;

/// Years tried, in order, as the baseline for the long-run change column.
const BASELINE_YEARS: [Year; 3] = [2000, 1999, 1998];

pub fn run(store: &ReferenceData) -> Result<()> {
    println!("{}", overview(store));
    Ok(())
}

pub fn run_years(store: &ReferenceData, symbol: &str) -> Result<()> {
    let years = store
        .available_years(symbol)
        .ok_or_else(|| anyhow!("Unknown instrument '{symbol}'"))?;

    if years.is_empty() {
        println!("No start years available for {symbol}.");
        return Ok(());
    }

    let listed = years
        .iter()
        .map(|y| y.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    println!(
        "{}: {listed}",
        ui::style_text(&format!("Start years for {symbol}"), ui::StyleType::TotalLabel)
    );
    Ok(())
}

/// Percent change from the first baseline year with a price to `current`.
pub fn long_run_change(instrument: &Instrument, current: f64) -> Option<(Year, f64)> {
    BASELINE_YEARS.iter().find_map(|year| {
        let old = instrument.prices.get(*year)?;
        Some((*year, (current - old) / old * 100.0))
    })
}

fn overview(store: &ReferenceData) -> String {
    let primary = store.primary_currency();
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Symbol"),
        ui::header_cell("Name"),
        ui::header_cell("Sector"),
        ui::header_cell(&format!("Current price ({primary})")),
        ui::header_cell("Long-run change"),
    ]);

    for instrument in store.instruments() {
        let current = store.current_price(&instrument.symbol);
        let price_cell = ui::format_optional_cell(current, |p| {
            if p.year == store.current_year() {
                format!("{:.2}", p.price)
            } else {
                format!("{:.2} ({})", p.price, p.year)
            }
        });
        let change_cell = match current.and_then(|p| long_run_change(instrument, p.price)) {
            Some((year, change)) => {
                ui::signed_cell(format!("{} since {year}", ui::format_percent(change)), change)
            }
            None => ui::na_cell(),
        };

        table.add_row(vec![
            Cell::new(&instrument.symbol),
            Cell::new(format!("{}\n{}", instrument.name, instrument.description)),
            Cell::new(&instrument.sector),
            price_cell,
            change_cell,
        ]);
    }

    format!(
        "{}\n\n{table}",
        ui::style_text("Instruments", ui::StyleType::Title)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reference::sample_dataset;

    #[test]
    fn long_run_change_uses_first_available_baseline() {
        let store = ReferenceData::new(sample_dataset()).unwrap();

        let apple = store.instrument("AAPL").unwrap();
        let (year, change) = long_run_change(apple, 7.42).unwrap();
        assert_eq!(year, 2000);
        assert!((change - 100.0).abs() < 1e-9);

        let mut late = apple.clone();
        late.prices = [(2010, 5.0), (2025, 10.0)].into_iter().collect();
        assert_eq!(long_run_change(&late, 10.0), None);

        let mut old = apple.clone();
        old.prices = [(1998, 4.0), (2025, 10.0)].into_iter().collect();
        assert_eq!(long_run_change(&old, 10.0).map(|(y, _)| y), Some(1998));
    }

    #[test]
    fn overview_lists_every_instrument() {
        let store = ReferenceData::new(sample_dataset()).unwrap();
        let text = console::strip_ansi_codes(&overview(&store)).to_string();
        assert!(text.contains("AAPL"));
        assert!(text.contains("GAP"));
        assert!(text.contains("254.27"));
        assert!(text.contains("100.00"));
        assert!(text.contains("(2024)"));
    }
}
