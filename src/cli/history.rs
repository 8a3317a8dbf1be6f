use super::ui;
use crate::core::{ReferenceData, Year};
use anyhow::{Result, anyhow};
use comfy_table::Cell;
use std::collections::BTreeMap;

/// One table row: the value for a year and its change from the year before.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub year: Year,
    pub value: f64,
    pub change: Option<f64>,
}

/// Newest-first rows with year-over-year change. The change is only defined
/// when the immediately preceding year has a value.
pub fn year_over_year(values: impl IntoIterator<Item = (Year, f64)>) -> Vec<HistoryRow> {
    let values: BTreeMap<Year, f64> = values.into_iter().collect();
    values
        .iter()
        .rev()
        .map(|(year, value)| HistoryRow {
            year: *year,
            value: *value,
            change: values
                .get(&(year - 1))
                .map(|prev| (value - prev) / prev * 100.0),
        })
        .collect()
}

pub fn run(store: &ReferenceData, symbol: Option<&str>) -> Result<()> {
    let output = match symbol {
        Some(symbol) => price_history(store, symbol)?,
        None => rate_history(store),
    };
    println!("{output}");
    Ok(())
}

fn change_cell(change: Option<f64>) -> Cell {
    match change {
        Some(change) => ui::change_cell(change),
        None => Cell::new("-"),
    }
}

fn rate_history(store: &ReferenceData) -> String {
    let secondary = store.secondary_currency();
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Year"),
        ui::header_cell(&format!("Rate ({secondary})")),
        ui::header_cell("Change"),
    ]);

    for row in year_over_year(store.exchange_rates().iter()) {
        table.add_row(vec![
            Cell::new(row.year),
            ui::number_cell(ui::format_number(row.value, 2)),
            change_cell(row.change),
        ]);
    }

    format!(
        "{}\n\n{table}",
        ui::style_text(
            &format!("{secondary} per {}", store.primary_currency()),
            ui::StyleType::Title
        )
    )
}

fn price_history(store: &ReferenceData, symbol: &str) -> Result<String> {
    let instrument = store
        .instrument(symbol)
        .ok_or_else(|| anyhow!("Unknown instrument '{symbol}'"))?;
    let primary = store.primary_currency();

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Year"),
        ui::header_cell(&format!("Price ({primary})")),
        ui::header_cell("Change"),
        ui::header_cell("Adjusted"),
    ]);

    for row in year_over_year(instrument.prices.iter()) {
        table.add_row(vec![
            Cell::new(row.year),
            ui::number_cell(ui::format_number(row.value, 2)),
            change_cell(row.change),
            Cell::new("yes"),
        ]);
    }

    let mut output = format!(
        "{} ({})\n",
        ui::style_text(&instrument.name, ui::StyleType::Title),
        instrument.symbol
    );
    if let Some(note) = &instrument.adjustment_note {
        output.push_str(&ui::style_text(
            &format!("Split-adjusted: {note}"),
            ui::StyleType::Subtle,
        ));
        output.push('\n');
    }
    output.push('\n');
    output.push_str(&table.to_string());
    Ok(output)
}
