use super::{facts, ui};
use crate::core::{InputCurrency, Outcome, Query, ReferenceData, engine};
use anyhow::Result;
use comfy_table::Cell;
use tracing::info;

const CHART_WIDTH: usize = 40;

pub fn run(store: &ReferenceData, query: &Query, json: bool) -> Result<()> {
    info!(
        "Calculating {} from {} with {} ({:?})",
        query.symbol, query.start_year, query.amount, query.currency
    );
    let outcome = engine::calculate(store, query)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", render(&outcome, store));
    }
    Ok(())
}

/// Renders the full report: summary, exchange rates, chart and fun facts.
pub fn render(outcome: &Outcome, store: &ReferenceData) -> String {
    let primary = store.primary_currency();
    let secondary = store.secondary_currency();

    let mut output = format!(
        "{} ({}) since {}\n\n",
        ui::style_text(&outcome.name, ui::StyleType::Title),
        outcome.symbol,
        outcome.start_year
    );

    output.push_str(&summary_table(outcome, primary, secondary).to_string());
    output.push_str("\n\n");
    output.push_str(&exchange_table(outcome, secondary).to_string());
    output.push_str("\n\n");
    output.push_str(&ui::style_text(
        &format!("Value over time ({secondary})"),
        ui::StyleType::TotalLabel,
    ));
    output.push('\n');
    output.push_str(&chart_table(outcome).to_string());
    output.push_str("\n\n");

    for fact in facts::fun_facts(outcome, secondary) {
        output.push_str(&fact);
        output.push('\n');
    }

    output.push_str(&ui::style_text(
        &format!(
            "Prices are split-adjusted annual averages; rates as of {}.",
            store.as_of()
        ),
        ui::StyleType::Subtle,
    ));
    output
}

fn summary_table(outcome: &Outcome, primary: &str, secondary: &str) -> comfy_table::Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Metric"), ui::header_cell("Value")]);

    let initial_value = match outcome.input_currency {
        InputCurrency::Primary => format!(
            "{} {primary} ({} {secondary})",
            ui::format_number(outcome.initial_primary, 2),
            ui::format_amount(outcome.initial_secondary)
        ),
        InputCurrency::Secondary => format!(
            "{} {secondary} ({} {primary})",
            ui::format_amount(outcome.initial_secondary),
            ui::format_number(outcome.initial_primary, 2)
        ),
    };
    table.add_row(vec![
        Cell::new("Initial investment"),
        ui::number_cell(initial_value),
    ]);

    table.add_row(vec![
        Cell::new("Current value"),
        ui::number_cell(format!(
            "{} {secondary} ({} {primary})",
            ui::format_amount(outcome.current_secondary),
            ui::format_number(outcome.current_primary, 2)
        )),
    ]);
    table.add_row(vec![
        Cell::new("Total return"),
        ui::change_cell(outcome.total_return_percent),
    ]);
    table.add_row(vec![
        Cell::new("Total gain"),
        ui::signed_amount_cell(outcome.total_gain_secondary, secondary),
    ]);
    table.add_row(vec![
        Cell::new("Annualized return"),
        ui::change_cell(outcome.annual_return_percent),
    ]);
    table.add_row(vec![
        Cell::new(format!("Return in {primary}")),
        ui::change_cell(outcome.price_return_percent),
    ]);
    table.add_row(vec![
        Cell::new("Shares"),
        ui::number_cell(format!("{:.2}", outcome.shares)),
    ]);

    let current_year = outcome.start_year + outcome.years_elapsed;
    let current_price_label = if outcome.current_price.year == current_year {
        "Current price".to_string()
    } else {
        format!("Current price ({})", outcome.current_price.year)
    };
    table.add_row(vec![
        Cell::new(format!("Price in {}", outcome.start_year)),
        ui::number_cell(format!("{:.2} {primary}", outcome.initial_price)),
    ]);
    table.add_row(vec![
        Cell::new(current_price_label),
        ui::number_cell(format!("{:.2} {primary}", outcome.current_price.price)),
    ]);

    table
}

fn exchange_table(outcome: &Outcome, secondary: &str) -> comfy_table::Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(&format!("Rate in {}", outcome.start_year)),
        ui::header_cell("Current rate"),
        ui::header_cell("Change"),
    ]);
    table.add_row(vec![
        ui::number_cell(format!(
            "{} {secondary}",
            ui::format_number(outcome.initial_rate, 2)
        )),
        ui::number_cell(format!(
            "{} {secondary}",
            ui::format_number(outcome.current_rate, 2)
        )),
        ui::change_cell(outcome.exchange_change_percent),
    ]);
    table
}

fn chart_table(outcome: &Outcome) -> comfy_table::Table {
    let max = outcome
        .series
        .iter()
        .map(|p| p.value)
        .fold(0.0_f64, f64::max);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Year"),
        ui::header_cell("Value"),
        ui::header_cell(""),
    ]);
    for point in &outcome.series {
        table.add_row(vec![
            Cell::new(point.year),
            ui::number_cell(ui::format_amount(point.value)),
            Cell::new(ui::bar(point.value, max, CHART_WIDTH)),
        ]);
    }
    table
}
