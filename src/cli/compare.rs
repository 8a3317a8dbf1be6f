use super::ui;
use crate::core::{InputCurrency, Outcome, Query, ReferenceData, Year, engine};
use anyhow::Result;
use comfy_table::{Attribute, Cell};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info};

pub async fn run(
    store: Arc<ReferenceData>,
    start_year: Year,
    amount: f64,
    currency: InputCurrency,
) -> Result<()> {
    info!("Comparing instruments from {start_year}...");

    let pb = ui::new_progress_bar(comparable_symbols(&store, start_year).len() as u64);
    let outcomes = compare(Arc::clone(&store), start_year, amount, currency, &|| {
        pb.inc(1)
    })
    .await?;
    pb.finish_and_clear();

    if outcomes.is_empty() {
        println!("No instruments can be bought in {start_year}.");
        return Ok(());
    }

    println!("{}", display_comparison(&outcomes, &store));
    Ok(())
}

/// Symbols that can be bought in `start_year`, in dataset order.
pub fn comparable_symbols(store: &ReferenceData, start_year: Year) -> Vec<String> {
    store
        .instruments()
        .iter()
        .filter(|i| {
            store
                .available_years(&i.symbol)
                .is_some_and(|years| years.contains(&start_year))
        })
        .map(|i| i.symbol.clone())
        .collect()
}

/// Runs the same query for every instrument that can be bought in
/// `start_year`, each on its own blocking task, and ranks the outcomes by
/// total return, best first.
pub async fn compare(
    store: Arc<ReferenceData>,
    start_year: Year,
    amount: f64,
    currency: InputCurrency,
    update_callback: &(dyn Fn() + Sync),
) -> Result<Vec<Outcome>> {
    let symbols = comparable_symbols(&store, start_year);
    debug!("{} instruments available in {start_year}", symbols.len());

    let futures = symbols.into_iter().map(|symbol| {
        let store = Arc::clone(&store);
        async move {
            let query = Query {
                symbol,
                start_year,
                amount,
                currency,
            };
            let result =
                tokio::task::spawn_blocking(move || engine::calculate(&store, &query)).await;
            update_callback();
            result
        }
    });

    let mut outcomes = Vec::new();
    for result in join_all(futures).await {
        outcomes.push(result??);
    }
    outcomes.sort_by(|a, b| b.total_return_percent.total_cmp(&a.total_return_percent));
    Ok(outcomes)
}

fn display_comparison(outcomes: &[Outcome], store: &ReferenceData) -> String {
    let secondary = store.secondary_currency();
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Instrument"),
        ui::header_cell(&format!("Current value ({secondary})")),
        ui::header_cell("Total return"),
        ui::header_cell("Annualized"),
    ]);

    for (rank, outcome) in outcomes.iter().enumerate() {
        let mut name = Cell::new(format!("{} ({})", outcome.name, outcome.symbol));
        if rank == 0 {
            name = name.add_attribute(Attribute::Bold);
        }
        table.add_row(vec![
            Cell::new(rank + 1),
            name,
            ui::number_cell(ui::format_amount(outcome.current_secondary)),
            ui::change_cell(outcome.total_return_percent),
            ui::change_cell(outcome.annual_return_percent),
        ]);
    }

    let first = &outcomes[0];
    format!(
        "{}\n\n{table}\n\nInvested: {}",
        ui::style_text(
            &format!("Since {}", first.start_year),
            ui::StyleType::Title
        ),
        ui::style_text(
            &format!("{} {secondary}", ui::format_amount(first.initial_secondary)),
            ui::StyleType::TotalValue
        )
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reference::sample_dataset;
    use crate::core::{CalcError, InvalidQuery};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn store() -> Arc<ReferenceData> {
        Arc::new(ReferenceData::new(sample_dataset()).unwrap())
    }

    #[tokio::test]
    async fn ranks_instruments_by_total_return() {
        let calls = AtomicUsize::new(0);
        let outcomes = compare(store(), 1999, 1000.0, InputCurrency::Primary, &|| {
            calls.fetch_add(1, Ordering::SeqCst);
        })
        .await
        .unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].symbol, "AAPL");
        assert_eq!(outcomes[1].symbol, "GAP");
        assert!(outcomes[0].total_return_percent > outcomes[1].total_return_percent);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn skips_instruments_without_the_start_year() {
        // AAPL has no 2002 price.
        let outcomes = compare(store(), 2002, 1000.0, InputCurrency::Primary, &|| ())
            .await
            .unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].symbol, "GAP");

        let none = compare(store(), 1990, 1000.0, InputCurrency::Primary, &|| ())
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn callback_fires_once_per_comparable_symbol() {
        let store = store();
        // AAPL has no 2002 price, so only GAP takes part.
        assert_eq!(comparable_symbols(&store, 2002), vec!["GAP".to_string()]);
        assert!(comparable_symbols(&store, 1990).is_empty());

        let calls = AtomicUsize::new(0);
        compare(Arc::clone(&store), 2002, 1000.0, InputCurrency::Primary, &|| {
            calls.fetch_add(1, Ordering::SeqCst);
        })
        .await
        .unwrap();
        assert_eq!(
            calls.load(Ordering::SeqCst),
            comparable_symbols(&store, 2002).len()
        );
    }

    #[tokio::test]
    async fn propagates_invalid_amount() {
        let err = compare(store(), 1999, -1.0, InputCurrency::Primary, &|| ())
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<CalcError>(),
            Some(&CalcError::InvalidQuery(InvalidQuery::NonPositiveAmount(
                -1.0
            )))
        );
    }

    #[tokio::test]
    async fn comparison_table_shows_ranks() {
        let store = store();
        let outcomes = compare(Arc::clone(&store), 1999, 1000.0, InputCurrency::Primary, &|| ())
            .await
            .unwrap();
        let text = console::strip_ansi_codes(&display_comparison(&outcomes, &store)).to_string();
        assert!(text.contains("Since 1999"));
        assert!(text.contains("AAPL"));
        assert!(text.contains("Invested: 1,188,820 KRW"));
    }
}
