pub mod cli;
pub mod core;

use crate::core::{InputCurrency, Query, Year, config::AppConfig, load_reference_data};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Calculate {
        symbol: String,
        year: Year,
        amount: f64,
        currency: Option<InputCurrency>,
        json: bool,
    },
    Years {
        symbol: String,
    },
    Instruments,
    History {
        symbol: Option<String>,
    },
    Compare {
        year: Year,
        amount: f64,
        currency: Option<InputCurrency>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("whatif starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    // Built once and shared by reference with every command.
    let source = config.dataset_source();
    let store = Arc::new(load_reference_data(source.as_ref()).await?);

    match command {
        AppCommand::Calculate {
            symbol,
            year,
            amount,
            currency,
            json,
        } => {
            let query = Query {
                symbol: cli::resolve_symbol(&store, &symbol),
                start_year: year,
                amount,
                currency: currency.unwrap_or(config.default_currency),
            };
            cli::calculate::run(&store, &query, json)
        }
        AppCommand::Years { symbol } => {
            cli::instruments::run_years(&store, &cli::resolve_symbol(&store, &symbol))
        }
        AppCommand::Instruments => cli::instruments::run(&store),
        AppCommand::History { symbol } => {
            let symbol = symbol.map(|s| cli::resolve_symbol(&store, &s));
            cli::history::run(&store, symbol.as_deref())
        }
        AppCommand::Compare {
            year,
            amount,
            currency,
        } => {
            cli::compare::run(
                store,
                year,
                amount,
                currency.unwrap_or(config.default_currency),
            )
            .await
        }
    }
}
