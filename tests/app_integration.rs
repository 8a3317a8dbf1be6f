use std::fs;
use tracing::info;
use whatif::core::{
    BuiltinSource, CalcError, FileSource, InputCurrency, InvalidQuery, Query, calculate,
    load_reference_data,
};

mod test_utils {
    use std::fs;
    use tempfile::TempDir;

    /// A dataset whose ETF has a year without exchange-rate coverage.
    pub const GAP_DATASET: &str = r#"
as_of: 2025-12-30
current_year: 2025
current_rate: 1439.01
primary_currency: USD
secondary_currency: KRW
exchange_rates:
  2019: 1165.65
  2020: 1180.27
  2022: 1291.95
  2023: 1305.41
  2024: 1420.76
  2025: 1439.01
instruments:
  - symbol: VTI
    name: Vanguard Total Stock Market ETF
    description: Total US stock market index
    sector: ETF
    prices: {2019: 179.45, 2020: 207.12, 2021: 244.06, 2022: 198.87,
             2023: 234.67, 2024: 292.00, 2025: 284.25}
"#;

    /// Writes a config pointing at `dataset` and returns its path.
    pub fn write_config(dir: &TempDir, dataset: Option<&str>, extra: &str) -> String {
        let mut config = String::new();
        if let Some(content) = dataset {
            let dataset_path = dir.path().join("dataset.yaml");
            fs::write(&dataset_path, content).expect("Failed to write dataset file");
            config.push_str(&format!("dataset_path: {:?}\n", dataset_path));
        }
        config.push_str(extra);

        let config_path = dir.path().join("config.yaml");
        fs::write(&config_path, config).expect("Failed to write config file");
        config_path.to_string_lossy().into_owned()
    }
}

#[test_log::test(tokio::test)]
async fn test_calculate_with_builtin_dataset() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&dir, None, "default_currency: secondary\n");

    let result = whatif::run_command(
        whatif::AppCommand::Calculate {
            symbol: "aapl".to_string(),
            year: 1999,
            amount: 1_000_000.0,
            currency: None,
            json: false,
        },
        Some(&config_path),
    )
    .await;
    assert!(result.is_ok(), "Calculate failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_every_listing_command_succeeds() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&dir, None, "default_currency: secondary\n");

    let commands = vec![
        whatif::AppCommand::Instruments,
        whatif::AppCommand::Years {
            symbol: "SPY".to_string(),
        },
        whatif::AppCommand::History { symbol: None },
        whatif::AppCommand::History {
            symbol: Some("nvda".to_string()),
        },
        whatif::AppCommand::Compare {
            year: 2010,
            amount: 1000.0,
            currency: Some(InputCurrency::Primary),
        },
        whatif::AppCommand::Calculate {
            symbol: "TSLA".to_string(),
            year: 2010,
            amount: 1000.0,
            currency: Some(InputCurrency::Primary),
            json: true,
        },
    ];

    for command in commands {
        let result = whatif::run_command(command, Some(&config_path)).await;
        assert!(result.is_ok(), "Command failed with: {:?}", result.err());
    }
}

#[test_log::test(tokio::test)]
async fn test_invalid_queries_are_reported() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&dir, None, "default_currency: secondary\n");

    let cases = [
        ("AAPL", 1999, 0.0, "positive"),
        ("AAPL", 1999, -10.0, "positive"),
        ("AAPL", 2025, 100.0, "before the current year"),
        ("SPY", 1993, 100.0, "No exchange rate"),
        ("ZZZZ", 2000, 100.0, "Unknown instrument"),
    ];
    for (symbol, year, amount, expected) in cases {
        let result = whatif::run_command(
            whatif::AppCommand::Calculate {
                symbol: symbol.to_string(),
                year,
                amount,
                currency: None,
                json: false,
            },
            Some(&config_path),
        )
        .await;
        let err = result.expect_err("Query should be rejected");
        info!(%err, "Rejected query");
        assert!(
            err.to_string().contains(expected),
            "'{err}' should mention '{expected}'"
        );
    }

    let result = whatif::run_command(
        whatif::AppCommand::Years {
            symbol: "ZZZZ".to_string(),
        },
        Some(&config_path),
    )
    .await;
    assert!(result.is_err());
}

#[test_log::test(tokio::test)]
async fn test_series_omits_year_without_exchange_rate() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let dataset_path = dir.path().join("dataset.yaml");
    fs::write(&dataset_path, test_utils::GAP_DATASET).expect("Failed to write dataset file");

    let store = load_reference_data(&FileSource::new(&dataset_path))
        .await
        .expect("Dataset should load");
    assert!(!store.available_years("VTI").unwrap().contains(&2021));

    let outcome = calculate(
        &store,
        &Query {
            symbol: "VTI".to_string(),
            start_year: 2019,
            amount: 1000.0,
            currency: InputCurrency::Primary,
        },
    )
    .expect("Gap years must not fail the calculation");

    let years: Vec<i32> = outcome.series.iter().map(|p| p.year).collect();
    assert_eq!(years, vec![2019, 2020, 2022, 2023, 2024, 2025]);

    // The command path uses the same dataset through the config file.
    let config_path = test_utils::write_config(&dir, Some(test_utils::GAP_DATASET), "");
    let result = whatif::run_command(
        whatif::AppCommand::Calculate {
            symbol: "VTI".to_string(),
            year: 2019,
            amount: 1000.0,
            currency: Some(InputCurrency::Primary),
            json: false,
        },
        Some(&config_path),
    )
    .await;
    assert!(result.is_ok(), "Calculate failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_concurrent_calculations_share_one_store() {
    let store = std::sync::Arc::new(
        load_reference_data(&BuiltinSource)
            .await
            .expect("Built-in dataset should load"),
    );

    let handles: Vec<_> = ["AAPL", "MSFT", "JNJ", "WMT"]
        .into_iter()
        .map(|symbol| {
            let store = std::sync::Arc::clone(&store);
            std::thread::spawn(move || {
                calculate(
                    &store,
                    &Query {
                        symbol: symbol.to_string(),
                        start_year: 1995,
                        amount: 1_000_000.0,
                        currency: InputCurrency::Secondary,
                    },
                )
            })
        })
        .collect();

    for handle in handles {
        let outcome = handle
            .join()
            .expect("Thread panicked")
            .expect("Calculation failed");
        let again = calculate(
            &store,
            &Query {
                symbol: outcome.symbol.clone(),
                start_year: 1995,
                amount: 1_000_000.0,
                currency: InputCurrency::Secondary,
            },
        )
        .expect("Calculation failed");
        assert_eq!(outcome, again);
    }
}

#[test_log::test(tokio::test)]
async fn test_start_year_equal_to_current_year_is_invalid() {
    let store = load_reference_data(&BuiltinSource)
        .await
        .expect("Built-in dataset should load");

    let err = calculate(
        &store,
        &Query {
            symbol: "AAPL".to_string(),
            start_year: store.current_year(),
            amount: 100.0,
            currency: InputCurrency::Primary,
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        CalcError::InvalidQuery(InvalidQuery::NotBeforeCurrentYear { .. })
    ));
}
