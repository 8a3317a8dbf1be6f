use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use whatif::core::{InputCurrency, log::init_logging};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum CurrencyArg {
    /// Currency the instrument prices are quoted in
    Primary,
    /// Local currency the results are reported in
    Secondary,
}

impl From<CurrencyArg> for InputCurrency {
    fn from(arg: CurrencyArg) -> InputCurrency {
        match arg {
            CurrencyArg::Primary => InputCurrency::Primary,
            CurrencyArg::Secondary => InputCurrency::Secondary,
        }
    }
}

impl From<Commands> for whatif::AppCommand {
    fn from(cmd: Commands) -> whatif::AppCommand {
        match cmd {
            Commands::Calculate {
                symbol,
                year,
                amount,
                currency,
                json,
            } => whatif::AppCommand::Calculate {
                symbol,
                year,
                amount,
                currency: currency.map(Into::into),
                json,
            },
            Commands::Years { symbol } => whatif::AppCommand::Years { symbol },
            Commands::Instruments => whatif::AppCommand::Instruments,
            Commands::History { symbol } => whatif::AppCommand::History { symbol },
            Commands::Compare {
                year,
                amount,
                currency,
            } => whatif::AppCommand::Compare {
                year,
                amount,
                currency: currency.map(Into::into),
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Calculate what an investment would be worth today
    Calculate {
        /// Instrument symbol, e.g. AAPL
        symbol: String,
        /// Year the investment was made
        year: i32,
        /// Amount invested
        amount: f64,
        /// Currency of the amount
        #[arg(long, value_enum)]
        currency: Option<CurrencyArg>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the start years available for an instrument
    Years {
        /// Instrument symbol
        symbol: String,
    },
    /// Display all instruments with current prices
    Instruments,
    /// Display historical exchange rates, or an instrument's prices
    History {
        /// Instrument symbol; exchange rates are shown when omitted
        symbol: Option<String>,
    },
    /// Compare the same investment across all instruments
    Compare {
        /// Year the investment was made
        year: i32,
        /// Amount invested
        amount: f64,
        /// Currency of the amount
        #[arg(long, value_enum)]
        currency: Option<CurrencyArg>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => whatif::cli::setup::setup(),
        Some(cmd) => whatif::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
