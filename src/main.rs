use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use fxconv::core::currency::ProviderKind;
use fxconv::core::log::init_logging;

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
enum Api {
    /// Open ER API, covers every supported currency
    OpenEr,
    /// Frankfurter API, ECB currencies only
    Frankfurter,
}

impl From<Api> for ProviderKind {
    fn from(api: Api) -> ProviderKind {
        match api {
            Api::OpenEr => ProviderKind::OpenEr,
            Api::Frankfurter => ProviderKind::Frankfurter,
        }
    }
}

impl From<Commands> for fxconv::AppCommand {
    fn from(cmd: Commands) -> fxconv::AppCommand {
        match cmd {
            Commands::Convert {
                amount,
                from,
                to,
                api,
                json,
            } => fxconv::AppCommand::Convert {
                amount,
                from,
                to,
                api: api.map(Into::into),
                json,
            },
            Commands::Precache { force } => fxconv::AppCommand::Precache { force },
            Commands::Rates { date } => fxconv::AppCommand::Rates { date },
            Commands::Currencies => fxconv::AppCommand::Currencies,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert, must be positive
        amount: String,
        /// Currency code to convert from, e.g. USD
        from: String,
        /// Currency code to convert to, e.g. MYR
        to: String,
        /// Rate provider to use (defaults to the configured one)
        #[arg(short, long, value_enum)]
        api: Option<Api>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Backfill yesterday's rates for every currency pair
    Precache {
        /// Fetch even if the cache already looks complete
        #[arg(short, long)]
        force: bool,
    },
    /// Display cached rates for a day
    Rates {
        /// Day to show as YYYY-MM-DD (defaults to yesterday, UTC)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// List supported currencies per provider
    Currencies,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxconv::cli::setup::setup(),
        Some(cmd) => fxconv::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
