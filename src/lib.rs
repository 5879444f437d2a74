pub mod app;
pub mod cli;
pub mod convert;
pub mod core;
pub mod precache;
pub mod providers;
pub mod store;

use crate::app::App;
use crate::core::config::AppConfig;
use crate::core::currency::ProviderKind;
use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, info};

pub enum AppCommand {
    Convert {
        amount: String,
        from: String,
        to: String,
        api: Option<ProviderKind>,
        json: bool,
    },
    Precache {
        force: bool,
    },
    Rates {
        date: Option<NaiveDate>,
    },
    Currencies,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxconv starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Convert {
            amount,
            from,
            to,
            api,
            json,
        } => {
            let app = App::from_config(config)?;
            cli::convert::run(&app, &amount, &from, &to, api, json).await
        }
        AppCommand::Precache { force } => {
            let app = App::from_config(config)?;
            cli::precache::run(&app, force).await
        }
        AppCommand::Rates { date } => {
            let app = App::from_config(config)?;
            cli::rates::run(&app, date).await
        }
        AppCommand::Currencies => {
            cli::currencies::run();
            Ok(())
        }
    }
}
