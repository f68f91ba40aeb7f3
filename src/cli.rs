//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::env_config_adapter::EnvConfigAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::nse_fetcher::NseHolidayFetcher;
use crate::adapters::open_store;
use crate::domain::config::{RefreshConfig, build_refresh_config};
use crate::domain::error::HolidayError;
use crate::domain::refresh::{RefreshReport, refresh_holidays};
use crate::ports::fetch_port::HolidayFetcher;
use crate::ports::store_port::HolidayStore;

#[derive(Parser, Debug)]
#[command(
    name = "holiday-refresh",
    about = "Sync the trading-holiday calendar into the holidays table"
)]
pub struct Cli {
    /// INI config file; the environment (and `.env`) is used when absent
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Fail when the holiday source is unreachable instead of storing nothing
    #[arg(long)]
    pub strict: bool,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Fetch holidays and store the new ones (default)
    Refresh,
    /// Print stored holidays
    List,
}

pub fn run(cli: Cli) -> ExitCode {
    let config = match load_refresh_config(cli.config.as_ref()) {
        Ok(c) => c,
        Err(e) => return report_error(&e),
    };

    let result = match cli.command.unwrap_or(Command::Refresh) {
        Command::Refresh => run_refresh(&config, cli.strict).map(|_| ()),
        Command::List => run_list(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_error(&e),
    }
}

fn report_error(err: &HolidayError) -> ExitCode {
    tracing::error!(error = %err, "holiday refresh failed");
    ExitCode::from(err)
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, HolidayError> {
    FileConfigAdapter::from_file(path)
}

pub fn load_refresh_config(path: Option<&PathBuf>) -> Result<RefreshConfig, HolidayError> {
    match path {
        Some(p) => {
            tracing::info!(path = %p.display(), "loading config file");
            build_refresh_config(&load_config(p)?)
        }
        None => build_refresh_config(&EnvConfigAdapter::from_env()),
    }
}

fn run_refresh(config: &RefreshConfig, strict: bool) -> Result<RefreshReport, HolidayError> {
    let fetcher = NseHolidayFetcher::new(config.source.clone())?;
    tracing::info!(backend = config.backend.kind(), "opening holiday store");
    let mut store = open_store(config)?;
    execute_refresh(&fetcher, store.as_mut(), strict)
}

/// Runs one refresh. With `strict`, an unavailable source becomes
/// [`HolidayError::SourceUnavailable`] after the (empty) store step.
pub fn execute_refresh(
    fetcher: &dyn HolidayFetcher,
    store: &mut dyn HolidayStore,
    strict: bool,
) -> Result<RefreshReport, HolidayError> {
    let report = refresh_holidays(fetcher, store)?;
    match &report.unavailable {
        Some(reason) if strict => Err(HolidayError::SourceUnavailable {
            reason: reason.clone(),
        }),
        _ => Ok(report),
    }
}

fn run_list(config: &RefreshConfig) -> Result<(), HolidayError> {
    let store = open_store(config)?;
    for line in format_listing(store.as_ref())? {
        println!("{line}");
    }
    Ok(())
}

/// One `YYYY-MM-DD<TAB>title` line per stored holiday.
pub fn format_listing(store: &dyn HolidayStore) -> Result<Vec<String>, HolidayError> {
    Ok(store
        .list_holidays()?
        .iter()
        .map(|h| format!("{}\t{}", h.date_key(), h.title))
        .collect())
}
